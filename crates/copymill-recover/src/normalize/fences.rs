//! Code-fence delimiter removal.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*```[A-Za-z0-9_-]*[ \t]*(\n|$)").expect("valid fence regex")
});

/// Remove lines that are pure code-fence delimiters (```` ``` ````,
/// ```` ```html ````, ...), keeping the fenced body.
pub(crate) fn strip_fence_lines(text: &str) -> String {
    FENCE_LINE.replace_all(text, "").into_owned()
}
