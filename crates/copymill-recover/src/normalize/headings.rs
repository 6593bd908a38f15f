//! Markdown heading conversion.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^ {0,3}(#{1,6})[ \t]+(.*)$").expect("valid heading regex"));

static STRAY_HASHES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*)#+[ \t]*").expect("valid stray-hash regex"));

/// Convert `#`..`######` headings to `<h1>`..`<h6>`, tolerating up to
/// three leading spaces and stripping trailing `#` decoration.
pub(crate) fn convert_headings(text: &str) -> String {
    HEADING
        .replace_all(text, |caps: &regex::Captures| {
            let level = caps[1].len();
            let title = caps[2].trim().trim_end_matches('#').trim_end();
            if title.is_empty() {
                String::new()
            } else {
                format!("<h{level}>{title}</h{level}>")
            }
        })
        .into_owned()
}

/// Remove leading `#` runs that did not form a heading. Must run after
/// [`convert_headings`].
pub(crate) fn strip_stray_hashes(text: &str) -> String {
    STRAY_HASHES.replace_all(text, "$1").into_owned()
}
