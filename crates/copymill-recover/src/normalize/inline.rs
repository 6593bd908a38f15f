//! Inline markup conversion: links, emphasis, inline code.

use once_cell::sync::Lazy;
use regex::Regex;

static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").expect("valid link regex"));
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*\n]+)\*\*").expect("valid bold regex"));
static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^\s*][^*\n]*?)\*").expect("valid italic regex"));
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("valid code regex"));

/// Convert inline markdown to HTML, then strip unmatched `*`/`` ` ``
/// markers rather than leaving them dangling.
///
/// Links open in a new context (`target="_blank"` with
/// `rel="noopener noreferrer"`).
pub(crate) fn convert_inline(text: &str) -> String {
    let text = LINK.replace_all(text, {
        r#"<a href="$2" target="_blank" rel="noopener noreferrer">$1</a>"#
    });
    let text = BOLD.replace_all(&text, "<strong>$1</strong>");
    let text = ITALIC.replace_all(&text, "<em>$1</em>");
    let text = CODE.replace_all(&text, "<code>$1</code>");

    // Leftover markers are stripped, not preserved.
    text.replace(['*', '`'], "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn converts_links() {
        assert_eq!(
            convert_inline("[docs](https://example.com)"),
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">docs</a>"#
        );
    }

    #[test]
    fn converts_emphasis_and_code() {
        assert_eq!(
            convert_inline("**b** and *i* and `c`"),
            "<strong>b</strong> and <em>i</em> and <code>c</code>"
        );
    }

    #[test]
    fn bold_binds_tighter_than_italic() {
        assert_eq!(convert_inline("**bold**"), "<strong>bold</strong>");
    }

    #[test]
    fn unmatched_markers_are_stripped() {
        assert_eq!(convert_inline("dangling* marker"), "dangling marker");
        assert_eq!(convert_inline("**half open"), "half open");
        assert_eq!(convert_inline("`unclosed"), "unclosed");
    }

    #[test]
    fn stable_on_converted_output() {
        let once = convert_inline("**b** [l](https://x.dev)");
        assert_eq!(convert_inline(&once), once);
    }
}
