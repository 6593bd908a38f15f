//! Leaked-JSON artifact cleanup.
//!
//! When a tier hands over raw text that was really the inside (or the
//! whole) of a JSON string, fragments like a leading `{"content":"`, a
//! trailing `"}` and literal `\n` escapes leak into the content. This
//! transform strips them before markdown conversion.

use crate::tiers::unescape_json;

const LEAK_PREFIXES: [&str; 3] = ["{\"content\":\"", "{\"content\": \"", "{ \"content\": \""];
const LEAK_SUFFIXES: [&str; 2] = ["\"}", "\" }"];

/// Strip leaked JSON wrapper fragments and boundary escape artifacts.
pub(crate) fn strip_json_artifacts(text: &str) -> String {
    let mut text = text.trim();
    let mut leaked = false;

    for prefix in LEAK_PREFIXES {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest;
            leaked = true;
            break;
        }
    }
    if leaked {
        for suffix in LEAK_SUFFIXES {
            if let Some(rest) = text.strip_suffix(suffix) {
                text = rest;
                break;
            }
        }
    }

    // Stray literal escapes at the string boundaries.
    loop {
        let before = text;
        text = text.trim();
        for pattern in ["\\n", "\\t"] {
            text = text.strip_prefix(pattern).unwrap_or(text);
            text = text.strip_suffix(pattern).unwrap_or(text);
        }
        if text == before {
            break;
        }
    }

    if leaked {
        // The body was a JSON string literal; decode it fully.
        unescape_json(text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leaked_wrapper_and_unescapes() {
        let input = r##"{"content":"# Title\n\nBody"}"##;
        assert_eq!(strip_json_artifacts(input), "# Title\n\nBody");
    }

    #[test]
    fn strips_boundary_escapes() {
        assert_eq!(strip_json_artifacts("\\n\\nreal text\\n"), "real text");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(strip_json_artifacts("plain text"), "plain text");
        // Interior literal escapes without a leak prefix stay put.
        assert_eq!(strip_json_artifacts("a \\n b"), "a \\n b");
    }

    #[test]
    fn idempotent() {
        let input = r#"{"content":"Body \"quoted\""}"#;
        let once = strip_json_artifacts(input);
        assert_eq!(strip_json_artifacts(&once), once);
    }
}
