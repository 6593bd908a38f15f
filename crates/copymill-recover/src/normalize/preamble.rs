//! AI preamble and trailing meta-commentary removal.

/// Lead-in phrases models prepend before the actual content. Matched
/// case-insensitively against the start of the first line only.
const PREAMBLE_PREFIXES: &[&str] = &[
    "here's the content",
    "here is the content",
    "here's your",
    "here is your",
    "i'll create",
    "i'll generate",
    "i'll write",
    "i've created",
    "i have created",
    "sure, here",
    "sure! here",
    "certainly, here",
    "certainly! here",
    "below is the",
];

/// Phrases that open trailing commentary about the content instead of
/// content itself. Everything from the first such line onward is cut.
const COMMENTARY_LEADS: &[&str] = &[
    "this content structure:",
    "this structure:",
    "would you like me to",
    "let me know if",
    "i hope this helps",
    "feel free to",
];

/// Drop leading preamble lines ("Here's the content:", ...).
///
/// Only the first line is considered per round, and never at the cost of
/// emptying the document.
pub(crate) fn strip_preamble(text: &str) -> String {
    let mut remaining = text.trim_start();
    for _ in 0..2 {
        let Some((first, rest)) = remaining.split_once('\n') else {
            break;
        };
        let lower = first.trim().to_lowercase();
        let is_preamble = PREAMBLE_PREFIXES.iter().any(|p| lower.starts_with(p))
            && (first.trim_end().ends_with(':') || first.len() < 80);
        if is_preamble && !rest.trim().is_empty() {
            remaining = rest.trim_start();
        } else {
            break;
        }
    }
    remaining.to_string()
}

/// Truncate trailing meta-commentary, provided real content precedes it.
pub(crate) fn strip_trailing_commentary(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        let lower = line.trim().to_lowercase();
        if COMMENTARY_LEADS.iter().any(|p| lower.starts_with(p))
            && lines[..i].iter().any(|l| !l.trim().is_empty())
        {
            return lines[..i].join("\n").trim_end().to_string();
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_preamble() {
        assert_eq!(strip_preamble("Here's the content:\n\nBody"), "Body");
        assert_eq!(strip_preamble("I'll create a post for you:\nBody"), "Body");
    }

    #[test]
    fn keeps_content_without_preamble() {
        assert_eq!(strip_preamble("## Title\nBody"), "## Title\nBody");
    }

    #[test]
    fn never_empties_the_document() {
        assert_eq!(
            strip_preamble("Here's the content:"),
            "Here's the content:"
        );
    }

    #[test]
    fn truncates_trailing_commentary() {
        let input = "Real content here.\n\nWould you like me to add more sections?";
        assert_eq!(strip_trailing_commentary(input), "Real content here.");
    }

    #[test]
    fn commentary_without_preceding_content_is_kept() {
        let input = "Let me know if this works";
        assert_eq!(strip_trailing_commentary(input), input);
    }
}
