//! Paragraph wrapping for remaining bare-text blocks.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid markup regex"));

/// Wrap bare-text blocks (split on blank lines) in `<p>` tags, skipping
/// blocks that already contain markup. Blocks are re-joined with a
/// single blank line.
pub(crate) fn wrap_paragraphs(text: &str) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    let flush = |current: &mut Vec<&str>, blocks: &mut Vec<String>| {
        if current.is_empty() {
            return;
        }
        let block = current.join("\n");
        let trimmed = block.trim();
        if !trimmed.is_empty() {
            if MARKUP.is_match(trimmed) {
                blocks.push(trimmed.to_string());
            } else {
                blocks.push(format!("<p>{trimmed}</p>"));
            }
        }
        current.clear();
    };

    for line in text.lines() {
        if line.trim().is_empty() {
            flush(&mut current, &mut blocks);
        } else {
            current.push(line);
        }
    }
    flush(&mut current, &mut blocks);

    blocks.join("\n\n")
}
