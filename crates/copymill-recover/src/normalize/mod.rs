//! Markdown-to-HTML content normalization
//!
//! A pipeline of independent, order-sensitive text transforms. Ordering
//! matters: heading conversion must run before stray `#` stripping,
//! block-level conversion before inline conversion, and paragraph
//! wrapping last so converted blocks are not re-wrapped.
//!
//! The pipeline is idempotent: running [`normalize`] on its own output
//! yields the same string.

mod artifacts;
mod blocks;
mod fences;
mod headings;
mod inline;
mod paragraphs;
mod preamble;
mod tables;

use once_cell::sync::Lazy;
use regex::Regex;

/// Normalize possibly-markdown content into HTML.
///
/// Applies the full transform pipeline. Empty or whitespace-only input
/// yields an empty string; callers that need a non-empty guarantee layer
/// their own fallback (see [`crate::recover`]).
#[must_use]
pub fn normalize(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let text = fences::strip_fence_lines(input);
    let text = artifacts::strip_json_artifacts(&text);
    let text = preamble::strip_preamble(&text);
    let text = preamble::strip_trailing_commentary(&text);
    let text = headings::convert_headings(&text);
    let text = headings::strip_stray_hashes(&text);
    let text = tables::convert_tables(&text);
    let text = blocks::convert_lists(&text);
    let text = blocks::convert_blockquotes(&text);
    let text = inline::convert_inline(&text);
    let text = paragraphs::wrap_paragraphs(&text);
    collapse_whitespace(&text)
}

/// Trim trailing per-line whitespace and collapse 3+ newlines to 2.
fn collapse_whitespace(text: &str) -> String {
    static TRAILING_WS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?m)[ \t]+$").expect("valid whitespace regex"));
    static EXCESS_NEWLINES: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));

    let text = TRAILING_WS.replace_all(text, "");
    EXCESS_NEWLINES.replace_all(&text, "\n\n").trim().to_string()
}
