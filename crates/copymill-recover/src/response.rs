//! The recovered response type and its deterministic fallbacks.

use serde::{Deserialize, Serialize};

/// A well-formed generation result.
///
/// Produced by [`crate::recover`]; `content` is normalized HTML and is
/// guaranteed non-empty. Wire names match the backend contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Normalized HTML body.
    pub content: String,
    /// SEO title, recovered or synthesized from the keyword.
    #[serde(rename = "metaSeoTitle")]
    pub meta_seo_title: String,
    /// Meta description, recovered or synthesized from the keyword.
    #[serde(rename = "metaDescription")]
    pub meta_description: String,
}

/// Deterministic SEO title for a keyword, used when the backend response
/// exposes none.
#[must_use]
pub fn fallback_title(keyword: &str) -> String {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        "Generated Content | Expert Insights".to_string()
    } else {
        format!("{keyword}: Complete Guide & Expert Insights")
    }
}

/// Deterministic meta description for a keyword.
#[must_use]
pub fn fallback_description(keyword: &str) -> String {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        "Expert insights and practical strategies for your team.".to_string()
    } else {
        format!(
            "Discover proven strategies and expert insights on {keyword}. \
             Practical guidance your team can apply today."
        )
    }
}
