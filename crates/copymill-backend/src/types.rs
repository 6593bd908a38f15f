//! Wire types for the generation backend.
//!
//! Field names follow the backend contract exactly, which mixes casing
//! (`jobTitle` next to `brand_kit`); serde renames keep the Rust side
//! uniform.

use serde::{Deserialize, Serialize};

/// Content type being generated; doubles as the route segment of the
/// backend endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Blog post.
    Blog,
    /// Email newsletter.
    Newsletter,
    /// Competitor-conquesting article.
    Competitor,
}

impl ContentKind {
    /// Route segment used in backend paths.
    #[inline]
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Newsletter => "newsletter",
            Self::Competitor => "competitor",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" => Ok(Self::Blog),
            "newsletter" => Ok(Self::Newsletter),
            "competitor" => Ok(Self::Competitor),
            other => Err(format!("unknown content kind: {other}")),
        }
    }
}

/// Body of `generate-content` / `regenerate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Subject keyword driving generation and meta fallbacks.
    pub keyword: String,
    /// Target job title, for competitor-conquesting content.
    #[serde(rename = "jobTitle", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Brand kit blob forwarded verbatim to the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_kit: Option<serde_json::Value>,
    /// System prompt.
    pub system_prompt: String,
    /// User prompt.
    pub user_prompt: String,
}

impl GenerationRequest {
    /// Request for `keyword` with the given prompts.
    #[must_use]
    pub fn new(
        keyword: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            job_title: None,
            brand_kit: None,
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }

    /// With a target job title.
    #[must_use]
    pub fn with_job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = Some(job_title.into());
        self
    }

    /// With a brand kit blob.
    #[must_use]
    pub fn with_brand_kit(mut self, brand_kit: serde_json::Value) -> Self {
        self.brand_kit = Some(brand_kit);
        self
    }
}

/// Body of `generate-meta`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaRequest {
    /// Content to derive meta fields from.
    pub content: String,
    /// Subject keyword.
    pub keyword: String,
}

/// Response of `generate-meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaResponse {
    /// SEO title.
    #[serde(rename = "metaSeoTitle")]
    pub meta_seo_title: String,
    /// Meta description.
    #[serde(rename = "metaDescription")]
    pub meta_description: String,
}

/// Body of `publish-to-cms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    /// Post title.
    pub title: String,
    /// HTML body.
    #[serde(rename = "htmlContent")]
    pub html_content: String,
    /// SEO title, if generated.
    #[serde(rename = "metaSeoTitle", skip_serializing_if = "Option::is_none")]
    pub meta_seo_title: Option<String>,
    /// Meta description, if generated.
    #[serde(rename = "metaDescription", skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    /// CMS publication status (e.g. `draft`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Response of `publish-to-cms`.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishResponse {
    /// URL of the published post, when the CMS reports one.
    pub url: Option<String>,
    /// CMS message, if any.
    pub message: Option<String>,
}
