//! Generation backend client.

use crate::error::BackendError;
use crate::types::{
    ContentKind, GenerationRequest, MetaRequest, MetaResponse, PublishRequest, PublishResponse,
};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl BackendConfig {
    /// Config for `base_url` with defaults.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// With a bearer token.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// With a per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read configuration from `COPYMILL_API_URL`, `COPYMILL_API_KEY`
    /// and `COPYMILL_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, BackendError> {
        let base_url = std::env::var("COPYMILL_API_URL")
            .map_err(|_| BackendError::NotConfigured("COPYMILL_API_URL is not set".to_string()))?;
        let mut config = Self::new(base_url);
        if let Ok(key) = std::env::var("COPYMILL_API_KEY") {
            config.api_key = Some(key);
        }
        if let Some(secs) = std::env::var("COPYMILL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

/// The generation backend seam.
///
/// Every call is made exactly once; no implementation retries. Raw-text
/// responses are handed to the recovery parser downstream.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// `POST /api/{kind}/generate-content`, returning the raw response
    /// text.
    async fn generate(
        &self,
        kind: ContentKind,
        request: &GenerationRequest,
    ) -> Result<String, BackendError>;

    /// `POST /api/{kind}/regenerate`, returning the raw response text.
    async fn regenerate(
        &self,
        kind: ContentKind,
        request: &GenerationRequest,
    ) -> Result<String, BackendError>;

    /// `POST /api/content/generate-meta`.
    async fn generate_meta(&self, request: &MetaRequest) -> Result<MetaResponse, BackendError>;

    /// `POST /api/content/publish-to-cms`.
    async fn publish(&self, request: &PublishRequest) -> Result<PublishResponse, BackendError>;
}

/// `reqwest`-based [`ContentBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl HttpBackend {
    /// Build a client for `config`.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::NotConfigured(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Build a client from the environment.
    pub fn from_env() -> Result<Self, BackendError> {
        Self::new(BackendConfig::from_env()?)
    }

    /// POST `body` to `path`, returning the raw response body. Non-2xx
    /// statuses become [`BackendError::Api`].
    async fn post_raw<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, BackendError> {
        let url = format!("{}{path}", self.config.base_url);
        tracing::debug!(%url, "posting to backend");

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        // Read as text first so error bodies survive JSON failures.
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "backend returned error status");
            return Err(BackendError::from_error_body(status.as_u16(), &text));
        }
        Ok(text)
    }

    async fn post_json<B: Serialize + Sync, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let text = self.post_raw(path, body).await?;
        serde_json::from_str(&text).map_err(|e| BackendError::InvalidPayload(e.to_string()))
    }
}

#[async_trait]
impl ContentBackend for HttpBackend {
    async fn generate(
        &self,
        kind: ContentKind,
        request: &GenerationRequest,
    ) -> Result<String, BackendError> {
        tracing::info!(%kind, keyword = %request.keyword, "generating content");
        self.post_raw(&format!("/api/{}/generate-content", kind.path_segment()), request)
            .await
    }

    async fn regenerate(
        &self,
        kind: ContentKind,
        request: &GenerationRequest,
    ) -> Result<String, BackendError> {
        tracing::info!(%kind, keyword = %request.keyword, "regenerating content");
        self.post_raw(&format!("/api/{}/regenerate", kind.path_segment()), request)
            .await
    }

    async fn generate_meta(&self, request: &MetaRequest) -> Result<MetaResponse, BackendError> {
        self.post_json("/api/content/generate-meta", request).await
    }

    async fn publish(&self, request: &PublishRequest) -> Result<PublishResponse, BackendError> {
        tracing::info!(title = %request.title, "publishing to cms");
        self.post_json("/api/content/publish-to-cms", request).await
    }
}
