//! Document/spreadsheet export client.

use crate::error::BackendError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const EXPORT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct ExportRequest<'a> {
    title: &'a str,
    #[serde(rename = "htmlContent")]
    html_content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
    url: String,
}

/// Client for the export service: hand over `{title, htmlContent}`, get
/// back a shareable URL. One attempt per call, like the backend client.
#[derive(Debug, Clone)]
pub struct ExportClient {
    client: reqwest::Client,
    base_url: String,
}

impl ExportClient {
    /// Client for the export service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(EXPORT_TIMEOUT_SECS))
            .build()
            .map_err(|e| BackendError::NotConfigured(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Export content as a document, returning its shareable URL.
    pub async fn export_document(
        &self,
        title: &str,
        html_content: &str,
    ) -> Result<String, BackendError> {
        self.export("/api/export/document", title, html_content).await
    }

    /// Export content as a spreadsheet, returning its shareable URL.
    pub async fn export_spreadsheet(
        &self,
        title: &str,
        html_content: &str,
    ) -> Result<String, BackendError> {
        self.export("/api/export/spreadsheet", title, html_content).await
    }

    async fn export(
        &self,
        path: &str,
        title: &str,
        html_content: &str,
    ) -> Result<String, BackendError> {
        let url = format!("{}{path}", self.base_url);
        tracing::info!(%url, title, "exporting content");

        let response = self
            .client
            .post(&url)
            .json(&ExportRequest {
                title,
                html_content,
            })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(BackendError::from_error_body(status.as_u16(), &text));
        }

        let parsed: ExportResponse = serde_json::from_str(&text)
            .map_err(|e| BackendError::InvalidPayload(e.to_string()))?;
        Ok(parsed.url)
    }
}
