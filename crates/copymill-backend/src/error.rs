//! Backend client errors.

/// Longest raw error-body snippet carried into an error message.
const SNIPPET_LIMIT: usize = 400;

/// Errors from the generation backend and export service clients.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },

    /// A JSON endpoint returned something unparseable.
    #[error("invalid response payload: {0}")]
    InvalidPayload(String),

    /// Client construction or configuration failed.
    #[error("backend not configured: {0}")]
    NotConfigured(String),
}

impl BackendError {
    /// Build an API error from a status and raw error body.
    ///
    /// Tries the common `{"error":{"message":...}}` and
    /// `{"message":...}` shapes before falling back to a bounded raw
    /// snippet.
    #[must_use]
    pub fn from_error_body(status: u16, body: &str) -> Self {
        if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(msg) = v
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .or_else(|| v.get("message").and_then(|m| m.as_str()))
            {
                return Self::Api {
                    status,
                    message: msg.to_string(),
                };
            }
        }

        let trimmed = body.trim();
        let message = if trimmed.len() > SNIPPET_LIMIT {
            let cut = trimmed
                .char_indices()
                .take_while(|(i, _)| *i < SNIPPET_LIMIT)
                .last()
                .map_or(0, |(i, c)| i + c.len_utf8());
            format!("{}...", &trimmed[..cut])
        } else {
            trimmed.to_string()
        };
        Self::Api { status, message }
    }
}
