//! Storage error types.

use std::path::PathBuf;

/// Errors raised by [`crate::KeyValueStore`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO failure against the backing file.
    #[error("io error on {}: {source}", path.display())]
    Io {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Value could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The backing file held something other than a JSON object of
    /// string values.
    #[error("corrupt store file {}: {message}", path.display())]
    Corrupt {
        /// Path of the backing file.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },
}

impl StoreError {
    /// Create an IO error for `path`.
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
