//! Content generation orchestration
//!
//! Ties the workspace together around a spreadsheet-like model of
//! content rows:
//! - [`ContentRow`] — one keyword's generation slot, with lifecycle
//!   invariants enforced by construction,
//! - [`ContentService`] — create/generate/regenerate/publish/export over
//!   an injected backend and key-value store,
//! - [`PromptAutosave`] — debounced persistence for prompt edits.
//!
//! Generation never retries and never surfaces raw backend text: every
//! response goes through `copymill-recover` before landing on a row.

mod autosave;
mod config;
mod error;
mod service;
mod types;

pub use autosave::PromptAutosave;
pub use config::CoreConfig;
pub use error::CoreError;
pub use service::ContentService;
pub use types::{ContentRow, PromptPair, RowError, RowId, RowStatus};

// Re-export the seams callers wire the service with.
pub use copymill_backend::{
    BackendConfig, BackendError, ContentBackend, ContentKind, ExportClient, GenerationRequest,
    HttpBackend, MetaRequest, MetaResponse, PublishRequest, PublishResponse,
};
pub use copymill_store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::{
        ContentBackend, ContentKind, ContentRow, ContentService, CoreConfig, CoreError,
        KeyValueStore, PromptAutosave, PromptPair, RowId, RowStatus,
    };
}
