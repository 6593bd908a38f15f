//! Clients for the content services consumed over HTTP
//!
//! Two collaborators live behind this crate:
//! - the generation backend (`generate-content`, `regenerate`,
//!   `generate-meta`, `publish-to-cms`), reached through the
//!   [`ContentBackend`] trait and its [`HttpBackend`] implementation;
//! - the document/spreadsheet export service ([`ExportClient`]).
//!
//! Calls are made exactly once: retry policy belongs to the caller, and
//! failures surface as structured [`BackendError`]s.

mod client;
mod error;
mod export;
mod types;

pub use client::{BackendConfig, ContentBackend, HttpBackend};
pub use error::BackendError;
pub use export::ExportClient;
pub use types::{
    ContentKind, GenerationRequest, MetaRequest, MetaResponse, PublishRequest, PublishResponse,
};
