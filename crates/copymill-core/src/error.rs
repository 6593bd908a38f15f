//! Orchestration errors.

use crate::types::{RowError, RowId};
use copymill_backend::BackendError;
use copymill_store::StoreError;

/// Errors from [`ContentService`](crate::ContentService) operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A backend call failed; the row has been marked `error`.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Reading or writing the row store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An invalid row state transition was attempted.
    #[error(transparent)]
    Row(#[from] RowError),

    /// No row stored under this id.
    #[error("row {0} not found")]
    RowNotFound(RowId),

    /// A generation call for this row is already in flight.
    #[error("row {0} already has a generation in flight")]
    AlreadyRunning(RowId),

    /// The operation needs completed output the row does not have.
    #[error("row {0} has no generated output")]
    NoOutput(RowId),
}
