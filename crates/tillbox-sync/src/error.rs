//! # Sync Error Types

use thiserror::Error;
use tillbox_store::StoreError;

/// Reconciliation errors.
///
/// Per-record insert failures are NOT errors; they are collected in the
/// [`crate::reconciler::SyncReport`]. An error here means the run itself
/// could not proceed (the local snapshot or clear failed).
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading or clearing a store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for reconciliation operations.
pub type SyncResult<T> = Result<T, SyncError>;
