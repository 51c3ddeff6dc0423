//! Domain errors for the issuesync reconciler.

use thiserror::Error;

use crate::domain::ports::{SinkError, SourceError};

/// Errors that can abort or degrade a reconciliation cycle.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
