//! Typed errors for the collaborator ports.
//!
//! Transport details are carried as plain strings so the domain stays free
//! of HTTP-client types; the adapters attach method, endpoint, and status
//! where they are known.

use thiserror::Error;

/// Errors from the source issue tracker.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{method} {endpoint}: transport error: {message}")]
    Transport {
        method: &'static str,
        endpoint: String,
        message: String,
    },

    #[error("{method} {endpoint}: API error {status}")]
    Api {
        method: &'static str,
        endpoint: String,
        status: u16,
    },

    #[error("{method} {endpoint}: decode error: {message}")]
    Decode {
        method: &'static str,
        endpoint: String,
        message: String,
    },
}

/// Errors from the sink task service.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("{method} {endpoint}: transport error: {message}")]
    Transport {
        method: &'static str,
        endpoint: String,
        message: String,
    },

    #[error("{method} {endpoint}: API error {status}")]
    Api {
        method: &'static str,
        endpoint: String,
        status: u16,
    },

    /// A 404 on a read; callers probing for optional data treat this as
    /// "no data" rather than a failure.
    #[error("{method} {endpoint}: not found")]
    NotFound {
        method: &'static str,
        endpoint: String,
    },

    #[error("{method} {endpoint}: decode error: {message}")]
    Decode {
        method: &'static str,
        endpoint: String,
        message: String,
    },
}

impl SinkError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
