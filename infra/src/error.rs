//! Infrastructure-specific error types.

use thiserror::Error;

/// Errors raised while constructing infrastructure collaborators
///
/// Once built, the API client reports failures through the core error
/// payload and the session store absorbs storage faults, so this type only
/// surfaces at wiring time.
#[derive(Debug, Error)]
pub enum InfraError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Session storage location error
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}
