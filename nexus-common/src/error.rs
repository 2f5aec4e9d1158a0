//! Common error types for Nexus

use thiserror::Error;

/// Common result type for Nexus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Nexus services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad input rejected before any I/O was attempted
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream rejected the supplied credential (HTTP 401/403)
    #[error("Upstream rejected credential ({status}): {body}")]
    Auth { status: u16, body: String },

    /// Non-success HTTP status from an upstream call
    #[error("Upstream request failed ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Network-level failure before any HTTP status was received
    #[error("Network error: {0}")]
    Network(String),

    /// Row store write failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Paginated listing exceeded the safety page cap
    #[error("Pagination exceeded {0} pages")]
    PageLimitExceeded(usize),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
