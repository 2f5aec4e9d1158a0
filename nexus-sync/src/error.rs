//! Error types for nexus-sync
//!
//! `ApiError` is the HTTP-facing shape; all handler failures render as a
//! JSON `{"error": "..."}` body. Upstream error bodies are passed through
//! verbatim when available, falling back to a status-derived message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nexus_common::Error;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing or rejected credential (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Upstream call failed (502)
    #[error("{0}")]
    BadGateway(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(msg) => ApiError::BadRequest(msg),
            Error::Auth { status, body } => {
                ApiError::Unauthorized(passthrough_or(status, body, "rejected the credential"))
            }
            Error::Upstream { status, body } => {
                ApiError::BadGateway(passthrough_or(status, body, "request failed"))
            }
            Error::Network(msg) => ApiError::BadGateway(msg),
            Error::PageLimitExceeded(pages) => {
                ApiError::BadGateway(format!("Upstream pagination exceeded {} pages", pages))
            }
            Error::Persistence(msg) => ApiError::Internal(format!("Persistence error: {}", msg)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

fn passthrough_or(status: u16, body: String, what: &str) -> String {
    if body.trim().is_empty() {
        format!("Upstream {} with status {}", what, status)
    } else {
        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
