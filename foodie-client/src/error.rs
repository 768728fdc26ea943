//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: no usable response arrived
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Authentication required (HTTP 401)
    #[error("authentication required")]
    Unauthorized,

    /// Permission denied (HTTP 403)
    #[error("permission denied: {0}")]
    Forbidden(String),

    /// Resource not found (HTTP 404)
    #[error("not found: {0}")]
    NotFound(String),

    /// Request rejected by server-side validation (HTTP 400/422)
    #[error("validation failed: {0}")]
    Validation(String),

    /// Any other non-success response
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
