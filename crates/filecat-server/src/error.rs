//! HTTP error mapping
//!
//! Every failure leaves the server as a JSON body `{"error": "..."}` with a
//! status matching its kind.

use filecat_core::domain::DomainError;
use hyper::StatusCode;

/// Errors surfaced to HTTP callers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request or invalid record
    #[error("{0}")]
    BadRequest(String),

    /// Unknown route or missing resource
    #[error("{0}")]
    NotFound(String),

    /// Known route, unsupported method
    #[error("Method {0} not allowed")]
    MethodNotAllowed(hyper::Method),

    /// Request body larger than the configured limit
    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    /// Store or serialization failure
    #[error("Internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(domain) => ApiError::BadRequest(domain.to_string()),
            None => ApiError::Internal(err),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {err}"))
    }
}
