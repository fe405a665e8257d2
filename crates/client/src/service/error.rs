//! Analysis service client error types.

use std::sync::Arc;

/// Errors from the analysis service HTTP client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    /// The HTTP client could not be constructed.
    #[error("client setup failed: {0}")]
    Setup(String),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Response body is not JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ServiceError::Timeout } else { ServiceError::Network(Arc::new(err)) }
    }
}

impl From<ServiceError> for dealscout_core::Error {
    fn from(err: ServiceError) -> Self {
        dealscout_core::Error::Network(err.to_string())
    }
}
