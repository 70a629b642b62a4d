//! Search provider error types.

use std::sync::Arc;

/// Errors from the search provider client.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// API key or engine id not configured.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// Invalid page request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (invalid API key or engine id).
    #[error("authentication failed")]
    AuthError,

    /// Quota exhausted or rate limited.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ProviderError::Timeout } else { ProviderError::Network(Arc::new(err)) }
    }
}
