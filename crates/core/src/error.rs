//! Unified error types for scour.
//!
//! None of these reach callers of the search operations, which degrade to
//! empty content or an empty list. They exist so each stage can say what went
//! wrong before the orchestrator decides how to recover.

use crate::config::ConfigError;

/// Unified error types for the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// URL failed structural validation.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch timed out (connect, read or total).
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Origin answered with something other than 200.
    #[error("HTTP_STATUS: {0}")]
    HttpStatus(u16),

    /// Transport-level failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Structured extraction could not run.
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// An enrichment batch ran past its deadline.
    #[error("TIMEOUT: {0}")]
    Timeout(String),

    /// HTTP client or runtime could not be built.
    #[error("CLIENT_ERROR: {0}")]
    Client(String),

    /// Configuration failed to load or validate.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether this failure should put the URL on the negative cache.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Error::FetchTimeout(_) | Error::HttpStatus(_) | Error::HttpError(_) | Error::InvalidUrl(_))
    }
}
