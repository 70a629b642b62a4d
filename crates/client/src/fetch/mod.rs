//! HTTP fetch client for origin documents.
//!
//! ### Request Policy
//! - Exactly one GET per call, no retries
//! - Max redirects: 2 (configurable)
//! - Independent connect, read and total timeouts
//!
//! ### Body Limits
//! - Only the first `max_bytes` of the body are read (default: 20 KiB); the
//!   rest of the response is dropped unread
//! - Anything other than `200 OK` is an error

pub mod url;

use bytes::{Bytes, BytesMut};
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use scour_core::{AppConfig, Error};
use std::time::{Duration, Instant};

pub use url::{UrlError, is_fetchable, parse_fetchable};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,

    /// Maximum response body bytes read (default: 20 KiB)
    pub max_bytes: usize,

    /// Connect timeout (default: 10s)
    pub connect_timeout: Duration,

    /// Idle read timeout (default: 20s)
    pub read_timeout: Duration,

    /// Total request timeout (default: 30s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 2)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl FetchConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_body_bytes,
            connect_timeout: config.connect_timeout(),
            read_timeout: config.read_timeout(),
            timeout: config.fetch_timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The final URL after redirects
    pub final_url: Url,
    /// Body prefix, at most `max_bytes` long
    pub bytes: Bytes,
    /// Whether the body was cut at `max_bytes`
    pub truncated: bool,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// HTTP fetch client shared by one enrichment batch.
#[derive(Debug)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: &FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Client(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config: config.clone() })
    }

    /// Fetch a URL, reading at most `max_bytes` of the body.
    pub async fn fetch(&self, url_str: &str) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let url = parse_fetchable(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let mut response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| classify(&url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let final_url = response.url().clone();

        let limit = self.config.max_bytes;
        let mut body = BytesMut::with_capacity(limit.min(64 * 1024));
        let mut truncated = false;

        while let Some(chunk) = response.chunk().await.map_err(|e| classify(&url, e))? {
            let room = limit - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                truncated = chunk.len() > room || response.content_length().is_some_and(|len| len as usize > limit);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} -> {} in {}ms ({} bytes, truncated={})", url, final_url, fetch_ms, body.len(), truncated);

        Ok(FetchResponse { final_url, bytes: body.freeze(), truncated, fetch_ms })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

fn classify(url: &Url, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(url.to_string())
    } else {
        Error::HttpError(format!("network error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.max_bytes, 20 * 1024);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.read_timeout, Duration::from_secs(20));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_redirects, 2);
    }

    #[test]
    fn test_fetch_config_fast_profile() {
        let config = FetchConfig::from_app_config(&AppConfig::for_profile(scour_core::Profile::Fast));
        assert_eq!(config.timeout, Duration::from_millis(400));
        assert_eq!(config.connect_timeout, Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        let client = FetchClient::new(&FetchConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_before_network() {
        let client = FetchClient::new(&FetchConfig::default()).unwrap();
        let result = client.fetch("ftp://example.com/file").await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
