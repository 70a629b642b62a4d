//! Search provider client.
//!
//! Provides the [`SearchProvider`] seam the query executor pages through, and
//! its Google Custom Search implementation.
//!
//! ### Google Custom Search
//!
//! - **Endpoint**: `https://www.googleapis.com/customsearch/v1`
//! - **Authentication**: `key` (API key) and `cx` (engine id) query parameters.
//! - **Paging**: at most 10 items per page, 1-based `start`, 100 results total.
//! - **Normalization**: items without a title or link are dropped; everything
//!   else becomes an unenriched [`SearchResult`].

pub mod error;
pub mod request;
pub mod response;

pub use error::ProviderError;
pub use request::{MAX_PAGE_SIZE, MAX_START, PageRequest};
pub use response::{CseItem, CseResponse};

use async_trait::async_trait;
use reqwest::header;
use scour_core::AppConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::types::SearchResult;

/// Source of ranked document metadata, one page at a time.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Fetch up to `num` results starting at the 1-based offset `start`.
    async fn page(&self, query: &str, num: usize, start: usize) -> Result<Vec<SearchResult>, ProviderError>;
}

/// Google Custom Search client configuration.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// API key.
    pub api_key: String,
    /// Programmable Search engine id.
    pub engine_id: String,
    /// Endpoint URL (default: https://www.googleapis.com/customsearch/v1).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl GoogleConfig {
    /// Build from application configuration.
    ///
    /// Returns an error if the API key or engine id is not set.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let (api_key, engine_id) = config
            .require_google_credentials()
            .map_err(|e| ProviderError::MissingCredentials(e.to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            engine_id: engine_id.to_string(),
            base_url: config.provider_base_url.clone(),
            timeout: config.provider_timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Google Custom Search JSON API client.
#[derive(Debug, Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GoogleConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() || config.engine_id.is_empty() {
            return Err(ProviderError::MissingCredentials("api_key and engine_id are required".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }
}

#[async_trait]
impl SearchProvider for GoogleClient {
    async fn page(&self, query: &str, num: usize, start: usize) -> Result<Vec<SearchResult>, ProviderError> {
        let req = PageRequest::new(&self.config.api_key, &self.config.engine_id, query, num, start);
        req.validate()?;

        let started = Instant::now();
        tracing::debug!("searching provider: query={} start={} num={}", query, start, num);

        let http_response = self
            .http
            .get(&self.config.base_url)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .query(&req)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("provider response status: {}", status);

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthError);
        }

        if status == 429 {
            return Err(ProviderError::RateLimited);
        }

        if !status.is_success() {
            return Err(ProviderError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let api_response: CseResponse =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::Parse(e.to_string()))?;

        let results = api_response.into_results(num);
        tracing::debug!("provider page completed in {:?}, {} results", started.elapsed(), results.len());

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GoogleConfig {
        GoogleConfig {
            api_key: "key".into(),
            engine_id: "cx".into(),
            base_url: scour_core::config::DEFAULT_PROVIDER_URL.into(),
            timeout: Duration::from_secs(10),
            user_agent: "scour-test".into(),
        }
    }

    #[test]
    fn test_client_new_missing_key() {
        let result = GoogleClient::new(GoogleConfig { api_key: String::new(), ..config() });
        assert!(matches!(result, Err(ProviderError::MissingCredentials(_))));
    }

    #[test]
    fn test_client_new() {
        let client = GoogleClient::new(config()).unwrap();
        assert_eq!(client.config().engine_id, "cx");
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig {
            google_api_key: Some("k".into()),
            google_engine_id: Some("c".into()),
            provider_timeout_ms: 2_500,
            ..Default::default()
        };
        let config = GoogleConfig::from_app_config(&app).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.timeout, Duration::from_millis(2_500));
        assert_eq!(config.base_url, app.provider_base_url);
    }

    #[test]
    fn test_config_from_app_config_without_credentials() {
        let result = GoogleConfig::from_app_config(&AppConfig::default());
        assert!(matches!(result, Err(ProviderError::MissingCredentials(_))));
    }

    #[tokio::test]
    async fn test_invalid_page_rejected_before_network() {
        let client = GoogleClient::new(config()).unwrap();
        let result = client.page("query", 0, 1).await;
        assert!(matches!(result, Err(ProviderError::InvalidRequest(_))));
    }
}
