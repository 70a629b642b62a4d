//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SCOUR_*)
//! 2. TOML config file (if SCOUR_CONFIG_FILE set)
//! 3. Defaults of the selected profile (`deep` unless overridden)
//!
//! The profile is resolved first from the same sources, then its defaults
//! become the base layer the other two are merged over.

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Default Google Custom Search endpoint.
pub const DEFAULT_PROVIDER_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Latency profile selecting timeout and extraction budgets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Generous budgets: seconds per fetch, long extracted text.
    #[default]
    Deep,
    /// Sub-second fetches and a short overall ceiling.
    Fast,
}

/// Where enrichment batches run when driven from a blocking call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confinement {
    /// Isolated worker when an ambient runtime is present, caller thread otherwise.
    #[default]
    Auto,
    /// Always run on an isolated worker thread with its own runtime.
    Isolated,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SCOUR_*)
/// 2. TOML config file (if SCOUR_CONFIG_FILE set)
/// 3. Profile defaults via [`AppConfig::for_profile`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Google Custom Search API key.
    ///
    /// Set via SCOUR_GOOGLE_API_KEY environment variable.
    /// Required only when the Google provider is built.
    pub google_api_key: Option<String>,

    /// Google Programmable Search engine id (`cx`).
    ///
    /// Set via SCOUR_GOOGLE_ENGINE_ID environment variable.
    pub google_engine_id: Option<String>,

    /// Search provider endpoint.
    pub provider_base_url: String,

    /// Timeout for a single provider page request in milliseconds.
    pub provider_timeout_ms: u64,

    /// User-Agent string for provider and origin requests.
    ///
    /// Set via SCOUR_USER_AGENT environment variable.
    pub user_agent: String,

    /// Latency profile the remaining defaults were derived from.
    pub profile: Profile,

    /// Execution context for blocking callers.
    pub confinement: Confinement,

    /// Per-fetch connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Per-fetch read (idle socket) timeout in milliseconds.
    pub read_timeout_ms: u64,

    /// Per-fetch total timeout in milliseconds.
    pub fetch_timeout_ms: u64,

    /// Maximum redirects followed per fetch.
    pub max_redirects: usize,

    /// Upper bound on concurrent origin fetches in one batch.
    pub max_concurrency: usize,

    /// Upper bound on results per search call.
    pub max_results: usize,

    /// Maximum body bytes read from an origin.
    ///
    /// Set via SCOUR_MAX_BODY_BYTES environment variable.
    pub max_body_bytes: usize,

    /// Maximum characters of extracted text kept per document.
    pub max_text_chars: usize,

    /// CSS selector for the article-like container.
    pub container_selector: String,

    /// Maximum entries held by the extracted-text cache.
    pub cache_capacity: usize,

    /// Oldest entries dropped when the text cache is full.
    pub cache_eviction_batch: usize,

    /// Maximum memoized URL validity verdicts.
    pub validity_memo_capacity: usize,

    /// Elapsed time after searching beyond which enrichment is skipped.
    pub search_budget_ms: u64,

    /// Aggregate deadline for one enrichment batch.
    pub enrich_deadline_ms: u64,

    /// Outer timeout on an isolated enrichment worker.
    pub bridge_timeout_ms: u64,

    /// Absolute ceiling for a search call; later results are discarded.
    pub ceiling_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

impl AppConfig {
    /// Defaults for the given profile.
    pub fn for_profile(profile: Profile) -> Self {
        let base = Self {
            google_api_key: None,
            google_engine_id: None,
            provider_base_url: DEFAULT_PROVIDER_URL.into(),
            provider_timeout_ms: 10_000,
            user_agent: "Mozilla/5.0 (compatible; scour/0.1)".into(),
            profile,
            confinement: Confinement::Auto,
            connect_timeout_ms: 10_000,
            read_timeout_ms: 20_000,
            fetch_timeout_ms: 30_000,
            max_redirects: 2,
            max_concurrency: 5,
            max_results: 20,
            max_body_bytes: 20 * 1024,
            max_text_chars: 10_000,
            container_selector: "article".into(),
            cache_capacity: 100,
            cache_eviction_batch: 20,
            validity_memo_capacity: 1000,
            search_budget_ms: 1_500,
            enrich_deadline_ms: 45_000,
            bridge_timeout_ms: 60_000,
            ceiling_ms: 60_000,
        };

        match profile {
            Profile::Deep => base,
            Profile::Fast => Self {
                connect_timeout_ms: 100,
                read_timeout_ms: 300,
                fetch_timeout_ms: 400,
                max_text_chars: 3_000,
                enrich_deadline_ms: 900,
                bridge_timeout_ms: 1_200,
                ceiling_ms: 3_000,
                ..base
            },
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn search_budget(&self) -> Duration {
        Duration::from_millis(self.search_budget_ms)
    }

    pub fn enrich_deadline(&self) -> Duration {
        Duration::from_millis(self.enrich_deadline_ms)
    }

    pub fn bridge_timeout(&self) -> Duration {
        Duration::from_millis(self.bridge_timeout_ms)
    }

    pub fn ceiling(&self) -> Duration {
        Duration::from_millis(self.ceiling_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let sources = Self::sources();

        let profile = if sources.contains("profile") {
            sources
                .extract_inner::<Profile>("profile")
                .map_err(|e| ConfigError::LoadFailed(e.to_string()))?
        } else {
            Profile::default()
        };

        let config: Self = Figment::from(Serialized::defaults(Self::for_profile(profile)))
            .merge(sources)
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        tracing::debug!(?profile, "configuration loaded");

        Ok(config)
    }

    /// File and environment layers, without defaults.
    fn sources() -> Figment {
        let mut figment = Figment::new();

        if let Ok(config_path) = std::env::var("SCOUR_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("SCOUR_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Check that provider credentials are available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if either the API key or engine id is not set.
    pub fn require_google_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let key = self.google_api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| ConfigError::Missing {
            field: "google_api_key".into(),
            hint: "Set SCOUR_GOOGLE_API_KEY environment variable".into(),
        })?;
        let cx = self.google_engine_id.as_deref().filter(|c| !c.is_empty()).ok_or_else(|| ConfigError::Missing {
            field: "google_engine_id".into(),
            hint: "Set SCOUR_GOOGLE_ENGINE_ID environment variable".into(),
        })?;
        Ok((key, cx))
    }
}
