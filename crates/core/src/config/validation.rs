//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Longest timeout any single knob may be set to (5 minutes).
const MAX_TIMEOUT_MS: u64 = 300_000;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - any capacity, concurrency, result or byte limit is 0
    /// - `cache_eviction_batch` exceeds `cache_capacity`
    /// - any timeout is 0 or exceeds 5 minutes
    /// - the budgets are out of order (search budget and enrich deadline
    ///   must fit in the ceiling, the bridge timeout must cover the deadline)
    /// - `user_agent` or `container_selector` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("max_concurrency", self.max_concurrency),
            ("max_results", self.max_results),
            ("max_body_bytes", self.max_body_bytes),
            ("max_text_chars", self.max_text_chars),
            ("cache_capacity", self.cache_capacity),
            ("cache_eviction_batch", self.cache_eviction_batch),
            ("validity_memo_capacity", self.validity_memo_capacity),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(invalid(field, "must be greater than 0"));
            }
        }

        if self.cache_eviction_batch > self.cache_capacity {
            return Err(invalid("cache_eviction_batch", "must not exceed cache_capacity"));
        }

        let timeouts = [
            ("provider_timeout_ms", self.provider_timeout_ms),
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("read_timeout_ms", self.read_timeout_ms),
            ("fetch_timeout_ms", self.fetch_timeout_ms),
            ("search_budget_ms", self.search_budget_ms),
            ("enrich_deadline_ms", self.enrich_deadline_ms),
            ("bridge_timeout_ms", self.bridge_timeout_ms),
            ("ceiling_ms", self.ceiling_ms),
        ];
        for (field, value) in timeouts {
            if value == 0 {
                return Err(invalid(field, "must be at least 1ms"));
            }
            if value > MAX_TIMEOUT_MS {
                return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
            }
        }

        if self.search_budget_ms > self.ceiling_ms {
            return Err(invalid("search_budget_ms", "must not exceed ceiling_ms"));
        }
        if self.enrich_deadline_ms > self.ceiling_ms {
            return Err(invalid("enrich_deadline_ms", "must not exceed ceiling_ms"));
        }
        if self.bridge_timeout_ms < self.enrich_deadline_ms {
            return Err(invalid("bridge_timeout_ms", "must be at least enrich_deadline_ms"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.container_selector.trim().is_empty() {
            return Err(invalid("container_selector", "must not be empty"));
        }

        if self.fetch_timeout_ms < self.connect_timeout_ms {
            tracing::warn!(
                connect_timeout_ms = self.connect_timeout_ms,
                fetch_timeout_ms = self.fetch_timeout_ms,
                "fetch_timeout_ms is shorter than connect_timeout_ms; \
                 the total timeout will always fire first"
            );
        }

        Ok(())
    }
}
