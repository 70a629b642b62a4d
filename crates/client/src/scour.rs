//! Search-and-enrich orchestration.
//!
//! A call moves through these stages:
//! 1. Collect candidates from the provider. An empty list ends the call.
//! 2. Time check: if the provider phase used up `search_budget`, or the
//!    caller asked for no enrichment, return the candidates bare.
//! 3. Enrich under a deadline of `min(enrich_deadline, ceiling - elapsed)`.
//! 4. If the whole call overran `ceiling`, return nothing.
//!
//! No stage error or panic reaches the caller; the worst case is an empty
//! list. A batch that times out as a whole comes back bare.

use futures_util::FutureExt;
use scour_core::{AppConfig, CacheLayer, CacheStats, Error};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::bridge::Bridge;
use crate::engine::Enricher;
use crate::extract::{Extractor, LayeredExtractor};
use crate::governor::Governor;
use crate::provider::{GoogleClient, GoogleConfig, MAX_PAGE_SIZE, SearchProvider};
use crate::search::{NEWS_COUNT, collect_candidates, news_query};
use crate::types::{SearchResult, bare};

/// Slack granted to a bridged provider phase beyond its per-page timeouts.
const PROVIDER_GRACE: Duration = Duration::from_secs(1);

/// Bounded-latency search pipeline.
///
/// Owns the caches for its whole lifetime; every call, including calls that
/// run on an isolated worker thread, shares them.
pub struct Scour {
    config: Arc<AppConfig>,
    provider: Arc<dyn SearchProvider>,
    caches: Arc<CacheLayer>,
    governor: Arc<Governor>,
    bridge: Bridge,
}

impl Scour {
    /// Build a pipeline backed by Google Custom Search.
    ///
    /// Fails if the configuration is invalid or credentials are missing.
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        config.validate()?;
        config.require_google_credentials()?;
        let client = GoogleClient::new(GoogleConfig::from_app_config(&config)?)?;
        Self::with_provider(config, Arc::new(client))
    }

    /// Build a pipeline from environment and config-file settings.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(AppConfig::load()?)
    }

    /// Build a pipeline over any provider.
    pub fn with_provider(config: AppConfig, provider: Arc<dyn SearchProvider>) -> Result<Self, Error> {
        let extractor = Arc::new(LayeredExtractor::from_config(&config));
        Self::with_extractor(config, provider, extractor)
    }

    /// Build a pipeline over any provider and extractor.
    pub fn with_extractor(
        config: AppConfig, provider: Arc<dyn SearchProvider>, extractor: Arc<dyn Extractor>,
    ) -> Result<Self, Error> {
        config.validate()?;

        let caches = Arc::new(CacheLayer::from_config(&config));
        let enricher = Enricher::new(Arc::clone(&caches), extractor);
        let governor = Arc::new(Governor::from_config(enricher, &config));
        let bridge = Bridge::new(config.confinement);

        tracing::debug!("pipeline ready: profile={:?} confinement={:?}", config.profile, config.confinement);

        Ok(Self { config: Arc::new(config), provider, caches, governor, bridge })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Search and optionally enrich, blocking the calling thread.
    ///
    /// Safe to call from inside or outside a tokio runtime. Returns at most
    /// `k` results (clamped to `max_results`); empty on failure.
    pub fn search(&self, query: &str, k: usize, enrich: bool) -> Vec<SearchResult> {
        let started = Instant::now();
        match catch_unwind(AssertUnwindSafe(|| self.search_blocking(query, k, enrich, started))) {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => {
                tracing::error!("search failed for query={}: {}", query, e);
                Vec::new()
            }
            Err(_) => {
                tracing::error!("search panicked for query={}", query);
                Vec::new()
            }
        }
    }

    /// Async variant of [`Scour::search`] for callers already on a runtime.
    pub async fn search_async(&self, query: &str, k: usize, enrich: bool) -> Vec<SearchResult> {
        let started = Instant::now();
        match AssertUnwindSafe(self.search_inner(query, k, enrich, started)).catch_unwind().await {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => {
                tracing::error!("search failed for query={}: {}", query, e);
                Vec::new()
            }
            Err(_) => {
                tracing::error!("search panicked for query={}", query);
                Vec::new()
            }
        }
    }

    /// Latest headlines for a category, never enriched.
    ///
    /// Always asks for [`NEWS_COUNT`] items, regardless of `max_results`.
    pub fn news(&self, category: &str) -> Vec<SearchResult> {
        let query = news_query(category);
        let provider = Arc::clone(&self.provider);
        let fetch_news = move || async move { collect_candidates(provider.as_ref(), query, NEWS_COUNT).await };
        let timeout = self.provider_phase_timeout(NEWS_COUNT);

        match catch_unwind(AssertUnwindSafe(|| self.bridge.block_on("scour-news", timeout, fetch_news))) {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => {
                tracing::error!("news lookup failed for category={}: {}", category, e);
                Vec::new()
            }
            Err(_) => {
                tracing::error!("news lookup panicked for category={}", category);
                Vec::new()
            }
        }
    }

    pub async fn news_async(&self, category: &str) -> Vec<SearchResult> {
        let fetch_news = collect_candidates(self.provider.as_ref(), news_query(category), NEWS_COUNT);
        match AssertUnwindSafe(fetch_news).catch_unwind().await {
            Ok(results) => results,
            Err(_) => {
                tracing::error!("news lookup panicked for category={}", category);
                Vec::new()
            }
        }
    }

    /// Clear extracted text, known failures and URL verdicts.
    pub fn reset(&self) {
        self.caches.reset();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.caches.stats()
    }

    fn search_blocking(
        &self, query: &str, k: usize, enrich: bool, started: Instant,
    ) -> Result<Vec<SearchResult>, Error> {
        let Some(k) = self.target_count(query, k) else {
            return Ok(Vec::new());
        };
        tracing::info!("search started: query={} k={} enrich={}", query, k, enrich);

        let provider = Arc::clone(&self.provider);
        let owned_query = query.to_string();
        let page_through = move || async move { collect_candidates(provider.as_ref(), &owned_query, k).await };
        let candidates = match self.bridge.block_on("scour-search", self.provider_phase_timeout(k), page_through) {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("provider phase abandoned: {}", e);
                Vec::new()
            }
        };

        if candidates.is_empty() {
            tracing::info!("no results for query={}", query);
            return Ok(candidates);
        }

        let Some(deadline) = self.enrich_deadline(started, enrich) else {
            return Ok(bare(&candidates, k));
        };

        let governor = Arc::clone(&self.governor);
        let batch = candidates.clone();
        let enrich_batch = move || async move { governor.run(batch, k, deadline).await };
        match self.bridge.block_on("scour-enrich", self.config.bridge_timeout(), enrich_batch) {
            Ok(outcome) => Ok(self.finish(query, started, outcome?)),
            Err(e) => {
                // same outcome as a governor deadline, so no ceiling check
                tracing::warn!("enrichment abandoned, returning unenriched results: {}", e);
                Ok(bare(&candidates, k))
            }
        }
    }

    async fn search_inner(
        &self, query: &str, k: usize, enrich: bool, started: Instant,
    ) -> Result<Vec<SearchResult>, Error> {
        let Some(k) = self.target_count(query, k) else {
            return Ok(Vec::new());
        };
        tracing::info!("search started: query={} k={} enrich={}", query, k, enrich);

        let candidates = collect_candidates(self.provider.as_ref(), query, k).await;
        if candidates.is_empty() {
            tracing::info!("no results for query={}", query);
            return Ok(candidates);
        }

        let Some(deadline) = self.enrich_deadline(started, enrich) else {
            return Ok(bare(&candidates, k));
        };

        let results = self.governor.run(candidates, k, deadline).await?;
        Ok(self.finish(query, started, results))
    }

    /// Effective result count, or `None` when there is nothing to search for.
    fn target_count(&self, query: &str, k: usize) -> Option<usize> {
        if query.trim().is_empty() || k == 0 {
            return None;
        }
        Some(k.min(self.config.max_results))
    }

    /// Deadline for the enrichment batch, or `None` to skip enrichment.
    fn enrich_deadline(&self, started: Instant, enrich: bool) -> Option<Duration> {
        if !enrich {
            return None;
        }

        let elapsed = started.elapsed();
        if elapsed > self.config.search_budget() {
            tracing::warn!(
                "provider phase took {:?}, over the {:?} budget; skipping enrichment",
                elapsed,
                self.config.search_budget()
            );
            return None;
        }

        Some(self.config.enrich_deadline().min(self.config.ceiling().saturating_sub(elapsed)))
    }

    fn provider_phase_timeout(&self, k: usize) -> Duration {
        let pages = k.div_ceil(MAX_PAGE_SIZE) as u32;
        self.config.provider_timeout() * pages + PROVIDER_GRACE
    }

    fn finish(&self, query: &str, started: Instant, results: Vec<SearchResult>) -> Vec<SearchResult> {
        let elapsed = started.elapsed();
        if elapsed > self.config.ceiling() {
            tracing::warn!(
                "search for query={} took {:?}, over the {:?} ceiling; discarding",
                query,
                elapsed,
                self.config.ceiling()
            );
            return Vec::new();
        }

        let enriched = results.iter().filter(|r| !r.full_content.is_empty()).count();
        tracing::info!("search completed in {:?}: {} results, {} enriched", elapsed, results.len(), enriched);
        results
    }
}
