//! Per-URL content enrichment.
//!
//! One call turns one link into extracted text or `""`:
//! 1. Structurally invalid or known-failed URLs return `""` without I/O.
//! 2. Cached text is returned without I/O.
//! 3. Otherwise the URL is fetched once and the body prefix extracted.
//!
//! Failures (status, timeout, transport, nothing extractable) land on the
//! negative cache and are not retried until the caches are reset.

use scour_core::CacheLayer;
use std::sync::Arc;

use crate::extract::Extractor;
use crate::fetch::{FetchClient, is_fetchable};

/// Fetch-and-extract step shared by every task of a batch.
#[derive(Clone)]
pub struct Enricher {
    caches: Arc<CacheLayer>,
    extractor: Arc<dyn Extractor>,
}

impl Enricher {
    pub fn new(caches: Arc<CacheLayer>, extractor: Arc<dyn Extractor>) -> Self {
        Self { caches, extractor }
    }

    pub fn caches(&self) -> &Arc<CacheLayer> {
        &self.caches
    }

    /// Extracted text for `link`, or `""` when unavailable.
    pub async fn enrich(&self, fetch: &FetchClient, link: &str) -> String {
        if !self.caches.validity(link, is_fetchable) {
            tracing::debug!("skipping invalid url: {}", link);
            return String::new();
        }

        if self.caches.is_failed(link) {
            tracing::debug!("skipping known failure: {}", link);
            return String::new();
        }

        if let Some(text) = self.caches.cached_text(link) {
            tracing::debug!("cache hit: {}", link);
            return text;
        }

        let response = match fetch.fetch(link).await {
            Ok(response) => response,
            Err(e) if e.is_fetch_failure() => {
                tracing::debug!("fetch failed for {}: {}", link, e);
                self.caches.mark_failed(link);
                return String::new();
            }
            Err(e) => {
                tracing::warn!("could not fetch {}: {}", link, e);
                return String::new();
            }
        };

        let html = String::from_utf8_lossy(&response.bytes);
        let text = self.extractor.extract(&html);

        if text.is_empty() {
            tracing::debug!("nothing extractable from {}", link);
            self.caches.mark_failed(link);
            return String::new();
        }

        tracing::debug!(
            "extracted {} chars from {} (final url {}, truncated={}) in {}ms",
            text.chars().count(),
            link,
            response.final_url,
            response.truncated,
            response.fetch_ms
        );
        self.caches.store_text(link, text.clone());
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::LayeredExtractor;
    use crate::fetch::FetchConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn enricher() -> Enricher {
        Enricher::new(Arc::new(CacheLayer::new(10, 2, 10)), Arc::new(LayeredExtractor::default()))
    }

    #[tokio::test]
    async fn test_invalid_url_is_not_fetched_or_failed() {
        let enricher = enricher();
        let fetch = FetchClient::new(&FetchConfig::default()).unwrap();

        assert_eq!(enricher.enrich(&fetch, "mailto:someone@example.com").await, "");
        let stats = enricher.caches().stats();
        assert_eq!(stats.failures, 0);
        assert_eq!(stats.verdicts, 1);
    }

    #[tokio::test]
    async fn test_cached_text_short_circuits() {
        let enricher = enricher();
        let fetch = FetchClient::new(&FetchConfig::default()).unwrap();
        enricher.caches().store_text("https://cached.invalid/a", "cached body".into());

        assert_eq!(enricher.enrich(&fetch, "https://cached.invalid/a").await, "cached body");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_negative_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let enricher = enricher();
        let fetch = FetchClient::new(&FetchConfig::default()).unwrap();
        let link = format!("{}/missing", server.uri());

        assert_eq!(enricher.enrich(&fetch, &link).await, "");
        assert!(enricher.caches().is_failed(&link));
        assert_eq!(enricher.enrich(&fetch, &link).await, "");
    }

    #[tokio::test]
    async fn test_known_failure_short_circuits() {
        let enricher = enricher();
        let fetch = FetchClient::new(&FetchConfig::default()).unwrap();
        enricher.caches().mark_failed("https://failed.invalid/a");
        enricher.caches().store_text("https://failed.invalid/a", "stale".into());

        assert_eq!(enricher.enrich(&fetch, "https://failed.invalid/a").await, "");
    }
}
