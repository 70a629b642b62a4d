//! Bounded, deadline-capped fan-out of enrichment over a candidate batch.
//!
//! - At most `min(k, max_concurrency)` fetches are in flight at once.
//! - The whole batch shares one deadline; when it passes, unfinished items
//!   keep `full_content = ""` and their tasks are aborted.
//! - A panicking task only blanks its own item.
//! - Output order always matches input order.

use scour_core::{AppConfig, Error};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::engine::Enricher;
use crate::fetch::{FetchClient, FetchConfig};
use crate::types::SearchResult;

/// Runs an [`Enricher`] over a batch of candidates.
#[derive(Clone)]
pub struct Governor {
    enricher: Enricher,
    fetch_config: FetchConfig,
    max_concurrency: usize,
}

impl Governor {
    pub fn new(enricher: Enricher, fetch_config: FetchConfig, max_concurrency: usize) -> Self {
        Self { enricher, fetch_config, max_concurrency: max_concurrency.max(1) }
    }

    pub fn from_config(enricher: Enricher, config: &AppConfig) -> Self {
        Self::new(enricher, FetchConfig::from_app_config(config), config.max_concurrency)
    }

    /// Enrich the first `k` candidates within `deadline`.
    ///
    /// Only fails if the batch's fetch client cannot be built.
    pub async fn run(
        &self, candidates: Vec<SearchResult>, k: usize, deadline: Duration,
    ) -> Result<Vec<SearchResult>, Error> {
        let mut results: Vec<SearchResult> = candidates
            .into_iter()
            .take(k)
            .map(|mut r| {
                r.full_content.clear();
                r
            })
            .collect();

        if results.is_empty() {
            return Ok(results);
        }

        let started = Instant::now();
        let deadline_at = started + deadline;
        let fetch = Arc::new(FetchClient::new(&self.fetch_config)?);
        let semaphore = Arc::new(Semaphore::new(results.len().min(self.max_concurrency)));

        let mut join_set = JoinSet::new();
        for (idx, result) in results.iter().enumerate() {
            let enricher = self.enricher.clone();
            let fetch = Arc::clone(&fetch);
            let semaphore = Arc::clone(&semaphore);
            let link = result.link.clone();

            join_set.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (idx, String::new());
                };
                (idx, enricher.enrich(&fetch, &link).await)
            });
        }

        let mut completed = 0usize;
        loop {
            match tokio::time::timeout_at(deadline_at, join_set.join_next()).await {
                Ok(Some(Ok((idx, text)))) => {
                    results[idx].full_content = text;
                    completed += 1;
                }
                Ok(Some(Err(e))) => {
                    tracing::warn!("enrichment task failed: {}", e);
                    completed += 1;
                }
                Ok(None) => break,
                Err(_) => {
                    let err = Error::Timeout(format!(
                        "enrichment deadline of {:?} reached with {}/{} items done",
                        deadline,
                        completed,
                        results.len()
                    ));
                    tracing::warn!("{}", err);
                    join_set.abort_all();
                    break;
                }
            }
        }

        tracing::debug!("enriched {} items in {:?}", results.len(), started.elapsed());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Extractor, LayeredExtractor};
    use scour_core::CacheLayer;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = "<p>Body text long enough to be extracted by the pipeline.</p>";

    fn governor(extractor: Arc<dyn Extractor>, max_concurrency: usize) -> Governor {
        let enricher = Enricher::new(Arc::new(CacheLayer::new(100, 20, 1000)), extractor);
        Governor::new(enricher, FetchConfig::default(), max_concurrency)
    }

    fn candidate(link: String) -> SearchResult {
        SearchResult::new("title", link, "snippet")
    }

    struct PanicOn(&'static str);

    impl Extractor for PanicOn {
        fn extract(&self, html: &str) -> String {
            if html.contains(self.0) {
                panic!("extractor exploded");
            }
            LayeredExtractor::default().extract(html)
        }
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let g = governor(Arc::new(LayeredExtractor::default()), 5);
        let results = g.run(Vec::new(), 5, Duration::from_secs(1)).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_preserves_order_and_truncates_to_k() {
        let server = MockServer::start().await;
        for (i, delay) in [300u64, 0, 150].iter().enumerate() {
            Mock::given(method("GET"))
                .and(path(format!("/doc{i}")))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(format!("<p>Document number {i} has plenty of body text.</p>"))
                        .set_delay(Duration::from_millis(*delay)),
                )
                .mount(&server)
                .await;
        }

        let candidates: Vec<_> = (0..4).map(|i| candidate(format!("{}/doc{i}", server.uri()))).collect();
        let g = governor(Arc::new(LayeredExtractor::default()), 5);
        let results = g.run(candidates, 3, Duration::from_secs(5)).await.unwrap();

        assert_eq!(results.len(), 3);
        for (i, r) in results.iter().enumerate() {
            assert!(r.link.ends_with(&format!("/doc{i}")));
            assert_eq!(r.full_content, format!("Document number {i} has plenty of body text."));
        }
    }

    #[tokio::test]
    async fn test_deadline_keeps_completed_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fast"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let candidates = vec![candidate(format!("{}/slow", server.uri())), candidate(format!("{}/fast", server.uri()))];
        let g = governor(Arc::new(LayeredExtractor::default()), 5);

        let started = std::time::Instant::now();
        let results = g.run(candidates, 2, Duration::from_millis(500)).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(results[0].full_content, "");
        assert!(!results[1].full_content.is_empty());
    }

    #[tokio::test]
    async fn test_panicking_task_is_isolated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boom"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>BOOM marker text long enough here</p>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let candidates = vec![candidate(format!("{}/boom", server.uri())), candidate(format!("{}/ok", server.uri()))];
        let g = governor(Arc::new(PanicOn("BOOM")), 2);
        let results = g.run(candidates, 2, Duration::from_secs(5)).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].full_content, "");
        assert_eq!(results[1].full_content, "Body text long enough to be extracted by the pipeline.");
    }

    #[tokio::test]
    async fn test_concurrency_bound() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE).set_delay(Duration::from_millis(200)))
            .mount(&server)
            .await;

        let candidates: Vec<_> = (0..4).map(|i| candidate(format!("{}/p{i}", server.uri()))).collect();
        let g = governor(Arc::new(LayeredExtractor::default()), 1);

        let started = std::time::Instant::now();
        let results = g.run(candidates, 4, Duration::from_secs(10)).await.unwrap();

        // one permit: four 200ms responses cannot overlap
        assert!(started.elapsed() >= Duration::from_millis(800));
        assert!(results.iter().all(|r| !r.full_content.is_empty()));
    }
}
