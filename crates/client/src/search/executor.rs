//! Pages through a [`SearchProvider`] to assemble up to `k` candidates.

use crate::provider::{MAX_PAGE_SIZE, MAX_START, SearchProvider};
use crate::types::SearchResult;

/// Collect up to `k` candidates for `query`, in provider rank order.
///
/// Pages are requested in windows of `min(10, k - collected)` from offset 1.
/// Paging ends when `k` results are in hand, a page comes back short, or the
/// next offset would pass the provider's 100-result cap. A failed page ends
/// paging too, keeping whatever earlier pages returned.
pub async fn collect_candidates(provider: &dyn SearchProvider, query: &str, k: usize) -> Vec<SearchResult> {
    let mut collected: Vec<SearchResult> = Vec::with_capacity(k.min(MAX_START + MAX_PAGE_SIZE - 1));
    let mut start = 1;

    while collected.len() < k && start <= MAX_START {
        let num = (k - collected.len()).min(MAX_PAGE_SIZE);

        match provider.page(query, num, start).await {
            Ok(page) => {
                let short = page.len() < num;
                collected.extend(page);
                if short {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("provider page at start={} failed, keeping {} results: {}", start, collected.len(), e);
                break;
            }
        }

        start += MAX_PAGE_SIZE;
    }

    collected.truncate(k);
    tracing::debug!("collected {} candidates for query={}", collected.len(), query);
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves `total` synthetic results, failing at `fail_at` if set.
    struct FakeProvider {
        total: usize,
        fail_at: Option<usize>,
        calls: Mutex<Vec<(usize, usize)>>,
    }

    impl FakeProvider {
        fn new(total: usize) -> Self {
            Self { total, fail_at: None, calls: Mutex::new(Vec::new()) }
        }

        fn calls(&self) -> Vec<(usize, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchProvider for FakeProvider {
        async fn page(&self, _query: &str, num: usize, start: usize) -> Result<Vec<SearchResult>, ProviderError> {
            self.calls.lock().unwrap().push((num, start));
            if self.fail_at == Some(start) {
                return Err(ProviderError::HttpError { status: 500 });
            }
            let first = start - 1;
            let last = (first + num).min(self.total);
            Ok((first..last)
                .map(|i| SearchResult::new(format!("r{i}"), format!("https://example.com/{i}"), ""))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_single_page() {
        let provider = FakeProvider::new(50);
        let results = collect_candidates(&provider, "q", 3).await;
        assert_eq!(results.len(), 3);
        assert_eq!(provider.calls(), vec![(3, 1)]);
    }

    #[tokio::test]
    async fn test_multi_page_windows() {
        let provider = FakeProvider::new(50);
        let results = collect_candidates(&provider, "q", 25).await;
        assert_eq!(results.len(), 25);
        assert_eq!(provider.calls(), vec![(10, 1), (10, 11), (5, 21)]);
        assert_eq!(results[24].title, "r24");
    }

    #[tokio::test]
    async fn test_short_page_stops() {
        let provider = FakeProvider::new(12);
        let results = collect_candidates(&provider, "q", 30).await;
        assert_eq!(results.len(), 12);
        assert_eq!(provider.calls(), vec![(10, 1), (10, 11)]);
    }

    #[tokio::test]
    async fn test_provider_cap() {
        let provider = FakeProvider::new(500);
        let results = collect_candidates(&provider, "q", 150).await;
        assert_eq!(results.len(), 100);
        assert_eq!(provider.calls().last(), Some(&(10, 91)));
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_pages() {
        let provider = FakeProvider { fail_at: Some(11), ..FakeProvider::new(50) };
        let results = collect_candidates(&provider, "q", 20).await;
        assert_eq!(results.len(), 10);
    }

    #[tokio::test]
    async fn test_first_page_failure() {
        let provider = FakeProvider { fail_at: Some(1), ..FakeProvider::new(50) };
        assert!(collect_candidates(&provider, "q", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_zero_k() {
        let provider = FakeProvider::new(50);
        assert!(collect_candidates(&provider, "q", 0).await.is_empty());
        assert!(provider.calls().is_empty());
    }
}
