//! Volatile, process-lifetime caches shared by every enrichment call.
//!
//! This module bundles the three pieces of memo state the pipeline keeps:
//!
//! - Extracted text per URL, bounded and evicted in insertion order
//! - URLs that failed to fetch or yielded no text (no expiry)
//! - Memoized URL validity verdicts
//!
//! Each piece sits behind its own `std::sync::Mutex`. Locks are never held
//! across an await point, so the layer can be shared between the caller's
//! runtime and an isolated worker thread.

pub mod content;
pub mod memo;

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use content::TextCache;
pub use memo::ValidityMemo;

use crate::AppConfig;

/// Entry counts for each cache, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub texts: usize,
    pub failures: usize,
    pub verdicts: usize,
}

/// Positive cache, negative cache and validity memo owned by one pipeline.
#[derive(Debug)]
pub struct CacheLayer {
    texts: Mutex<TextCache>,
    failures: Mutex<HashSet<String>>,
    verdicts: Mutex<ValidityMemo>,
}

impl CacheLayer {
    /// Create an empty cache layer.
    pub fn new(capacity: usize, eviction_batch: usize, memo_capacity: usize) -> Self {
        Self {
            texts: Mutex::new(TextCache::new(capacity, eviction_batch)),
            failures: Mutex::new(HashSet::new()),
            verdicts: Mutex::new(ValidityMemo::new(memo_capacity)),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.cache_capacity, config.cache_eviction_batch, config.validity_memo_capacity)
    }

    /// Cached extracted text for a URL.
    pub fn cached_text(&self, url: &str) -> Option<String> {
        lock(&self.texts).get(url).map(str::to_owned)
    }

    /// Store extracted text, evicting the oldest entries when full.
    pub fn store_text(&self, url: &str, text: String) {
        let evicted = lock(&self.texts).insert(url.to_owned(), text);
        if evicted > 0 {
            tracing::debug!(evicted, "text cache full, dropped oldest entries");
        }
    }

    pub fn is_failed(&self, url: &str) -> bool {
        lock(&self.failures).contains(url)
    }

    /// Record a URL as not worth fetching again.
    pub fn mark_failed(&self, url: &str) {
        lock(&self.failures).insert(url.to_owned());
    }

    /// Memoized validity verdict for a URL, computing it with `check` on a miss.
    pub fn validity(&self, url: &str, check: impl FnOnce(&str) -> bool) -> bool {
        if let Some(verdict) = lock(&self.verdicts).get(url) {
            return verdict;
        }
        let verdict = check(url);
        lock(&self.verdicts).insert(url, verdict);
        verdict
    }

    /// Clear all three caches.
    pub fn reset(&self) {
        lock(&self.texts).clear();
        lock(&self.failures).clear();
        lock(&self.verdicts).clear();
        tracing::debug!("caches cleared");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            texts: lock(&self.texts).len(),
            failures: lock(&self.failures).len(),
            verdicts: lock(&self.verdicts).len(),
        }
    }
}

/// A panic while holding one of these locks cannot leave the maps half-updated
/// in a way that matters, so poisoning is ignored.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
