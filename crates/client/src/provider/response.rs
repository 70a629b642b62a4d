//! Custom Search response types and normalization.

use serde::Deserialize;

use crate::types::SearchResult;

/// Raw response from the Custom Search JSON API.
///
/// A query with no hits omits `items` entirely.
#[derive(Debug, Deserialize)]
pub struct CseResponse {
    #[serde(default)]
    pub items: Vec<CseItem>,
}

/// Individual item from the `items` array.
#[derive(Debug, Deserialize)]
pub struct CseItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

impl CseResponse {
    /// Normalize up to `limit` items, dropping any without a title or link.
    pub fn into_results(self, limit: usize) -> Vec<SearchResult> {
        self.items
            .into_iter()
            .take(limit)
            .filter(|item| !item.title.is_empty() && !item.link.is_empty())
            .map(|item| SearchResult::new(item.title, item.link, item.snippet))
            .collect()
    }
}
