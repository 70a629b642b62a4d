//! Result type shared by every stage of the pipeline.

use serde::{Deserialize, Serialize};

/// One candidate document: provider metadata plus optional enriched text.
///
/// Identity is `link`; the pipeline never deduplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
    /// Extracted body text, `""` when not enriched or enrichment failed.
    pub full_content: String,
}

impl SearchResult {
    /// Create an unenriched result.
    pub fn new(title: impl Into<String>, link: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self { title: title.into(), link: link.into(), snippet: snippet.into(), full_content: String::new() }
    }
}

/// First `k` results with their content cleared.
pub fn bare(results: &[SearchResult], k: usize) -> Vec<SearchResult> {
    results
        .iter()
        .take(k)
        .map(|r| SearchResult { full_content: String::new(), ..r.clone() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unenriched() {
        let result = SearchResult::new("Title", "https://example.com", "snippet");
        assert!(result.full_content.is_empty());
    }

    #[test]
    fn test_bare_truncates_and_clears() {
        let mut first = SearchResult::new("a", "https://a.example", "");
        first.full_content = "text".into();
        let second = SearchResult::new("b", "https://b.example", "");

        let results = bare(&[first, second], 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].link, "https://a.example");
        assert!(results[0].full_content.is_empty());
    }

    #[test]
    fn test_serializes_field_names() {
        let json = serde_json::to_value(SearchResult::new("t", "https://x.example", "s")).unwrap();
        assert_eq!(json["full_content"], "");
        assert_eq!(json["link"], "https://x.example");
    }
}
