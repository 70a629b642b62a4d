//! Custom Search page request parameters and validation.

use serde::Serialize;

use crate::provider::ProviderError;

/// Most results the provider returns per page.
pub const MAX_PAGE_SIZE: usize = 10;

/// Highest 1-based start offset the provider accepts for a full page
/// (it serves at most 100 results per query).
pub const MAX_START: usize = 91;

/// Query string for one Custom Search page.
#[derive(Debug, Clone, Serialize)]
pub struct PageRequest<'a> {
    /// API key.
    pub key: &'a str,
    /// Search engine id.
    pub cx: &'a str,
    /// Query text.
    pub q: &'a str,
    /// Page size (1-10).
    pub num: usize,
    /// 1-based offset of the first result.
    pub start: usize,
    /// Safe search level; always "off".
    pub safe: &'static str,
}

impl<'a> PageRequest<'a> {
    pub fn new(key: &'a str, cx: &'a str, q: &'a str, num: usize, start: usize) -> Self {
        Self { key, cx, q, num, start, safe: "off" }
    }

    /// Validate the page parameters.
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.q.trim().is_empty() {
            return Err(ProviderError::InvalidRequest("query cannot be empty".to_string()));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.num) {
            return Err(ProviderError::InvalidRequest(format!("num must be 1-{MAX_PAGE_SIZE}, got {}", self.num)));
        }

        if !(1..=MAX_START).contains(&self.start) {
            return Err(ProviderError::InvalidRequest(format!("start must be 1-{MAX_START}, got {}", self.start)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let req = PageRequest::new("key", "cx", "rust async", 10, 1);
        assert!(req.validate().is_ok());
        assert_eq!(req.safe, "off");
    }

    #[test]
    fn test_empty_query() {
        let req = PageRequest::new("key", "cx", "  ", 10, 1);
        assert!(matches!(req.validate(), Err(ProviderError::InvalidRequest(_))));
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(PageRequest::new("key", "cx", "q", 0, 1).validate().is_err());
        assert!(PageRequest::new("key", "cx", "q", 11, 1).validate().is_err());
    }

    #[test]
    fn test_start_bounds() {
        assert!(PageRequest::new("key", "cx", "q", 10, 91).validate().is_ok());
        assert!(PageRequest::new("key", "cx", "q", 10, 101).validate().is_err());
        assert!(PageRequest::new("key", "cx", "q", 10, 0).validate().is_err());
    }

    #[test]
    fn test_serializes_all_parameters() {
        let req = PageRequest::new("k", "c", "q", 5, 11);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["num"], 5);
        assert_eq!(json["start"], 11);
        assert_eq!(json["safe"], "off");
        assert_eq!(json["cx"], "c");
    }
}
