//! Fixed category-to-query table for headline lookups.

/// Results returned for a news lookup.
pub const NEWS_COUNT: usize = 8;

/// Provider query for a news category. Unknown categories get generic news.
pub fn news_query(category: &str) -> &'static str {
    match category {
        "technology" => "latest tech AI news",
        "finance" => "latest finance market news",
        "entertainment" => "latest entertainment news",
        "sports" => "latest sports news",
        "world" => "latest world news",
        "health" => "latest health news",
        _ => "latest news",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories() {
        assert_eq!(news_query("technology"), "latest tech AI news");
        assert_eq!(news_query("finance"), "latest finance market news");
        assert_eq!(news_query("sports"), "latest sports news");
        assert_eq!(news_query("health"), "latest health news");
    }

    #[test]
    fn test_unknown_category() {
        assert_eq!(news_query("gardening"), "latest news");
        assert_eq!(news_query(""), "latest news");
        assert_eq!(news_query("Technology"), "latest news");
    }
}
