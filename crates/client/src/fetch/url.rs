//! Structural URL validation for enrichment candidates.

/// Error type for URL validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("missing host")]
    MissingHost,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse a candidate link into a fetchable URL.
///
/// Unlike user-typed input, provider links must already be absolute: no
/// scheme is inferred. The URL must:
/// 1. Parse after trimming surrounding whitespace
/// 2. Use `http` or `https`
/// 3. Have a non-empty host
pub fn parse_fetchable(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(parsed)
}

/// Whether a link passes [`parse_fetchable`].
pub fn is_fetchable(input: &str) -> bool {
    parse_fetchable(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let url = parse_fetchable("https://example.com/article").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_http_allowed() {
        assert!(is_fetchable("http://example.com"));
    }

    #[test]
    fn test_scheme_required() {
        assert!(matches!(parse_fetchable("example.com/page"), Err(UrlError::InvalidUrl(_))));
    }

    #[test]
    fn test_unsupported_scheme() {
        assert!(matches!(parse_fetchable("ftp://example.com/file"), Err(UrlError::UnsupportedScheme(_))));
        assert!(matches!(parse_fetchable("file:///etc/passwd"), Err(UrlError::UnsupportedScheme(_))));
        assert!(!is_fetchable("javascript:alert(1)"));
    }

    #[test]
    fn test_empty() {
        assert!(matches!(parse_fetchable(""), Err(UrlError::Empty)));
        assert!(matches!(parse_fetchable("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_trim_whitespace() {
        let url = parse_fetchable("  https://example.com  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_preserves_query() {
        let url = parse_fetchable("https://example.com/path?a=1&b=2#frag").unwrap();
        assert_eq!(url.path(), "/path");
        assert_eq!(url.query(), Some("a=1&b=2"));
    }

    #[test]
    fn test_local_addresses_are_structurally_valid() {
        assert!(is_fetchable("http://127.0.0.1:8080/page"));
    }
}
