//! Text normalization for extracted fragments.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Join fragments with single spaces, decode HTML entities, collapse
/// whitespace runs, trim, and cut to at most `max_chars` characters.
pub fn normalize_text(parts: &[String], max_chars: usize) -> String {
    let joined = parts.join(" ");
    let decoded = html_escape::decode_html_entities(&joined);
    let collapsed = WHITESPACE_RE.replace_all(&decoded, " ");
    truncate_chars(collapsed.trim(), max_chars).to_string()
}

/// Longest prefix of `s` holding at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
