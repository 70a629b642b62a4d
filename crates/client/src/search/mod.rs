//! Candidate retrieval: provider paging and the fixed news lookup.

pub mod executor;
pub mod news;

pub use executor::collect_candidates;
pub use news::{NEWS_COUNT, news_query};
