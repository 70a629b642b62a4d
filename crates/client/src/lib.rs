//! Bounded-latency web search with best-effort content enrichment.
//!
//! [`Scour`] asks a search provider for candidate documents, then fetches
//! each candidate's origin page and extracts readable text, all under a
//! wall-clock budget. Enrichment is best effort: any document that is slow,
//! broken or empty comes back with `full_content = ""`.
//!
//! ```no_run
//! use scour_client::Scour;
//!
//! let scour = Scour::from_env()?;
//! for result in scour.search("rust async runtimes", 5, true) {
//!     println!("{} ({} chars)", result.link, result.full_content.len());
//! }
//! # Ok::<(), scour_core::Error>(())
//! ```

pub mod bridge;
pub mod engine;
pub mod extract;
pub mod fetch;
pub mod governor;
pub mod provider;
pub mod scour;
pub mod search;
pub mod types;

pub use bridge::{Bridge, BridgeError, run_isolated};
pub use engine::Enricher;
pub use extract::{ExtractProfile, Extractor, LayeredExtractor, Strategy};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, is_fetchable};
pub use governor::Governor;
pub use provider::{GoogleClient, GoogleConfig, ProviderError, SearchProvider};
pub use scour::Scour;
pub use search::{NEWS_COUNT, collect_candidates, news_query};
pub use types::SearchResult;
