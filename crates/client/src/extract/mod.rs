//! Readable text extraction from HTML prefixes.
//!
//! ### Layered Strategies
//! Strategies run in order over one parsed document, each only while the
//! text gathered so far is below its sufficiency threshold:
//! 1. `<meta name="description">` content (> 40 chars)
//! 2. `<p>` inside the first container element (default `article`)
//! 3. `h1, h2, h3` text
//! 4. `<p>` anywhere
//!
//! If any structured strategy fails (e.g. a selector does not compile), the
//! gathered text is discarded and a regex `<p>` stripper runs over the raw
//! markup instead.
//!
//! ### Output Normalization
//! Fragments are joined, entity-decoded, whitespace-collapsed, trimmed and
//! cut to `max_text_chars`. An empty string means nothing was extractable.

pub mod normalize;
pub mod strategy;

pub use normalize::{normalize_text, truncate_chars};
pub use strategy::{Budget, Collected, ElementText, MetaDescription, RegexFallback, ScopedParagraphs, Strategy};

use scour_core::{AppConfig, Error, Profile};
use scraper::Html;

/// Budgets for the layered strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractProfile {
    pub container_selector: String,
    pub container: Budget,
    pub headings: Budget,
    pub paragraphs: Budget,
    pub fallback: Budget,
    pub max_text_chars: usize,
}

impl ExtractProfile {
    /// Budgets for thorough, slower extraction.
    pub fn deep() -> Self {
        Self {
            container_selector: "article".to_string(),
            container: Budget { max_items: 15, min_chars: 20, max_chars: None, run_below: None, stop_above: Some(600) },
            headings: Budget {
                max_items: 5,
                min_chars: 10,
                max_chars: Some(140),
                run_below: Some(200),
                stop_above: Some(300),
            },
            paragraphs: Budget {
                max_items: 15,
                min_chars: 20,
                max_chars: None,
                run_below: Some(200),
                stop_above: Some(600),
            },
            fallback: Budget { max_items: 12, min_chars: 20, max_chars: None, run_below: None, stop_above: Some(600) },
            max_text_chars: 10_000,
        }
    }

    /// Tighter budgets for latency-sensitive callers.
    pub fn fast() -> Self {
        Self {
            container_selector: "article".to_string(),
            container: Budget { max_items: 8, min_chars: 20, max_chars: None, run_below: None, stop_above: Some(400) },
            headings: Budget {
                max_items: 3,
                min_chars: 10,
                max_chars: Some(140),
                run_below: Some(150),
                stop_above: Some(250),
            },
            paragraphs: Budget {
                max_items: 8,
                min_chars: 20,
                max_chars: None,
                run_below: Some(150),
                stop_above: Some(400),
            },
            fallback: Budget { max_items: 8, min_chars: 20, max_chars: None, run_below: None, stop_above: Some(400) },
            max_text_chars: 3_000,
        }
    }

    /// Profile budgets with the configured selector and text cap applied.
    pub fn from_config(config: &AppConfig) -> Self {
        let base = match config.profile {
            Profile::Deep => Self::deep(),
            Profile::Fast => Self::fast(),
        };
        Self { container_selector: config.container_selector.clone(), max_text_chars: config.max_text_chars, ..base }
    }
}

impl Default for ExtractProfile {
    fn default() -> Self {
        Self::deep()
    }
}

/// Extracts normalized readable text from an HTML document.
pub trait Extractor: Send + Sync {
    /// Extract text from `html`; empty when nothing qualifies.
    fn extract(&self, html: &str) -> String;
}

/// Ordered-strategy extractor with a regex fallback.
pub struct LayeredExtractor {
    strategies: Vec<Box<dyn Strategy>>,
    fallback: RegexFallback,
    max_text_chars: usize,
}

impl LayeredExtractor {
    pub fn new(profile: &ExtractProfile) -> Self {
        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(MetaDescription::new()),
            Box::new(ScopedParagraphs::new(profile.container_selector.clone(), profile.container)),
            Box::new(ElementText::headings(profile.headings)),
            Box::new(ElementText::paragraphs(profile.paragraphs)),
        ];
        Self::with_strategies(strategies, RegexFallback::new(profile.fallback), profile.max_text_chars)
    }

    pub fn with_strategies(strategies: Vec<Box<dyn Strategy>>, fallback: RegexFallback, max_text_chars: usize) -> Self {
        Self { strategies, fallback, max_text_chars }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&ExtractProfile::from_config(config))
    }

    fn structured(&self, html: &str) -> Result<Collected, Error> {
        let doc = Html::parse_document(html);
        let mut collected = Collected::default();
        for strategy in &self.strategies {
            if strategy.is_applicable(&collected) {
                strategy.collect(&doc, &mut collected)?;
                tracing::trace!(strategy = strategy.name(), chars = collected.joined_len(), "strategy ran");
            }
        }
        Ok(collected)
    }
}

impl Default for LayeredExtractor {
    fn default() -> Self {
        Self::new(&ExtractProfile::default())
    }
}

impl Extractor for LayeredExtractor {
    fn extract(&self, html: &str) -> String {
        let collected = match self.structured(html) {
            Ok(collected) => collected,
            Err(e) => {
                tracing::debug!("structured extraction failed, using regex fallback: {}", e);
                self.fallback.collect(html)
            }
        };

        if collected.is_empty() {
            return String::new();
        }

        normalize_text(&collected.into_parts(), self.max_text_chars)
    }
}
