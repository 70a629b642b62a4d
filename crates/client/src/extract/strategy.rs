//! Extraction strategies and their budgets.
//!
//! Each strategy reads one kind of element out of a parsed document and
//! appends qualifying text to a shared [`Collected`] buffer. A strategy only
//! runs while the buffer is below its sufficiency threshold and stops as soon
//! as the buffer grows past its stop threshold.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use scour_core::Error;
use std::sync::LazyLock;

static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>").expect("valid paragraph regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Limits applied to a single strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    /// Number of matching elements examined, in document order.
    pub max_items: usize,
    /// Items must be strictly longer than this many characters.
    pub min_chars: usize,
    /// Items must be strictly shorter than this, when set.
    pub max_chars: Option<usize>,
    /// Only run while the joined text is shorter than this, when set.
    pub run_below: Option<usize>,
    /// Stop once the joined text is longer than this, when set.
    pub stop_above: Option<usize>,
}

impl Budget {
    fn accepts(&self, text: &str) -> bool {
        let len = text.chars().count();
        len > self.min_chars && self.max_chars.is_none_or(|max| len < max)
    }

    fn should_run(&self, collected: &Collected) -> bool {
        self.run_below.is_none_or(|below| collected.joined_len() < below)
    }

    fn exhausted(&self, collected: &Collected) -> bool {
        self.stop_above.is_some_and(|above| collected.joined_len() > above)
    }
}

/// Text pieces gathered so far, with the length they would have once joined
/// by single spaces.
#[derive(Debug, Default, Clone)]
pub struct Collected {
    parts: Vec<String>,
    joined_len: usize,
}

impl Collected {
    pub fn push(&mut self, text: String) {
        if !self.parts.is_empty() {
            self.joined_len += 1;
        }
        self.joined_len += text.chars().count();
        self.parts.push(text);
    }

    /// Character length of `parts().join(" ")`.
    pub fn joined_len(&self) -> usize {
        self.joined_len
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn into_parts(self) -> Vec<String> {
        self.parts
    }

    /// Push `text` if the budget accepts it; returns true when the budget's
    /// stop threshold has been crossed.
    fn offer(&mut self, budget: &Budget, text: String) -> bool {
        if budget.accepts(&text) {
            self.push(text);
            return budget.exhausted(self);
        }
        false
    }
}

/// One step of the layered extraction.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn budget(&self) -> &Budget;

    /// Append qualifying text from `doc` to `collected`.
    fn collect(&self, doc: &Html, collected: &mut Collected) -> Result<(), Error>;

    /// Whether this strategy should run given what has been collected.
    fn is_applicable(&self, collected: &Collected) -> bool {
        self.budget().should_run(collected)
    }
}

fn compile(selector: &str) -> Result<Selector, Error> {
    Selector::parse(selector).map_err(|e| Error::ExtractFailed(format!("invalid selector {selector:?}: {e}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `<meta name="description">` content.
pub struct MetaDescription {
    budget: Budget,
}

impl MetaDescription {
    pub fn new() -> Self {
        Self { budget: Budget { max_items: 1, min_chars: 40, max_chars: None, run_below: None, stop_above: None } }
    }
}

impl Default for MetaDescription {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for MetaDescription {
    fn name(&self) -> &'static str {
        "meta-description"
    }

    fn budget(&self) -> &Budget {
        &self.budget
    }

    fn collect(&self, doc: &Html, collected: &mut Collected) -> Result<(), Error> {
        let selector = compile(r#"meta[name="description"]"#)?;
        for meta in doc.select(&selector).take(self.budget.max_items) {
            if let Some(content) = meta.value().attr("content")
                && collected.offer(&self.budget, content.trim().to_string())
            {
                break;
            }
        }
        Ok(())
    }
}

/// Paragraphs inside the first element matching a container selector.
pub struct ScopedParagraphs {
    container: String,
    budget: Budget,
}

impl ScopedParagraphs {
    pub fn new(container: impl Into<String>, budget: Budget) -> Self {
        Self { container: container.into(), budget }
    }
}

impl Strategy for ScopedParagraphs {
    fn name(&self) -> &'static str {
        "container-paragraphs"
    }

    fn budget(&self) -> &Budget {
        &self.budget
    }

    fn collect(&self, doc: &Html, collected: &mut Collected) -> Result<(), Error> {
        let container = compile(&self.container)?;
        let paragraph = compile("p")?;

        let Some(scope) = doc.select(&container).next() else {
            return Ok(());
        };

        for p in scope.select(&paragraph).take(self.budget.max_items) {
            if collected.offer(&self.budget, element_text(p)) {
                break;
            }
        }
        Ok(())
    }
}

/// Text of every element matching a selector anywhere in the document.
pub struct ElementText {
    name: &'static str,
    selector: &'static str,
    budget: Budget,
}

impl ElementText {
    pub fn headings(budget: Budget) -> Self {
        Self { name: "headings", selector: "h1, h2, h3", budget }
    }

    pub fn paragraphs(budget: Budget) -> Self {
        Self { name: "paragraphs", selector: "p", budget }
    }
}

impl Strategy for ElementText {
    fn name(&self) -> &'static str {
        self.name
    }

    fn budget(&self) -> &Budget {
        &self.budget
    }

    fn collect(&self, doc: &Html, collected: &mut Collected) -> Result<(), Error> {
        let selector = compile(self.selector)?;
        for element in doc.select(&selector).take(self.budget.max_items) {
            if collected.offer(&self.budget, element_text(element)) {
                break;
            }
        }
        Ok(())
    }
}

/// Regex `<p>` stripper used when structured extraction fails.
#[derive(Debug, Clone)]
pub struct RegexFallback {
    budget: Budget,
}

impl RegexFallback {
    pub fn new(budget: Budget) -> Self {
        Self { budget }
    }

    /// Collect paragraph text straight from the raw markup.
    pub fn collect(&self, html: &str) -> Collected {
        let mut collected = Collected::default();
        for captures in PARAGRAPH_RE.captures_iter(html).take(self.budget.max_items) {
            let inner = captures.get(1).map_or("", |m| m.as_str());
            let text = TAG_RE.replace_all(inner, "").trim().to_string();
            if collected.offer(&self.budget, text) {
                break;
            }
        }
        collected
    }
}
