//! Analysis domain models.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::category::AnalysisCategory;
use crate::error::{MiaError, MiaResult};

/// Placeholder used in the context block when a result has no title.
pub const UNTITLED: &str = "Untitled";

/// Placeholder used in the context block when a result has no snippet.
pub const NO_CONTENT: &str = "No content";

/// Upper bound on the number of results carried into synthesis.
pub const MAX_RESULTS: usize = 15;

/// Input to one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub company_name: String,
    pub category: AnalysisCategory,
}

impl AnalysisRequest {
    /// Build a request. The company name must not be blank.
    pub fn new(company_name: impl Into<String>, category: AnalysisCategory) -> MiaResult<Self> {
        let company_name = company_name.into();
        if company_name.trim().is_empty() {
            return Err(MiaError::validation("company_name must not be empty"));
        }
        Ok(Self {
            company_name,
            category,
        })
    }

    /// Build a request from a raw category key. Unknown keys resolve to the
    /// default category rather than failing.
    pub fn from_key(company_name: impl Into<String>, category: &str) -> MiaResult<Self> {
        Self::new(company_name, AnalysisCategory::resolve(category))
    }
}

/// A single web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl SearchResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            content: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Title, or [`UNTITLED`] when absent.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// Snippet, or [`NO_CONTENT`] when absent.
    pub fn display_content(&self) -> &str {
        self.content.as_deref().unwrap_or(NO_CONTENT)
    }
}

/// Ordered, URL-unique, bounded collection of search results.
///
/// Insertion order is preserved. A URL that was already accepted is
/// rejected (first seen wins), and nothing is accepted once `limit`
/// entries are held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    results: Vec<SearchResult>,
    seen: HashSet<String>,
    limit: usize,
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::with_limit(MAX_RESULTS)
    }
}

impl ResultSet {
    /// Create an empty set bounded to `limit` entries.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            results: Vec::new(),
            seen: HashSet::new(),
            limit,
        }
    }

    /// Offer a result. Returns `true` if it was accepted.
    pub fn push(&mut self, result: SearchResult) -> bool {
        if self.is_full() || self.seen.contains(&result.url) {
            return false;
        }
        self.seen.insert(result.url.clone());
        self.results.push(result);
        true
    }

    /// Offer results in order, returning how many were accepted.
    pub fn extend(&mut self, results: impl IntoIterator<Item = SearchResult>) -> usize {
        let mut accepted = 0;
        for result in results {
            if self.push(result) {
                accepted += 1;
            }
        }
        accepted
    }

    pub fn is_full(&self) -> bool {
        self.results.len() >= self.limit
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[SearchResult] {
        &self.results
    }

    /// URLs in result order.
    pub fn urls(&self) -> Vec<String> {
        self.results.iter().map(|r| r.url.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Mutable record threaded through one pipeline run.
///
/// `sources` is only ever written from `results`, so the two stay aligned.
#[derive(Debug, Clone)]
pub struct AnalysisState {
    pub company_name: String,
    pub category: AnalysisCategory,
    results: ResultSet,
    report: String,
    sources: Vec<String>,
}

impl AnalysisState {
    pub fn new(company_name: impl Into<String>, category: AnalysisCategory) -> Self {
        Self {
            company_name: company_name.into(),
            category,
            results: ResultSet::default(),
            report: String::new(),
            sources: Vec::new(),
        }
    }

    /// Record the outcome of the research stage.
    pub fn apply_research(&mut self, results: ResultSet) {
        self.sources = results.urls();
        self.results = results;
    }

    /// Record the outcome of the synthesis stage.
    pub fn apply_report(&mut self, report: String) {
        self.report = report;
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn report(&self) -> &str {
        &self.report
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Consume the state into the caller-facing outcome.
    pub fn into_report(self) -> AnalysisReport {
        AnalysisReport {
            report: self.report,
            sources: self.sources,
        }
    }
}

/// A finished analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub report: String,
    pub sources: Vec<String>,
}
