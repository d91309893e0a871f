//! Deterministic providers for tests and offline runs.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::analysis::SearchResult;
use crate::error::{MiaError, MiaResult};
use crate::search::{SearchProvider, SearchRequest};
use crate::synth::{GenerationRequest, TextGenerator};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Search provider with canned results per query.
///
/// Unconfigured queries succeed with no results. Like a real provider, at
/// most `max_results` hits are returned per query. Every request is recorded.
#[derive(Default)]
pub struct StubSearchProvider {
    results: HashMap<String, Vec<SearchResult>>,
    failures: HashSet<String>,
    calls: Mutex<Vec<SearchRequest>>,
}

impl StubSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.results.insert(query.to_string(), results);
        self
    }

    pub fn with_failure(mut self, query: &str) -> Self {
        self.failures.insert(query.to_string());
        self
    }

    /// Requests received so far, in order.
    pub fn calls(&self) -> Vec<SearchRequest> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }
}

#[async_trait]
impl SearchProvider for StubSearchProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn search(&self, request: &SearchRequest) -> MiaResult<Vec<SearchResult>> {
        lock(&self.calls).push(request.clone());

        if self.failures.contains(&request.query) {
            return Err(MiaError::Search {
                query: request.query.clone(),
                message: "stubbed failure".to_string(),
            });
        }

        let mut results = self.results.get(&request.query).cloned().unwrap_or_default();
        results.truncate(request.max_results);
        Ok(results)
    }
}

/// Text generator returning fixed segments, or a fixed error.
pub struct StubGenerator {
    outcome: Result<Vec<String>, String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl StubGenerator {
    /// Always returns `report` as the only segment.
    pub fn new(report: impl Into<String>) -> Self {
        Self::with_segments(vec![report.into()])
    }

    pub fn with_segments(segments: Vec<String>) -> Self {
        Self {
            outcome: Ok(segments),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with a provider error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, request: &GenerationRequest) -> MiaResult<Vec<String>> {
        lock(&self.requests).push(request.clone());

        match &self.outcome {
            Ok(segments) => Ok(segments.clone()),
            Err(message) => Err(MiaError::ProviderApi {
                provider: "stub",
                status: 529,
                message: message.clone(),
            }),
        }
    }
}
