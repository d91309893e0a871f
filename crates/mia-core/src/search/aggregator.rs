//! Search aggregation across a category's query list.
//!
//! Queries are issued in list order. Hits are merged in query order, then
//! in-query order, de-duplicated by URL (first seen wins) and capped.
//! A failing query contributes nothing; it is logged and skipped.

use chrono::Datelike;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{SearchDepth, SearchProvider, SearchRequest};
use crate::analysis::model::MAX_RESULTS;
use crate::analysis::{AnalysisCategory, ResultSet, SearchResult};
use crate::config::SearchConfig;
use crate::error::{MiaError, MiaResult};

/// Results requested from the provider per query.
pub const RESULTS_PER_QUERY: usize = 5;

/// Tunables for [`SearchAggregator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorSettings {
    pub max_results_per_query: usize,
    pub max_results: usize,
    pub depth: SearchDepth,
    /// Issue all queries concurrently. Merge order is unaffected.
    pub parallel: bool,
    /// Fail when every query failed instead of returning an empty set.
    pub require_sources: bool,
    /// Year substituted into time-sensitive queries.
    pub reference_year: i32,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            max_results_per_query: RESULTS_PER_QUERY,
            max_results: MAX_RESULTS,
            depth: SearchDepth::Advanced,
            parallel: false,
            require_sources: false,
            reference_year: chrono::Utc::now().year(),
        }
    }
}

impl From<&SearchConfig> for AggregatorSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_results_per_query: config.max_results_per_query.min(RESULTS_PER_QUERY),
            max_results: config.max_results.min(MAX_RESULTS),
            depth: config.depth,
            parallel: config.parallel_queries,
            require_sources: config.require_sources,
            reference_year: config
                .reference_year
                .unwrap_or_else(|| chrono::Utc::now().year()),
        }
    }
}

/// Runs a category's queries and builds the bounded result set.
#[derive(Clone)]
pub struct SearchAggregator {
    provider: Arc<dyn SearchProvider>,
    settings: AggregatorSettings,
}

impl SearchAggregator {
    pub fn new(provider: Arc<dyn SearchProvider>, settings: AggregatorSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &AggregatorSettings {
        &self.settings
    }

    /// The requests `aggregate` will issue, in order.
    pub fn plan(&self, company: &str, category: AnalysisCategory) -> Vec<SearchRequest> {
        category
            .queries(company, self.settings.reference_year)
            .into_iter()
            .map(|query| SearchRequest {
                query,
                max_results: self.settings.max_results_per_query,
                depth: self.settings.depth,
            })
            .collect()
    }

    /// Search for `company` and return the merged, de-duplicated, capped set.
    pub async fn aggregate(&self, company: &str, category: AnalysisCategory) -> MiaResult<ResultSet> {
        let requests = self.plan(company, category);
        let outcomes = self.execute(&requests).await;

        let mut results = ResultSet::with_limit(self.settings.max_results);
        let mut failed = 0;

        for (request, outcome) in requests.iter().zip(outcomes) {
            match outcome {
                Ok(hits) => {
                    let returned = hits.len();
                    let accepted = results.extend(hits);
                    debug!(query = %request.query, returned, accepted, "Search query complete");
                }
                Err(e) => {
                    failed += 1;
                    warn!(
                        provider = self.provider.name(),
                        query = %request.query,
                        error = %e,
                        "Search query failed, skipping"
                    );
                }
            }
        }

        if failed == requests.len() {
            if self.settings.require_sources {
                return Err(MiaError::NoSearchResults { attempted: requests.len() });
            }
            warn!(attempted = requests.len(), "Every search query failed, continuing without sources");
        }

        info!(
            company,
            category = %category,
            count = results.len(),
            failed,
            "Research complete"
        );

        Ok(results)
    }

    async fn execute(&self, requests: &[SearchRequest]) -> Vec<MiaResult<Vec<SearchResult>>> {
        if self.settings.parallel {
            // join_all yields outputs in input order
            let calls = requests.iter().map(|r| self.provider.search(r));
            return futures::future::join_all(calls).await;
        }

        let mut outcomes = Vec::with_capacity(requests.len());
        for request in requests {
            outcomes.push(self.provider.search(request).await);
        }
        outcomes
    }
}
