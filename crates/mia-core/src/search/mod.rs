//! Web search: provider seam, Tavily client and the result aggregator.

pub mod aggregator;
pub mod tavily;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::SearchResult;
use crate::error::MiaResult;

pub use aggregator::{AggregatorSettings, SearchAggregator};
pub use tavily::TavilyClient;

/// How much effort the provider spends per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

/// One query sent to a search provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: usize,
    pub depth: SearchDepth,
}

/// A web search backend.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Run one query. Errors are per-call and never retried by callers.
    async fn search(&self, request: &SearchRequest) -> MiaResult<Vec<SearchResult>>;
}
