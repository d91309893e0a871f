//! Tavily HTTP client for web search.
//!
//! Uses the `/search` endpoint with bearer-token authentication.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{SearchProvider, SearchRequest};
use crate::analysis::SearchResult;
use crate::config::SearchConfig;
use crate::error::{MiaError, MiaResult};

/// Default Tavily API URL.
pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com";

/// Tavily search client.
#[derive(Clone)]
pub struct TavilyClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct TavilySearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    search_depth: &'static str,
    include_answer: bool,
}

#[derive(Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

impl TavilyClient {
    /// Create a new client against `base_url`.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> MiaResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Create a client from the `[search]` configuration section.
    pub fn from_config(config: &SearchConfig) -> MiaResult<Self> {
        Self::new(
            &config.api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    fn name(&self) -> &'static str {
        "tavily"
    }

    async fn search(&self, request: &SearchRequest) -> MiaResult<Vec<SearchResult>> {
        let body = TavilySearchRequest {
            query: &request.query,
            max_results: request.max_results,
            search_depth: request.depth.as_str(),
            include_answer: false,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MiaError::ProviderApi {
                provider: "Tavily",
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let results = parse_search_response(&text)?;

        debug!(query = %request.query, count = results.len(), "Tavily search returned");

        Ok(results)
    }
}

/// Parse a `/search` response body into results, preserving order.
fn parse_search_response(body: &str) -> MiaResult<Vec<SearchResult>> {
    let parsed: TavilySearchResponse = serde_json::from_str(body)?;
    Ok(parsed.results)
}
