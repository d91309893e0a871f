//! Application state.

use mia_core::{AnalysisPipeline, Config, MiaResult};
use serde::{Deserialize, Serialize};

/// Which provider credentials were present at start-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub api_configured: bool,
    pub search_configured: bool,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: AnalysisPipeline,
    pub providers: ProviderStatus,
}

impl AppState {
    pub fn new(pipeline: AnalysisPipeline, providers: ProviderStatus) -> Self {
        Self { pipeline, providers }
    }

    /// Build state backed by the configured Tavily and Claude clients.
    pub fn from_config(config: &Config) -> MiaResult<Self> {
        let pipeline = AnalysisPipeline::from_config(config)?;
        let providers = ProviderStatus {
            api_configured: config.llm_configured(),
            search_configured: config.search_configured(),
        };
        Ok(Self::new(pipeline, providers))
    }
}
