//! Service configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! environment variables. Every field has a default, so an empty file is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::model::MAX_RESULTS;
use crate::error::{MiaError, MiaResult};
use crate::search::aggregator::RESULTS_PER_QUERY;
use crate::search::tavily::DEFAULT_TAVILY_URL;
use crate::search::SearchDepth;
use crate::synth::anthropic::{DEFAULT_ANTHROPIC_URL, DEFAULT_MODEL};
use crate::synth::synthesizer::DEFAULT_MAX_TOKENS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed browser origins. `"*"` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub api_key: String,
    pub base_url: String,
    pub max_results_per_query: usize,
    pub max_results: usize,
    pub depth: SearchDepth,
    pub parallel_queries: bool,
    pub require_sources: bool,
    pub timeout_secs: u64,
    pub reference_year: Option<i32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_TAVILY_URL.to_string(),
            max_results_per_query: RESULTS_PER_QUERY,
            max_results: MAX_RESULTS,
            depth: SearchDepth::Advanced,
            parallel_queries: false,
            require_sources: false,
            timeout_secs: 60,
            reference_year: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_ANTHROPIC_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: 120,
        }
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> MiaResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file.
    pub fn from_file(path: &Path) -> MiaResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load from `path` if given and present, apply environment overrides, validate.
    pub fn load(path: Option<&Path>) -> MiaResult<Self> {
        let mut config = match path {
            Some(p) if p.exists() => {
                tracing::debug!(path = %p.display(), "Loading configuration file");
                Self::from_file(p)?
            }
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override fields from environment variables read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("ANTHROPIC_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(key) = non_empty("TAVILY_API_KEY") {
            self.search.api_key = key;
        }
        if let Some(model) = non_empty("MIA_MODEL") {
            self.llm.model = model;
        }
        if let Some(host) = non_empty("MIA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = non_empty("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Reject settings that would make the pipeline meaningless.
    pub fn validate(&self) -> MiaResult<()> {
        if !(1..=MAX_RESULTS).contains(&self.search.max_results) {
            return Err(MiaError::Config(format!(
                "search.max_results must be between 1 and {MAX_RESULTS}"
            )));
        }
        if !(1..=RESULTS_PER_QUERY).contains(&self.search.max_results_per_query) {
            return Err(MiaError::Config(format!(
                "search.max_results_per_query must be between 1 and {RESULTS_PER_QUERY}"
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(MiaError::Config("llm.max_tokens must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Whether a generative-text API key is set.
    pub fn llm_configured(&self) -> bool {
        !self.llm.api_key.is_empty()
    }

    /// Whether a search API key is set.
    pub fn search_configured(&self) -> bool {
        !self.search.api_key.is_empty()
    }
}
