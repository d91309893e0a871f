//! Centralized error types for MIA.

use thiserror::Error;

/// Main error type for MIA operations.
#[derive(Error, Debug)]
pub enum MiaError {
    #[error("Search failed for '{query}': {message}")]
    Search { query: String, message: String },

    #[error("All {attempted} search queries failed; no sources to analyze")]
    NoSearchResults { attempted: usize },

    #[error("Report synthesis failed: {0}")]
    Synthesis(String),

    #[error("{provider} API error (HTTP {status}): {message}")]
    ProviderApi {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Invalid analysis_type '{given}'. Must be one of: {valid}")]
    InvalidCategory { given: String, valid: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for MIA operations.
pub type MiaResult<T> = Result<T, MiaError>;

impl MiaError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a synthesis error.
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    /// Whether the error was caused by the caller rather than a provider.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidCategory { .. } | Self::Validation(_))
    }
}
