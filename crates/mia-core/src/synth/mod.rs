//! Report synthesis: prompt assembly and the generative-text seam.

pub mod anthropic;
pub mod synthesizer;

use async_trait::async_trait;

use crate::error::MiaResult;

pub use anthropic::AnthropicClient;
pub use synthesizer::{format_context, ReportSynthesizer, SynthesizerSettings, SYSTEM_PROMPT};

/// A single-turn generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
}

/// A generative-text backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Generate text. On success returns the text segments in order.
    async fn generate(&self, request: &GenerationRequest) -> MiaResult<Vec<String>>;
}
