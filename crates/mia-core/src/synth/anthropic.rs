//! Claude Messages API client for report generation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{GenerationRequest, TextGenerator};
use crate::config::LlmConfig;
use crate::error::{MiaError, MiaResult};

/// Default Anthropic API URL.
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com";

/// Default model for report generation.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for the Claude Messages API.
#[derive(Clone)]
pub struct AnthropicClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

impl AnthropicClient {
    /// Create a new client against `base_url`.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> MiaResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Create a client from the `[llm]` configuration section.
    pub fn from_config(config: &LlmConfig) -> MiaResult<Self> {
        Self::new(
            &config.api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn generate(&self, request: &GenerationRequest) -> MiaResult<Vec<String>> {
        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: &request.system_prompt,
            messages: vec![Message {
                role: "user",
                content: &request.user_prompt,
            }],
        };

        debug!(model = %request.model, prompt_chars = request.user_prompt.len(), "Calling Claude Messages API");
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MiaError::ProviderApi {
                provider: "Anthropic",
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        parse_messages_response(&text)
    }
}

/// Extract the text blocks of a Messages API response, in order.
fn parse_messages_response(body: &str) -> MiaResult<Vec<String>> {
    let parsed: MessagesResponse = serde_json::from_str(body)?;

    Ok(parsed
        .content
        .into_iter()
        .filter(|c| c.content_type == "text")
        .filter_map(|c| c.text)
        .collect())
}
