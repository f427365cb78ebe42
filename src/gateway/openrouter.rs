//! OpenRouter-compatible gateway using the Chat Completions API.
//!
//! One request per user turn, no streaming. The response taxonomy maps
//! directly onto [`GatewayError`]: non-2xx status, unparsable body, empty
//! `choices`, or transport failure.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{ChatMessage, CompletionGateway, CompletionParams, GatewayError, MAX_TOKENS, TEMPERATURE};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// A hung request must not leave the app loading forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize, Debug)]
struct CompletionBody<'a> {
    messages: &'a [ChatMessage],
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    #[serde(default)]
    message: Option<ReplyBody>,
}

#[derive(Deserialize, Debug)]
struct ReplyBody {
    #[serde(default)]
    content: Option<String>,
}

/// Extracts the reply text from a parsed response: the first choice's
/// message content, or an empty string when the choice has no content.
fn reply_content(response: &CompletionResponse) -> Result<String, GatewayError> {
    let first = response.choices.first().ok_or(GatewayError::EmptyChoices)?;
    Ok(first
        .message
        .as_ref()
        .and_then(|m| m.content.clone())
        .unwrap_or_default())
}

pub struct OpenRouterGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterGateway {
    /// `base_url` of `None` uses the public OpenRouter endpoint.
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

#[async_trait]
impl CompletionGateway for OpenRouterGateway {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, params: CompletionParams<'_>) -> Result<String, GatewayError> {
        let body = CompletionBody {
            messages: params.messages,
            model: params.model,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let url = format!("{}/chat/completions", self.base_url);
        info!(
            "Requesting completion: model={} messages={}",
            params.model,
            params.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Http(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        debug!("Completion response: {} bytes", text.len());

        let parsed: CompletionResponse =
            serde_json::from_str(&text).map_err(|e| GatewayError::InvalidBody(e.to_string()))?;

        reply_content(&parsed)
    }
}
