use crate::api_types::{ChatMessage, ChatReply};
use crate::llm::{AiError, CompletionParams, LlmClient};
use crate::retry::{with_retry, RetryConfig};
use anyhow::Context;
use reqwest::Client;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;

/// Client for the OpenAI chat completions API (or any compatible endpoint
/// via `OPENAI_BASE_URL`).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    retry: RetryConfig,
}

impl OpenAiClient {
    /// Reads `OPENAI_API_KEY` from the environment. A missing key is a
    /// constructor error so the server can answer 401 instead of failing
    /// mid-request.
    pub fn new(model: &str, base_url: Option<&str>) -> Result<Self, AiError> {
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey);
        }

        let base_url = base_url
            .map(|s| s.to_string())
            .or_else(|| env::var("OPENAI_BASE_URL").ok())
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model: model.to_string(),
            retry: RetryConfig::default(),
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(
        &self,
        system: &str,
        messages: Vec<ChatMessage>,
        params: CompletionParams,
    ) -> Result<ChatReply, AiError> {
        // System prompt goes first with role "system"; history follows as-is.
        let mut openai_messages = vec![json!({
            "role": "system",
            "content": system
        })];
        for msg in &messages {
            openai_messages.push(json!({
                "role": msg.role,
                "content": msg.content
            }));
        }

        let payload = json!({
            "model": self.model,
            "messages": openai_messages,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
        });

        let url = format!("{}/chat/completions", self.base_url);

        let response = with_retry(&self.retry, "OpenAI", || {
            let request = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&payload);
            async move {
                request
                    .send()
                    .await
                    .context("Failed to send request to OpenAI")
            }
        })
        .await?;

        let resp_json: Value = response
            .json()
            .await
            .context("Failed to parse OpenAI response body")?;

        let choice = &resp_json["choices"][0];
        let content = choice["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        if content.is_empty() {
            return Err(AiError::Upstream(anyhow::anyhow!(
                "OpenAI returned no text content"
            )));
        }
        let finish_reason = choice["finish_reason"].as_str().map(|s| s.to_string());

        Ok(ChatReply {
            content,
            finish_reason,
        })
    }
}
