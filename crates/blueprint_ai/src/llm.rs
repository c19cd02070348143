use crate::api_types::{ChatMessage, ChatReply};
use async_trait::async_trait;

/// Failure taxonomy for the AI layer. The server maps these to distinct
/// HTTP statuses instead of sniffing error-message substrings.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("OpenAI API 키가 없거나 유효하지 않습니다")]
    MissingApiKey,
    #[error("AI 요청 한도를 초과했습니다. 잠시 후 다시 시도해주세요")]
    RateLimited,
    #[error("입력 내용이 비어 있습니다")]
    EmptyInput,
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// Parameters for an LLM completion request.
#[derive(Debug, Clone)]
pub struct CompletionParams {
    pub max_tokens: u32,
    /// Sampling temperature (0.0 - 2.0).
    pub temperature: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a chat completion request. `system` is sent as the leading
    /// system message; `messages` is the full conversation so far.
    async fn complete(
        &self,
        system: &str,
        messages: Vec<ChatMessage>,
        params: CompletionParams,
    ) -> Result<ChatReply, AiError>;
}
