//! Mock LLM provider — deterministic responses for testing without API keys.

use crate::api_types::{ChatMessage, ChatReply};
use crate::llm::{AiError, CompletionParams, LlmClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockMode {
    Reply,
    Fail,
    RateLimit,
}

#[derive(Debug, Clone)]
pub struct MockClient {
    reply: String,
    mode: MockMode,
}

impl MockClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            mode: MockMode::Reply,
        }
    }

    /// Every call fails with an upstream error. For degradation tests.
    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            mode: MockMode::Fail,
        }
    }

    /// Every call fails with a rate-limit error.
    pub fn rate_limited() -> Self {
        Self {
            reply: String::new(),
            mode: MockMode::RateLimit,
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    async fn complete(
        &self,
        _system: &str,
        _messages: Vec<ChatMessage>,
        _params: CompletionParams,
    ) -> Result<ChatReply, AiError> {
        match self.mode {
            MockMode::Reply => Ok(ChatReply {
                content: self.reply.clone(),
                finish_reason: Some("stop".to_string()),
            }),
            MockMode::Fail => Err(AiError::Upstream(anyhow::anyhow!("mock upstream failure"))),
            MockMode::RateLimit => Err(AiError::RateLimited),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_reply() {
        let client = MockClient::new("안녕하세요");
        let reply = client
            .complete("system", vec![], CompletionParams::default())
            .await
            .unwrap();
        assert_eq!(reply.content, "안녕하세요");
        assert_eq!(reply.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let client = MockClient::failing();
        let result = client
            .complete("system", vec![], CompletionParams::default())
            .await;
        assert!(matches!(result, Err(AiError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_mock_rate_limited() {
        let client = MockClient::rate_limited();
        let result = client
            .complete("system", vec![], CompletionParams::default())
            .await;
        assert!(matches!(result, Err(AiError::RateLimited)));
    }
}
