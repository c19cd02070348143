//! AI narrative over a computed analysis.
//!
//! This augmentation is best-effort: the detailed-analysis endpoint
//! swallows any error from here and still returns the basic analysis.

use crate::llm::{AiError, CompletionParams, LlmClient};
use crate::prompts::{insight_user_prompt, INSIGHT_SYSTEM_PROMPT};
use crate::ChatMessage;
use blueprint_core::BasicAnalysis;

pub async fn generate_insights(
    llm: &dyn LlmClient,
    analysis: &BasicAnalysis,
) -> Result<String, AiError> {
    let reply = llm
        .complete(
            INSIGHT_SYSTEM_PROMPT,
            vec![ChatMessage::user(&insight_user_prompt(analysis))],
            CompletionParams {
                max_tokens: 512,
                temperature: 0.7,
            },
        )
        .await?;

    let text = reply.content.trim().to_string();
    if text.is_empty() {
        return Err(AiError::Upstream(anyhow::anyhow!("empty insight reply")));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockClient;
    use blueprint_core::analyze;

    #[tokio::test]
    async fn test_generate_insights() {
        let llm = MockClient::new("과제 완료율이 좋습니다. 다음은 계획 단계를 채워보세요.");
        let analysis = analyze(&[]);
        let text = generate_insights(&llm, &analysis).await.unwrap();
        assert!(text.contains("완료율"));
    }

    #[tokio::test]
    async fn test_generate_insights_propagates_failure() {
        let llm = MockClient::failing();
        let analysis = analyze(&[]);
        assert!(generate_insights(&llm, &analysis).await.is_err());
    }
}
