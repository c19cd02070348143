//! Branding statement generation.

use crate::llm::{AiError, CompletionParams, LlmClient};
use crate::prompts::{branding_user_prompt, BRANDING_SYSTEM_PROMPT};
use crate::ChatMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingInput {
    pub keywords: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub tone: Option<String>,
}

impl BrandingInput {
    /// At least one keyword or strength is required.
    pub fn is_empty(&self) -> bool {
        self.keywords.iter().all(|k| k.trim().is_empty())
            && self.strengths.iter().all(|s| s.trim().is_empty())
    }
}

/// Generate branding statements from structured input.
pub async fn generate_branding(
    llm: &dyn LlmClient,
    input: &BrandingInput,
) -> Result<Vec<String>, AiError> {
    if input.is_empty() {
        return Err(AiError::EmptyInput);
    }

    let reply = llm
        .complete(
            BRANDING_SYSTEM_PROMPT,
            vec![ChatMessage::user(&branding_user_prompt(input))],
            CompletionParams {
                max_tokens: 512,
                temperature: 0.9,
            },
        )
        .await?;

    Ok(parse_statements(&reply.content))
}

/// Split a numbered or bulleted reply into individual statements.
/// Falls back to the whole reply as one statement.
fn parse_statements(raw: &str) -> Vec<String> {
    let statements: Vec<String> = raw
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')')
                .trim_start_matches(['-', '*', '•'])
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect();

    if statements.is_empty() {
        vec![raw.trim().to_string()]
    } else {
        statements
    }
}
