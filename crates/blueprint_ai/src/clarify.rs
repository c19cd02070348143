//! Goal clarification chain.
//!
//! Stateless per request: the caller sends the full conversation history
//! plus the latest goal text each turn. Completion is signaled by a marker
//! the model appends, parsed here in one place and stripped from the text
//! shown to the user.

use crate::api_types::ChatMessage;
use crate::llm::{AiError, CompletionParams, LlmClient};
use crate::prompts::{clarify_system_prompt, COMPLETION_MARKER};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarifyOutcome {
    /// Assistant reply with the completion marker removed.
    pub response: String,
    pub is_complete: bool,
}

impl ClarifyOutcome {
    /// Structured parse of a raw assistant reply: the goal is complete iff
    /// the reply contains the literal completion marker.
    pub fn parse(raw: &str) -> Self {
        let is_complete = raw.contains(COMPLETION_MARKER);
        let response = raw.replace(COMPLETION_MARKER, "").trim().to_string();
        Self {
            response,
            is_complete,
        }
    }
}

/// Run one clarification turn: history + new goal text → assistant reply.
pub async fn clarify_goal(
    llm: &dyn LlmClient,
    goal: &str,
    conversation: Vec<ChatMessage>,
) -> Result<ClarifyOutcome, AiError> {
    if goal.trim().is_empty() {
        return Err(AiError::EmptyInput);
    }

    let mut messages = conversation;
    messages.push(ChatMessage::user(goal));

    let reply = llm
        .complete(
            &clarify_system_prompt(),
            messages,
            CompletionParams::default(),
        )
        .await?;

    Ok(ClarifyOutcome::parse(&reply.content))
}
