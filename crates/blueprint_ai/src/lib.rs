pub mod api_types;
pub mod branding;
pub mod clarify;
pub mod insight;
pub mod llm;
pub mod prompts;
pub mod providers;
pub mod retry;

pub use api_types::{ChatMessage, ChatReply, ChatRole};
pub use branding::{generate_branding, BrandingInput};
pub use clarify::{clarify_goal, ClarifyOutcome};
pub use insight::generate_insights;
pub use llm::{AiError, CompletionParams, LlmClient};
pub use providers::mock::MockClient;
pub use providers::openai::OpenAiClient;
