pub mod openai;

pub use openai::OpenAIClient;

use crate::error::Result;
use crate::state::ChatMessage;
use async_trait::async_trait;

/// Generation parameters sent alongside the history on every request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

/// A remote service that turns a conversation into the next assistant reply.
///
/// Implementations classify failures into `ChatError::Auth`,
/// `ChatError::RateLimit` or `ChatError::Remote`; callers never see
/// transport-specific status codes.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], params: &GenerationParams)
        -> Result<String>;
}
