use crate::ai::{CompletionService, GenerationParams};
use crate::error::{ChatError, Result};
use crate::state::ChatMessage;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIErrorBody {
    error: OpenAIErrorDetail,
}

#[derive(Deserialize)]
struct OpenAIErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the client at a different API root, e.g. a proxy or a test server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::config(format!("Could not build HTTP client: {}", e)))?;
        Ok(self)
    }

    pub async fn chat(&self, messages: &[ChatMessage], params: &GenerationParams) -> Result<String> {
        let request = OpenAIRequest {
            model: &params.model,
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        tracing::debug!(
            model = %params.model,
            messages = messages.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(%status, "chat completion request failed");
            return Err(classify_failure(status, &text));
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| ChatError::remote(format!("could not parse response: {}", e)))?;

        openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::remote("response contained no choices"))?
            .message
            .content
            .ok_or_else(|| ChatError::remote("response contained no message content"))
    }
}

#[async_trait]
impl CompletionService for OpenAIClient {
    async fn complete(&self, messages: &[ChatMessage], params: &GenerationParams) -> Result<String> {
        self.chat(messages, params).await
    }
}

fn classify_failure(status: StatusCode, body: &str) -> ChatError {
    match status {
        StatusCode::UNAUTHORIZED => ChatError::Auth,
        StatusCode::TOO_MANY_REQUESTS => ChatError::RateLimit,
        _ => match serde_json::from_str::<OpenAIErrorBody>(body) {
            Ok(parsed) => ChatError::remote(parsed.error.message),
            Err(_) if body.trim().is_empty() => ChatError::remote(status.to_string()),
            Err(_) => ChatError::remote(format!("{}: {}", status, body.trim())),
        },
    }
}
