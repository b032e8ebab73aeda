//! The injected LM collaborator (§3, §9). The orchestrator depends only on
//! the `LanguageModel` trait; `OpenAiCompatibleLm` is the default production
//! implementation, calling any OpenAI-chat-completions-shaped endpoint.

use crate::core::config::OpenAiCompatibleConfig;
use crate::core::error::LmError;
use crate::core::types::Completion;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str, provider: &str, model: &str) -> Result<Completion, LmError>;
}

pub struct OpenAiCompatibleLm {
    config: OpenAiCompatibleConfig,
    client: reqwest::Client,
}

impl OpenAiCompatibleLm {
    pub fn new(config: OpenAiCompatibleConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatibleLm {
    /// `provider` is accepted for interface symmetry with other providers a
    /// caller might route to; this implementation always speaks the
    /// OpenAI-compatible chat-completions wire format against `base_url`.
    async fn generate(&self, prompt: &str, _provider: &str, model: &str) -> Result<Completion, LmError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(LmError::CallFailed("no API key configured".to_string()));
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let body = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LmError::CallFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(LmError::CallFailed(format!("HTTP {}: {}", status, text)));
        }

        let parsed: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| LmError::CallFailed(format!("invalid chat completion response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LmError::EmptyResponse);
        }

        Ok(Completion { content })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
