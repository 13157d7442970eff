// src/core/analysis/provider.rs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use url::Url;

use crate::config::AnalysisConfig;
use crate::core::models::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// An OpenAI-compatible chat-completion request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// A remote chat-completion service.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Sends one request and returns the first choice's message content.
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatError>;

    fn provider_name(&self) -> &str;
}

/// Groq's OpenAI-compatible chat endpoint, called through `reqwest`.
pub struct GroqProvider {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl GroqProvider {
    pub fn new(config: &AnalysisConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build HTTP client for analysis.");
                ChatError::Transport(e.to_string())
            })?;
        let endpoint = config
            .base_url
            .join("chat/completions")
            .map_err(|e| ChatError::Transport(format!("invalid provider URL: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatProvider for GroqProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatError> {
        debug!(endpoint = %self.endpoint, model = %request.model, "Sending chat completion request.");

        let mut builder = self.client.post(self.endpoint.clone()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            error!(endpoint = %self.endpoint, error = %e, "Chat completion request failed.");
            ChatError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Provider rejected chat completion request.");
            return Err(ChatError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let completion: ChatCompletion = response.json().await.map_err(|e| {
            error!(error = %e, "Could not decode chat completion response.");
            ChatError::MalformedResponse(e.to_string())
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ChatError::EmptyChoices)?;

        info!(chars = content.len(), "Chat completion received.");
        Ok(content)
    }

    fn provider_name(&self) -> &str {
        "groq"
    }
}
