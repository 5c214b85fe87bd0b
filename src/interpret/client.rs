use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Inference call errors. These never reach the user directly; the
/// session converts them to a fixed fallback reply.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("missing interpreter API key")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("response carried no completion")]
    MalformedResponse,
}

/// Interpreter endpoint configuration.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl InterpreterConfig {
    /// Resolve the API key from the environment; it is never compiled in
    /// or read from the config file.
    pub fn new(api_key: Option<String>, model: String, temperature: f64, max_tokens: u32) -> Self {
        let api_key = api_key
            .or_else(|| std::env::var("NYX_INTERPRETER_API_KEY").ok())
            .unwrap_or_default();

        Self {
            api_key,
            model,
            temperature,
            max_tokens,
        }
    }
}

/// Black-box text-generation collaborator: one prompt in, one completion
/// out. No streaming, no multi-turn context beyond what the caller sends.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, InferenceError>;

    /// Client name for logging.
    fn name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatCompletionsClient {
    client: Client,
    config: InterpreterConfig,
    endpoint: String,
}

impl ChatCompletionsClient {
    pub fn new(config: InterpreterConfig, endpoint: String) -> Result<Self, InferenceError> {
        if config.api_key.is_empty() {
            return Err(InferenceError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }
}

#[async_trait::async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, InferenceError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatRequestMessage {
                    role: "system",
                    content: system,
                },
                ChatRequestMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(code = status.as_u16(), message = %message, "Interpreter API error");
            return Err(InferenceError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(InferenceError::MalformedResponse)
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_rejected_at_construction() {
        let config = InterpreterConfig {
            api_key: String::new(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 800,
        };
        let result = ChatCompletionsClient::new(config, "http://localhost/v1".to_string());
        assert!(matches!(result, Err(InferenceError::MissingApiKey)));
    }
}
