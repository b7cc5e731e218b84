//! OpenAI-compatible chat-completions gateway
//!
//! Implements the [`LlmGateway`] port against any OpenAI-compatible
//! `/chat/completions` endpoint. The per-invocation timeout from the
//! request is enforced here, on the HTTP call itself, so a timed-out
//! invocation surfaces as an ordinary [`GatewayError::Timeout`].

use async_trait::async_trait;
use ensemble_application::{Completion, CompletionRequest, GatewayError, LlmGateway};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const API_KEY_ENV: &str = "ENSEMBLE_API_KEY";
const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
const BASE_URL_ENV: &str = "ENSEMBLE_BASE_URL";

/// Errors constructing the gateway (before any invocation is attempted)
#[derive(Debug, Error)]
pub enum GatewaySetupError {
    #[error("no API key found: set {API_KEY_ENV} or {OPENAI_KEY_ENV}")]
    MissingApiKey,
}

/// Gateway adapter for OpenAI-compatible providers
pub struct OpenAiGateway {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiGateway {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Build a gateway from the environment.
    ///
    /// Reads the API key from `ENSEMBLE_API_KEY` (or `OPENAI_API_KEY` as a
    /// fallback) and an optional endpoint override from `ENSEMBLE_BASE_URL`.
    pub fn from_env(model: impl Into<String>) -> Result<Self, GatewaySetupError> {
        let api_key = std::env::var(API_KEY_ENV)
            .or_else(|_| std::env::var(OPENAI_KEY_ENV))
            .map_err(|_| GatewaySetupError::MissingApiKey)?;

        let gateway = Self::new(model, api_key);
        Ok(match std::env::var(BASE_URL_ENV) {
            Ok(base_url) => gateway.with_base_url(base_url),
            Err(_) => gateway,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, GatewayError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: request.question,
                },
            ],
            temperature: request.temperature,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                GatewayError::InvalidResponse("response carried no choices".to_string())
            })?;

        let elapsed = started.elapsed();
        debug!(model = %self.model, ?elapsed, "Completion received");

        Ok(Completion { content, elapsed })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "be brief".to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: "what is 6 times 7?".to_string(),
                },
            ],
            temperature: 0.55,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "what is 6 times 7?");
        assert_eq!(json["temperature"], 0.55);
    }

    #[test]
    fn test_response_parsing() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{
                "id": "chatcmpl-1",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "42"}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("42"));
    }

    #[test]
    fn test_empty_choices_detected() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(parsed.choices.is_empty());
    }
}
