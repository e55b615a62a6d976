//! OpenAI chat completions client.
//!
//! Sends each prompt as a single user message to `/chat/completions`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{client::PromptClient, error::EvalError};

use super::{decode, ensure_success, http_client, join_url, non_empty};

const PROVIDER_NAME: &str = "OpenAI";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the OpenAI client.
#[derive(Debug)]
pub struct OpenAIConfig {
    /// API key for authentication with OpenAI.
    pub api_key: SecretString,
    /// Base URL of the API, overridable for proxies and tests.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate in responses.
    pub max_tokens: Option<u32>,
    /// Sampling temperature for response randomness.
    pub temperature: Option<f32>,
    /// System prompt to guide model behavior.
    pub system: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Client for OpenAI's chat completions API.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct OpenAI {
    pub config: Arc<OpenAIConfig>,
    pub client: Client,
}

#[derive(Serialize)]
struct OpenAIChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatResponse {
    choices: Vec<OpenAIChatChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatChoice {
    message: OpenAIChatMsg,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatMsg {
    content: Option<String>,
}

impl OpenAIChatResponse {
    fn text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

impl OpenAI {
    /// Creates a new OpenAI client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `base_url` - API base URL (defaults to the public endpoint)
    /// * `model` - Model to use (defaults to `gpt-4o-mini`)
    /// * `max_tokens` - Maximum tokens to generate
    /// * `temperature` - Sampling temperature
    /// * `timeout_seconds` - Request timeout in seconds
    /// * `system` - System prompt
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        system: Option<String>,
    ) -> Result<Self, EvalError> {
        Ok(Self::with_client(
            http_client(timeout_seconds)?,
            api_key,
            base_url,
            model,
            max_tokens,
            temperature,
            timeout_seconds,
            system,
        ))
    }

    /// Creates a new OpenAI client with a custom HTTP client.
    #[allow(clippy::too_many_arguments)]
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        system: Option<String>,
    ) -> Self {
        Self {
            config: Arc::new(OpenAIConfig {
                api_key: SecretString::new(api_key.into()),
                base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens,
                temperature,
                system,
                timeout_seconds,
            }),
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> OpenAIChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.config.system {
            messages.push(OpenAIChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(OpenAIChatMessage {
            role: "user",
            content: prompt,
        });
        OpenAIChatRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: false,
        }
    }
}

#[async_trait]
impl PromptClient for OpenAI {
    async fn complete(&self, prompt: &str) -> Result<String, EvalError> {
        let api_key = self.config.api_key.expose_secret();
        if api_key.is_empty() {
            return Err(EvalError::AuthError("Missing OpenAI API key".to_string()));
        }

        let body = self.build_request(prompt);
        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("OpenAI request payload: {}", json);
            }
        }

        let resp = self
            .client
            .post(join_url(&self.config.base_url, "chat/completions"))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        let resp = ensure_success(resp, PROVIDER_NAME).await?;
        let parsed: OpenAIChatResponse = decode(resp, PROVIDER_NAME).await?;
        non_empty(parsed.text(), PROVIDER_NAME)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn client_for(server: &mockito::ServerGuard, key: &str) -> OpenAI {
        OpenAI::new(
            key,
            Some(server.url()),
            Some("gpt-test".into()),
            None,
            Some(0.0),
            Some(5),
            Some("You are terse.".into()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn returns_first_choice_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-test",
                "messages": [
                    { "role": "system", "content": "You are terse." },
                    { "role": "user", "content": "What is 2+2?" }
                ],
                "stream": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"4"}}]}"#)
            .create_async()
            .await;

        let text = client_for(&server, "sk-test")
            .complete("What is 2+2?")
            .await
            .unwrap();
        assert_eq!(text, "4");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":"bad key"}"#)
            .create_async()
            .await;

        let err = client_for(&server, "sk-bad").complete("hi").await.unwrap_err();
        assert!(matches!(err, EvalError::AuthError(_)));
        assert!(err.is_provider_failure());
    }

    #[tokio::test]
    async fn null_content_is_an_empty_completion() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":null}}]}"#)
            .create_async()
            .await;

        let err = client_for(&server, "sk-test").complete("hi").await.unwrap_err();
        assert!(matches!(err, EvalError::ProviderError(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_format_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server, "sk-test").complete("hi").await.unwrap_err();
        assert!(matches!(err, EvalError::ResponseFormatError { .. }));
    }

    #[tokio::test]
    async fn missing_key_fails_before_sending() {
        let server = mockito::Server::new_async().await;
        let err = client_for(&server, "").complete("hi").await.unwrap_err();
        assert!(matches!(err, EvalError::AuthError(_)));
    }
}
