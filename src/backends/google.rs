//! Google Gemini client using the `generateContent` endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{client::PromptClient, error::EvalError};

use super::{decode, ensure_success, http_client, join_url, non_empty};

const PROVIDER_NAME: &str = "Google";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite-preview-06-17";

/// Configuration for the Google Gemini client.
#[derive(Debug)]
pub struct GoogleConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Client for Google's Gemini API.
#[derive(Debug, Clone)]
pub struct Google {
    pub config: Arc<GoogleConfig>,
    pub client: Client,
}

#[derive(Serialize)]
struct GooglePart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GoogleContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GooglePart<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleGenerateRequest<'a> {
    contents: Vec<GoogleContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GoogleContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GoogleGenerationConfig>,
}

#[derive(Deserialize, Debug)]
struct GoogleGenerateResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
}

#[derive(Deserialize, Debug)]
struct GoogleCandidate {
    content: Option<GoogleResponseContent>,
}

#[derive(Deserialize, Debug)]
struct GoogleResponseContent {
    #[serde(default)]
    parts: Vec<GoogleResponsePart>,
}

#[derive(Deserialize, Debug)]
struct GoogleResponsePart {
    text: Option<String>,
}

impl GoogleGenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        Some(text)
    }
}

impl Google {
    /// Creates a new Gemini client.
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

    /// Creates a new Gemini client with a custom HTTP client.
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
            config: Arc::new(GoogleConfig {
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

    fn build_request<'a>(&'a self, prompt: &'a str) -> GoogleGenerateRequest<'a> {
        let generation_config =
            if self.config.max_tokens.is_some() || self.config.temperature.is_some() {
                Some(GoogleGenerationConfig {
                    max_output_tokens: self.config.max_tokens,
                    temperature: self.config.temperature,
                })
            } else {
                None
            };
        GoogleGenerateRequest {
            contents: vec![GoogleContent {
                role: Some("user"),
                parts: vec![GooglePart { text: prompt }],
            }],
            system_instruction: self.config.system.as_deref().map(|system| GoogleContent {
                role: None,
                parts: vec![GooglePart { text: system }],
            }),
            generation_config,
        }
    }
}

#[async_trait]
impl PromptClient for Google {
    async fn complete(&self, prompt: &str) -> Result<String, EvalError> {
        let api_key = self.config.api_key.expose_secret();
        if api_key.is_empty() {
            return Err(EvalError::AuthError("Missing Google API key".to_string()));
        }

        let body = self.build_request(prompt);
        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("Google request payload: {}", json);
            }
        }

        let path = format!("models/{}:generateContent", self.config.model);
        let resp = self
            .client
            .post(join_url(&self.config.base_url, &path))
            .header("x-goog-api-key", api_key.as_str())
            .json(&body)
            .send()
            .await?;
        let resp = ensure_success(resp, PROVIDER_NAME).await?;
        let parsed: GoogleGenerateResponse = decode(resp, PROVIDER_NAME).await?;
        non_empty(parsed.text(), PROVIDER_NAME)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}
