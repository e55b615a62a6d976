//! HTTP clients for the model providers the harness talks to.
//!
//! Each backend implements [`PromptClient`](crate::client::PromptClient) with a
//! single user-turn request and returns the completion text.

pub mod google;
pub mod openai;

pub use google::Google;
pub use openai::OpenAI;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::EvalError;

pub(crate) fn http_client(timeout_seconds: Option<u64>) -> Result<Client, EvalError> {
    let mut builder = Client::builder();
    if let Some(sec) = timeout_seconds {
        builder = builder.timeout(Duration::from_secs(sec));
    }
    Ok(builder.build()?)
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// Maps a non-success HTTP status to the matching error.
pub(crate) async fn ensure_success(response: Response, provider: &str) -> Result<Response, EvalError> {
    let status = response.status();
    log::debug!("{provider} HTTP status: {status}");
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(EvalError::AuthError(format!(
            "{provider} rejected credentials ({status}): {body}"
        ))),
        _ => Err(EvalError::ProviderError(format!(
            "{provider} returned error status {status}: {body}"
        ))),
    }
}

pub(crate) async fn decode<T: DeserializeOwned>(
    response: Response,
    provider: &str,
) -> Result<T, EvalError> {
    let text = response.text().await?;
    log::trace!("{provider} raw response: {text}");
    serde_json::from_str(&text).map_err(|e| EvalError::ResponseFormatError {
        message: format!("Failed to decode {provider} response: {e}"),
        raw_response: text,
    })
}

/// Rejects completions that carry no text.
pub(crate) fn non_empty(text: Option<String>, provider: &str) -> Result<String, EvalError> {
    match text {
        Some(text) if !text.trim().is_empty() => {
            log::debug!("{provider} completion: {text}");
            Ok(text)
        }
        _ => Err(EvalError::ProviderError(format!(
            "{provider} returned an empty completion"
        ))),
    }
}
