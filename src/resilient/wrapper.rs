use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::{client::PromptClient, error::EvalError};

use super::config::ResilienceConfig;

/// Prompt client wrapper that retries transient failures using exponential backoff.
///
/// Batch operations never retry on their own; callers opt in by wrapping the
/// client they inject.
pub struct ResilientClient<C> {
    inner: C,
    cfg: ResilienceConfig,
}

impl<C: PromptClient> ResilientClient<C> {
    /// Creates a new resilient wrapper around an existing client.
    pub fn new(inner: C, cfg: ResilienceConfig) -> Self {
        Self { inner, cfg }
    }

    fn is_retryable(err: &EvalError) -> bool {
        match err {
            EvalError::HttpError(_) => true,
            EvalError::ProviderError(_) => true,
            EvalError::ResponseFormatError { .. } => true,
            EvalError::JsonError(_) => true,
            EvalError::RetryExceeded { .. } => false,
            EvalError::AuthError(_) => false,
            EvalError::InvalidRequest(_) => false,
            EvalError::TaskError(_) => false,
        }
    }

    fn backoff_delay(&self, attempt_index: usize) -> Duration {
        let mut delay = self
            .cfg
            .base_delay_ms
            .saturating_mul(1u64 << attempt_index.min(16));
        delay = delay.min(self.cfg.max_delay_ms);
        if self.cfg.jitter {
            let span = (delay / 2).max(1);
            let jitter = ((attempt_index as u64)
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1))
                % span;
            delay = delay.saturating_sub(jitter);
        }
        Duration::from_millis(delay)
    }
}

#[async_trait]
impl<C: PromptClient> PromptClient for ResilientClient<C> {
    async fn complete(&self, prompt: &str) -> Result<String, EvalError> {
        let max_attempts = self.cfg.max_attempts.max(1);
        let mut last_err = String::new();

        for attempt in 0..max_attempts {
            match self.inner.complete(prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if !Self::is_retryable(&err) => return Err(err),
                Err(err) => {
                    log::warn!(
                        "{} attempt {} of {} failed: {err}",
                        self.inner.name(),
                        attempt + 1,
                        max_attempts
                    );
                    last_err = err.to_string();
                    if attempt + 1 < max_attempts {
                        sleep(self.backoff_delay(attempt)).await;
                    }
                }
            }
        }

        Err(EvalError::RetryExceeded {
            attempts: max_attempts,
            last_error: last_err,
        })
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
