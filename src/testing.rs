//! Scripted prompt clients for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::{client::PromptClient, error::EvalError};

type Respond = Box<dyn Fn(&str) -> Result<String, EvalError> + Send + Sync>;
type Latency = Box<dyn Fn(&str) -> Duration + Send + Sync>;

pub(crate) struct ScriptedClient {
    name: String,
    calls: AtomicUsize,
    respond: Respond,
    latency: Latency,
}

impl ScriptedClient {
    pub(crate) fn new<F>(respond: F) -> Self
    where
        F: Fn(&str) -> Result<String, EvalError> + Send + Sync + 'static,
    {
        Self {
            name: "scripted".to_string(),
            calls: AtomicUsize::new(0),
            respond: Box::new(respond),
            latency: Box::new(|_| Duration::ZERO),
        }
    }

    /// Answers every prompt with the prompt itself.
    pub(crate) fn echo() -> Self {
        Self::new(|prompt| Ok(prompt.to_string()))
    }

    pub(crate) fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub(crate) fn with_latency<F>(mut self, latency: F) -> Self
    where
        F: Fn(&str) -> Duration + Send + Sync + 'static,
    {
        self.latency = Box::new(latency);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PromptClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<String, EvalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = (self.latency)(prompt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        (self.respond)(prompt)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Latency that shrinks as the trailing number in the prompt grows, so later
/// items finish first.
pub(crate) fn reversed_latency(prompt: &str) -> Duration {
    let index: u64 = prompt
        .rsplit(|c: char| !c.is_ascii_digit())
        .find(|s| !s.is_empty())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0);
    Duration::from_millis(1_000u64.saturating_sub(index * 37))
}
