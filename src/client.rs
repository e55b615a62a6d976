//! The single capability the pipeline needs from a model provider.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::EvalError;

/// Trait for anything that turns a prompt into completion text.
///
/// Implementations do not retry. Wrap a client in
/// [`ResilientClient`](crate::resilient::ResilientClient) when retries are wanted.
#[async_trait]
pub trait PromptClient: Send + Sync {
    /// Sends `prompt` and returns the completion text.
    async fn complete(&self, prompt: &str) -> Result<String, EvalError>;

    /// Short identifier used in logs and reports.
    fn name(&self) -> &str {
        "client"
    }
}

#[async_trait]
impl<C: PromptClient + ?Sized> PromptClient for Arc<C> {
    async fn complete(&self, prompt: &str) -> Result<String, EvalError> {
        (**self).complete(prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<C: PromptClient + ?Sized> PromptClient for Box<C> {
    async fn complete(&self, prompt: &str) -> Result<String, EvalError> {
        (**self).complete(prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;

    #[tokio::test]
    async fn boxed_and_shared_clients_delegate() {
        let boxed: Box<dyn PromptClient> = Box::new(ScriptedClient::echo().named("echo"));
        assert_eq!(boxed.complete("hi").await.unwrap(), "hi");
        assert_eq!(boxed.name(), "echo");

        let shared = Arc::new(boxed);
        let answers = crate::generate_answers(shared.clone(), &["q".to_string()])
            .await
            .unwrap();
        assert_eq!(answers, vec!["What is the answer to the following question: q"]);
        assert_eq!(shared.name(), "echo");
    }
}
