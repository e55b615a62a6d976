use std::sync::Arc;

use crate::{
    client::PromptClient,
    error::EvalError,
    task_group::run_indexed,
    types::{Answer, Question},
};

/// Prompt asking the model to answer `question`.
pub fn answer_prompt(question: &str) -> String {
    format!("What is the answer to the following question: {question}")
}

/// Answers a batch of questions, one concurrent request per question.
pub struct AnswerGenerator<C: ?Sized> {
    client: Arc<C>,
    concurrency: Option<usize>,
}

impl<C: PromptClient + ?Sized + 'static> AnswerGenerator<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            concurrency: None,
        }
    }

    /// Caps the number of requests in flight.
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit);
        self
    }

    /// Returns one answer per question; `answers[i]` answers `questions[i]`.
    pub async fn generate(&self, questions: &[Question]) -> Result<Vec<Answer>, EvalError> {
        if questions.is_empty() {
            return Ok(Vec::new());
        }
        log::info!(
            "answering {} questions with {}",
            questions.len(),
            self.client.name()
        );
        run_indexed(questions, self.concurrency, |question| {
            let client = self.client.clone();
            let prompt = answer_prompt(question);
            async move { client.complete(&prompt).await }
        })
        .await
    }
}

/// Answers `questions` with no concurrency limit.
pub async fn generate_answers<C>(
    client: Arc<C>,
    questions: &[Question],
) -> Result<Vec<Answer>, EvalError>
where
    C: PromptClient + ?Sized + 'static,
{
    AnswerGenerator::new(client).generate(questions).await
}
