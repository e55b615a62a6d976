use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::{
    client::PromptClient, error::EvalError, task_group::run_indexed, types::Question,
};

static ENUMERATION: OnceLock<Regex> = OnceLock::new();

fn enumeration() -> &'static Regex {
    ENUMERATION.get_or_init(|| Regex::new(r"^\s*\d+\.\s*").expect("enumeration pattern"))
}

/// Prompt asking for a single question about `topic`.
pub fn question_prompt(topic: &str) -> String {
    format!("Generate one test question about {topic}.")
}

/// Removes a leading `1.`-style marker and trims the rest.
pub fn strip_enumeration(raw: &str) -> Question {
    enumeration().replace(raw, "").trim().to_string()
}

/// Splits caller-supplied text into questions, one per non-blank line.
pub fn parse_question_list(text: &str) -> Vec<Question> {
    text.lines()
        .map(strip_enumeration)
        .filter(|q| !q.is_empty())
        .collect()
}

/// Generates test questions with one independent prompt per question.
pub struct QuestionGenerator<C: ?Sized> {
    client: Arc<C>,
    concurrency: Option<usize>,
}

impl<C: PromptClient + ?Sized + 'static> QuestionGenerator<C> {
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

    /// Generates `count` questions about `topic`.
    ///
    /// Responses are not filtered: a blank response yields an empty question.
    pub async fn generate(&self, topic: &str, count: usize) -> Result<Vec<Question>, EvalError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        log::info!(
            "generating {count} questions about {topic:?} with {}",
            self.client.name()
        );
        let prompt: Arc<str> = question_prompt(topic).into();
        run_indexed(0..count, self.concurrency, |_| {
            let client = self.client.clone();
            let prompt = prompt.clone();
            async move {
                let raw = client.complete(&prompt).await?;
                Ok(strip_enumeration(&raw))
            }
        })
        .await
    }
}

/// Generates `count` questions about `topic` with no concurrency limit.
pub async fn generate_questions<C>(
    client: Arc<C>,
    topic: &str,
    count: usize,
) -> Result<Vec<Question>, EvalError>
where
    C: PromptClient + ?Sized + 'static,
{
    QuestionGenerator::new(client).generate(topic, count).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;

    #[test]
    fn strips_leading_marker() {
        assert_eq!(strip_enumeration("1. What is entropy?"), "What is entropy?");
        assert_eq!(strip_enumeration("  12.What is entropy?  "), "What is entropy?");
        assert_eq!(strip_enumeration("What is entropy?"), "What is entropy?");
    }

    #[test]
    fn keeps_numbers_that_are_not_a_leading_marker() {
        assert_eq!(strip_enumeration("Is 2.5 > 2?"), "Is 2.5 > 2?");
        assert_eq!(strip_enumeration("1) What?"), "1) What?");
    }

    #[test]
    fn question_list_skips_blank_lines() {
        let text = "1. What is AI?\n\n2. Who coined it?\r\n   \nWhat is a GPU?";
        assert_eq!(
            parse_question_list(text),
            vec!["What is AI?", "Who coined it?", "What is a GPU?"]
        );
    }

    #[tokio::test]
    async fn zero_count_does_not_call_client() {
        let client = Arc::new(ScriptedClient::echo());
        let questions = generate_questions(client.clone(), "physics", 0).await.unwrap();
        assert!(questions.is_empty());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn one_prompt_per_question() {
        let client = Arc::new(ScriptedClient::new(|prompt| {
            assert_eq!(prompt, "Generate one test question about physics.");
            Ok("1. What is entropy?".to_string())
        }));
        let questions = generate_questions(client.clone(), "physics", 3).await.unwrap();
        assert_eq!(questions, vec!["What is entropy?"; 3]);
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn blank_responses_are_kept() {
        let client = Arc::new(ScriptedClient::new(|_| Ok("   ".to_string())));
        let questions = generate_questions(client, "art", 2).await.unwrap();
        assert_eq!(questions, vec!["", ""]);
    }

    #[tokio::test]
    async fn provider_failure_fails_the_batch() {
        let client = Arc::new(ScriptedClient::new(|_| {
            Err(EvalError::ProviderError("down".into()))
        }));
        assert!(generate_questions(client, "art", 2).await.is_err());
    }
}
