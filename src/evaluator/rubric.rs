use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Rubric used when the caller does not supply one.
pub const DEFAULT_RUBRIC: &str = "Please evaluate the correctness of the following answer for the given question. \
Provide a score from 1 to 5, where 1 is completely incorrect and 5 is completely correct and well-explained.\n\n\
Question: {question}\n\n\
Answer: {answer}\n\n\
Reply with a line `Score: <1-5>` followed by a line `Notes: <your reasoning>`.";

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(question|answer)\}").expect("placeholder pattern"))
}

/// Substitutes `{question}` and `{answer}` in `template`.
///
/// Substitution is a single pass, so placeholders appearing inside the question or
/// answer text are left alone. A template missing a placeholder simply omits that value.
pub fn render_rubric(template: &str, question: &str, answer: &str) -> String {
    placeholder()
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "question" => question.to_string(),
            _ => answer.to_string(),
        })
        .into_owned()
}
