//! Question and answer generation.
//!
//! Both generators issue one prompt per item, dispatch them concurrently through
//! an injected [`PromptClient`](crate::client::PromptClient) and return results in
//! input order.

mod answers;
mod questions;

pub use answers::{answer_prompt, generate_answers, AnswerGenerator};
pub use questions::{
    generate_questions, parse_question_list, question_prompt, strip_enumeration,
    QuestionGenerator,
};
