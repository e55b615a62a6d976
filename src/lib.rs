//! LLM evaluation harness.
//!
//! Generates test questions about a topic, answers them with a language model and
//! scores the answers with one or more independent judge models:
//!
//! - [`generate_questions`] issues one prompt per wanted question, concurrently.
//! - [`generate_answers`] answers every question, concurrently and index-aligned.
//! - [`evaluate`] renders a rubric per pair, asks one judge, and parses each verdict
//!   into a [`Judgment`]. Run it once per judge.
//! - [`aggregate`] averages the scored judgments.
//!
//! Providers are injected as [`PromptClient`] values; [`backends`] ships OpenAI and
//! Google Gemini implementations, and [`Pipeline`] wires a full run together.

pub mod aggregate;
pub mod backends;
pub mod client;
pub mod error;
pub mod evaluator;
pub mod generator;
#[cfg(feature = "logging")]
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod resilient;
pub mod task_group;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregate::{aggregate, summarize, ScoreSummary};
pub use client::PromptClient;
pub use error::EvalError;
pub use evaluator::{evaluate, render_rubric, Evaluator, DEFAULT_RUBRIC};
pub use generator::{
    generate_answers, generate_questions, parse_question_list, AnswerGenerator, QuestionGenerator,
};
#[cfg(feature = "logging")]
pub use logging::init_env_logger;
pub use parser::parse_judgment;
pub use pipeline::{EvalReport, JudgeReport, Pipeline, QuestionSource};
pub use resilient::{ResilienceConfig, ResilientClient};
pub use task_group::TaskGroup;
pub use types::{pair_up, AggregateScore, Answer, JudgeResult, Judgment, QAPair, Question};
