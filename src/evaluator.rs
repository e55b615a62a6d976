//! Scoring answers with a judge model.

#[path = "evaluator/rubric.rs"]
mod rubric;

#[path = "evaluator/judge.rs"]
mod judge;

pub use judge::{evaluate, Evaluator};
pub use rubric::{render_rubric, DEFAULT_RUBRIC};
