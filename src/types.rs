//! Values that flow through one evaluation run.

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// A generated or caller-supplied test question.
pub type Question = String;

/// A model answer, bound to the question at the same position.
pub type Answer = String;

/// Judgments from one judge, index-aligned with the evaluated pairs.
pub type JudgeResult = Vec<Judgment>;

/// Mean of the scored judgments, `0.0` when nothing was scored.
pub type AggregateScore = f64;

/// A question paired with its answer, the unit of work for a judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QAPair {
    pub question: Question,
    pub answer: Answer,
}

impl QAPair {
    pub fn new(question: impl Into<Question>, answer: impl Into<Answer>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// A pair can be judged only once both the question and the answer are non-blank.
    pub fn is_evaluable(&self) -> bool {
        !self.question.trim().is_empty() && !self.answer.trim().is_empty()
    }
}

impl<Q: Into<Question>, A: Into<Answer>> From<(Q, A)> for QAPair {
    fn from((question, answer): (Q, A)) -> Self {
        Self::new(question, answer)
    }
}

/// Pairs questions with answers by position.
///
/// Both sequences must have the same length, otherwise some question would be
/// left without an answer.
pub fn pair_up(questions: &[Question], answers: &[Answer]) -> Result<Vec<QAPair>, EvalError> {
    if questions.len() != answers.len() {
        return Err(EvalError::InvalidRequest(format!(
            "cannot pair {} questions with {} answers",
            questions.len(),
            answers.len()
        )));
    }
    Ok(questions
        .iter()
        .zip(answers)
        .map(|(q, a)| QAPair::new(q.clone(), a.clone()))
        .collect())
}

/// A judge's verdict on one pair.
///
/// `score` is `None` when the judge's response held no usable 1-5 score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub score: Option<u8>,
    pub notes: String,
}

impl Judgment {
    pub fn new(score: Option<u8>, notes: impl Into<String>) -> Self {
        Self {
            score,
            notes: notes.into(),
        }
    }

    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}
