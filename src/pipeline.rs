//! End-to-end evaluation run: questions, answers, then one evaluation per judge.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::{summarize, ScoreSummary},
    client::PromptClient,
    error::EvalError,
    evaluator::Evaluator,
    generator::{AnswerGenerator, QuestionGenerator},
    types::{pair_up, Answer, JudgeResult, Judgment, QAPair, Question},
};

/// Where the questions of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSource {
    /// Generate `count` questions about `topic`.
    Topic { topic: String, count: usize },
    /// Use caller-supplied questions as they are.
    Custom(Vec<Question>),
    /// Caller-supplied questions with optional answers. Supplied answers are
    /// judged as given; only the missing ones are generated.
    Pairs(Vec<(Question, Option<Answer>)>),
}

/// Outcome of one judge over every pair of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeReport {
    pub judge: String,
    /// `judgments[i]` belongs to the i-th question of the run. `None` marks a
    /// pair with a blank question or answer, which is never sent to the judge.
    pub judgments: Vec<Option<Judgment>>,
    /// Computed over the judged pairs only.
    pub summary: ScoreSummary,
    /// Set when the judge's batch failed; `judgments` is then empty.
    pub error: Option<String>,
}

impl JudgeReport {
    fn from_outcome(
        judge: String,
        outcome: Result<JudgeResult, EvalError>,
        positions: &[usize],
        len: usize,
    ) -> Self {
        match outcome {
            Ok(judged) => {
                let summary = summarize(&judged);
                let mut judgments = vec![None; len];
                for (&index, judgment) in positions.iter().zip(judged) {
                    judgments[index] = Some(judgment);
                }
                Self {
                    judge,
                    judgments,
                    summary,
                    error: None,
                }
            }
            Err(err) => {
                log::error!("judge {judge} failed: {err}");
                Self {
                    summary: summarize(&[]),
                    judge,
                    judgments: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Mean score, `0.0` for a failed or fully unscored judge.
    pub fn average(&self) -> f64 {
        self.summary.mean
    }
}

/// Everything produced by a [`Pipeline::run`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
    pub judges: Vec<JudgeReport>,
}

impl EvalReport {
    pub fn pairs(&self) -> impl Iterator<Item = (&Question, &Answer)> {
        self.questions.iter().zip(&self.answers)
    }

    pub fn judge(&self, id: &str) -> Option<&JudgeReport> {
        self.judges.iter().find(|j| j.judge == id)
    }
}

/// Composes the generators, the evaluator and the aggregator into one run.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use llm_evals::{backends::{Google, OpenAI}, Pipeline, QuestionSource, DEFAULT_RUBRIC};
/// # async fn run() -> Result<(), llm_evals::EvalError> {
/// let openai = Arc::new(OpenAI::new("sk-...", None, None, None, None, None, None)?);
/// let gemini = Arc::new(Google::new("key", None, None, None, None, None, None)?);
/// let report = Pipeline::new(openai.clone())
///     .judge("openai", openai)
///     .judge("google", gemini)
///     .run(
///         QuestionSource::Topic { topic: "AI trivia".into(), count: 5 },
///         DEFAULT_RUBRIC,
///     )
///     .await?;
/// for judge in &report.judges {
///     println!("{}: {:.2}/5", judge.judge, judge.average());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    questioner: Arc<dyn PromptClient>,
    answerer: Arc<dyn PromptClient>,
    judges: Vec<(String, Arc<dyn PromptClient>)>,
    concurrency: Option<usize>,
}

impl Pipeline {
    /// Creates a pipeline that generates questions and answers with `answerer`.
    pub fn new(answerer: Arc<dyn PromptClient>) -> Self {
        Self {
            questioner: answerer.clone(),
            answerer,
            judges: Vec::new(),
            concurrency: None,
        }
    }

    /// Uses a different client for question generation.
    pub fn questioner(mut self, client: Arc<dyn PromptClient>) -> Self {
        self.questioner = client;
        self
    }

    /// Adds a judge; each judge evaluates every pair independently.
    pub fn judge(mut self, id: impl Into<String>, client: Arc<dyn PromptClient>) -> Self {
        self.judges.push((id.into(), client));
        self
    }

    /// Caps in-flight requests per batch.
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit);
        self
    }

    async fn rows(
        &self,
        source: QuestionSource,
    ) -> Result<Vec<(Question, Option<Answer>)>, EvalError> {
        let questions = match source {
            QuestionSource::Topic { topic, count } => {
                let mut generator = QuestionGenerator::new(self.questioner.clone());
                if let Some(limit) = self.concurrency {
                    generator = generator.concurrency(limit);
                }
                generator.generate(&topic, count).await?
            }
            QuestionSource::Custom(questions) => questions,
            QuestionSource::Pairs(rows) => return Ok(rows),
        };
        Ok(questions.into_iter().map(|q| (q, None)).collect())
    }

    /// Fills in missing answers in place. Blank questions are never answered.
    async fn answers(
        &self,
        rows: Vec<(Question, Option<Answer>)>,
    ) -> Result<(Vec<Question>, Vec<Answer>), EvalError> {
        let missing: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, (question, answer))| {
                !question.trim().is_empty()
                    && answer.as_deref().map_or(true, |a| a.trim().is_empty())
            })
            .map(|(index, _)| index)
            .collect();
        let (questions, mut answers): (Vec<Question>, Vec<Answer>) = rows
            .into_iter()
            .map(|(question, answer)| (question, answer.unwrap_or_default()))
            .unzip();
        log::debug!(
            "{} of {} answers to generate",
            missing.len(),
            questions.len()
        );

        let asked: Vec<Question> = missing.iter().map(|&i| questions[i].clone()).collect();
        let mut generator = AnswerGenerator::new(self.answerer.clone());
        if let Some(limit) = self.concurrency {
            generator = generator.concurrency(limit);
        }
        let generated = generator.generate(&asked).await?;
        for (index, answer) in missing.into_iter().zip(generated) {
            answers[index] = answer;
        }
        Ok((questions, answers))
    }

    async fn judge_all(
        &self,
        pairs: &[QAPair],
        positions: &[usize],
        len: usize,
        rubric: &str,
    ) -> Vec<JudgeReport> {
        let runs = self.judges.iter().map(|(id, client)| {
            let mut evaluator = Evaluator::new(client.clone());
            if let Some(limit) = self.concurrency {
                evaluator = evaluator.concurrency(limit);
            }
            async move {
                let outcome = evaluator.evaluate(pairs, rubric).await;
                JudgeReport::from_outcome(id.clone(), outcome, positions, len)
            }
        });
        join_all(runs).await
    }

    /// Runs the whole evaluation.
    ///
    /// Question and answer failures fail the run. Judge failures are recorded in
    /// the matching [`JudgeReport`] and leave other judges untouched. Pairs with
    /// a blank question or answer stay in the report but are not judged.
    pub async fn run(&self, source: QuestionSource, rubric: &str) -> Result<EvalReport, EvalError> {
        if self.judges.is_empty() {
            return Err(EvalError::InvalidRequest("no judges configured".to_string()));
        }
        let rows = self.rows(source).await?;
        let (questions, answers) = self.answers(rows).await?;
        let (positions, pairs): (Vec<usize>, Vec<QAPair>) = pair_up(&questions, &answers)?
            .into_iter()
            .enumerate()
            .filter(|(_, pair)| pair.is_evaluable())
            .unzip();
        if pairs.len() < questions.len() {
            log::warn!(
                "skipping {} of {} pairs with a blank question or answer",
                questions.len() - pairs.len(),
                questions.len()
            );
        }

        let judges = self
            .judge_all(&pairs, &positions, questions.len(), rubric)
            .await;
        for report in judges.iter().filter(|r| r.succeeded()) {
            log::info!(
                "{}: average {:.2}/5 over {} scored answers",
                report.judge,
                report.average(),
                report.summary.scored
            );
        }
        Ok(EvalReport {
            questions,
            answers,
            judges,
        })
    }
}
