use std::sync::Arc;

use crate::{
    client::PromptClient,
    error::EvalError,
    parser::parse_judgment,
    task_group::run_indexed,
    types::{JudgeResult, QAPair},
};

use super::rubric::render_rubric;

/// Scores question/answer pairs with a single judge.
///
/// The evaluator never fans out across judges; run one per judge to get
/// multi-judge results.
pub struct Evaluator<C: ?Sized> {
    judge: Arc<C>,
    concurrency: Option<usize>,
}

impl<C: PromptClient + ?Sized + 'static> Evaluator<C> {
    pub fn new(judge: Arc<C>) -> Self {
        Self {
            judge,
            concurrency: None,
        }
    }

    /// Caps the number of judge requests in flight.
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit);
        self
    }

    /// Judges every pair; `result[i]` is the judgment of `pairs[i]`.
    ///
    /// Responses without a usable score become judgments with `score: None` and
    /// a warning is logged; they never fail the batch.
    pub async fn evaluate(
        &self,
        pairs: &[QAPair],
        rubric_template: &str,
    ) -> Result<JudgeResult, EvalError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        let judge_name = self.judge.name().to_string();
        log::info!("judging {} answers with {judge_name}", pairs.len());

        let judgments = run_indexed(pairs, self.concurrency, |pair| {
            let judge = self.judge.clone();
            let prompt = render_rubric(rubric_template, &pair.question, &pair.answer);
            async move {
                let raw = judge.complete(&prompt).await?;
                Ok(parse_judgment(&raw))
            }
        })
        .await?;

        let mut unscored = 0usize;
        for (index, (pair, judgment)) in pairs.iter().zip(&judgments).enumerate() {
            if !judgment.is_scored() {
                unscored += 1;
                log::warn!(
                    "{judge_name}: could not extract a score for item {index} (question: {:?})",
                    pair.question
                );
            }
        }
        if unscored > 0 {
            log::warn!(
                "{judge_name}: {unscored} of {} responses had no usable score",
                judgments.len()
            );
        }
        Ok(judgments)
    }
}

/// Judges `pairs` with `judge` using `rubric_template`, with no concurrency limit.
pub async fn evaluate<C>(
    pairs: &[QAPair],
    rubric_template: &str,
    judge: Arc<C>,
) -> Result<JudgeResult, EvalError>
where
    C: PromptClient + ?Sized + 'static,
{
    Evaluator::new(judge).evaluate(pairs, rubric_template).await
}
