//! Reducing a judge's judgments to a single number.

use serde::{Deserialize, Serialize};

use crate::types::{AggregateScore, Judgment};

/// Mean of the scored judgments; `0.0` when none were scored.
pub fn aggregate(judgments: &[Judgment]) -> AggregateScore {
    summarize(judgments).mean
}

/// Mean score together with how many judgments were scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub mean: AggregateScore,
    pub scored: usize,
    pub unscored: usize,
}

pub fn summarize(judgments: &[Judgment]) -> ScoreSummary {
    let (sum, scored) = judgments
        .iter()
        .filter_map(|j| j.score)
        .fold((0u64, 0usize), |(sum, n), score| (sum + u64::from(score), n + 1));
    let mean = if scored == 0 {
        0.0
    } else {
        sum as f64 / scored as f64
    };
    ScoreSummary {
        mean,
        scored,
        unscored: judgments.len() - scored,
    }
}
