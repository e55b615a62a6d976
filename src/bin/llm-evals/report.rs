use std::fmt::{self, Write};

use llm_evals::{EvalReport, JudgeReport};

/// Renders a report as plain text, one section per judge.
///
/// Pairs that were not judged because of a blank question or answer are left out.
pub fn render_text(report: &EvalReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for judge in &report.judges {
        render_judge(&mut out, report, judge)?;
    }
    Ok(out)
}

fn render_judge(out: &mut String, report: &EvalReport, judge: &JudgeReport) -> fmt::Result {
    writeln!(out, "=== Judge: {} ===\n", judge.judge)?;
    if let Some(err) = &judge.error {
        return writeln!(out, "Evaluation failed: {err}\n");
    }
    for ((question, answer), judgment) in report.pairs().zip(&judge.judgments) {
        let Some(judgment) = judgment else {
            continue;
        };
        writeln!(out, "Q: {question}")?;
        writeln!(out, "A: {answer}")?;
        match judgment.score {
            Some(score) => writeln!(out, "Score: {score}/5")?,
            None => writeln!(out, "Score: Not available")?,
        }
        writeln!(out, "Notes: {}\n", judgment.notes)?;
    }
    if judge.summary.scored > 0 {
        writeln!(out, "Average score: {:.2}/5\n", judge.average())
    } else {
        writeln!(out, "Could not calculate an average score.\n")
    }
}
