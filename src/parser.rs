//! Extraction of a 1-5 score and a rationale from free-form judge output.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::Judgment;

static LABELED_SCORE: OnceLock<Regex> = OnceLock::new();
static BARE_SCORE: OnceLock<Regex> = OnceLock::new();
static LABELED_NOTES: OnceLock<Regex> = OnceLock::new();

fn labeled_score() -> &'static Regex {
    LABELED_SCORE.get_or_init(|| {
        Regex::new(r"(?i)score\s*:\s*([1-5])(?:\D|$)").expect("labeled score pattern")
    })
}

// Any lone 1-5 digit counts, so "I have 3 concerns" scores 3.
fn bare_score() -> &'static Regex {
    BARE_SCORE.get_or_init(|| Regex::new(r"(?:^|\D)([1-5])(?:\D|$)").expect("bare score pattern"))
}

fn labeled_notes() -> &'static Regex {
    LABELED_NOTES
        .get_or_init(|| Regex::new(r"(?is)notes\s*:\s*(.*)").expect("labeled notes pattern"))
}

/// Parses a judge response into a [`Judgment`]. Never fails.
///
/// The score comes from a `Score: N` label when present, otherwise from the first
/// standalone digit 1-5 anywhere in the text. Notes come from everything after a
/// `Notes:` label, otherwise from the whole response. Both are trimmed.
pub fn parse_judgment(raw: &str) -> Judgment {
    Judgment {
        score: extract_score(raw),
        notes: extract_notes(raw),
    }
}

/// Score pass of [`parse_judgment`].
pub fn extract_score(raw: &str) -> Option<u8> {
    labeled_score()
        .captures(raw)
        .or_else(|| bare_score().captures(raw))
        .and_then(|caps| caps.get(1))
        .and_then(|digit| digit.as_str().parse().ok())
}

/// Notes pass of [`parse_judgment`].
pub fn extract_notes(raw: &str) -> String {
    labeled_notes()
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|notes| notes.as_str().trim())
        .filter(|notes| !notes.is_empty())
        .unwrap_or_else(|| raw.trim())
        .to_string()
}
