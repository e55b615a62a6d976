use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "llm-evals",
    about = "Generate test questions, answer them with an LLM and score the answers with LLM judges"
)]
pub struct CliArgs {
    /// Topic to generate questions about
    #[arg(long, short = 't')]
    pub topic: Option<String>,
    /// Number of questions to generate
    #[arg(long, short = 'n')]
    pub num_questions: Option<usize>,
    /// File with one question per line, used instead of generating questions
    #[arg(long)]
    pub questions_file: Option<PathBuf>,
    /// JSON array of {"question", "answer"} objects; only missing answers are generated
    #[arg(long, conflicts_with = "questions_file")]
    pub pairs_file: Option<PathBuf>,
    /// Rubric template containing {question} and {answer}
    #[arg(long)]
    pub rubric_file: Option<PathBuf>,
    /// Provider id used to generate questions and answers
    #[arg(long)]
    pub answerer: Option<String>,
    /// Provider id of a judge; repeat for several judges
    #[arg(long = "judge")]
    pub judges: Vec<String>,
    /// Maximum requests in flight per batch
    #[arg(long)]
    pub concurrency: Option<usize>,
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_judge_flags_accumulate() {
        let args = CliArgs::parse_from([
            "llm-evals", "--topic", "AI trivia", "-n", "3", "--judge", "openai", "--judge",
            "google",
        ]);
        assert_eq!(args.topic.as_deref(), Some("AI trivia"));
        assert_eq!(args.num_questions, Some(3));
        assert_eq!(args.judges, vec!["openai", "google"]);
        assert!(!args.json);
    }
}
