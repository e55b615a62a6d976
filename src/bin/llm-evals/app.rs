use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use llm_evals::{parse_question_list, Answer, Pipeline, Question, QuestionSource, DEFAULT_RUBRIC};
use serde::Deserialize;

use crate::args::CliArgs;
use crate::config::{load_config, AppConfig};
use crate::logging::init_logging;
use crate::provider::{build_client, provider_config};
use crate::report::render_text;

const DEFAULT_PROVIDER: &str = "openai";

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let loaded = load_config(args.config.clone())?;
    let _logger = init_logging(&loaded.config.logging, args.log_level.as_deref(), &loaded.paths)?;
    if !loaded.config_exists {
        log::debug!(
            "no config at {}, using defaults",
            loaded.paths.config_file.display()
        );
    }

    let plan = RunPlan::resolve(&args, &loaded.config)?;
    let rubric = match &plan.rubric_file {
        Some(path) => read_file(path)?,
        None => DEFAULT_RUBRIC.to_string(),
    };

    let answerer = build_client(&plan.answerer, &provider_config(&loaded.config, &plan.answerer))?;
    let mut pipeline = Pipeline::new(answerer);
    for id in &plan.judges {
        pipeline = pipeline.judge(id.clone(), build_client(id, &provider_config(&loaded.config, id))?);
    }
    if let Some(limit) = plan.concurrency {
        pipeline = pipeline.concurrency(limit);
    }

    let report = pipeline.run(plan.source, &rubric).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report)?);
    }
    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// One entry of a `--pairs-file`.
#[derive(Debug, Deserialize)]
struct PairRow {
    question: Question,
    #[serde(default)]
    answer: Option<Answer>,
}

fn read_pairs(path: &Path) -> anyhow::Result<Vec<(Question, Option<Answer>)>> {
    let rows: Vec<PairRow> = serde_json::from_str(&read_file(path)?)
        .with_context(|| format!("parsing {}", path.display()))?;
    if rows.is_empty() {
        bail!("{} contains no pairs", path.display());
    }
    Ok(rows.into_iter().map(|row| (row.question, row.answer)).collect())
}

/// Settings for one run, merged from flags and the config file.
#[derive(Debug)]
struct RunPlan {
    source: QuestionSource,
    answerer: String,
    judges: Vec<String>,
    concurrency: Option<usize>,
    rubric_file: Option<std::path::PathBuf>,
}

impl RunPlan {
    fn resolve(args: &CliArgs, config: &AppConfig) -> anyhow::Result<Self> {
        let source = match (&args.pairs_file, &args.questions_file, &args.topic) {
            (Some(path), _, _) => QuestionSource::Pairs(read_pairs(path)?),
            (None, Some(path), _) => {
                let questions = parse_question_list(&read_file(path)?);
                if questions.is_empty() {
                    bail!("{} contains no questions", path.display());
                }
                QuestionSource::Custom(questions)
            }
            (None, None, Some(topic)) => QuestionSource::Topic {
                topic: topic.clone(),
                count: args.num_questions.unwrap_or(config.run.num_questions),
            },
            (None, None, None) => {
                bail!("one of --topic, --questions-file or --pairs-file is required")
            }
        };
        let answerer = args
            .answerer
            .clone()
            .or_else(|| config.run.answerer.clone())
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
        let judges = if !args.judges.is_empty() {
            args.judges.clone()
        } else if !config.run.judges.is_empty() {
            config.run.judges.clone()
        } else {
            vec![answerer.clone()]
        };
        Ok(Self {
            source,
            answerer,
            judges,
            concurrency: args.concurrency.or(config.run.concurrency),
            rubric_file: args
                .rubric_file
                .clone()
                .or_else(|| config.run.rubric_file.as_ref().map(Into::into)),
        })
    }
}
