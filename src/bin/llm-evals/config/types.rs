use std::collections::BTreeMap;

use llm_evals::ResilienceConfig;
use serde::{Deserialize, Serialize};

const DEFAULT_NUM_QUESTIONS: usize = 5;
const DEFAULT_LOG_ROTATE_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_ROTATE_KEEP: usize = 5;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub providers: BTreeMap<String, ProviderConfig>,
    pub run: RunConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// `openai` or `google`; defaults to the provider id.
    pub backend: Option<String>,
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
    pub system: Option<String>,
    pub retry: Option<ResilienceConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    pub answerer: Option<String>,
    pub judges: Vec<String>,
    pub num_questions: usize,
    pub concurrency: Option<usize>,
    pub rubric_file: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            answerer: None,
            judges: Vec::new(),
            num_questions: DEFAULT_NUM_QUESTIONS,
            concurrency: None,
            rubric_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file; logs go to stderr when unset.
    pub path: Option<String>,
    pub rotate_size: u64,
    pub rotate_keep: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: None,
            rotate_size: DEFAULT_LOG_ROTATE_SIZE,
            rotate_keep: DEFAULT_LOG_ROTATE_KEEP,
        }
    }
}
