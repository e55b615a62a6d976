use std::path::PathBuf;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};

use crate::config::{ConfigPaths, LoggingConfig};

/// Starts logging to stderr, or to a rotating file when `config.path` is set.
///
/// `RUST_LOG` overrides the configured level. The returned handle must stay alive
/// for the rest of the program.
pub fn init_logging(
    config: &LoggingConfig,
    level_override: Option<&str>,
    paths: &ConfigPaths,
) -> anyhow::Result<LoggerHandle> {
    let level = level_override.unwrap_or(&config.level);
    let logger = Logger::try_with_env_or_str(level)?;
    let Some(path) = config.path.as_ref() else {
        return Ok(logger.log_to_stderr().start()?);
    };

    let log_path = PathBuf::from(path);
    let directory = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| paths.logs_dir.clone());
    let basename = log_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("llm-evals")
        .to_string();
    Ok(logger
        .log_to_file(FileSpec::default().directory(directory).basename(basename))
        .rotate(
            Criterion::Size(config.rotate_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.rotate_keep),
        )
        .start()?)
}
