use thiserror::Error;

/// Error types that can occur while running an evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Authentication and authorization errors
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Invalid request parameters or caller input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Errors returned by the model provider, including empty completions
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// API response parsing or format error
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
    /// A spawned unit of work panicked or was cancelled
    #[error("Task error: {0}")]
    TaskError(String),
    /// Retry attempts exceeded
    #[error("Retry attempts exceeded after {attempts} tries: {last_error}")]
    RetryExceeded { attempts: usize, last_error: String },
}

impl EvalError {
    /// Whether the error came from an outbound call to a provider.
    ///
    /// Every variant except caller input and task failures is a provider failure.
    pub fn is_provider_failure(&self) -> bool {
        !matches!(self, EvalError::InvalidRequest(_) | EvalError::TaskError(_))
    }
}

/// Converts reqwest HTTP errors into EvalErrors
impl From<reqwest::Error> for EvalError {
    fn from(err: reqwest::Error) -> Self {
        EvalError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

impl From<tokio::task::JoinError> for EvalError {
    fn from(err: tokio::task::JoinError) -> Self {
        EvalError::TaskError(err.to_string())
    }
}
