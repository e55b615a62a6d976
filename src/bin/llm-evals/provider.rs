use std::sync::Arc;

use anyhow::{anyhow, bail};
use llm_evals::{
    backends::{Google, OpenAI},
    PromptClient, ResilientClient,
};

use crate::config::{AppConfig, ProviderConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    OpenAI,
    Google,
}

impl Backend {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "google" | "gemini" => Some(Self::Google),
            _ => None,
        }
    }

    fn default_key_env(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Google => "GOOGLE_API_KEY",
        }
    }
}

/// Looks up provider `id`, falling back to an empty entry so the built-in
/// `openai` and `google` ids work without any configuration.
pub fn provider_config(config: &AppConfig, id: &str) -> ProviderConfig {
    config.providers.get(id).cloned().unwrap_or_default()
}

fn resolve_api_key(
    id: &str,
    backend: Backend,
    cfg: &ProviderConfig,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<String> {
    if let Some(key) = cfg.api_key.as_ref().filter(|k| !k.is_empty()) {
        return Ok(key.clone());
    }
    let var = cfg
        .api_key_env
        .as_deref()
        .unwrap_or_else(|| backend.default_key_env());
    env(var)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| anyhow!("no API key for provider '{id}': set {var} or api_key"))
}

/// Builds the client for provider `id`, wrapped for retries when configured.
pub fn build_client(id: &str, cfg: &ProviderConfig) -> anyhow::Result<Arc<dyn PromptClient>> {
    let backend_name = cfg.backend.as_deref().unwrap_or(id);
    let Some(backend) = Backend::parse(backend_name) else {
        bail!("unknown backend '{backend_name}' for provider '{id}'");
    };
    let api_key = resolve_api_key(id, backend, cfg, |var| std::env::var(var).ok())?;

    let client: Arc<dyn PromptClient> = match backend {
        Backend::OpenAI => {
            let client = OpenAI::new(
                api_key,
                cfg.base_url.clone(),
                cfg.model.clone(),
                cfg.max_tokens,
                cfg.temperature,
                cfg.timeout_seconds,
                cfg.system.clone(),
            )?;
            with_retry(client, cfg)
        }
        Backend::Google => {
            let client = Google::new(
                api_key,
                cfg.base_url.clone(),
                cfg.model.clone(),
                cfg.max_tokens,
                cfg.temperature,
                cfg.timeout_seconds,
                cfg.system.clone(),
            )?;
            with_retry(client, cfg)
        }
    };
    log::debug!("provider {id} uses {backend:?} model {}", client.name());
    Ok(client)
}

fn with_retry<C: PromptClient + 'static>(client: C, cfg: &ProviderConfig) -> Arc<dyn PromptClient> {
    match &cfg.retry {
        Some(retry) => Arc::new(ResilientClient::new(client, retry.clone())),
        None => Arc::new(client),
    }
}
