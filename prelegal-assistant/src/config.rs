use std::time::Duration;

use crate::error::AssistantError;

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_PROVIDER_ORDER: &str = "cerebras";
pub const DEFAULT_REASONING_EFFORT: &str = "low";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for the chat-completions provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Upstream providers to try, in order. Empty lets the router decide.
    pub provider_order: Vec<String>,
    pub reasoning_effort: Option<String>,
    pub timeout: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            provider_order: split_list(DEFAULT_PROVIDER_ORDER),
            reasoning_effort: Some(DEFAULT_REASONING_EFFORT.to_string()),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ModelConfig {
    /// Read settings from the process environment.
    ///
    /// | Variable                      | Default                        |
    /// |-------------------------------|--------------------------------|
    /// | `OPENROUTER_API_KEY`          | none                           |
    /// | `PRELEGAL_MODEL`              | `openai/gpt-oss-120b`          |
    /// | `PRELEGAL_MODEL_BASE_URL`     | `https://openrouter.ai/api/v1` |
    /// | `PRELEGAL_PROVIDER_ORDER`     | `cerebras`                     |
    /// | `PRELEGAL_REASONING_EFFORT`   | `low`                          |
    /// | `PRELEGAL_MODEL_TIMEOUT_SECS` | `120`                          |
    pub fn from_env() -> Result<Self, AssistantError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ModelConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AssistantError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let mut config = Self::default();

        config.api_key = get("OPENROUTER_API_KEY").filter(|v| !v.is_empty());
        if let Some(model) = get("PRELEGAL_MODEL").filter(|v| !v.is_empty()) {
            config.model = model;
        }
        if let Some(url) = get("PRELEGAL_MODEL_BASE_URL").filter(|v| !v.is_empty()) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(order) = get("PRELEGAL_PROVIDER_ORDER") {
            config.provider_order = split_list(&order);
        }
        if let Some(effort) = get("PRELEGAL_REASONING_EFFORT") {
            config.reasoning_effort = Some(effort).filter(|v| !v.is_empty());
        }
        if let Some(secs) = get("PRELEGAL_MODEL_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                AssistantError::Config(format!(
                    "PRELEGAL_MODEL_TIMEOUT_SECS must be a whole number of seconds, got '{secs}'"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
