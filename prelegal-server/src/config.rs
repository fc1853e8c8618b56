use std::path::PathBuf;

use prelegal_assistant::ModelConfig;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Log output format, chosen with `PRELEGAL_LOG_FORMAT` (`json` or `text`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        std::env::var("PRELEGAL_LOG_FORMAT")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    /// Anything other than `json` (case-insensitive) is plain text.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Everything `run` needs to start serving.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    /// Built frontend; served with an `index.html` fallback.
    pub static_dir: PathBuf,
    /// Extra or overriding cover-page templates.
    pub templates_dir: Option<PathBuf>,
    /// Alternative document catalog; the embedded one is used when `None`.
    pub catalog: Option<PathBuf>,
    pub model: ModelConfig,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            templates_dir: None,
            catalog: None,
            model: ModelConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parsing() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, "0.0.0.0:8000");
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(config.catalog.is_none());
    }
}
