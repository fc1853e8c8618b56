use prelegal_core::SchemaError;
use thiserror::Error;

/// Error surface for model calls and response validation.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("no API key configured (set OPENROUTER_API_KEY)")]
    MissingApiKey,

    #[error("model provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("could not reach model provider: {0}")]
    Transport(String),

    #[error("unexpected provider response: {0}")]
    MalformedResponse(String),

    #[error("model reply did not match the response schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("invalid model configuration: {0}")]
    Config(String),
}
