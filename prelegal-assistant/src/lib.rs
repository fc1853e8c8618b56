//! Completion orchestrator: turns a conversation plus the fields collected so
//! far into a model request, and the model's structured answer into a reply
//! and a sparse field update.

pub mod config;
mod error;
pub mod orchestrator;
pub mod provider;

pub use config::ModelConfig;
pub use error::AssistantError;
pub use orchestrator::{Assistant, DETECTED_DOC_TYPE_FIELD};
pub use provider::{CompletionModel, CompletionRequest, OpenRouterClient};
