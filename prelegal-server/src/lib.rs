//! HTTP layer: chat over server-sent events, cover-page preview, health, and
//! the single-page frontend.

pub mod assets;
pub mod config;
mod error;
pub mod events;
mod runtime;

pub use config::{LogFormat, ServerConfig};
pub use error::{ApiError, ServerError};
pub use events::ChatEvent;
pub use runtime::{init_tracing, router, run, start_blocking, AppState, ChatRequest, PreviewRequest};
