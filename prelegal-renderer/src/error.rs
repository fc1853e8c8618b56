//! Error types for prelegal-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from cover-page rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// The placeholder pattern failed to compile.
    #[error("placeholder pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Filesystem error while loading override templates.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
