pub mod chat;
pub mod docs;
pub mod preview;
pub mod serve;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use prelegal_core::DocumentRegistry;

/// `--catalog` flag shared by every command that reads the registry.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArg {
    /// Alternative document catalog (YAML). Defaults to the built-in one.
    #[arg(long, env = "PRELEGAL_CATALOG")]
    pub catalog: Option<PathBuf>,
}

impl CatalogArg {
    pub fn load(&self) -> Result<DocumentRegistry> {
        match &self.catalog {
            Some(path) => DocumentRegistry::load_at(path)
                .with_context(|| format!("failed to load catalog {}", path.display())),
            None => DocumentRegistry::builtin().context("built-in catalog is invalid"),
        }
    }
}
