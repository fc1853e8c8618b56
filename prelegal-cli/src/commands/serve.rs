//! `prelegal serve`: foreground HTTP server.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use prelegal_assistant::ModelConfig;
use prelegal_server::config::{DEFAULT_BIND, DEFAULT_STATIC_DIR};
use prelegal_server::{start_blocking, LogFormat, ServerConfig};

use super::CatalogArg;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "PRELEGAL_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Directory holding the built frontend.
    #[arg(long, env = "PRELEGAL_STATIC_DIR", default_value = DEFAULT_STATIC_DIR)]
    pub static_dir: PathBuf,

    /// Directory of `<doc_type>.md` cover pages that override the built-in ones.
    #[arg(long, env = "PRELEGAL_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,

    #[command(flatten)]
    pub catalog: CatalogArg,
}

impl ServeArgs {
    pub fn run(self) -> Result<()> {
        let model = ModelConfig::from_env().context("invalid model configuration")?;
        let config = ServerConfig {
            bind: self.bind,
            static_dir: self.static_dir,
            templates_dir: self.templates_dir,
            catalog: self.catalog.catalog,
            model,
            log_format: LogFormat::from_env(),
        };
        start_blocking(config).context("server exited with error")
    }
}
