//! Prelegal: conversational drafting assistant for standard legal agreements.
//!
//! # Usage
//!
//! ```text
//! prelegal serve [--bind <addr>] [--static-dir <dir>] [--templates-dir <dir>] [--catalog <file>]
//! prelegal docs list [--json]
//! prelegal docs show <doc_type>
//! prelegal preview <doc_type> [--fields <file.json>] [--field key=value]...
//! prelegal chat [--doc-type <id>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{chat::ChatArgs, docs::DocsCommand, preview::PreviewArgs, serve::ServeArgs};

#[derive(Parser, Debug)]
#[command(
    name = "prelegal",
    version,
    about = "Draft standard legal agreements through a guided conversation",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server in the foreground.
    Serve(ServeArgs),

    /// Inspect the document catalog.
    Docs {
        #[command(subcommand)]
        command: DocsCommand,
    },

    /// Render a cover page as HTML.
    Preview(PreviewArgs),

    /// Talk to the assistant from the terminal.
    Chat(ChatArgs),
}

fn main() -> Result<()> {
    // A missing .env is fine; real deployments inject variables directly.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => args.run(),
        Commands::Docs { command } => commands::docs::run(command),
        Commands::Preview(args) => args.run(),
        Commands::Chat(args) => args.run(),
    }
}
