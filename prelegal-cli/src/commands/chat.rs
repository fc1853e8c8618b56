//! `prelegal chat`: terminal conversation with the assistant.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use prelegal_assistant::{Assistant, ModelConfig, OpenRouterClient};
use prelegal_core::{ChatTurn, DocType, FieldSet};
use prelegal_renderer::Renderer;

use super::CatalogArg;

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Document to draft; leave unset to let the assistant work it out.
    #[arg(long, default_value = DocType::UNKNOWN)]
    pub doc_type: String,

    /// Directory of `<doc_type>.md` cover pages that override the built-in ones.
    #[arg(long, env = "PRELEGAL_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,

    #[command(flatten)]
    pub catalog: CatalogArg,
}

impl ChatArgs {
    pub fn run(self) -> Result<()> {
        let registry = self.catalog.load()?;
        let renderer = Renderer::with_template_dir(self.templates_dir.as_deref())
            .context("failed to load cover-page templates")?;
        let model = ModelConfig::from_env().context("invalid model configuration")?;
        if model.api_key.is_none() {
            eprintln!("{}", "OPENROUTER_API_KEY is not set; messages will fail".yellow());
        }
        let client = Arc::new(OpenRouterClient::new(model));
        let assistant = Assistant::new(Arc::new(registry), client);
        let mut session = ChatSession::new(assistant, renderer, DocType::from(self.doc_type));

        println!(
            "Drafting {}. Commands: /fields, /preview, /quit",
            session.document_name().bold()
        );
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        let mut lines = stdin.lock().lines();
        loop {
            print!("> ");
            stdout.flush().context("failed to flush stdout")?;
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("failed to read stdin")?;
            if session.handle_line(&line, &mut stdout)? == Step::Quit {
                break;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Quit,
}

/// Conversation state the web client would otherwise keep.
pub struct ChatSession {
    assistant: Assistant,
    renderer: Renderer,
    doc_type: DocType,
    fields: FieldSet,
    history: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new(assistant: Assistant, renderer: Renderer, doc_type: DocType) -> Self {
        Self {
            assistant,
            renderer,
            doc_type,
            fields: FieldSet::new(),
            history: Vec::new(),
        }
    }

    fn document_name(&self) -> String {
        self.assistant
            .registry()
            .lookup(self.doc_type.as_str())
            .name
            .clone()
    }

    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Step> {
        let line = line.trim();
        match line {
            "" => {}
            "/quit" | "/exit" => return Ok(Step::Quit),
            "/fields" => {
                let json = serde_json::to_string_pretty(&self.fields.filled())
                    .context("failed to serialize fields")?;
                writeln!(out, "{json}")?;
            }
            "/preview" => {
                let html = self
                    .renderer
                    .render(self.doc_type.as_str(), &self.fields)
                    .context("failed to render preview")?;
                writeln!(out, "{html}")?;
            }
            command if command.starts_with('/') => {
                writeln!(out, "unknown command {command}; try /fields, /preview or /quit")?;
            }
            message => self.send(message, out)?,
        }
        Ok(Step::Continue)
    }

    fn send<W: Write>(&mut self, message: &str, out: &mut W) -> Result<()> {
        self.history.push(ChatTurn::user(message));
        let turn = self
            .assistant
            .chat(&self.history, &self.fields, self.doc_type.as_str());
        let result = match turn {
            Ok(result) => result,
            Err(err) => {
                // Drop the turn so the next attempt resends a clean history.
                self.history.pop();
                writeln!(out, "{} {err}", "error:".red())?;
                return Ok(());
            }
        };

        writeln!(out, "{}", result.reply)?;
        self.history.push(ChatTurn::assistant(result.reply.clone()));

        match result.detected_doc_type {
            Some(detected) => {
                self.doc_type = detected;
                writeln!(out, "{} {}", "switched to".green(), self.document_name())?;
            }
            None => {
                self.fields.overlay(&result.fields);
                for (name, value) in result.fields.iter_filled() {
                    writeln!(out, "  {} {name} = {value}", "+".green())?;
                }
            }
        }
        Ok(())
    }
}
