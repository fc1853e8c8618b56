//! `prelegal preview`: render a cover page from the command line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use prelegal_core::FieldSet;
use prelegal_renderer::Renderer;

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Document type id, e.g. `pilot`.
    pub doc_type: String,

    /// JSON object of field values.
    #[arg(long)]
    pub fields: Option<PathBuf>,

    /// Single field value; repeatable and applied after `--fields`.
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub field: Vec<(String, String)>,

    /// Directory of `<doc_type>.md` cover pages that override the built-in ones.
    #[arg(long, env = "PRELEGAL_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,
}

impl PreviewArgs {
    pub fn run(self) -> Result<()> {
        let mut fields = match &self.fields {
            Some(path) => read_fields(path)?,
            None => FieldSet::new(),
        };
        let overrides: FieldSet = self.field.into_iter().collect();
        fields.overlay(&overrides);

        let renderer = Renderer::with_template_dir(self.templates_dir.as_deref())
            .context("failed to load cover-page templates")?;
        let html = renderer
            .render(&self.doc_type, &fields)
            .with_context(|| format!("failed to render '{}'", self.doc_type))?;
        println!("{html}");

        let missing = renderer.missing_fields(&self.doc_type, &fields);
        if !missing.is_empty() {
            eprintln!("{} {}", "missing fields:".yellow(), missing.join(", "));
        }
        Ok(())
    }
}

fn read_fields(path: &Path) -> Result<FieldSet> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON object of string values", path.display()))
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_splits_on_first_equals() {
        assert_eq!(
            parse_field("governingLaw=State of Delaware"),
            Ok(("governingLaw".to_string(), "State of Delaware".to_string()))
        );
        assert_eq!(parse_field("note=a=b"), Ok(("note".to_string(), "a=b".to_string())));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }
}
