//! `prelegal docs`: catalog inspection.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use prelegal_core::{DocumentConfig, DocumentRegistry};

use super::CatalogArg;

#[derive(Subcommand, Debug)]
pub enum DocsCommand {
    /// List every document type in the catalog.
    List(DocsListArgs),
    /// Show one document type's description and fields.
    Show(DocsShowArgs),
}

#[derive(Args, Debug)]
pub struct DocsListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub catalog: CatalogArg,
}

#[derive(Args, Debug)]
pub struct DocsShowArgs {
    /// Document type id, e.g. `mnda`.
    pub doc_type: String,

    #[command(flatten)]
    pub catalog: CatalogArg,
}

pub fn run(command: DocsCommand) -> Result<()> {
    match command {
        DocsCommand::List(args) => {
            let registry = args.catalog.load()?;
            if args.json {
                print_json(&registry)
            } else {
                print_table(&registry);
                Ok(())
            }
        }
        DocsCommand::Show(args) => {
            let registry = args.catalog.load()?;
            let Some(config) = registry.get(&args.doc_type) else {
                bail!(
                    "unknown document type '{}'; run `prelegal docs list` to see the catalog",
                    args.doc_type
                );
            };
            print_details(config, registry.is_fallback(config));
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct DocJson<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    fields: &'a [String],
    fallback: bool,
}

#[derive(Tabled)]
struct DocRow {
    #[tabled(rename = "doc type")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "fields")]
    fields: usize,
}

fn print_json(registry: &DocumentRegistry) -> Result<()> {
    let docs: Vec<DocJson<'_>> = registry
        .documents()
        .iter()
        .map(|doc| DocJson {
            id: doc.id.as_str(),
            name: &doc.name,
            description: &doc.description,
            fields: &doc.fields,
            fallback: registry.is_fallback(doc),
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&docs).context("failed to serialize catalog JSON")?
    );
    Ok(())
}

fn print_table(registry: &DocumentRegistry) {
    println!(
        "Prelegal v{} | {} document types",
        env!("CARGO_PKG_VERSION"),
        registry.drafts().count(),
    );
    let rows: Vec<DocRow> = registry
        .drafts()
        .map(|doc| DocRow {
            id: doc.id.to_string(),
            name: doc.name.clone(),
            fields: doc.fields.len(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!(
        "Unrecognised types use the '{}' classifier.",
        registry.fallback().id
    );
}

fn print_details(config: &DocumentConfig, fallback: bool) {
    println!("{} ({})", config.name.bold(), config.id);
    if !config.description.is_empty() {
        println!("{}", config.description);
    }
    if fallback {
        println!("{}", "classifier for unrecognised document types".bright_black());
    }
    println!();
    println!("Fields:");
    for field in &config.fields {
        println!("  - {field}");
    }
}
