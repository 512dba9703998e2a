//! Extract command - pull the invoice fields out of one file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{debug, info};

use dbex_core::{source_for_path, InvoiceFieldExtractor};

use super::config::load_config;
use crate::export::{format_csv, format_record_text};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or extracted page text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// PDF page to read (overrides pdf.page from the config)
    #[arg(long)]
    page: Option<u32>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(page) = args.page {
        config.pdf.page = page;
    }
    config.validate()?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let source = source_for_path(&args.input, &config.pdf);
    let text = source.load_text()?;
    debug!("Read {} chars of page text", text.len());

    let extractor = InvoiceFieldExtractor::from_config(&config.extraction);
    let record = extractor.extract(&text, source.source_name());

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&record)?,
        OutputFormat::Csv => format_csv(std::slice::from_ref(&record), &[], &config.export)?,
        OutputFormat::Text => format_record_text(&record),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    let (filled, total) = record.coverage();
    if filled < total {
        let missing: Vec<&str> = record.missing_fields().iter().map(|f| f.label()).collect();
        eprintln!(
            "{} {}/{} fields found; missing: {}",
            style("ℹ").blue(),
            filled,
            total,
            missing.join(", ")
        );
    }

    Ok(())
}
