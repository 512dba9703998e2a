//! Batch processing command for multiple invoice files.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use dbex_core::{
    source_for_path, Batch, BatchReport, DocumentFailure, Field, InvoiceFieldExtractor, TextSource,
};

use super::config::load_config;
use super::extract::OutputFormat;
use crate::export::{format_record_text, format_warnings, sum_amounts, write_csv};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob patterns, processed in the order given
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Stop at the first document that cannot be read
    #[arg(long)]
    fail_fast: bool,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    config.validate()?;

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for: {}", args.inputs.join(" "));
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("=>-"),
    );

    let extractor = InvoiceFieldExtractor::from_config(&config.extraction);
    let sources: Vec<Box<dyn TextSource>> = files
        .iter()
        .map(|path| source_for_path(path, &config.pdf))
        .collect();

    let stop = AtomicBool::new(false);
    let mut first_failure: Option<DocumentFailure> = None;
    let report = Batch::run_with(&extractor, &sources, Some(&stop), |outcome| {
        match outcome {
            Ok(record) => pb.set_message(record.source_name().to_string()),
            Err(failure) => {
                pb.set_message(failure.source.clone());
                if args.fail_fast && first_failure.is_none() {
                    error!("Failed to process {}: {}", failure.source, failure.error);
                    first_failure = Some(failure.clone());
                    stop.store(true, Ordering::Relaxed);
                }
            }
        }
        pb.inc(1);
    });

    if let Some(failure) = first_failure {
        pb.abandon();
        anyhow::bail!("Processing failed: {}: {}", failure.source, failure.error);
    }
    pb.finish_with_message("Complete");

    write_output(&args, &report, &config.export)?;
    print_summary(&report, start);

    if report.all_failed() {
        anyhow::bail!("None of the {} documents could be read", report.failures.len());
    }

    Ok(())
}

/// Resolve each input to files. Existing paths are used as is; anything else
/// is treated as a glob pattern. Order follows the arguments, and a file named
/// twice is processed once.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        let candidates: Vec<PathBuf> = if Path::new(input).exists() {
            vec![PathBuf::from(input)]
        } else {
            glob(input)?.filter_map(|r| r.ok()).collect()
        };

        if candidates.is_empty() {
            debug!("No files matched {}", input);
        }

        for path in candidates {
            if path.is_file() && seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

fn write_output(
    args: &BatchArgs,
    report: &BatchReport,
    export: &dbex_core::models::config::ExportConfig,
) -> anyhow::Result<()> {
    let output = match args.format {
        OutputFormat::Csv => {
            if let Some(path) = &args.output {
                write_csv(fs::File::create(path)?, &report.records, &report.failures, export)?;
                eprintln!("{} CSV written to {}", style("✓").green(), path.display());
            } else {
                write_csv(io::stdout().lock(), &report.records, &report.failures, export)?;
            }
            return Ok(());
        }
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Text => {
            let mut text: String = report.records.iter().map(format_record_text).collect();
            text.push('\n');
            text.push_str(&format_warnings(&report.duplicates));
            text
        }
    };

    if let Some(path) = &args.output {
        fs::write(path, &output)?;
        eprintln!("{} Output written to {}", style("✓").green(), path.display());
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn print_summary(report: &BatchReport, start: Instant) {
    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.processed(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(report.records.len()).green(),
        style(report.failures.len()).red()
    );

    let (total, counted) = sum_amounts(&report.records, Field::TotalThisInvoice);
    if counted > 0 {
        eprintln!("   Total This Invoice across {} invoices: {}", counted, total);
    }

    if !report.failures.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for failure in &report.failures {
            eprintln!("  - {}: {}", failure.source, failure.error);
        }
    }

    if !report.duplicates.is_empty() {
        eprintln!();
        eprint!("{}", style(format_warnings(&report.duplicates)).red());
    }
}
