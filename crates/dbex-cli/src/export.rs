//! Output formatting shared by the extract and batch commands.

use std::io::Write;

use rust_decimal::Decimal;

use dbex_core::models::config::ExportConfig;
use dbex_core::{DocumentFailure, ExtractedRecord, Field};

const SEPARATOR: &str = "-------------------------------------------";

/// Write records as CSV: one header row in column order, one row per record.
/// With `include_failures`, an Error column is appended and each failed
/// document gets a row holding only its file name and error.
pub fn write_csv<W: Write>(
    writer: W,
    records: &[ExtractedRecord],
    failures: &[DocumentFailure],
    config: &ExportConfig,
) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(config.delimiter as u8)
        .from_writer(writer);

    let mut header: Vec<&str> = Field::COLUMNS.iter().map(|f| f.label()).collect();
    if config.include_failures {
        header.push("Error");
    }
    wtr.write_record(&header)?;

    for record in records {
        let mut row = record.row();
        if config.include_failures {
            row.push("");
        }
        wtr.write_record(&row)?;
    }

    if config.include_failures {
        for failure in failures {
            let mut row = vec![""; Field::COLUMNS.len()];
            row[Field::COLUMNS.len() - 1] = failure.source.as_str();
            row.push(failure.error.as_str());
            wtr.write_record(&row)?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Records as a CSV string.
pub fn format_csv(
    records: &[ExtractedRecord],
    failures: &[DocumentFailure],
    config: &ExportConfig,
) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records, failures, config)?;
    Ok(String::from_utf8(buf)?)
}

/// `Label: value` lines for one record, file name first.
pub fn format_record_text(record: &ExtractedRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("File: {}\n", record.source_name()));
    for field in Field::COLUMNS.iter().filter(|f| **f != Field::SourceFile) {
        output.push_str(&format!("{}: {}\n", field.label(), record.get(*field)));
    }
    output.push('\n');
    output.push_str(SEPARATOR);
    output.push('\n');

    output
}

/// The duplicate invoice number block printed after a batch.
pub fn format_warnings(duplicates: &[String]) -> String {
    let mut output = String::from("Warnings Summary:\n");

    if duplicates.is_empty() {
        output.push_str("  (none)\n");
    } else {
        output.push_str("Duplicate Invoice Numbers:\n");
        for duplicate in duplicates {
            output.push_str(&format!("  - {}\n", duplicate));
        }
    }

    output
}

/// Sum of a currency field over the records where it parses.
pub fn sum_amounts(records: &[ExtractedRecord], field: Field) -> (Decimal, usize) {
    records
        .iter()
        .filter_map(|r| r.amount(field))
        .fold((Decimal::ZERO, 0), |(sum, n), amount| (sum + amount, n + 1))
}
