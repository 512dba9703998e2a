//! Rule-driven extractor for task-order invoices.

use tracing::debug;

use super::normalize::normalize;
use super::rules::dbe::read_dbe_section;
use super::rules::field_rules;
use super::InvoiceExtractor;
use crate::models::config::ExtractionConfig;
use crate::models::record::ExtractedRecord;

/// Extracts the fixed invoice field set from one page of text.
///
/// The extractor holds no per-batch state; calling [`extract`](Self::extract)
/// twice on the same text yields equal records.
#[derive(Debug, Clone)]
pub struct InvoiceFieldExtractor {
    /// Heading that opens the DBE spending table.
    dbe_section_header: String,
}

impl InvoiceFieldExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            dbe_section_header: normalize_header(&config.dbe_section_header),
        }
    }

    /// Set the DBE section heading.
    pub fn with_dbe_section_header(mut self, header: impl AsRef<str>) -> Self {
        self.dbe_section_header = normalize_header(header.as_ref());
        self
    }

    pub fn dbe_section_header(&self) -> &str {
        &self.dbe_section_header
    }

    /// Normalize `text` and apply every rule plus the DBE section reader.
    pub fn extract(&self, text: &str, source_name: &str) -> ExtractedRecord {
        let text = normalize(text);
        let mut record = ExtractedRecord::new(source_name);

        for rule in field_rules() {
            match rule.apply(&text) {
                Some(value) => record.set(rule.field, value),
                None => debug!(field = rule.field.label(), source = source_name, "no match"),
            }
        }

        read_dbe_section(&text, &self.dbe_section_header).apply_to(&mut record);

        let (filled, total) = record.coverage();
        debug!(
            source = source_name,
            invoice_number = record.invoice_number(),
            filled,
            total,
            "Extracted invoice fields"
        );

        record
    }
}

/// The heading is searched for in normalized text, so it gets the same treatment.
fn normalize_header(header: &str) -> String {
    normalize(header).trim().to_string()
}

impl Default for InvoiceFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for InvoiceFieldExtractor {
    fn extract(&self, text: &str, source_name: &str) -> ExtractedRecord {
        InvoiceFieldExtractor::extract(self, text, source_name)
    }
}
