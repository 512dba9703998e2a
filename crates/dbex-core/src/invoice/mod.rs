//! Invoice field extraction module.

mod extractor;
mod normalize;
pub mod rules;
mod tally;

pub use extractor::InvoiceFieldExtractor;
pub use normalize::normalize;
pub use rules::dbe::{read_dbe_section, DbeSection};
pub use tally::InvoiceNumberTally;

use crate::models::record::ExtractedRecord;

/// Trait for invoice field extractors.
pub trait InvoiceExtractor {
    /// Extract a record from raw page text. Never fails: fields that cannot be
    /// found hold the sentinel value.
    fn extract(&self, text: &str, source_name: &str) -> ExtractedRecord;
}
