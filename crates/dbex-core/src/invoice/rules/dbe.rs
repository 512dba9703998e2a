//! DBE spending section extraction.
//!
//! The section has no per-value labels. Its three figures are the first three
//! dollar amounts that follow the section heading, in reading order. A `$`
//! with no digits after it (`$ -` for zero) still occupies its slot.

use tracing::{debug, trace};

use super::patterns::DOLLAR_AMOUNT;
use super::strip_whitespace;
use crate::models::record::{ExtractedRecord, Field};

/// Number of amounts the section must yield.
const SECTION_AMOUNTS: usize = 3;

/// Outcome of reading the DBE spending section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbeSection {
    /// Heading found with at least three amounts after it.
    Found {
        previously_billed: String,
        total_this_invoice: String,
        billed_to_date: String,
    },
    /// The heading does not occur in the text.
    HeaderMissing,
    /// The heading occurs but fewer than three amounts follow it.
    TooFewAmounts(usize),
}

impl DbeSection {
    /// Write the section's figures into `record`. Anything but [`DbeSection::Found`]
    /// leaves all three fields at the sentinel, as does an empty slot.
    pub fn apply_to(&self, record: &mut ExtractedRecord) {
        if let DbeSection::Found {
            previously_billed,
            total_this_invoice,
            billed_to_date,
        } = self
        {
            let slots = [
                (Field::DbePreviouslyBilled, previously_billed),
                (Field::DbeTotalThisInvoice, total_this_invoice),
                (Field::DbeBilledToDate, billed_to_date),
            ];
            for (field, amount) in slots {
                if !amount.is_empty() {
                    record.set(field, amount.clone());
                }
            }
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, DbeSection::Found { .. })
    }
}

/// Locate `header` in normalized text and take the first three dollar
/// amounts from the heading onward. All-or-nothing: fewer than three amounts
/// yields no values. Positions are kept, so an amount that strips to nothing
/// is returned as an empty string rather than skipped.
pub fn read_dbe_section(text: &str, header: &str) -> DbeSection {
    let Some(start) = text.find(header) else {
        debug!(header, "DBE spending section not found");
        return DbeSection::HeaderMissing;
    };

    let following = &text[start..];
    let amounts: Vec<String> = DOLLAR_AMOUNT
        .captures_iter(following)
        .map(|caps| strip_whitespace(&caps[1]))
        .take(SECTION_AMOUNTS)
        .collect();

    trace!(?amounts, "DBE section amounts");

    match <[String; SECTION_AMOUNTS]>::try_from(amounts) {
        Ok([previously_billed, total_this_invoice, billed_to_date]) => DbeSection::Found {
            previously_billed,
            total_this_invoice,
            billed_to_date,
        },
        Err(partial) => {
            debug!(found = partial.len(), "DBE spending section has too few amounts");
            DbeSection::TooFewAmounts(partial.len())
        }
    }
}
