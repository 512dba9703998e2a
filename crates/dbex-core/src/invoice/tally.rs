//! Per-batch invoice number counter and duplicate warnings.

use std::collections::HashMap;

use tracing::warn;

use crate::models::record::ExtractedRecord;

/// Counts invoice numbers across one batch.
///
/// The sentinel value is counted like any other number, so two documents
/// without a readable invoice number are reported as duplicates of "N/A".
#[derive(Debug, Clone, Default)]
pub struct InvoiceNumberTally {
    counts: HashMap<String, usize>,
    /// Numbers seen more than once, in the order they were first repeated.
    duplicates: Vec<String>,
}

impl InvoiceNumberTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tally as a single reduction over finished records.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ExtractedRecord>,
    {
        let mut tally = Self::new();
        for record in records {
            tally.record(record.invoice_number());
        }
        tally
    }

    /// Count one occurrence. Returns `true` when the number has now been seen
    /// more than once.
    pub fn record(&mut self, invoice_number: &str) -> bool {
        let count = self.counts.entry(invoice_number.to_string()).or_insert(0);
        *count += 1;

        if *count == 2 {
            warn!(invoice_number, "Duplicate invoice number");
            self.duplicates.push(invoice_number.to_string());
        }
        *count > 1
    }

    pub fn count(&self, invoice_number: &str) -> usize {
        self.counts.get(invoice_number).copied().unwrap_or(0)
    }

    pub fn is_duplicate(&self, invoice_number: &str) -> bool {
        self.count(invoice_number) > 1
    }

    /// Duplicate numbers, each listed once.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Number of distinct invoice numbers seen.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Forget everything; called at the start of each batch.
    pub fn reset(&mut self) {
        self.counts.clear();
        self.duplicates.clear();
    }

    pub fn into_duplicates(self) -> Vec<String> {
        self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{Field, NOT_FOUND};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn record(number: &str) -> ExtractedRecord {
        let mut r = ExtractedRecord::new(format!("{number}.pdf"));
        r.set(Field::InvoiceNumber, number);
        r
    }

    #[test]
    fn test_duplicate_flagged_once() {
        let mut tally = InvoiceNumberTally::new();
        assert!(!tally.record("INV-001"));
        assert!(!tally.record("INV-002"));
        assert!(tally.record("INV-001"));
        assert!(tally.record("INV-001"));

        assert_eq!(tally.duplicates(), ["INV-001".to_string()]);
        assert_eq!(tally.count("INV-001"), 3);
        assert_eq!(tally.distinct(), 2);
    }

    #[test]
    fn test_order_does_not_change_duplicate_set() {
        let orders = [
            ["INV-001", "INV-001", "INV-002"],
            ["INV-001", "INV-002", "INV-001"],
            ["INV-002", "INV-001", "INV-001"],
        ];
        for order in orders {
            let records: Vec<ExtractedRecord> = order.iter().map(|n| record(n)).collect();
            let tally = InvoiceNumberTally::from_records(&records);
            assert_eq!(tally.duplicates(), ["INV-001".to_string()]);
        }
    }

    #[test]
    fn test_reduction_matches_incremental() {
        let numbers = ["A", "B", "A", "C", "B", "A"];
        let records: Vec<ExtractedRecord> = numbers.iter().map(|n| record(n)).collect();

        let mut incremental = InvoiceNumberTally::new();
        for r in &records {
            incremental.record(r.invoice_number());
        }
        let reduced = InvoiceNumberTally::from_records(records.iter().rev());

        let a: BTreeSet<_> = incremental.duplicates().iter().collect();
        let b: BTreeSet<_> = reduced.duplicates().iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sentinel_counts_as_key() {
        let mut tally = InvoiceNumberTally::new();
        tally.record(NOT_FOUND);
        tally.record(NOT_FOUND);
        assert!(tally.is_duplicate(NOT_FOUND));
    }

    #[test]
    fn test_reset() {
        let mut tally = InvoiceNumberTally::new();
        tally.record("X");
        tally.record("X");
        tally.reset();
        assert_eq!(tally.count("X"), 0);
        assert!(tally.duplicates().is_empty());
    }
}
