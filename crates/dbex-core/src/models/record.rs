//! The flat record produced for each invoice document.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Value stored for any field whose rule found no match.
pub const NOT_FOUND: &str = "N/A";

/// A named field of an extracted invoice record.
///
/// Declaration order is the export column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ContractNumber,
    InvoiceDate,
    InvoiceNumber,
    TaskOrderNumber,
    BillingPeriod,
    TotalThisInvoice,
    TotalBilledToDate,
    DbePreviouslyBilled,
    DbeTotalThisInvoice,
    DbeBilledToDate,
    SourceFile,
    /// Figure printed next to a "DBE Billed To Date:" label. Not exported as a column;
    /// the exported DBE Billed To Date comes from the spending section.
    DbeBilledToDateLabel,
}

impl Field {
    /// Exported columns, in header order.
    pub const COLUMNS: [Field; 11] = [
        Field::ContractNumber,
        Field::InvoiceDate,
        Field::InvoiceNumber,
        Field::TaskOrderNumber,
        Field::BillingPeriod,
        Field::TotalThisInvoice,
        Field::TotalBilledToDate,
        Field::DbePreviouslyBilled,
        Field::DbeTotalThisInvoice,
        Field::DbeBilledToDate,
        Field::SourceFile,
    ];

    /// Every field a record carries.
    pub const ALL: [Field; 12] = [
        Field::ContractNumber,
        Field::InvoiceDate,
        Field::InvoiceNumber,
        Field::TaskOrderNumber,
        Field::BillingPeriod,
        Field::TotalThisInvoice,
        Field::TotalBilledToDate,
        Field::DbePreviouslyBilled,
        Field::DbeTotalThisInvoice,
        Field::DbeBilledToDate,
        Field::SourceFile,
        Field::DbeBilledToDateLabel,
    ];

    /// Human-readable label, also used as the CSV header.
    pub fn label(self) -> &'static str {
        match self {
            Field::ContractNumber => "Contract Number",
            Field::InvoiceDate => "Invoice Date",
            Field::InvoiceNumber => "Invoice Number",
            Field::TaskOrderNumber => "Task Order Number",
            Field::BillingPeriod => "Billing Period",
            Field::TotalThisInvoice => "Total This Invoice",
            Field::TotalBilledToDate => "Total Billed To Date",
            Field::DbePreviouslyBilled => "DBE Previously Billed",
            Field::DbeTotalThisInvoice => "DBE Total This Invoice",
            Field::DbeBilledToDate => "DBE Billed To Date",
            Field::SourceFile => "File",
            Field::DbeBilledToDateLabel => "DBE Billed To Date (Label)",
        }
    }

    /// Whether the field holds a currency figure.
    pub fn is_amount(self) -> bool {
        matches!(
            self,
            Field::TotalThisInvoice
                | Field::TotalBilledToDate
                | Field::DbePreviouslyBilled
                | Field::DbeTotalThisInvoice
                | Field::DbeBilledToDate
                | Field::DbeBilledToDateLabel
        )
    }
}

/// Fields extracted from one invoice document.
///
/// Every field in [`Field::ALL`] is always present. Fields whose rule did
/// not match hold [`NOT_FOUND`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedRecord {
    fields: BTreeMap<Field, String>,
}

impl ExtractedRecord {
    /// Create a record for `source_name` with every other field unset.
    pub fn new(source_name: impl Into<String>) -> Self {
        let mut fields: BTreeMap<Field, String> = Field::ALL
            .iter()
            .map(|f| (*f, NOT_FOUND.to_string()))
            .collect();
        fields.insert(Field::SourceFile, source_name.into());
        Self { fields }
    }

    pub fn get(&self, field: Field) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or(NOT_FOUND)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    pub fn source_name(&self) -> &str {
        self.get(Field::SourceFile)
    }

    pub fn invoice_number(&self) -> &str {
        self.get(Field::InvoiceNumber)
    }

    /// Whether a rule matched for `field`.
    pub fn is_found(&self, field: Field) -> bool {
        self.get(field) != NOT_FOUND
    }

    /// Exported fields that hold the sentinel.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::COLUMNS
            .iter()
            .copied()
            .filter(|f| !self.is_found(*f))
            .collect()
    }

    /// How many exported fields (excluding the file name) were filled.
    pub fn coverage(&self) -> (usize, usize) {
        let extracted: Vec<Field> = Field::COLUMNS
            .iter()
            .copied()
            .filter(|f| *f != Field::SourceFile)
            .collect();
        let filled = extracted.iter().filter(|f| self.is_found(**f)).count();
        (filled, extracted.len())
    }

    /// Values in export column order.
    pub fn row(&self) -> Vec<&str> {
        Field::COLUMNS.iter().map(|f| self.get(*f)).collect()
    }

    /// Parse a currency field (e.g. "1,234.56") into a decimal.
    pub fn amount(&self, field: Field) -> Option<Decimal> {
        if !field.is_amount() || !self.is_found(field) {
            return None;
        }
        let cleaned: String = self.get(field).chars().filter(|c| *c != ',').collect();
        Decimal::from_str(&cleaned).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_record_is_all_sentinel() {
        let record = ExtractedRecord::new("a.pdf");
        assert_eq!(record.source_name(), "a.pdf");
        for field in Field::ALL {
            if field != Field::SourceFile {
                assert_eq!(record.get(field), NOT_FOUND);
            }
        }
        assert_eq!(record.missing_fields().len(), 10);
        assert_eq!(record.coverage(), (0, 10));
    }

    #[test]
    fn test_row_follows_column_order() {
        let mut record = ExtractedRecord::new("inv.pdf");
        record.set(Field::ContractNumber, "C-9");
        record.set(Field::DbeBilledToDate, "300");
        record.set(Field::DbeBilledToDateLabel, "999");

        let row = record.row();
        assert_eq!(row.len(), 11);
        assert_eq!(row[0], "C-9");
        assert_eq!(row[9], "300");
        assert_eq!(row[10], "inv.pdf");
        assert!(!row.contains(&"999"));
    }

    #[test]
    fn test_amount_parsing() {
        let mut record = ExtractedRecord::new("x");
        record.set(Field::TotalThisInvoice, "1,234.56");
        record.set(Field::InvoiceNumber, "123");

        assert_eq!(
            record.amount(Field::TotalThisInvoice),
            Some(Decimal::from_str("1234.56").unwrap())
        );
        assert_eq!(record.amount(Field::TotalBilledToDate), None);
        assert_eq!(record.amount(Field::InvoiceNumber), None);
    }

    #[test]
    fn test_json_uses_snake_case_keys() {
        let mut record = ExtractedRecord::new("x.pdf");
        record.set(Field::InvoiceNumber, "INV-1");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["invoice_number"], "INV-1");
        assert_eq!(json["source_file"], "x.pdf");
        assert_eq!(json["contract_number"], NOT_FOUND);

        let back: ExtractedRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
