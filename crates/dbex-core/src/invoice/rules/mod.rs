//! Declarative rule table for independent invoice fields.
//!
//! Each rule is applied once to the normalized page text. Rules do not see
//! each other's results; the DBE spending section is handled separately by
//! [`dbe`] because its values depend on position, not on a label.

pub mod dbe;
pub mod patterns;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::record::Field;
use patterns::*;

/// Post-processing applied to a rule's capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Use the capture as is.
    Keep,
    /// Remove all whitespace (amounts broken up by the text layer).
    StripWhitespace,
}

impl PostProcess {
    pub fn apply(self, raw: &str) -> String {
        match self {
            PostProcess::Keep => raw.to_string(),
            PostProcess::StripWhitespace => strip_whitespace(raw),
        }
    }
}

/// One entry of the rule table.
#[derive(Debug)]
pub struct FieldRule {
    /// Field the rule fills.
    pub field: Field,
    /// Pattern anchored on the field's label.
    pub pattern: &'static Regex,
    /// Capture group holding the value.
    pub group: usize,
    /// Clean-up applied to the capture.
    pub post: PostProcess,
}

impl FieldRule {
    /// Apply the rule to normalized text. Returns `None` on no match, or when
    /// post-processing leaves nothing behind.
    pub fn apply(&self, text: &str) -> Option<String> {
        let caps = self.pattern.captures(text)?;
        let raw = caps.get(self.group)?.as_str();
        let value = self.post.apply(raw);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

lazy_static! {
    static ref FIELD_RULES: Vec<FieldRule> = vec![
        FieldRule { field: Field::ContractNumber, pattern: &*CONTRACT_NUMBER, group: 1, post: PostProcess::Keep },
        FieldRule { field: Field::InvoiceDate, pattern: &*INVOICE_DATE, group: 1, post: PostProcess::Keep },
        FieldRule { field: Field::InvoiceNumber, pattern: &*INVOICE_NUMBER, group: 1, post: PostProcess::Keep },
        FieldRule { field: Field::TaskOrderNumber, pattern: &*TASK_ORDER_NUMBER, group: 1, post: PostProcess::Keep },
        FieldRule { field: Field::BillingPeriod, pattern: &*BILLING_PERIOD, group: 1, post: PostProcess::Keep },
        FieldRule { field: Field::TotalThisInvoice, pattern: &*TOTAL_THIS_INVOICE, group: 1, post: PostProcess::StripWhitespace },
        FieldRule { field: Field::TotalBilledToDate, pattern: &*TOTAL_BILLED_TO_DATE, group: 1, post: PostProcess::StripWhitespace },
        FieldRule { field: Field::DbeBilledToDateLabel, pattern: &*DBE_BILLED_TO_DATE, group: 1, post: PostProcess::StripWhitespace },
    ];
}

/// The fixed rule table, in application order.
pub fn field_rules() -> &'static [FieldRule] {
    &FIELD_RULES
}

/// Remove every whitespace character from an amount capture.
pub fn strip_whitespace(raw: &str) -> String {
    INNER_WHITESPACE.replace_all(raw, "").into_owned()
}
