//! Regex patterns for task-order invoice fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Scalar fields: label, optional whitespace, colon, first token
    pub static ref CONTRACT_NUMBER: Regex = Regex::new(
        r"Contract\s*Number:\s*(\S+)"
    ).unwrap();

    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"Invoice\s*Date:\s*([\d/]+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"Invoice\s*Number:\s*(\S+)"
    ).unwrap();

    pub static ref TASK_ORDER_NUMBER: Regex = Regex::new(
        r"Task\s*Order\s*Number:\s*(\S+)"
    ).unwrap();

    pub static ref BILLING_PERIOD: Regex = Regex::new(
        r"Billing\s*Period:\s*([\d/]+\s*-\s*[\d/]+)"
    ).unwrap();

    // Currency fields. Amounts may be split by stray spaces in the page text.
    pub static ref TOTAL_THIS_INVOICE: Regex = Regex::new(
        r"(?s)TOTAL\s*THIS\s*INVOICE.*?\$\s*([\d\s,\.]+)"
    ).unwrap();

    pub static ref TOTAL_BILLED_TO_DATE: Regex = Regex::new(
        r"(?i)Total\s*Billed\s*To\s*Date\s*:\s*\$\s*([\d\s,\.]+)"
    ).unwrap();

    pub static ref DBE_BILLED_TO_DATE: Regex = Regex::new(
        r"DBE\s*Billed\s*To\s*Date:\s*([\d\s,\.]+)"
    ).unwrap();

    // Any dollar amount, used inside the DBE spending section
    pub static ref DOLLAR_AMOUNT: Regex = Regex::new(
        r"\$\s*([\d\s,\.]+)"
    ).unwrap();

    pub static ref INNER_WHITESPACE: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}
