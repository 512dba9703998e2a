//! Page text normalization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Replace non-breaking spaces and collapse every whitespace run (line breaks
/// included) into one space. Leading and trailing spaces are kept.
pub fn normalize(text: &str) -> String {
    let text = text.replace('\u{00a0}', " ");
    WHITESPACE_RUN.replace_all(&text, " ").into_owned()
}
