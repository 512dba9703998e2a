//! Core library for task-order invoice field extraction.
//!
//! This crate provides:
//! - PDF and plain-text document sources
//! - Whitespace normalization of page text
//! - A declarative rule table for scalar and currency fields
//! - DBE spending section extraction
//! - Batch processing with duplicate invoice-number detection

pub mod batch;
pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;
pub mod source;

pub use batch::{Batch, BatchReport, DocumentFailure};
pub use error::{DbexError, Result};
pub use invoice::{InvoiceExtractor, InvoiceFieldExtractor, InvoiceNumberTally};
pub use models::config::DbexConfig;
pub use models::record::{ExtractedRecord, Field, NOT_FOUND};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use source::{source_for_path, InMemorySource, PdfSource, TextFileSource, TextSource};
