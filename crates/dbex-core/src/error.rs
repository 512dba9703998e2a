//! Error types for the dbex-core library.

use thiserror::Error;

/// Main error type for the dbex library.
#[derive(Error, Debug)]
pub enum DbexError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document type is not one we can read text from.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The page text is shorter than the configured `pdf.min_text_length`.
    #[error("too little text extracted from {0}")]
    EmptyDocument(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Result type for the dbex library.
pub type Result<T> = std::result::Result<T, DbexError>;
