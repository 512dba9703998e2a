//! Document sources: anything that can hand the extractor one page of text.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DbexError, Result};
use crate::models::config::PdfConfig;
use crate::pdf::{PdfExtractor, PdfProcessor};

/// A document the batch can read page text from.
pub trait TextSource {
    /// Name recorded in the File column.
    fn source_name(&self) -> &str;

    /// Read the page text. Failures are per document and never retried.
    fn load_text(&self) -> Result<String>;
}

impl<T: TextSource + ?Sized> TextSource for Box<T> {
    fn source_name(&self) -> &str {
        (**self).source_name()
    }

    fn load_text(&self) -> Result<String> {
        (**self).load_text()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Reject a page with fewer than `min_text_length` non-whitespace characters.
/// A threshold of 0 accepts blank pages; they extract to an all-sentinel record.
fn check_text(name: &str, text: String, min_text_length: usize) -> Result<String> {
    let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
    if meaningful < min_text_length {
        debug!(meaningful, min_text_length, "Page text below threshold");
        return Err(DbexError::EmptyDocument(name.to_string()));
    }
    Ok(text)
}

/// One page of a PDF file.
#[derive(Debug, Clone)]
pub struct PdfSource {
    path: PathBuf,
    name: String,
    page: u32,
    min_text_length: usize,
}

impl PdfSource {
    pub fn new(path: impl Into<PathBuf>, config: &PdfConfig) -> Self {
        let path = path.into();
        Self {
            name: file_name(&path),
            path,
            page: config.page,
            min_text_length: config.min_text_length,
        }
    }
}

impl TextSource for PdfSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn load_text(&self) -> Result<String> {
        let data = fs::read(&self.path)?;
        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;

        debug!(
            "PDF {} has {} pages, reading page {}",
            self.name,
            extractor.page_count(),
            self.page
        );
        let text = extractor.extract_page_text(self.page)?;
        check_text(&self.name, text, self.min_text_length)
    }
}

/// A UTF-8 file holding page text that was extracted elsewhere.
#[derive(Debug, Clone)]
pub struct TextFileSource {
    path: PathBuf,
    name: String,
}

impl TextFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: file_name(&path),
            path,
        }
    }
}

impl TextSource for TextFileSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn load_text(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }
}

/// Page text already held by the caller.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    name: String,
    text: String,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl TextSource for InMemorySource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn load_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// A path whose extension is not supported. Reported when the batch tries to read it.
#[derive(Debug, Clone)]
struct UnsupportedSource {
    name: String,
    extension: String,
}

impl TextSource for UnsupportedSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn load_text(&self) -> Result<String> {
        Err(DbexError::UnsupportedFormat(self.extension.clone()))
    }
}

/// Pick a source for `path` by extension (`pdf` or `txt`). Other extensions
/// yield a source whose read fails, so the batch reports them like any other
/// unreadable document.
pub fn source_for_path(path: &Path, config: &PdfConfig) -> Box<dyn TextSource> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => Box::new(PdfSource::new(path, config)),
        "txt" => Box::new(TextFileSource::new(path)),
        _ => Box::new(UnsupportedSource {
            name: file_name(path),
            extension,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;
    use crate::pdf::sample_pdf;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page1.txt");
        fs::write(&path, "Invoice Number: X-1").unwrap();

        let source = source_for_path(&path, &PdfConfig::default());
        assert_eq!(source.source_name(), "page1.txt");
        assert_eq!(source.load_text().unwrap(), "Invoice Number: X-1");
    }

    #[test]
    fn test_blank_text_file_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        fs::write(&path, " \n\t ").unwrap();

        assert_eq!(TextFileSource::new(&path).load_text().unwrap(), " \n\t ");
    }

    #[test]
    fn test_check_text_threshold() {
        assert_eq!(check_text("a.pdf", "  ".to_string(), 0).unwrap(), "  ");
        assert!(check_text("a.pdf", "abc".to_string(), 3).is_ok());
        assert!(matches!(
            check_text("a.pdf", " a b ".to_string(), 3),
            Err(DbexError::EmptyDocument(name)) if name == "a.pdf"
        ));
    }

    #[test]
    fn test_pdf_source_reads_first_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        fs::write(&path, sample_pdf("Invoice Number: INV-7")).unwrap();

        let source = source_for_path(&path, &PdfConfig::default());
        assert_eq!(source.source_name(), "invoice.pdf");
        let text = source.load_text().unwrap();
        assert!(text.contains("INV-7"), "unexpected page text: {text:?}");
    }

    #[test]
    fn test_pdf_source_page_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        fs::write(&path, sample_pdf("Invoice Number: INV-7")).unwrap();

        let config = PdfConfig {
            page: 2,
            ..PdfConfig::default()
        };
        let result = PdfSource::new(&path, &config).load_text();
        assert!(matches!(result, Err(DbexError::Pdf(PdfError::InvalidPage(2)))));
    }

    #[test]
    fn test_pdf_source_min_text_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.pdf");
        fs::write(&path, sample_pdf("INV-7")).unwrap();

        let config = PdfConfig {
            min_text_length: 500,
            ..PdfConfig::default()
        };
        let result = PdfSource::new(&path, &config).load_text();
        assert!(matches!(result, Err(DbexError::EmptyDocument(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let source = source_for_path(Path::new("/tmp/scan.png"), &PdfConfig::default());
        assert_eq!(source.source_name(), "scan.png");
        assert!(matches!(source.load_text(), Err(DbexError::UnsupportedFormat(ext)) if ext == "png"));
    }

    #[test]
    fn test_missing_pdf_is_io_error() {
        let source = PdfSource::new("/nonexistent/dir/a.pdf", &PdfConfig::default());
        assert_eq!(source.source_name(), "a.pdf");
        assert!(matches!(source.load_text(), Err(DbexError::Io(_))));
    }

    #[test]
    fn test_corrupt_pdf_is_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.pdf");
        fs::write(&path, b"%PDF-1.4 not really").unwrap();

        let result = PdfSource::new(&path, &PdfConfig::default()).load_text();
        assert!(matches!(result, Err(DbexError::Pdf(_))));
    }
}
