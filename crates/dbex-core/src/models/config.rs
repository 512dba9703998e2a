//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for dbex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DbexConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// Batch export configuration.
    pub export: ExportConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Page to read text from (1-indexed). Invoices carry every field on the first page.
    pub page: u32,

    /// Minimum number of non-whitespace characters for a page to count as readable.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page: 1,
            min_text_length: 0,
        }
    }
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Literal heading that opens the DBE spending table.
    pub dbe_section_header: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            dbe_section_header: "Task Order DBE Spending Data".to_string(),
        }
    }
}

/// Tabular export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Field delimiter for CSV output.
    pub delimiter: char,

    /// Write a row (source name plus error) for documents that failed to read.
    pub include_failures: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            include_failures: false,
        }
    }
}

impl DbexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check values that serde accepts but extraction cannot use.
    pub fn validate(&self) -> crate::Result<()> {
        if self.pdf.page == 0 {
            return Err(crate::DbexError::Config("pdf.page is 1-indexed".to_string()));
        }
        if self.extraction.dbe_section_header.trim().is_empty() {
            return Err(crate::DbexError::Config(
                "extraction.dbe_section_header must not be empty".to_string(),
            ));
        }
        if !self.export.delimiter.is_ascii() {
            return Err(crate::DbexError::Config(format!(
                "export.delimiter must be a single ASCII character, got {:?}",
                self.export.delimiter
            )));
        }
        Ok(())
    }
}
