//! Sequential batch processing with per-document failure isolation.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::invoice::{InvoiceFieldExtractor, InvoiceNumberTally};
use crate::models::record::{ExtractedRecord, Field};
use crate::source::TextSource;

/// A document that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    /// Source name (file name) of the document.
    pub source: String,
    /// Error message.
    pub error: String,
}

/// Everything a finished batch produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Records in input order.
    pub records: Vec<ExtractedRecord>,
    /// Documents that failed to read, in input order.
    pub failures: Vec<DocumentFailure>,
    /// Invoice numbers seen more than once, each listed once.
    pub duplicates: Vec<String>,
    /// Whether the batch was stopped before every document was processed.
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    /// Number of documents attempted.
    pub fn processed(&self) -> usize {
        self.records.len() + self.failures.len()
    }

    /// True when at least one document was attempted and none succeeded.
    pub fn all_failed(&self) -> bool {
        self.records.is_empty() && !self.failures.is_empty()
    }
}

/// State of one batch run: the record list, the failure list and the
/// invoice-number tally. Documents are processed one at a time, in the order
/// they are handed in.
pub struct Batch<'a> {
    extractor: &'a InvoiceFieldExtractor,
    tally: InvoiceNumberTally,
    records: Vec<ExtractedRecord>,
    failures: Vec<DocumentFailure>,
    cancelled: bool,
    started_at: DateTime<Utc>,
}

impl<'a> Batch<'a> {
    /// Start a batch with an empty tally.
    pub fn new(extractor: &'a InvoiceFieldExtractor) -> Self {
        Self {
            extractor,
            tally: InvoiceNumberTally::new(),
            records: Vec::new(),
            failures: Vec::new(),
            cancelled: false,
            started_at: Utc::now(),
        }
    }

    /// Read, extract and tally one document. A read failure is recorded and
    /// returned; it does not end the batch.
    pub fn process<S>(&mut self, source: &S) -> Result<&ExtractedRecord, &DocumentFailure>
    where
        S: TextSource + ?Sized,
    {
        let name = source.source_name();
        let span = info_span!("document", source = %name);
        let _guard = span.enter();

        match source.load_text() {
            Ok(text) => {
                debug!(chars = text.len(), "Loaded page text");
                let record = self.extractor.extract(&text, name);
                self.tally.record(record.invoice_number());
                info!(
                    invoice_number = record.invoice_number(),
                    total_this_invoice = record.get(Field::TotalThisInvoice),
                    "Extraction result"
                );
                self.records.push(record);
                Ok(&self.records[self.records.len() - 1])
            }
            Err(e) => {
                warn!(error = %e, "Failed to read document");
                self.failures.push(DocumentFailure {
                    source: name.to_string(),
                    error: e.to_string(),
                });
                Err(&self.failures[self.failures.len() - 1])
            }
        }
    }

    /// Mark the batch as stopped early.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn records(&self) -> &[ExtractedRecord] {
        &self.records
    }

    pub fn tally(&self) -> &InvoiceNumberTally {
        &self.tally
    }

    /// Close the batch and hand back its report.
    pub fn finish(self) -> BatchReport {
        let report = BatchReport {
            records: self.records,
            failures: self.failures,
            duplicates: self.tally.into_duplicates(),
            cancelled: self.cancelled,
            started_at: self.started_at,
            finished_at: Utc::now(),
        };
        info!(
            records = report.records.len(),
            failures = report.failures.len(),
            duplicates = report.duplicates.len(),
            cancelled = report.cancelled,
            "Batch complete"
        );
        report
    }

    /// Process `sources` in order. When `stop` is set, it is checked before
    /// each document; once it reads `true` the remaining documents are skipped.
    pub fn run<'s, I, S>(
        extractor: &'a InvoiceFieldExtractor,
        sources: I,
        stop: Option<&AtomicBool>,
    ) -> BatchReport
    where
        I: IntoIterator<Item = &'s S>,
        S: TextSource + ?Sized + 's,
    {
        Self::run_with(extractor, sources, stop, |_| {})
    }

    /// Like [`Batch::run`], calling `on_document` with each outcome as soon as
    /// the document is done. The callback may set `stop` to end the batch early.
    pub fn run_with<'s, I, S, F>(
        extractor: &'a InvoiceFieldExtractor,
        sources: I,
        stop: Option<&AtomicBool>,
        mut on_document: F,
    ) -> BatchReport
    where
        I: IntoIterator<Item = &'s S>,
        S: TextSource + ?Sized + 's,
        F: FnMut(Result<&ExtractedRecord, &DocumentFailure>),
    {
        let mut batch = Batch::new(extractor);
        for source in sources {
            if stop.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                info!("Batch stopped before {}", source.source_name());
                batch.cancel();
                break;
            }
            on_document(batch.process(source));
        }
        batch.finish()
    }
}
