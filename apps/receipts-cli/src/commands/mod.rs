//! # Commands Module
//!
//! One module per command group. Every handler takes the shared
//! [`AppContext`] and returns the text to print on success.
//!
//! ```text
//! receipts settings show | set | signature
//! receipts receipt  next | new | edit | list | show | print | pdf
//! receipts backup   export | import
//! receipts status
//! ```

pub mod backup;
pub mod receipt;
pub mod settings;

use chrono::{NaiveDate, Utc};
use receipts_db::{KeyValueStore, ReceiptBook};

use crate::pdf::PdfExporter;
use crate::state::AppConfig;

/// Everything a command handler needs.
///
/// Generic over the store and the PDF exporter so handlers run unchanged
/// against `MemoryStore` and a stand-in converter.
pub struct AppContext<S, P> {
    pub book: ReceiptBook<S>,
    pub config: AppConfig,
    pub pdf: P,
    /// Date used for new receipts and backup names (UTC).
    pub today: NaiveDate,
    /// Print records as JSON instead of text.
    pub json: bool,
}

impl<S: KeyValueStore, P: PdfExporter> AppContext<S, P> {
    pub fn new(book: ReceiptBook<S>, config: AppConfig, pdf: P) -> Self {
        AppContext {
            book,
            config,
            pdf,
            today: Utc::now().date_naive(),
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;

    use receipts_db::MemoryStore;
    use tempfile::TempDir;

    use super::AppContext;
    use crate::pdf::{PdfError, PdfExporter};
    use crate::state::AppConfig;

    /// Copies the HTML to the destination, or fails like a broken converter.
    pub struct StubPdf {
        pub fail: bool,
    }

    impl PdfExporter for StubPdf {
        async fn export(&self, html: &str, destination: &Path) -> Result<(), PdfError> {
            if self.fail {
                return Err(PdfError::ConverterFailed {
                    status: "exit status: 1".into(),
                    stderr: "stub failure".into(),
                });
            }
            tokio::fs::write(destination, html).await?;
            Ok(())
        }
    }

    pub fn context_with(fail_pdf: bool) -> (AppContext<MemoryStore, StubPdf>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            output_dir: dir.path().join("out"),
            ..AppConfig::default()
        };
        let book = receipts_db::ReceiptBook::new(MemoryStore::default());
        let mut ctx = AppContext::new(book, config, StubPdf { fail: fail_pdf });
        ctx.today = chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        (ctx, dir)
    }

    pub fn context() -> (AppContext<MemoryStore, StubPdf>, TempDir) {
        context_with(false)
    }
}
