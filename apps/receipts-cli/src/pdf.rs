//! # PDF Export
//!
//! Turns a rendered print document into `receipt-<n>.pdf` through an
//! external HTML to PDF converter.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  export(html, out/receipt-7.pdf)                                        │
//! │                                                                         │
//! │  1. write html        ──► $TMP/receipt-XXXX.html                        │
//! │  2. reserve scratch   ──► out/.receipt-XXXX.pdf   (same directory)      │
//! │  3. run converter     ──► <cmd> [args] <input.html> <scratch.pdf>       │
//! │  4. success?  rename scratch ──► out/receipt-7.pdf                      │
//! │     failure?  scratch is removed, receipt-7.pdf is never created        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no timeout: the call waits until the converter exits.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// PDF export errors.
#[derive(Debug, Error)]
pub enum PdfError {
    /// The converter command line is empty.
    #[error("No PDF converter configured")]
    NotConfigured,

    /// The converter could not be started.
    #[error("Failed to start PDF converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter ran and reported failure.
    #[error("PDF converter exited with {status}: {stderr}")]
    ConverterFailed { status: String, stderr: String },

    /// Scratch file handling failed.
    #[error("PDF export I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders an HTML document to a PDF file.
#[allow(async_fn_in_trait)]
pub trait PdfExporter {
    /// Writes `destination` only on success.
    async fn export(&self, html: &str, destination: &Path) -> Result<(), PdfError>;
}

/// [`PdfExporter`] backed by an external program such as `wkhtmltopdf`.
#[derive(Debug, Clone)]
pub struct CommandPdfExporter {
    program: String,
    args: Vec<String>,
}

impl CommandPdfExporter {
    /// Parses a command line like `"wkhtmltopdf --quiet"`.
    pub fn from_command_line(command: &str) -> Result<Self, PdfError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(PdfError::NotConfigured)?;
        Ok(CommandPdfExporter {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl PdfExporter for CommandPdfExporter {
    async fn export(&self, html: &str, destination: &Path) -> Result<(), PdfError> {
        let input = tempfile::Builder::new()
            .prefix("receipt-")
            .suffix(".html")
            .tempfile()?;
        tokio::fs::write(input.path(), html).await?;

        let out_dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let scratch = tempfile::Builder::new()
            .prefix(".receipt-")
            .suffix(".pdf")
            .tempfile_in(&out_dir)?;

        debug!(
            program = %self.program,
            input = %input.path().display(),
            output = %scratch.path().display(),
            "Running PDF converter"
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(input.path())
            .arg(scratch.path())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| PdfError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PdfError::ConverterFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        scratch
            .persist(destination)
            .map_err(|e| PdfError::Io(e.error))?;

        info!(path = %destination.display(), "PDF written");
        Ok(())
    }
}
