//! # CLI Error Type
//!
//! The one error type every command returns.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Receiptly                              │
//! │                                                                         │
//! │  command handler                                                       │
//! │  CliResult<String>                                                     │
//! │         │                                                               │
//! │         ├── CoreError::NotSaveEligible ──► NOT_SAVE_ELIGIBLE            │
//! │         ├── ImportError::Parse / Shape ──► IMPORT_FAILED                │
//! │         ├── PdfError (any)             ──► PDF_FAILED  (generic text)   │
//! │         ├── DbError (store fault)      ──► DATABASE_ERROR               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  main: "error: <message>" on stderr, exit code by ErrorCode            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Details that don't help the user (SQL messages, converter stderr) are
//! logged with `tracing::error!` and replaced by a short message.

use receipts_core::{CoreError, ValidationError};
use receipts_db::{DbError, ImportError};
use serde::Serialize;
use std::process::ExitCode;

use crate::pdf::PdfError;
use crate::signature::SignatureError;

/// Error returned from CLI commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Receipt id not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// The save gate refused the receipt
    NotSaveEligible,

    /// Backup document rejected
    ImportFailed,

    /// PDF converter failed
    PdfFailed,

    /// Store operation failed
    DatabaseError,

    /// Bad configuration
    ConfigError,

    /// File system error
    Io,

    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Process exit status for this code.
    pub fn exit_status(self) -> u8 {
        match self {
            ErrorCode::ValidationError | ErrorCode::NotSaveEligible => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::ImportFailed => 4,
            ErrorCode::PdfFailed => 5,
            ErrorCode::ConfigError => 6,
            ErrorCode::DatabaseError | ErrorCode::Io | ErrorCode::Internal => 1,
        }
    }
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ConfigError, message)
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code.exit_status())
    }
}

/// Converts store errors to CLI errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(e) => e.into(),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Could not open the receipts store")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Receipts store migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Store operation failed")
            }
            DbError::PoolExhausted => {
                CliError::new(ErrorCode::DatabaseError, "Receipts store is busy")
            }
            DbError::Serialization(e) => {
                tracing::error!("Record encoding failed: {}", e);
                CliError::new(ErrorCode::Internal, "Could not encode record")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal store error: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Store operation failed")
            }
        }
    }
}

/// Converts core errors to CLI errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotSaveEligible(_) => {
                CliError::new(ErrorCode::NotSaveEligible, err.to_string())
            }
            CoreError::ReceiptNotFound(id) => CliError::not_found("Receipt", &id),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<ImportError> for CliError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Store(e) => e.into(),
            other => CliError::new(ErrorCode::ImportFailed, other.to_string()),
        }
    }
}

impl From<PdfError> for CliError {
    fn from(err: PdfError) -> Self {
        tracing::error!(error = %err, "PDF export failed");
        CliError::new(ErrorCode::PdfFailed, "PDF generation failed")
    }
}

impl From<SignatureError> for CliError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::Io(e) => e.into(),
            other => CliError::validation(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(ErrorCode::Io, err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::new(ErrorCode::Internal, err.to_string())
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for command handlers.
pub type CliResult<T> = Result<T, CliError>;
