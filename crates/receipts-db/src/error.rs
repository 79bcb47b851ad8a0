//! # Store Error Types
//!
//! Error types for store operations and backup import.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  READS of a record                                                     │
//! │       corrupt / missing value ──► default value + warn!  (no error)    │
//! │                                                                         │
//! │  WRITES and connection faults                                          │
//! │       sqlx::Error ──► DbError ──► CliError ──► stderr                  │
//! │                                                                         │
//! │  IMPORT of a backup document                                           │
//! │       not JSON     ──► ImportError::Parse  (store untouched)           │
//! │       wrong shape  ──► ImportError::Shape  (store untouched)           │
//! │       write failed ──► ImportError::Store                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use receipts_core::CoreError;
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The store file could not be opened or created, or the store is
    /// already closed.
    #[error("Could not open store: {0}")]
    ConnectionFailed(String),

    #[error("Store schema upgrade failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement.
    #[error("Store statement failed: {0}")]
    QueryFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Store is busy")]
    PoolExhausted,

    /// A record could not be encoded for writing.
    #[error("Could not encode record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A business rule refused the operation (save gate, unknown receipt).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Internal store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

/// ```text
/// sqlx::Error::Database      → QueryFailed      (SQLite message only)
/// sqlx::Error::PoolTimedOut  → PoolExhausted
/// sqlx::Error::PoolClosed    → ConnectionFailed
/// anything else              → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(e) => DbError::QueryFailed(e.message().to_owned()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("store is closed".to_owned()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Import Error
// =============================================================================

/// A backup document was rejected or could not be written.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The document is not valid JSON.
    #[error("Backup file is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The document is JSON but its records have the wrong shape.
    #[error("Backup file has an unexpected structure: {0}")]
    Shape(#[source] serde_json::Error),

    /// Writing the imported records failed.
    #[error("Failed to write imported data: {0}")]
    Store(#[from] DbError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use receipts_core::Ineligible;

    #[test]
    fn test_core_error_is_transparent() {
        let err: DbError = CoreError::NotSaveEligible(vec![Ineligible::MissingDate]).into();
        assert_eq!(err.to_string(), "Receipt cannot be saved: a date is required");
    }

    #[test]
    fn test_pool_closed_maps_to_connection_failed() {
        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }
}
