//! # receipts-db: Persistent Store for Receiptly
//!
//! This crate owns the durable copies of the three records (receipt list,
//! business settings, next-receipt counter) and the operations that write
//! them: the save transaction and backup import.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Receiptly Data Flow                              │
//! │                                                                         │
//! │  CLI command (receipt new / backup import / ...)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   receipts-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌───────────────┐    │   │
//! │  │   │  ReceiptBook  │   │    backup     │   │   Records     │    │   │
//! │  │   │  save / edit  │──►│ export/import │──►│ soft-fail I/O │    │   │
//! │  │   └───────────────┘   └───────────────┘   └───────┬───────┘    │   │
//! │  │                                                   │            │   │
//! │  │                         KeyValueStore ◄───────────┘            │   │
//! │  │                     ┌─────────┴─────────┐                      │   │
//! │  │               SqliteKvStore        MemoryStore                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite file: <data_dir>/receipts.db  (kv_store table)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `KeyValueStore` seam and the in-memory store
//! - [`records`] - Typed records with soft-fail decoding
//! - [`book`] - Receipt workflow and the save transaction
//! - [`backup`] - Backup export and import
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQLite repository implementations
//! - [`error`] - Store and import error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use receipts_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("receipts.db")).await?;
//! let book = db.book();
//!
//! let mut working = book.begin_new(today).await;
//! working.receipt.to = "Noa".into();
//! let outcome = book.save(working).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod book;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod records;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use backup::{export_all, import_all, ImportSummary};
pub use book::{ReceiptBook, SaveOutcome};
pub use error::{DbError, DbResult, ImportError};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig, StoreLocation};
pub use records::Records;
pub use repository::kv::SqliteKvStore;
pub use store::{KeyValueStore, MemoryStore};
