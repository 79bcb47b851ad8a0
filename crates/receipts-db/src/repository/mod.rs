//! # Repository Module
//!
//! SQLite implementations of the store seams.
//!
//! ```text
//! ReceiptBook / Records
//!       │
//!       │  KeyValueStore::get / set
//!       ▼
//! SqliteKvStore ──► kv_store table
//! ```

pub mod kv;
