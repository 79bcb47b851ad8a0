//! # Key-Value Store
//!
//! The storage seam. Everything above this trait sees string keys and
//! string values; nothing above it knows whether they live in SQLite or in
//! memory.
//!
//! ```text
//! ┌───────────────────────┐
//! │  Records / ReceiptBook│   typed, soft-fail decode
//! └───────────┬───────────┘
//!             │ get(key) / set(key, value)
//!             ▼
//! ┌───────────────────────┐     ┌───────────────────────┐
//! │    SqliteKvStore      │     │     MemoryStore       │
//! │  (repository/kv.rs)   │     │  (tests, fakes)       │
//! └───────────────────────┘     └───────────────────────┘
//! ```
//!
//! ## Contract
//! - `get` of a key that was never set is `Ok(None)`.
//! - `set` overwrites the whole value and is durable when it returns.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::DbResult;

/// A durable string-to-string map.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Reads the raw value stored under `key`.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> DbResult<()>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// A [`KeyValueStore`] kept in process memory.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// the code under test wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every stored entry, ordered by key.
    pub async fn entries(&self) -> BTreeMap<String, String> {
        self.entries.lock().await.clone()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = self.entries.lock().await.get(key).cloned();
        debug!(key, found = value.is_some(), "memory store read");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key, bytes = value.len(), "memory store write");
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
