//! # Store Connection
//!
//! Opens the SQLite file that backs the key-value store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new(path) / DbConfig::in_memory()                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config)                                                  │
//! │       ├── file:   WAL journal, synchronous = FULL, busy timeout         │
//! │       ├── memory: one pinned connection (the data lives in it)          │
//! │       └── migrate_on_open ──► migrations::run_migrations                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.kv()    ──► SqliteKvStore                                           │
//! │  db.book()  ──► ReceiptBook<SqliteKvStore>                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `synchronous = FULL` makes every `set` durable once it returns.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::book::ReceiptBook;
use crate::error::{DbError, DbResult};
use crate::migrations::{self, MigrationStatus};
use crate::repository::kv::SqliteKvStore;

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A SQLite file, created on first open.
    File(PathBuf),
    /// A private in-memory database, gone when the `Database` is closed.
    Memory,
}

/// How to open the store.
///
/// ```rust,ignore
/// let config = DbConfig::new("/home/dana/.local/share/receipts/receipts.db")
///     .busy_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: StoreLocation,

    /// Pool size for file stores. One writer is assumed; the second
    /// connection serves `status` reads.
    pub max_connections: u32,

    /// How long to wait for a connection from the pool.
    pub acquire_timeout: Duration,

    /// How long SQLite retries on a locked file before failing.
    pub busy_timeout: Duration,

    /// Apply pending migrations in [`Database::new`].
    pub migrate_on_open: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: StoreLocation::File(path.into()),
            max_connections: 2,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            migrate_on_open: true,
        }
    }

    /// A throwaway store for tests.
    pub fn in_memory() -> Self {
        DbConfig {
            location: StoreLocation::Memory,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(1),
            migrate_on_open: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn migrate_on_open(mut self, migrate: bool) -> Self {
        self.migrate_on_open = migrate;
        self
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = SqliteConnectOptions::new().busy_timeout(self.busy_timeout);
        match &self.location {
            StoreLocation::File(path) => options
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Full),
            StoreLocation::Memory => options.in_memory(true),
        }
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new().acquire_timeout(self.acquire_timeout);
        match self.location {
            StoreLocation::File(_) => options.max_connections(self.max_connections),
            // Closing the only connection would drop the data
            StoreLocation::Memory => options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// An open store.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    location: StoreLocation,
}

impl Database {
    /// Opens (and creates, for a file) the store described by `config`.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let db = Database {
            pool,
            location: config.location,
        };
        info!(location = ?db.location, "Store opened");

        if config.migrate_on_open {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub async fn migration_status(&self) -> DbResult<MigrationStatus> {
        migrations::migration_status(&self.pool).await
    }

    /// The store file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            StoreLocation::File(path) => Some(path),
            StoreLocation::Memory => None,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Raw `get` / `set` access to the three records.
    pub fn kv(&self) -> SqliteKvStore {
        SqliteKvStore::new(self.pool.clone())
    }

    pub fn book(&self) -> ReceiptBook<SqliteKvStore> {
        ReceiptBook::new(self.kv())
    }

    /// Closes every connection. Later operations fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// True when a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
        assert_eq!(db.path(), None);
    }

    #[tokio::test]
    async fn test_file_store_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipts.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), Some(path.as_path()));
        db.close().await;
    }

    #[tokio::test]
    async fn test_closed_store_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("receipts.db")
            .max_connections(0)
            .busy_timeout(Duration::from_secs(9))
            .migrate_on_open(false);

        assert_eq!(config.location, StoreLocation::File("receipts.db".into()));
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.busy_timeout, Duration::from_secs(9));
        assert!(!config.migrate_on_open);
    }
}
