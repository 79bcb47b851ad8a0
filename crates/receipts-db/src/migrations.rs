//! # Schema Migrations
//!
//! The store schema is one table, `kv_store`. Migrations are embedded at
//! compile time from `migrations/sqlite/` at the workspace root and applied
//! when a [`Database`](crate::Database) opens.
//!
//! ```text
//! migrations/sqlite/
//! └── 001_initial_schema.sql   kv_store(key, value, updated_at)
//! ```
//!
//! New schema changes go in a new `NNN_description.sql` file. Applied files
//! are never edited.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far the schema of an open store has been migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migrations compiled into this binary.
    pub embedded: usize,
    /// Migrations recorded as applied in the store.
    pub applied: usize,
}

impl MigrationStatus {
    pub fn is_current(&self) -> bool {
        self.applied >= self.embedded
    }
}

/// Applies every pending migration. Safe to call on an up-to-date store.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(embedded = MIGRATOR.migrations.len(), "Store schema up to date");
    Ok(())
}

/// Reads the migration bookkeeping table. A store that was never migrated
/// reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let applied = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1",
    )
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| {
        debug!(error = %e, "No migration table");
        0
    });

    Ok(MigrationStatus {
        embedded: MIGRATOR.migrations.len(),
        applied: usize::try_from(applied).unwrap_or(0),
    })
}
