//! # Key-Value Repository
//!
//! [`KeyValueStore`] over the `kv_store` table.
//!
//! Each `set` is a single autocommitted upsert, so it is durable as soon as
//! it returns. There is no batching.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::store::KeyValueStore;

/// Repository for raw key-value records.
#[derive(Debug, Clone)]
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    /// Creates a new SqliteKvStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteKvStore { pool }
    }

    /// Lists every stored key, in key order.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }
}

impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        debug!(key, found = value.is_some(), "kv read");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key, bytes = value.len(), "kv write");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_get_set_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();

        assert_eq!(kv.get("receipts_app.settings").await.unwrap(), None);

        kv.set("receipts_app.settings", "{}").await.unwrap();
        kv.set("receipts_app.settings", r#"{"businessName":"X"}"#)
            .await
            .unwrap();

        assert_eq!(
            kv.get("receipts_app.settings").await.unwrap().as_deref(),
            Some(r#"{"businessName":"X"}"#)
        );
        assert_eq!(kv.keys().await.unwrap(), vec!["receipts_app.settings"]);
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipts.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.kv().set("receipts_app.next_receipt", "7").await.unwrap();
        db.close().await;

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(
            db.kv().get("receipts_app.next_receipt").await.unwrap().as_deref(),
            Some("7")
        );
    }
}
