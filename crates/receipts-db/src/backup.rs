//! # Backup Export / Import
//!
//! The whole store as one JSON document.
//!
//! ```text
//! {
//!   "receipts": [ Receipt, ... ],      newest first
//!   "settings": { BusinessSettings },
//!   "nextReceipt": 113 | null
//! }
//! ```
//!
//! ## Import Rules
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  1. parse as JSON             ── fail ──► ImportError::Parse         │
//! │  2. decode every record       ── fail ──► ImportError::Shape         │
//! │     (nothing written before both steps succeed)                      │
//! │  3. for each top-level field present and not null:                   │
//! │        receipts     → replace list                                   │
//! │        settings     → replace settings                               │
//! │        nextReceipt  → replace counter                                │
//! │     absent / null fields leave the store as it is                    │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

use receipts_core::{BackupDocument, ImportDocument};
use tracing::info;

use crate::error::{DbResult, ImportError};
use crate::records::Records;
use crate::store::KeyValueStore;

/// Which records an import replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Number of receipts written, if the list was replaced.
    pub receipts: Option<usize>,
    pub settings: bool,
    pub next_receipt: Option<u64>,
}

impl ImportSummary {
    pub fn is_empty(&self) -> bool {
        self.receipts.is_none() && !self.settings && self.next_receipt.is_none()
    }
}

/// Snapshot of the three records as a [`BackupDocument`].
pub async fn snapshot<S: KeyValueStore>(records: &Records<S>) -> BackupDocument {
    BackupDocument {
        receipts: records.load_receipts().await,
        settings: records.load_settings().await,
        next_receipt: records.load_next_receipt().await,
    }
}

/// Pretty-printed backup document. Key order is fixed by the record types.
pub async fn export_all<S: KeyValueStore>(records: &Records<S>) -> DbResult<String> {
    let document = snapshot(records).await;
    let json = serde_json::to_string_pretty(&document)?;

    info!(
        receipts = document.receipts.len(),
        next_receipt = ?document.next_receipt,
        "Exported backup"
    );
    Ok(json)
}

/// Decodes a backup document without touching the store.
pub fn parse_backup(document: &str) -> Result<ImportDocument, ImportError> {
    let value: serde_json::Value = serde_json::from_str(document).map_err(ImportError::Parse)?;
    serde_json::from_value(value).map_err(ImportError::Shape)
}

/// Replaces the records present in `document`.
pub async fn import_all<S: KeyValueStore>(
    records: &Records<S>,
    document: &str,
) -> Result<ImportSummary, ImportError> {
    let parsed = parse_backup(document)?;
    let mut summary = ImportSummary::default();

    if let Some(receipts) = parsed.receipts {
        records.save_receipts(&receipts).await?;
        summary.receipts = Some(receipts.len());
    }
    if let Some(settings) = parsed.settings {
        records.save_settings(&settings).await?;
        summary.settings = true;
    }
    if let Some(next) = parsed.next_receipt {
        records.save_next_receipt(next).await?;
        summary.next_receipt = Some(next);
    }

    info!(
        receipts = ?summary.receipts,
        settings = summary.settings,
        next_receipt = ?summary.next_receipt,
        "Imported backup"
    );
    Ok(summary)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::ReceiptBook;
    use crate::records::{NEXT_RECEIPT_KEY, RECEIPTS_KEY, SETTINGS_KEY};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use receipts_core::{BusinessSettings, LineItem};

    async fn populated() -> (MemoryStore, ReceiptBook<MemoryStore>) {
        let store = MemoryStore::new();
        let book = ReceiptBook::new(store.clone());
        book.save_settings(&BusinessSettings {
            business_name: "Dana's Bakery".into(),
            business_number: "514-22".into(),
            default_receipt_number: Some(40),
            ..Default::default()
        })
        .await
        .unwrap();

        for client in ["Noa", "Avi"] {
            let mut working = book
                .begin_new(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap())
                .await;
            working.receipt.to = client.into();
            working.receipt.line_items = vec![
                LineItem::new("Challah", 2.0, 14.9),
                LineItem::new("Rugelach", 0.5, 33.33),
            ];
            book.save(working).await.unwrap();
        }
        (store, book)
    }

    #[tokio::test]
    async fn test_export_then_import_is_byte_identical() {
        let (store, book) = populated().await;
        let before = store.entries().await;

        let json = export_all(book.records()).await.unwrap();
        let summary = import_all(book.records(), &json).await.unwrap();

        assert_eq!(summary.receipts, Some(2));
        assert!(summary.settings);
        assert_eq!(summary.next_receipt, Some(42));
        assert_eq!(store.entries().await, before);
    }

    #[tokio::test]
    async fn test_export_shape() {
        let (_store, book) = populated().await;
        let json = export_all(book.records()).await.unwrap();

        let keys: Vec<&str> = json
            .lines()
            .filter(|l| l.starts_with("  \""))
            .map(|l| l.trim_start().split('"').nth(1).unwrap_or(""))
            .collect();
        assert_eq!(keys, vec!["receipts", "settings", "nextReceipt"]);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nextReceipt"], 42);
        assert_eq!(value["receipts"][0]["to"], "Avi");
    }

    #[tokio::test]
    async fn test_fresh_export_has_null_counter() {
        let records = Records::new(MemoryStore::new());
        let json = export_all(&records).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["nextReceipt"].is_null());
        assert_eq!(value["receipts"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_partial_import_leaves_receipts_untouched() {
        let (store, book) = populated().await;
        let receipts_before = store.entries().await.get(RECEIPTS_KEY).cloned();
        let counter_before = store.entries().await.get(NEXT_RECEIPT_KEY).cloned();

        let summary = import_all(
            book.records(),
            r#"{"settings":{"businessName":"New Owner","businessNumber":"9"},"nextReceipt":null}"#,
        )
        .await
        .unwrap();

        assert_eq!(summary.receipts, None);
        assert!(summary.settings);
        assert_eq!(summary.next_receipt, None);

        let entries = store.entries().await;
        assert_eq!(entries.get(RECEIPTS_KEY).cloned(), receipts_before);
        assert_eq!(entries.get(NEXT_RECEIPT_KEY).cloned(), counter_before);

        // Replaced wholesale, not merged.
        let settings = book.settings().await;
        assert_eq!(settings.business_name, "New Owner");
        assert_eq!(settings.default_receipt_number, None);
    }

    #[tokio::test]
    async fn test_invalid_json_is_rejected_without_writes() {
        let (store, book) = populated().await;
        let before = store.entries().await;

        let err = import_all(book.records(), "receipts: oops").await.unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
        assert_eq!(store.entries().await, before);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_rejected_without_writes() {
        let (store, book) = populated().await;
        let before = store.entries().await;

        // Valid settings first, malformed receipts second: nothing is written.
        let err = import_all(
            book.records(),
            r#"{"settings":{"businessName":"X"},"receipts":[{"id":3}]}"#,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ImportError::Shape(_)));
        assert_eq!(store.entries().await, before);
    }

    #[tokio::test]
    async fn test_empty_object_changes_nothing() {
        let (store, book) = populated().await;
        let before = store.entries().await;
        let summary = import_all(book.records(), "{}").await.unwrap();
        assert!(summary.is_empty());
        assert_eq!(store.entries().await, before);
    }

    #[tokio::test]
    async fn test_import_into_fresh_store() {
        let (_store, book) = populated().await;
        let json = export_all(book.records()).await.unwrap();

        let target = MemoryStore::new();
        let records = Records::new(target.clone());
        import_all(&records, &json).await.unwrap();

        let entries = target.entries().await;
        assert!(entries.contains_key(RECEIPTS_KEY));
        assert!(entries.contains_key(SETTINGS_KEY));
        assert_eq!(entries.get(NEXT_RECEIPT_KEY).map(String::as_str), Some("42"));
        assert_eq!(records.load_receipts().await.len(), 2);
    }
}
