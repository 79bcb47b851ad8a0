//! # Receipt Book
//!
//! The receipt workflow over the store: open a working copy, save it, look
//! up history.
//!
//! ## Save Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(working)                                                          │
//! │                                                                         │
//! │  1. load settings                                                       │
//! │  2. save gate ── refused? ──► CoreError::NotSaveEligible (no writes)    │
//! │  3. refresh line totals, stamp settings snapshot + signature            │
//! │  4. apply_save(list) ── unknown id on edit? ──► ReceiptNotFound         │
//! │  5. WRITE receipts list                                                 │
//! │  6. new receipt only: WRITE counter = max(n + 1, prior, default)        │
//! │                                                                         │
//! │  The list is written first. A failure between 5 and 6 leaves a saved   │
//! │  receipt and a stale counter, never a counter ahead of the list.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One logical writer is assumed. Calls are not locked against each other.

use chrono::NaiveDate;
use receipts_core::filter::ReceiptFilter;
use receipts_core::ledger::{apply_save, Origin, WorkingReceipt};
use receipts_core::numbering::{advance_counter_after_save, next_receipt_number_for};
use receipts_core::validation::check_save_eligibility;
use receipts_core::{BusinessSettings, CoreError, Receipt};
use tracing::info;

use crate::error::DbResult;
use crate::records::Records;
use crate::store::KeyValueStore;

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    /// The receipt as stored.
    pub receipt: Receipt,
    pub was_edit: bool,
    /// The counter written by this save; `None` for edits.
    pub next_receipt: Option<u64>,
}

/// Receipt operations over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct ReceiptBook<S> {
    records: Records<S>,
}

impl<S: KeyValueStore> ReceiptBook<S> {
    pub fn new(store: S) -> Self {
        ReceiptBook {
            records: Records::new(store),
        }
    }

    /// Typed record access (settings, counter, raw list).
    pub fn records(&self) -> &Records<S> {
        &self.records
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub async fn settings(&self) -> BusinessSettings {
        self.records.load_settings().await
    }

    /// Replaces the settings record wholesale.
    ///
    /// Receipts saved earlier keep their own snapshot.
    pub async fn save_settings(&self, settings: &BusinessSettings) -> DbResult<()> {
        self.records.save_settings(settings).await?;
        info!(business = %settings.business_name, "Settings saved");
        Ok(())
    }

    // =========================================================================
    // Working Copies
    // =========================================================================

    /// The number a new receipt would get right now.
    pub async fn next_receipt_number(&self) -> u64 {
        let counter = self.records.load_next_receipt().await;
        let settings = self.records.load_settings().await;
        next_receipt_number_for(None, counter, &settings)
    }

    /// A new working receipt dated `today`.
    pub async fn begin_new(&self, today: NaiveDate) -> WorkingReceipt {
        let number = self.next_receipt_number().await;
        WorkingReceipt::new(Receipt::draft(number, today))
    }

    /// A working copy of a stored receipt.
    pub async fn begin_edit(&self, id: &str) -> DbResult<WorkingReceipt> {
        let receipt = self
            .find_by_id(id)
            .await
            .ok_or_else(|| CoreError::ReceiptNotFound(id.to_string()))?;
        Ok(WorkingReceipt::existing(receipt))
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Persists a working receipt. See the module docs for the write order.
    pub async fn save(&self, working: WorkingReceipt) -> DbResult<SaveOutcome> {
        let WorkingReceipt {
            mut receipt,
            origin,
        } = working;

        let settings = self.records.load_settings().await;
        check_save_eligibility(&receipt, &settings).map_err(CoreError::NotSaveEligible)?;

        receipt.refresh_totals();
        receipt.stamp_settings(&settings);
        let id = receipt.id.clone();

        let list = self.records.load_receipts().await;
        let prior_counter = self.records.load_next_receipt().await;
        let updated = apply_save(&list, receipt, origin)?;

        self.records.save_receipts(&updated).await?;

        let next_receipt = match origin {
            Origin::New => {
                let saved_number = updated[0].receipt_number;
                let next = advance_counter_after_save(
                    saved_number,
                    prior_counter,
                    settings.default_receipt_number,
                );
                self.records.save_next_receipt(next).await?;
                Some(next)
            }
            Origin::Existing => None,
        };

        let stored = updated
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| CoreError::ReceiptNotFound(id.clone()))?;
        let was_edit = origin == Origin::Existing;

        info!(
            receipt_id = %stored.id,
            receipt_number = stored.receipt_number,
            edit = was_edit,
            next_receipt = ?next_receipt,
            total = stored.total,
            "Receipt saved"
        );

        Ok(SaveOutcome {
            receipt: stored,
            was_edit,
            next_receipt,
        })
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Stored receipts matching `filter`, newest first.
    pub async fn list(&self, filter: &ReceiptFilter) -> Vec<Receipt> {
        let receipts = self.records.load_receipts().await;
        receipts.into_iter().filter(|r| filter.matches(r)).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Receipt> {
        self.records
            .load_receipts()
            .await
            .into_iter()
            .find(|r| r.id == id)
    }

    /// Every stored receipt with this number. Numbers are not unique.
    pub async fn find_by_number(&self, number: u64) -> Vec<Receipt> {
        self.records
            .load_receipts()
            .await
            .into_iter()
            .filter(|r| r.receipt_number == number)
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::records::{NEXT_RECEIPT_KEY, RECEIPTS_KEY};
    use crate::store::MemoryStore;
    use crate::{Database, DbConfig};
    use receipts_core::{Ineligible, LineItem};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    fn business() -> BusinessSettings {
        BusinessSettings {
            business_name: "Dana's Bakery".into(),
            business_number: "514-22".into(),
            signature_data_url: Some("data:image/png;base64,AAAA".into()),
            ..Default::default()
        }
    }

    fn fill(working: &mut WorkingReceipt, client: &str) {
        working.receipt.to = client.into();
        working.receipt.line_items = vec![LineItem::new("Sourdough", 3.0, 19.99)];
    }

    async fn book_with_settings(settings: BusinessSettings) -> ReceiptBook<MemoryStore> {
        let book = ReceiptBook::new(MemoryStore::new());
        book.save_settings(&settings).await.unwrap();
        book
    }

    #[tokio::test]
    async fn test_fresh_book_numbers_from_one() {
        let book = ReceiptBook::new(MemoryStore::new());
        assert_eq!(book.next_receipt_number().await, 1);
        assert_eq!(book.begin_new(today()).await.receipt.receipt_number, 1);
    }

    #[tokio::test]
    async fn test_default_number_then_counter() {
        let book = book_with_settings(BusinessSettings {
            default_receipt_number: Some(100),
            ..business()
        })
        .await;

        let mut working = book.begin_new(today()).await;
        assert_eq!(working.receipt.receipt_number, 100);
        fill(&mut working, "Noa");

        let outcome = book.save(working).await.unwrap();
        assert_eq!(outcome.next_receipt, Some(101));
        assert_eq!(book.records().load_next_receipt().await, Some(101));
        assert_eq!(book.next_receipt_number().await, 101);
    }

    #[tokio::test]
    async fn test_save_stamps_totals_and_snapshot() {
        let book = book_with_settings(business()).await;
        let mut working = book.begin_new(today()).await;
        fill(&mut working, "Noa");
        working.receipt.line_items[0].qty = 1.0; // stale total behind the setter

        let outcome = book.save(working).await.unwrap();
        let saved = outcome.receipt;
        assert_eq!(saved.line_items[0].total, 19.99);
        assert_eq!(saved.total, 19.99);
        assert_eq!(saved.business_number, "514-22");
        assert_eq!(saved.settings_snapshot, Some(business()));
        assert_eq!(saved.signature_data_url, business().signature_data_url);

        // Later settings edits do not reach the stored snapshot.
        book.save_settings(&BusinessSettings {
            business_name: "Renamed".into(),
            ..business()
        })
        .await
        .unwrap();
        let stored = book.find_by_id(&saved.id).await.unwrap();
        assert_eq!(
            stored.settings_snapshot.unwrap().business_name,
            "Dana's Bakery"
        );
    }

    #[tokio::test]
    async fn test_counter_strictly_increases_over_new_saves() {
        let book = book_with_settings(business()).await;
        let mut last = 0;
        for i in 0..5 {
            let mut working = book.begin_new(today()).await;
            fill(&mut working, &format!("client {i}"));
            let next = book.save(working).await.unwrap().next_receipt.unwrap();
            assert!(next > last);
            last = next;
        }
        assert_eq!(last, 6);

        let numbers: Vec<u64> = book
            .list(&ReceiptFilter::new())
            .await
            .iter()
            .map(|r| r.receipt_number)
            .collect();
        assert_eq!(numbers, vec![5, 4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_edit_keeps_number_and_counter() {
        let book = book_with_settings(business()).await;
        let mut working = book.begin_new(today()).await;
        fill(&mut working, "Noa");
        let saved = book.save(working).await.unwrap().receipt;
        let counter = book.records().load_next_receipt().await;

        let mut edit = book.begin_edit(&saved.id).await.unwrap();
        assert!(edit.is_edit());
        edit.receipt.to = "Noa Levi".into();
        let outcome = book.save(edit).await.unwrap();

        assert!(outcome.was_edit);
        assert_eq!(outcome.next_receipt, None);
        assert_eq!(outcome.receipt.receipt_number, saved.receipt_number);
        assert_eq!(outcome.receipt.created_at, saved.created_at);
        assert_eq!(book.records().load_next_receipt().await, counter);

        let all = book.list(&ReceiptFilter::new()).await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].to, "Noa Levi");
    }

    #[tokio::test]
    async fn test_refused_save_writes_nothing() {
        let store = MemoryStore::new();
        let book = ReceiptBook::new(store.clone());
        book.save_settings(&business()).await.unwrap();
        let before = store.entries().await;

        let mut working = book.begin_new(today()).await;
        fill(&mut working, "   ");
        let err = book.save(working).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Core(CoreError::NotSaveEligible(ref reasons))
                if reasons == &vec![Ineligible::MissingClientName]
        ));
        assert_eq!(store.entries().await, before);
    }

    #[tokio::test]
    async fn test_begin_edit_unknown_id() {
        let book = ReceiptBook::new(MemoryStore::new());
        let err = book.begin_edit("missing").await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::ReceiptNotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_numbers_are_kept() {
        let book = book_with_settings(business()).await;
        for client in ["A", "B"] {
            let mut working = book.begin_new(today()).await;
            working.receipt.receipt_number = 9;
            fill(&mut working, client);
            book.save(working).await.unwrap();
        }
        assert_eq!(book.find_by_number(9).await.len(), 2);
        assert_eq!(book.next_receipt_number().await, 10);
    }

    /// Accepts the list write, fails the counter write.
    #[derive(Clone, Default)]
    struct CounterWriteFails {
        inner: MemoryStore,
    }

    impl KeyValueStore for CounterWriteFails {
        async fn get(&self, key: &str) -> DbResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> DbResult<()> {
            if key == NEXT_RECEIPT_KEY {
                return Err(DbError::QueryFailed("disk full".into()));
            }
            self.inner.set(key, value).await
        }
    }

    #[tokio::test]
    async fn test_list_is_written_before_counter() {
        let store = CounterWriteFails::default();
        let book = ReceiptBook::new(store.clone());
        book.save_settings(&business()).await.unwrap();

        let mut working = book.begin_new(today()).await;
        fill(&mut working, "Noa");
        assert!(book.save(working).await.is_err());

        let entries = store.inner.entries().await;
        assert!(entries.contains_key(RECEIPTS_KEY));
        assert!(!entries.contains_key(NEXT_RECEIPT_KEY));
        assert_eq!(book.list(&ReceiptFilter::new()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_against_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let book = db.book();
        book.save_settings(&business()).await.unwrap();

        let mut working = book.begin_new(today()).await;
        fill(&mut working, "Noa");
        let outcome = book.save(working).await.unwrap();

        assert_eq!(outcome.receipt.total, 59.97);
        assert_eq!(db.book().find_by_number(1).await.len(), 1);
        assert_eq!(db.book().next_receipt_number().await, 2);
    }
}
