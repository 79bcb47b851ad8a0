//! # Ledger
//!
//! Totals and the pure half of the save transaction.
//!
//! ## Save Transaction
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────────────────────┐
//! │   WorkingReceipt     │      │   stored list (newest first)         │
//! │   origin: New        │─────►│   [new, r3, r2, r1]     prepend      │
//! │   origin: Existing   │─────►│   [r3, r2', r1]         replace by id│
//! └──────────────────────┘      └──────────────────────────────────────┘
//! ```
//!
//! [`apply_save`] only builds the new list. Writing it (and the counter)
//! is the store layer's job.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LineItem, Receipt};

// =============================================================================
// Totals
// =============================================================================

/// `qty × unit_price`, rounded half away from zero to two decimal places.
///
/// Negative and zero inputs are accepted.
pub fn compute_line_total(qty: f64, unit_price: f64) -> f64 {
    Money::line_total(qty, unit_price).amount()
}

/// Sum of every line item's stored `total`.
///
/// The stored totals are trusted as-is; call [`Receipt::refresh_totals`]
/// first if `qty` or `unit_price` may have changed behind the setters.
pub fn compute_receipt_total(line_items: &[LineItem]) -> f64 {
    line_items
        .iter()
        .map(|item| Money::from_amount(item.total))
        .sum::<Money>()
        .amount()
}

// =============================================================================
// Working Copy
// =============================================================================

/// Where a working receipt came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Created by "new receipt"; saving prepends it and advances the counter.
    New,
    /// Loaded from the stored list; saving replaces it in place.
    Existing,
}

/// An in-memory receipt that has not been written back yet.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingReceipt {
    pub receipt: Receipt,
    pub origin: Origin,
}

impl WorkingReceipt {
    pub fn new(receipt: Receipt) -> Self {
        WorkingReceipt {
            receipt,
            origin: Origin::New,
        }
    }

    pub fn existing(receipt: Receipt) -> Self {
        WorkingReceipt {
            receipt,
            origin: Origin::Existing,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.origin == Origin::Existing
    }
}

// =============================================================================
// List Update
// =============================================================================

/// Produces the receipt list that results from saving `receipt`.
///
/// - `Origin::New`: the receipt is prepended.
/// - `Origin::Existing`: the element with the same id is replaced. Its
///   `created_at` is carried over from the stored copy.
///
/// Receipt numbers are not checked for collisions.
pub fn apply_save(list: &[Receipt], receipt: Receipt, origin: Origin) -> CoreResult<Vec<Receipt>> {
    match origin {
        Origin::New => {
            let mut updated = Vec::with_capacity(list.len() + 1);
            updated.push(receipt);
            updated.extend_from_slice(list);
            Ok(updated)
        }
        Origin::Existing => {
            let position = list
                .iter()
                .position(|r| r.id == receipt.id)
                .ok_or_else(|| CoreError::ReceiptNotFound(receipt.id.clone()))?;

            let mut updated = list.to_vec();
            let created_at = updated[position].created_at;
            updated[position] = Receipt {
                created_at,
                ..receipt
            };
            Ok(updated)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_single_item_receipt_total() {
        let item = LineItem::new("Widget", 3.0, 19.99);
        assert_eq!(item.total, 59.97);
        assert_eq!(compute_line_total(3.0, 19.99), 59.97);

        let mut receipt = Receipt::draft(1, day());
        receipt.line_items = vec![item];
        receipt.refresh_totals();
        assert_eq!(receipt.total, 59.97);
    }

    #[test]
    fn test_line_total_matches_rounded_product() {
        let cases = [
            (1.0, 0.1),
            (2.5, 4.2),
            (7.0, 0.333),
            (0.0, 12.0),
            (12.0, 0.0),
            (1.5, 1.005),
        ];
        for (qty, price) in cases {
            let expected = (qty * price * 100.0_f64).round() / 100.0;
            assert_eq!(compute_line_total(qty, price), expected, "{qty} x {price}");
        }
    }

    #[test]
    fn test_receipt_total_sums_stored_line_totals() {
        let mut items = vec![
            LineItem::new("a", 1.0, 0.1),
            LineItem::new("b", 1.0, 0.2),
            LineItem::new("c", 2.0, 5.0),
        ];
        assert_eq!(compute_receipt_total(&items), 10.3);

        // A stale stored total is trusted.
        items[2].qty = 100.0;
        assert_eq!(compute_receipt_total(&items), 10.3);

        items[2].refresh_total();
        assert_eq!(compute_receipt_total(&items), 500.3);
    }

    #[test]
    fn test_sub_cent_stored_totals_are_rounded_per_line() {
        let mut items = vec![LineItem::new("a", 1.0, 0.0), LineItem::new("b", 1.0, 0.0)];
        items[0].total = 0.004;
        items[1].total = 0.004;
        assert_eq!(compute_receipt_total(&items), 0.0);

        items[1].total = 0.005;
        assert_eq!(compute_receipt_total(&items), 0.01);
    }

    #[test]
    fn test_huge_stored_totals_do_not_overflow() {
        let items = vec![
            LineItem::new("a", 1e17, 1000.0),
            LineItem::new("b", 1e17, 1000.0),
        ];
        let total = compute_receipt_total(&items);
        assert_eq!(total, Money::from_minor_units(i64::MAX).amount());
        assert!(total > 0.0);
    }

    #[test]
    fn test_empty_receipt_total_is_zero() {
        assert_eq!(compute_receipt_total(&[]), 0.0);
    }

    #[test]
    fn test_new_receipt_is_prepended() {
        let older = Receipt::draft(1, day());
        let newer = Receipt::draft(2, day());

        let list = apply_save(&[], older.clone(), Origin::New).unwrap();
        let list = apply_save(&list, newer.clone(), Origin::New).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, newer.id);
        assert_eq!(list[1].id, older.id);
    }

    #[test]
    fn test_edit_replaces_in_place_and_keeps_created_at() {
        let a = Receipt::draft(1, day());
        let b = Receipt::draft(2, day());
        let list = vec![b.clone(), a.clone()];

        let mut edited = a.clone();
        edited.to = "New client".into();
        edited.receipt_number = 77;
        edited.created_at = a.created_at + Duration::days(3);

        let updated = apply_save(&list, edited, Origin::Existing).unwrap();
        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0].id, b.id);
        assert_eq!(updated[1].id, a.id);
        assert_eq!(updated[1].to, "New client");
        assert_eq!(updated[1].receipt_number, 77);
        assert_eq!(updated[1].created_at, a.created_at);
    }

    #[test]
    fn test_edit_of_unknown_receipt_fails() {
        let stray = Receipt::draft(1, day());
        let err = apply_save(&[], stray, Origin::Existing).unwrap_err();
        assert!(matches!(err, CoreError::ReceiptNotFound(_)));
    }

    #[test]
    fn test_duplicate_numbers_are_allowed() {
        let first = Receipt::draft(5, day());
        let second = Receipt::draft(5, day());
        let list = apply_save(&[first], second, Origin::New).unwrap();
        assert_eq!(list.iter().filter(|r| r.receipt_number == 5).count(), 2);
    }
}
