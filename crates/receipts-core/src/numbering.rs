//! # Receipt Numbering
//!
//! Chooses the number a new receipt is pre-filled with, and moves the
//! next-receipt counter forward after a new receipt is saved.
//!
//! ```text
//! next_receipt_number_for
//! ───────────────────────
//!   editing?  ──yes──► existing.receipt_number    (counter untouched)
//!      │
//!      no
//!      ▼
//!   stored counter ?? settings.default_receipt_number ?? 1
//!
//! advance_counter_after_save (new receipts only)
//! ──────────────────────────
//!   max(saved + 1, prior ?? 0, default ?? 0)
//! ```
//!
//! The counter is a convenience number: nothing here checks that a number
//! is unused, and a user may type any number into a receipt.

use crate::types::{BusinessSettings, Receipt};
use crate::FIRST_RECEIPT_NUMBER;

/// Number to show on a receipt that is being opened for editing or created.
///
/// An explicitly stored counter wins even when it is zero; only an absent
/// counter falls through to the configured default.
pub fn next_receipt_number_for(
    existing: Option<&Receipt>,
    stored_counter: Option<u64>,
    settings: &BusinessSettings,
) -> u64 {
    if let Some(receipt) = existing {
        return receipt.receipt_number;
    }

    stored_counter
        .or(settings.default_receipt_number)
        .unwrap_or(FIRST_RECEIPT_NUMBER)
}

/// Counter value to store after a new receipt numbered `saved_number` has
/// been persisted. Never lower than `prior_counter`.
pub fn advance_counter_after_save(
    saved_number: u64,
    prior_counter: Option<u64>,
    default_receipt_number: Option<u64>,
) -> u64 {
    saved_number
        .saturating_add(1)
        .max(prior_counter.unwrap_or(0))
        .max(default_receipt_number.unwrap_or(0))
}

// =============================================================================
// Unit Tests
// =============================================================================
