//! # Domain Types
//!
//! The persisted record shapes of Receiptly.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────┐              │
//! │  │       Receipt        │        │   BusinessSettings   │              │
//! │  │  ──────────────────  │        │  ──────────────────  │              │
//! │  │  id (UUID, opaque)   │        │  businessName        │              │
//! │  │  receiptNumber       │        │  businessNumber      │              │
//! │  │  date (YYYY-MM-DD)   │        │  defaultReceiptNumber│              │
//! │  │  lineItems ──────────┼──┐     │  signatureDataUrl    │              │
//! │  │  settingsSnapshot ◄──┼──┼─────┤  (copied at save)    │              │
//! │  └──────────────────────┘  │     └──────────────────────┘              │
//! │                            ▼                                            │
//! │                 ┌──────────────────────┐                                │
//! │                 │       LineItem       │                                │
//! │                 │  qty × unitPrice     │                                │
//! │                 │  = total (2 dp)      │                                │
//! │                 └──────────────────────┘                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! Field names are camelCase on the wire; the same JSON is used for the
//! store records and for backup documents, so both must round-trip
//! unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::DATE_FORMAT;

// =============================================================================
// Line Item
// =============================================================================

/// One billable row on a receipt.
///
/// `total` is derived: every setter that touches `qty` or `unit_price`
/// recomputes it. Do not assign it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub description: String,
    pub qty: f64,
    pub unit_price: f64,
    pub total: f64,
}

impl LineItem {
    /// Creates a line item with a fresh id and a computed total.
    pub fn new(description: impl Into<String>, qty: f64, unit_price: f64) -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            qty,
            unit_price,
            total: Money::line_total(qty, unit_price).amount(),
        }
    }

    /// The empty row a new receipt starts with: qty 1, price 0.
    pub fn blank() -> Self {
        LineItem::new("", 1.0, 0.0)
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_qty(&mut self, qty: f64) {
        self.qty = qty;
        self.refresh_total();
    }

    pub fn set_unit_price(&mut self, unit_price: f64) {
        self.unit_price = unit_price;
        self.refresh_total();
    }

    /// Recomputes `total` from `qty` and `unit_price`.
    pub fn refresh_total(&mut self) {
        self.total = Money::line_total(self.qty, self.unit_price).amount();
    }

    /// A row counts toward save eligibility when it has a description and a
    /// strictly positive total.
    pub fn is_billable(&self) -> bool {
        !self.description.trim().is_empty() && self.total > 0.0
    }
}

// =============================================================================
// Business Settings
// =============================================================================

/// The singleton settings record.
///
/// Every field has a default so that a partially stored record decodes
/// field-by-field instead of being discarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessSettings {
    pub business_name: String,
    pub phone: String,
    pub owner_name: String,
    pub business_number: String,

    /// First number to use when no counter has been stored yet.
    #[ts(type = "number | null")]
    pub default_receipt_number: Option<u64>,

    /// Opaque image reference (a `data:` URL) produced by signature capture.
    pub signature_data_url: Option<String>,
}

impl BusinessSettings {
    /// Business name and business number are both present.
    pub fn has_business_identity(&self) -> bool {
        !self.business_name.trim().is_empty() && !self.business_number.trim().is_empty()
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A receipt: identity, sequential number, client, items and a frozen copy
/// of the business settings.
///
/// ## Lifecycle
/// ```text
/// Receipt::draft()  ──► provisional number, blank line
///       │
///       ▼  (save, create path)
/// persisted, prepended to the list; id and createdAt never change again
///       │
///       ▼  (save, edit path)
/// replaced in place; every other field may change
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,

    /// Soft sequential hint, not unique across the stored list.
    #[ts(type = "number")]
    pub receipt_number: u64,

    /// Calendar date in `YYYY-MM-DD` form. May be empty on a working copy.
    pub date: String,

    /// Client name.
    pub to: String,

    /// Copied from the settings at save time.
    #[serde(default)]
    pub business_number: String,

    /// Entry order is display order.
    pub line_items: Vec<LineItem>,

    pub total: f64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Deep copy of the settings taken when the receipt was saved.
    #[serde(default)]
    pub settings_snapshot: Option<BusinessSettings>,

    #[serde(default)]
    pub signature_data_url: Option<String>,
}

impl Receipt {
    /// A new working receipt: one blank line, empty client.
    pub fn draft(receipt_number: u64, date: NaiveDate) -> Self {
        Receipt {
            id: Uuid::new_v4().to_string(),
            receipt_number,
            date: date.format(DATE_FORMAT).to_string(),
            to: String::new(),
            business_number: String::new(),
            line_items: vec![LineItem::blank()],
            total: 0.0,
            created_at: Utc::now(),
            settings_snapshot: None,
            signature_data_url: None,
        }
    }

    /// Appends a line item and returns its id.
    pub fn add_line_item(&mut self, item: LineItem) -> String {
        let id = item.id.clone();
        self.line_items.push(item);
        self.total = crate::ledger::compute_receipt_total(&self.line_items);
        id
    }

    /// Removes the line item with the given id. Returns false if absent.
    pub fn remove_line_item(&mut self, id: &str) -> bool {
        let before = self.line_items.len();
        self.line_items.retain(|li| li.id != id);
        self.total = crate::ledger::compute_receipt_total(&self.line_items);
        self.line_items.len() != before
    }

    /// Updates one line item in place and refreshes the receipt total.
    pub fn update_line_item<F>(&mut self, id: &str, patch: F) -> bool
    where
        F: FnOnce(&mut LineItem),
    {
        let Some(item) = self.line_items.iter_mut().find(|li| li.id == id) else {
            return false;
        };
        patch(item);
        item.refresh_total();
        self.total = crate::ledger::compute_receipt_total(&self.line_items);
        true
    }

    /// Recomputes every line total, then the receipt total.
    pub fn refresh_totals(&mut self) {
        for item in &mut self.line_items {
            item.refresh_total();
        }
        self.total = crate::ledger::compute_receipt_total(&self.line_items);
    }

    /// Freezes the current settings into the receipt.
    pub fn stamp_settings(&mut self, settings: &BusinessSettings) {
        self.business_number = settings.business_number.clone();
        self.signature_data_url = settings.signature_data_url.clone();
        self.settings_snapshot = Some(settings.clone());
    }

    /// The date parsed as a calendar date, if it is well-formed.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    /// `receipt-<number>.pdf`
    pub fn pdf_file_name(&self) -> String {
        format!("receipt-{}.pdf", self.receipt_number)
    }

    /// `receipt-<number>.html`
    pub fn print_file_name(&self) -> String {
        format!("receipt-{}.html", self.receipt_number)
    }
}

// =============================================================================
// Backup Documents
// =============================================================================

/// The full exportable state.
///
/// Field order here is the key order of the exported JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub receipts: Vec<Receipt>,
    pub settings: BusinessSettings,
    #[ts(type = "number | null")]
    pub next_receipt: Option<u64>,
}

/// A backup document as accepted on import: every top-level field is
/// optional, and `null` is the same as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDocument {
    #[serde(default)]
    pub receipts: Option<Vec<Receipt>>,
    #[serde(default)]
    pub settings: Option<BusinessSettings>,
    #[serde(default)]
    pub next_receipt: Option<u64>,
}

/// `receipts-backup-<YYYY-MM-DD>.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("receipts-backup-{}.json", date.format(DATE_FORMAT))
}

// =============================================================================
// Unit Tests
// =============================================================================
