//! # receipts-core: Pure Business Logic for Receiptly
//!
//! This crate holds the receipt model, the numbering policy, the
//! save-eligibility gate and the print document template. Nothing in here
//! touches the store, the file system or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Receiptly Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front end (receipts-cli)                     │   │
//! │  │    settings ──► new / edit receipt ──► print / pdf ──► backup   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ receipts-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌──────────────┐    │   │
//! │  │   │  types   │ │  ledger  │ │ numbering │ │  validation  │    │   │
//! │  │   │ Receipt  │ │  totals  │ │  counter  │ │  save gate   │    │   │
//! │  │   └──────────┘ └──────────┘ └───────────┘ └──────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 receipts-db (Persistent Store)                  │   │
//! │  │        key-value records, save transaction, backup/restore      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Persisted record shapes (LineItem, BusinessSettings, Receipt)
//! - [`money`] - Money type in integer minor units, two-decimal rounding
//! - [`ledger`] - Line/receipt totals and the list update of a save
//! - [`numbering`] - Next-receipt-number policy
//! - [`validation`] - Save-eligibility gate and input validators
//! - [`filter`] - Receipt history search
//! - [`render`] - Printable receipt document
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use receipts_core::ledger::{compute_line_total, compute_receipt_total};
//! use receipts_core::LineItem;
//!
//! let item = LineItem::new("Consulting", 3.0, 19.99);
//! assert_eq!(item.total, 59.97);
//! assert_eq!(compute_line_total(3.0, 19.99), 59.97);
//! assert_eq!(compute_receipt_total(&[item]), 59.97);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod ledger;
pub mod money;
pub mod numbering;
pub mod render;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, Ineligible, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Receipt number used when neither a stored counter nor a configured
/// default exists.
pub const FIRST_RECEIPT_NUMBER: u64 = 1;

/// `chrono` format of a receipt date (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";
