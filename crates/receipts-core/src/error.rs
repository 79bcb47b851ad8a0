//! # Error Types
//!
//! Domain-specific error types for receipts-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  receipts-core errors (this file)                                      │
//! │  ├── CoreError        - Refused saves, unknown receipts                │
//! │  ├── Ineligible       - Which save-gate condition failed               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  receipts-db errors (separate crate)                                   │
//! │  ├── DbError          - Store write / connection failures              │
//! │  └── ImportError      - Backup document rejected                       │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: Ineligible → CoreError → DbError → CliError → stderr            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Corrupt stored data is NOT an error anywhere in this hierarchy: the
//! store layer replaces it with the record's default.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The save-eligibility gate refused the receipt.
    ///
    /// ## User Workflow
    /// ```text
    /// receipt new --to "" --item "Lesson:1:100"
    ///      │
    ///      ▼
    /// check_save_eligibility() → [MissingClientName]
    ///      │
    ///      ▼
    /// NotSaveEligible([MissingClientName])  (nothing is written)
    ///      │
    ///      ▼
    /// UI shows: "Receipt cannot be saved: client name is required"
    /// ```
    #[error("Receipt cannot be saved: {}", join_reasons(.0))]
    NotSaveEligible(Vec<Ineligible>),

    /// An edit referenced a receipt id that is not in the stored list.
    #[error("Receipt not found: {0}")]
    ReceiptNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn join_reasons(reasons: &[Ineligible]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Save Gate Reasons
// =============================================================================

/// One failed condition of the save-eligibility gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ineligible {
    /// The receipt date is empty.
    MissingDate,
    /// The client name is empty after trimming.
    MissingClientName,
    /// No line item has both a description and a positive total.
    NoBillableLineItem,
    /// Business name or business number is missing in the settings.
    MissingBusinessIdentity,
}

impl std::fmt::Display for Ineligible {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Ineligible::MissingDate => "a date is required",
            Ineligible::MissingClientName => "client name is required",
            Ineligible::NoBillableLineItem => {
                "at least one line item needs a description and an amount above zero"
            }
            Ineligible::MissingBusinessIdentity => {
                "business name and business number must be set in the settings"
            }
        };
        f.write_str(msg)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements, before any
/// receipt logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Number is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Value is finite but too large to store.
    #[error("{field} is out of range")]
    OutOfRange { field: String },

    /// Invalid format (e.g., invalid date, malformed line item).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
