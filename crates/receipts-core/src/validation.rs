//! # Validation Module
//!
//! The save-eligibility gate and validators for user input.
//!
//! ## Save Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A receipt may be saved only when ALL of these hold:                    │
//! │                                                                         │
//! │   1. date is non-empty                        → MissingDate             │
//! │   2. client name (trimmed) is non-empty       → MissingClientName       │
//! │   3. some line has a description AND total>0  → NoBillableLineItem      │
//! │   4. business name + number (trimmed) are set → MissingBusinessIdentity │
//! │                                                                         │
//! │  Every failed condition is reported, in this order.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A refused save is not a fault: nothing is written and the caller shows
//! the reasons.

use chrono::NaiveDate;

use crate::error::{Ineligible, ValidationError};
use crate::money::Money;
use crate::types::{BusinessSettings, Receipt};
use crate::DATE_FORMAT;

// =============================================================================
// Save Gate
// =============================================================================

/// Checks every gate condition and returns all that failed.
pub fn check_save_eligibility(
    receipt: &Receipt,
    settings: &BusinessSettings,
) -> Result<(), Vec<Ineligible>> {
    let mut reasons = Vec::new();

    if receipt.date.is_empty() {
        reasons.push(Ineligible::MissingDate);
    }
    if receipt.to.trim().is_empty() {
        reasons.push(Ineligible::MissingClientName);
    }
    if !receipt.line_items.iter().any(|item| item.is_billable()) {
        reasons.push(Ineligible::NoBillableLineItem);
    }
    if !settings.has_business_identity() {
        reasons.push(Ineligible::MissingBusinessIdentity);
    }

    if reasons.is_empty() {
        Ok(())
    } else {
        Err(reasons)
    }
}

/// `true` when the receipt passes the gate.
pub fn is_save_eligible(receipt: &Receipt, settings: &BusinessSettings) -> bool {
    check_save_eligibility(receipt, settings).is_ok()
}

// =============================================================================
// Input Validators
// =============================================================================

/// Validates a `YYYY-MM-DD` calendar date.
pub fn validate_iso_date(value: &str) -> Result<NaiveDate, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "date".to_string(),
        });
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: format!("expected YYYY-MM-DD ({e})"),
    })
}

/// Receipt numbers are positive integers.
pub fn validate_receipt_number(number: u64) -> Result<u64, ValidationError> {
    if number == 0 {
        return Err(ValidationError::MustBePositive {
            field: "receipt number".to_string(),
        });
    }
    Ok(number)
}

/// Quantities and prices must be finite. Zero and negative values pass.
pub fn validate_amount(field: &str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// A line's `qty × unit_price` must fit the stored amount range.
pub fn validate_line_total(qty: f64, unit_price: f64) -> Result<Money, ValidationError> {
    Money::checked_line_total(qty, unit_price).ok_or_else(|| ValidationError::OutOfRange {
        field: "line total".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineItem;

    fn settings() -> BusinessSettings {
        BusinessSettings {
            business_name: "Dana's Bakery".into(),
            business_number: "514-22".into(),
            ..Default::default()
        }
    }

    fn eligible_receipt() -> Receipt {
        let mut receipt = Receipt::draft(1, NaiveDate::from_ymd_opt(2024, 5, 5).unwrap());
        receipt.to = "Noa".into();
        receipt.line_items = vec![LineItem::new("Sourdough", 2.0, 18.0)];
        receipt.refresh_totals();
        receipt
    }

    #[test]
    fn test_complete_receipt_is_eligible() {
        assert!(is_save_eligible(&eligible_receipt(), &settings()));
    }

    #[test]
    fn test_empty_client_blocks_save() {
        let mut receipt = eligible_receipt();
        receipt.to = "   ".into();
        assert!(!is_save_eligible(&receipt, &settings()));
        assert_eq!(
            check_save_eligibility(&receipt, &settings()),
            Err(vec![Ineligible::MissingClientName])
        );
    }

    #[test]
    fn test_missing_date_blocks_save() {
        let mut receipt = eligible_receipt();
        receipt.date.clear();
        assert_eq!(
            check_save_eligibility(&receipt, &settings()),
            Err(vec![Ineligible::MissingDate])
        );
    }

    #[test]
    fn test_line_needs_description_and_positive_total() {
        let mut receipt = eligible_receipt();

        receipt.line_items = vec![LineItem::new("  ", 1.0, 10.0)];
        assert!(!is_save_eligible(&receipt, &settings()));

        receipt.line_items = vec![LineItem::new("Free sample", 1.0, 0.0)];
        assert!(!is_save_eligible(&receipt, &settings()));

        receipt.line_items = vec![LineItem::new("Refund", -1.0, 10.0)];
        assert!(!is_save_eligible(&receipt, &settings()));

        receipt.line_items = vec![
            LineItem::blank(),
            LineItem::new("Baguette", 1.0, 0.01),
        ];
        assert!(is_save_eligible(&receipt, &settings()));
    }

    #[test]
    fn test_business_identity_required() {
        let receipt = eligible_receipt();
        let mut s = settings();
        s.business_number = " ".into();
        assert_eq!(
            check_save_eligibility(&receipt, &s),
            Err(vec![Ineligible::MissingBusinessIdentity])
        );
    }

    #[test]
    fn test_all_reasons_are_reported_in_order() {
        let mut receipt = Receipt::draft(1, NaiveDate::from_ymd_opt(2024, 5, 5).unwrap());
        receipt.date.clear();
        let reasons = check_save_eligibility(&receipt, &BusinessSettings::default()).unwrap_err();
        assert_eq!(
            reasons,
            vec![
                Ineligible::MissingDate,
                Ineligible::MissingClientName,
                Ineligible::NoBillableLineItem,
                Ineligible::MissingBusinessIdentity,
            ]
        );
    }

    #[test]
    fn test_validate_iso_date() {
        assert_eq!(
            validate_iso_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(matches!(
            validate_iso_date(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_iso_date("29/02/2024"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_receipt_number_and_amount() {
        assert!(validate_receipt_number(0).is_err());
        assert_eq!(validate_receipt_number(9).unwrap(), 9);

        assert!(validate_amount("qty", f64::NAN).is_err());
        assert!(validate_amount("price", f64::INFINITY).is_err());
        assert_eq!(validate_amount("price", -3.5).unwrap(), -3.5);
    }

    #[test]
    fn test_validate_line_total_range() {
        assert_eq!(validate_line_total(2.0, 18.0).unwrap().minor_units(), 3600);
        assert_eq!(validate_line_total(-2.0, 18.0).unwrap().minor_units(), -3600);
        assert!(matches!(
            validate_line_total(1e17, 1000.0),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
