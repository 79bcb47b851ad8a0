//! Receipt history search.
//!
//! Free text matches the client name or the receipt number as a substring.
//! Date bounds are inclusive and compared on the `YYYY-MM-DD` text, which
//! orders the same as the calendar.

use crate::types::Receipt;

/// Search criteria for the receipt history. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptFilter {
    pub text: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl ReceiptFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn from_date(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn to_date(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn matches(&self, receipt: &Receipt) -> bool {
        if let Some(text) = self.text.as_deref().filter(|t| !t.trim().is_empty()) {
            let number = receipt.receipt_number.to_string();
            if !receipt.to.contains(text) && !number.contains(text) {
                return false;
            }
        }
        if let Some(from) = self.from.as_deref().filter(|d| !d.is_empty()) {
            if receipt.date.as_str() < from {
                return false;
            }
        }
        if let Some(to) = self.to.as_deref().filter(|d| !d.is_empty()) {
            if receipt.date.as_str() > to {
                return false;
            }
        }
        true
    }

    /// Matching receipts, in stored order.
    pub fn apply<'a>(&self, receipts: &'a [Receipt]) -> Vec<&'a Receipt> {
        receipts.iter().filter(|r| self.matches(r)).collect()
    }
}
