//! # Money
//!
//! Receipts store amounts as JSON numbers, but every sum is taken in integer
//! minor units (agorot, cents) so totals never pick up float noise.
//!
//! ```text
//! f64 amount ──► Money::from_amount ──► i64 minor units ──► Σ ──► .amount() ──► f64
//!   0.10                                   10
//!   0.20                                   20          30          0.30
//! ```
//!
//! ## Rounding
//! Conversions round **half away from zero** to two decimals: `f64::round`
//! applied to `amount × 100`. The rounding sees the binary value of that
//! product, identically at every call site.
//!
//! ## Range
//! Sums saturate at the `i64` bounds instead of wrapping. Input is held to
//! [`MAX_LINE_MINOR_UNITS`] per line by [`Money::checked_line_total`], so
//! saturation is only reachable through hand-edited records.
//!
//! ```rust
//! use receipts_core::money::Money;
//!
//! assert_eq!(Money::from_amount(19.99).minor_units(), 1999);
//! assert_eq!(Money::line_total(3.0, 19.99).amount(), 59.97);
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// An amount in minor units. Signed: negative quantities and prices are
/// allowed on a line, so totals can go below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

const MINOR_PER_MAJOR: i64 = 100;

/// Largest line total accepted from input. Below 2^53, so the value is
/// exact as an `f64`.
pub const MAX_LINE_MINOR_UNITS: i64 = 1_000_000_000_000_000;

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor_units(minor: i64) -> Self {
        Money(minor)
    }

    /// Rounds a decimal amount to two places. NaN becomes zero and
    /// infinities saturate (the `as` cast).
    pub fn from_amount(amount: f64) -> Self {
        Money((amount * MINOR_PER_MAJOR as f64).round() as i64)
    }

    /// `qty × unit_price`, rounded once. Any sign is accepted.
    pub fn line_total(qty: f64, unit_price: f64) -> Self {
        Money::from_amount(qty * unit_price)
    }

    /// Like [`Money::line_total`], but `None` when the product is not finite
    /// or its magnitude is above [`MAX_LINE_MINOR_UNITS`].
    pub fn checked_line_total(qty: f64, unit_price: f64) -> Option<Self> {
        let minor = (qty * unit_price * MINOR_PER_MAJOR as f64).round();
        if minor.is_finite() && minor.abs() <= MAX_LINE_MINOR_UNITS as f64 {
            Some(Money(minor as i64))
        } else {
            None
        }
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// The decimal form written into records.
    pub fn amount(self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }
}

/// `1234.50`, no currency symbol. Placement of the symbol is up to the caller.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = MINOR_PER_MAJOR as u64;
        write!(f, "{}{}.{:02}", sign, abs / per, abs % per)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_away_from_zero() {
        assert_eq!(Money::from_amount(0.125).minor_units(), 13);
        assert_eq!(Money::from_amount(-0.125).minor_units(), -13);
        assert_eq!(Money::from_amount(0.124).minor_units(), 12);
        assert_eq!(Money::from_amount(10.99).minor_units(), 1099);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(Money::line_total(3.0, 19.99).minor_units(), 5997);
        assert_eq!(Money::line_total(0.0, 42.0), Money::ZERO);
        assert_eq!(Money::line_total(-2.0, 5.5).minor_units(), -1100);
        assert_eq!(Money::line_total(f64::NAN, 3.0), Money::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor_units(1099).to_string(), "10.99");
        assert_eq!(Money::from_minor_units(500).to_string(), "5.00");
        assert_eq!(Money::from_minor_units(-5).to_string(), "-0.05");
        assert_eq!(Money::from_minor_units(-550).to_string(), "-5.50");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_checked_line_total_range() {
        assert_eq!(
            Money::checked_line_total(3.0, 19.99),
            Some(Money::from_minor_units(5997))
        );
        assert_eq!(
            Money::checked_line_total(-1e13, 1.0),
            Some(Money::from_minor_units(-MAX_LINE_MINOR_UNITS))
        );
        assert_eq!(Money::checked_line_total(1e17, 1000.0), None);
        assert_eq!(Money::checked_line_total(-1e17, 1000.0), None);
        assert_eq!(Money::checked_line_total(f64::NAN, 1.0), None);
    }

    #[test]
    fn test_sum_saturates_instead_of_overflowing() {
        let huge = Money::from_amount(1e20);
        assert_eq!(huge.minor_units(), i64::MAX);

        let total: Money = [huge, huge].into_iter().sum();
        assert_eq!(total.minor_units(), i64::MAX);

        let low = Money::from_amount(-1e20);
        assert_eq!((low + low).minor_units(), i64::MIN);
        assert_eq!((huge + low).minor_units(), -1);
    }

    #[test]
    fn test_sum_has_no_float_drift() {
        let total: Money = [0.1, 0.2].into_iter().map(Money::from_amount).sum();
        assert_eq!(total.amount(), 0.3);
    }
}
