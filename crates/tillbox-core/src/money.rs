//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                     │
//! │                                                                 │
//! │  In floating point:                                             │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                   │
//! │                                                                 │
//! │  OUR SOLUTION: rust_decimal                                     │
//! │    23.00 × 8.25% = 1.8975 exactly, kept at full precision.      │
//! │    The value rounds to two decimal places ONLY when it is       │
//! │    formatted for display, never inside receipt arithmetic.     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tillbox_core::money::Money;
//!
//! let price = Money::from_major_minor(10, 99); // $10.99
//! let line = price.times(3);                   // $32.97
//! assert_eq!(format!("{}", line), "$32.97");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value backed by an exact decimal.
///
/// ## Design Decisions
/// - **Decimal inner**: full precision through every intermediate step;
///   two-decimal rounding is a display concern
/// - **Single field tuple struct**: zero-cost abstraction over `Decimal`
/// - **`transparent` serde**: blobs store the bare decimal ("9.99")
///
/// ## Where Money Flows
/// ```text
/// ProductRecord.amount ──► ReceiptItem.unit_amount ──► line_total
///                                                          │
///          subtotal ──► discount clamp ──► tax ──► total ◄─┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a raw decimal value.
    #[inline]
    pub const fn from_decimal(value: Decimal) -> Self {
        Money(value)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Example
    /// ```rust
    /// use tillbox_core::money::Money;
    ///
    /// let price = Money::from_major_minor(10, 99); // $10.99
    /// let refund = Money::from_major_minor(-5, 50); // -$5.50
    /// assert_eq!(format!("{}", refund), "-$5.50");
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` is -$5.50, not -$4.50.
    pub fn from_major_minor(major: i64, minor: i64) -> Self {
        let cents = if major < 0 {
            major * 100 - minor
        } else {
            major * 100 + minor
        };
        Money(Decimal::new(cents, 2))
    }

    /// Parses a user-supplied amount string ("9.99").
    ///
    /// Returns `None` for non-numeric input; callers that want forgiving
    /// entry-form behavior should go through
    /// [`crate::validation::coerce_amount`] instead, which maps bad input to
    /// zero.
    pub fn parse(input: &str) -> Option<Self> {
        Decimal::from_str(input.trim()).ok().map(Money)
    }

    /// Returns the inner decimal at full precision.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiplies by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tillbox_core::money::Money;
    ///
    /// let unit = Money::from_major_minor(2, 99);
    /// assert_eq!(format!("{}", unit.times(3)), "$8.97");
    /// ```
    pub fn times(&self, quantity: i64) -> Self {
        Money(self.0 * Decimal::from(quantity))
    }

    /// Applies a percentage rate and returns the resulting amount.
    ///
    /// Used for tax: `base.percent(rate)` is `base × rate / 100`, carried at
    /// full precision. $23.00 at 8.25% yields exactly 1.8975.
    pub fn percent(&self, rate: Decimal) -> Self {
        Money(self.0 * rate / Decimal::from(100))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display rounds to two decimal places (half away from zero) and prefixes a
/// currency sign. This is the ONLY place currency rounding happens.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_sign_negative() {
            write!(f, "-${:.2}", -rounded)
        } else {
            write!(f, "${:.2}", rounded)
        }
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).amount(), Decimal::new(1099, 2));
        assert_eq!(Money::from_major_minor(-5, 50).amount(), Decimal::new(-550, 2));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("9.99"), Some(Money::from_major_minor(9, 99)));
        assert_eq!(Money::parse("  5 "), Some(Money::from_major_minor(5, 0)));
        assert_eq!(Money::parse("abc"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_major_minor(10, 99)), "$10.99");
        assert_eq!(format!("{}", Money::from_major_minor(5, 0)), "$5.00");
        assert_eq!(format!("{}", Money::from_major_minor(-5, 50)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_display_rounds_only_at_display() {
        // $23.00 at 8.25% = 1.8975 held exactly, shown as $1.90
        let tax = Money::from_major_minor(23, 0).percent(Decimal::new(825, 2));
        assert_eq!(tax.amount(), Decimal::new(18975, 4));
        assert_eq!(format!("{}", tax), "$1.90");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major_minor(10, 0);
        let b = Money::from_major_minor(5, 0);

        assert_eq!(a + b, Money::from_major_minor(15, 0));
        assert_eq!(a - b, Money::from_major_minor(5, 0));
        assert_eq!(a.times(3), Money::from_major_minor(30, 0));
    }

    #[test]
    fn test_percent_exact() {
        // $10.00 at 10% = $1.00 exactly
        let tax = Money::from_major_minor(10, 0).percent(Decimal::from(10));
        assert_eq!(tax, Money::from_major_minor(1, 0));
    }

    #[test]
    fn test_ordering_supports_clamping() {
        let subtotal = Money::from_major_minor(25, 0);
        let discount = Money::from_major_minor(30, 0);
        // Discount larger than subtotal clamps to the subtotal via Ord
        assert_eq!(discount.min(subtotal), subtotal);
        // Negative values clamp up to zero
        assert_eq!(Money::from_major_minor(-2, 0).max(Money::zero()), Money::zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_major_minor(1, 0).is_positive());
        assert!(Money::from_major_minor(-1, 0).is_negative());
    }
}
