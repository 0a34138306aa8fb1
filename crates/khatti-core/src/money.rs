//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The storefront prices everything in whole rupees:                      │
//! │    ₹1,299 list, ₹999 free-shipping threshold, ₹99 shipping fee          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Rupees                                           │
//! │    GST and coupon discounts are rounded to the nearest rupee at the     │
//! │    moment they are computed, never carried as fractions                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use khatti_core::money::Money;
//!
//! let price = Money::from_rupees(1299);
//! let doubled = price * 2u32;
//! assert_eq!(doubled.rupees(), 2598);
//! assert_eq!(doubled.to_string(), "₹2,598");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole rupees.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for discounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as a bare number**: `{"price": 1299}` in catalog JSON
///
/// ## Where Money Flows
/// ```text
/// Product.discount_price ──► CartLine.line_total ──► Store.cart_total
///                                                         │
///                                                         ▼
///                               CheckoutSummary { shipping, tax, discount }
///                                                         │
///                                                         ▼
///                                           Order.total_amount (persisted)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees)
    }

    /// Returns the value in whole rupees.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Applies a rate in basis points and rounds to the nearest rupee.
    ///
    /// Halves round away from zero, which for the non-negative amounts the
    /// storefront deals in is the same as JavaScript's `Math.round`.
    ///
    /// ## Example
    /// ```rust
    /// use khatti_core::money::Money;
    /// use khatti_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_rupees(1200);
    /// let gst = subtotal.calculate_tax(TaxRate::from_bps(1800)); // 18%
    /// assert_eq!(gst.rupees(), 216);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.percent_of_bps(rate.bps())
    }

    /// Returns `self × bps / 10000`, rounded to the nearest rupee.
    ///
    /// Used for GST and percentage coupons alike.
    pub fn percent_of_bps(&self, bps: u32) -> Money {
        // i128 keeps large carts from overflowing the intermediate product
        let scaled = self.0 as i128 * bps as i128;
        let rounded = if scaled >= 0 {
            (scaled + 5000) / 10000
        } else {
            (scaled - 5000) / 10000
        };
        Money(rounded as i64)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows rupees with thousands separators: `₹12,499`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{}₹{}", sign, grouped)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

/// Multiplication by a cart quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_rupees(0).to_string(), "₹0");
        assert_eq!(Money::from_rupees(99).to_string(), "₹99");
        assert_eq!(Money::from_rupees(999).to_string(), "₹999");
        assert_eq!(Money::from_rupees(1299).to_string(), "₹1,299");
        assert_eq!(Money::from_rupees(1234567).to_string(), "₹1,234,567");
        assert_eq!(Money::from_rupees(-120).to_string(), "-₹120");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(1000);
        let b = Money::from_rupees(250);

        assert_eq!((a + b).rupees(), 1250);
        assert_eq!((a - b).rupees(), 750);
        assert_eq!((b * 3u32).rupees(), 750);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.rupees(), 1500);
    }

    #[test]
    fn test_gst_rounding_matches_math_round() {
        let rate = TaxRate::from_bps(1800);

        // 500 × 0.18 = 90 exactly
        assert_eq!(Money::from_rupees(500).calculate_tax(rate).rupees(), 90);
        // 1299 × 0.18 = 233.82 → 234
        assert_eq!(Money::from_rupees(1299).calculate_tax(rate).rupees(), 234);
        // 25 × 0.18 = 4.5 → 5 (half rounds up)
        assert_eq!(Money::from_rupees(25).calculate_tax(rate).rupees(), 5);
    }

    #[test]
    fn test_percent_of_bps() {
        // 10% coupon on 2499 = 249.9 → 250
        assert_eq!(Money::from_rupees(2499).percent_of_bps(1000).rupees(), 250);
        assert_eq!(Money::zero().percent_of_bps(1000), Money::zero());
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_rupees(5).is_positive());
        assert!(!Money::from_rupees(-5).is_positive());
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_rupees(1499)).unwrap();
        assert_eq!(json, "1499");
    }
}
