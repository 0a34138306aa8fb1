//! # Checkout Pricing
//!
//! Turns a cart subtotal into the order summary shown on the cart page.
//!
//! ## Order Summary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Subtotal          Σ discount_price × qty                               │
//! │  Shipping          0 if subtotal ≥ ₹999, else ₹99                       │
//! │  GST (18%)         round(subtotal × 0.18)                               │
//! │  Discount          round(subtotal × coupon %)  (KHATTI10 → 10%)         │
//! │  ─────────────────────────────────────────────                          │
//! │  Total             subtotal + shipping + tax − discount                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tax and discount are both computed on the subtotal, not on each other.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::TaxRate;
use crate::validation::{validate_coupon_code, ValidationResult};

/// Default order value from which shipping is free.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Money = Money::from_rupees(999);

/// Default flat shipping fee below the threshold.
pub const DEFAULT_SHIPPING_FEE: Money = Money::from_rupees(99);

/// Default GST rate (18%).
pub const DEFAULT_TAX_RATE: TaxRate = TaxRate::from_bps(1800);

// =============================================================================
// Coupon
// =============================================================================

/// A coupon accepted by [`PricingRules::apply_coupon`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppliedCoupon {
    /// Normalized (upper-case) code.
    pub code: String,
    /// Discount in basis points of the subtotal.
    pub discount_bps: u32,
}

// =============================================================================
// Summary
// =============================================================================

/// Checkout breakdown for a given subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutSummary {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
    pub coupon_code: Option<String>,
}

impl CheckoutSummary {
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Shipping, tax and coupon configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingRules {
    pub free_shipping_threshold: Money,
    pub shipping_fee: Money,
    pub tax_rate: TaxRate,
    /// Code (upper-case) → discount in basis points.
    pub coupons: BTreeMap<String, u32>,
}

impl Default for PricingRules {
    fn default() -> Self {
        let mut coupons = BTreeMap::new();
        coupons.insert("KHATTI10".to_string(), 1000);

        Self {
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            shipping_fee: DEFAULT_SHIPPING_FEE,
            tax_rate: DEFAULT_TAX_RATE,
            coupons,
        }
    }
}

impl PricingRules {
    /// Shipping charged for a subtotal.
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal >= self.free_shipping_threshold {
            Money::zero()
        } else {
            self.shipping_fee
        }
    }

    /// Looks up a coupon code, case-insensitively and ignoring surrounding
    /// whitespace.
    ///
    /// ## Example
    /// ```rust
    /// use khatti_core::PricingRules;
    ///
    /// let rules = PricingRules::default();
    /// assert_eq!(rules.apply_coupon("khatti10").unwrap().code, "KHATTI10");
    /// assert!(rules.apply_coupon("FREEBIE").is_err());
    /// ```
    pub fn apply_coupon(&self, code: &str) -> ValidationResult<AppliedCoupon> {
        let code = validate_coupon_code(code)?;

        match self.coupons.get(&code) {
            Some(&discount_bps) => Ok(AppliedCoupon { code, discount_bps }),
            None => Err(ValidationError::UnknownCoupon(code)),
        }
    }

    /// Computes the order summary.
    pub fn summarize(&self, subtotal: Money, coupon: Option<&AppliedCoupon>) -> CheckoutSummary {
        let shipping = self.shipping_for(subtotal);
        let tax = subtotal.calculate_tax(self.tax_rate);
        let discount = coupon
            .map(|c| subtotal.percent_of_bps(c.discount_bps))
            .unwrap_or_default();

        CheckoutSummary {
            subtotal,
            shipping,
            tax,
            discount,
            total: subtotal + shipping + tax - discount,
            coupon_code: coupon.map(|c| c.code.clone()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_shipping_above_threshold() {
        let rules = PricingRules::default();
        let summary = rules.summarize(Money::from_rupees(1200), None);

        assert_eq!(summary.shipping, Money::zero());
        assert_eq!(summary.tax.rupees(), 216);
        assert_eq!(summary.discount, Money::zero());
        assert_eq!(summary.total.rupees(), 1416);
        assert!(summary.is_free_shipping());
    }

    #[test]
    fn test_shipping_fee_below_threshold() {
        let rules = PricingRules::default();
        let summary = rules.summarize(Money::from_rupees(500), None);

        assert_eq!(summary.shipping.rupees(), 99);
        assert_eq!(summary.tax.rupees(), 90);
        assert_eq!(summary.total.rupees(), 689);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let rules = PricingRules::default();
        assert!(rules.shipping_for(Money::from_rupees(999)).is_zero());
        assert_eq!(rules.shipping_for(Money::from_rupees(998)).rupees(), 99);
    }

    #[test]
    fn test_coupon_discount() {
        let rules = PricingRules::default();
        let coupon = rules.apply_coupon("  Khatti10 ").unwrap();
        let summary = rules.summarize(Money::from_rupees(1299), Some(&coupon));

        // tax round(233.82) = 234, discount round(129.9) = 130
        assert_eq!(summary.tax.rupees(), 234);
        assert_eq!(summary.discount.rupees(), 130);
        assert_eq!(summary.total.rupees(), 1299 + 234 - 130);
        assert_eq!(summary.coupon_code.as_deref(), Some("KHATTI10"));
    }

    #[test]
    fn test_unknown_coupon_rejected() {
        let rules = PricingRules::default();
        assert!(matches!(
            rules.apply_coupon("SAVE50"),
            Err(ValidationError::UnknownCoupon(code)) if code == "SAVE50"
        ));
        assert!(rules.apply_coupon("").is_err());
    }

    #[test]
    fn test_custom_rules() {
        let rules = PricingRules {
            free_shipping_threshold: Money::from_rupees(2000),
            shipping_fee: Money::from_rupees(49),
            tax_rate: TaxRate::from_bps(500),
            coupons: BTreeMap::new(),
        };
        let summary = rules.summarize(Money::from_rupees(1000), None);
        assert_eq!(summary.shipping.rupees(), 49);
        assert_eq!(summary.tax.rupees(), 50);
        assert!(rules.apply_coupon("KHATTI10").is_err());
    }
}
