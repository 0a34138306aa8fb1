//! # Checkout State
//!
//! The coupon applied on the cart page. It survives cart edits and is
//! cleared once an order is placed.

use std::sync::{Arc, Mutex, PoisonError};

use khatti_core::AppliedCoupon;

#[derive(Debug, Clone, Default)]
pub struct CheckoutState {
    coupon: Arc<Mutex<Option<AppliedCoupon>>>,
}

impl CheckoutState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coupon(&self) -> Option<AppliedCoupon> {
        self.coupon
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_coupon(&self, coupon: AppliedCoupon) {
        *self.coupon.lock().unwrap_or_else(PoisonError::into_inner) = Some(coupon);
    }

    pub fn clear(&self) {
        *self.coupon.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
