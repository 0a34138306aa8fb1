//! # Store State
//!
//! The cart and wishlist of the current browsing session.
//!
//! ## Thread Safety
//! The store is wrapped in `Arc<Mutex<T>>`: commands may run on any runtime
//! thread, and only one of them should mutate the store at a time.
//!
//! ## Store Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shell input              Command                 Store change          │
//! │  ───────────              ───────                 ────────────          │
//! │  add 1 --size M ────────► add_to_cart() ────────► line qty +1 / push    │
//! │  qty 1 3 ───────────────► update_cart_item() ───► qty = 3 (if ≥ 1)      │
//! │  rm 1 ──────────────────► remove_from_cart() ───► lines for id dropped  │
//! │  heart 4 ───────────────► toggle_wishlist() ────► toggled               │
//! │  cart ──────────────────► get_cart() ───────────► (read only)           │
//! │                                                                         │
//! │  Every change queues a Notice; the shell drains them into toasts.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use khatti_core::{Notice, Store};

/// Thread-safe wrapper around the session's [`Store`].
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    store: Arc<Mutex<Store>>,
}

impl StoreState {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = store_state.with_store(|s| s.cart_total());
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Store) -> R,
    {
        // Store operations are total, so a poisoned lock still holds a
        // consistent store.
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&store)
    }

    /// Executes a function with write access to the store.
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Store) -> R,
    {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    /// Takes the notices queued since the last call.
    pub fn drain_notices(&self) -> Vec<Notice> {
        self.with_store_mut(Store::drain_notices)
    }
}
