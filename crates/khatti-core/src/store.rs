//! # Cart / Wishlist Store
//!
//! The shopper's session state: what they intend to buy and what they saved
//! for later. Single source of truth for every page that shows the cart
//! badge, the wishlist heart or a price total.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store Operations                                     │
//! │                                                                         │
//! │  Operation                       State Change               Notice      │
//! │  ─────────                       ────────────               ──────      │
//! │  add_to_cart(p, size, color) ──► qty += 1 on (id,size,color) "Updated   │
//! │                                  or push line with qty 1     quantity"  │
//! │                                                              / "Added"  │
//! │  remove_from_cart(id) ─────────► drop EVERY line of id       "Removed"  │
//! │  update_quantity(id, n) ───────► n outside 1..=99: nothing   -          │
//! │                                  else qty = n on every line  -          │
//! │  clear_cart() ─────────────────► lines.clear()               -          │
//! │  toggle_wishlist(p) ───────────► add or remove by id         Added /    │
//! │                                                              Removed    │
//! │  move_to_cart(id, size, color) ► add_to_cart + unwishlist    "Added"    │
//! │                                                                         │
//! │  cart_count() = Σ qty           cart_total() = Σ discount_price × qty  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every line has quantity in `1..=MAX_LINE_QUANTITY`. Requests outside
//!   that range are ignored, never errors; adding at the cap keeps the cap.
//! - `cart_count` is exact: a `u64` sum of `u32` quantities cannot wrap.
//! - No two lines share `(product id, size, color)`.
//! - No two wishlist entries share a product id.
//!
//! Every operation is total. Notices are queued as a side effect and
//! drained by the presentation layer with [`Store::drain_notices`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;
use crate::MAX_LINE_QUANTITY;

// =============================================================================
// Lines and Entries
// =============================================================================

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineKey {
    pub product_id: String,
    pub size: String,
    pub color: String,
}

impl LineKey {
    pub fn new(
        product_id: impl Into<String>,
        size: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            size: size.into(),
            color: color.into(),
        }
    }
}

/// A product in the cart with the chosen variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product: Product,
    pub size: String,
    pub color: String,
    /// Always ≥ 1.
    pub quantity: u32,
}

impl CartLine {
    /// Discounted unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.discount_price * self.quantity
    }

    pub fn key(&self) -> LineKey {
        LineKey::new(&self.product.id, &self.size, &self.color)
    }

    fn matches(&self, product_id: &str, size: &str, color: &str) -> bool {
        self.product.id == product_id && self.size == size && self.color == color
    }
}

/// A saved product. No variant, no quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WishlistEntry {
    pub product: Product,
}

// =============================================================================
// Notices
// =============================================================================

/// Severity of a notice, mapped to toast styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// User-facing notification emitted by a store operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    ItemAdded { product_id: String },
    QuantityUpdated { product_id: String },
    ItemRemoved { product_id: String },
    WishlistAdded { product_id: String },
    WishlistRemoved { product_id: String },
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::ItemAdded { .. }
            | Notice::QuantityUpdated { .. }
            | Notice::WishlistAdded { .. } => NoticeLevel::Success,
            Notice::ItemRemoved { .. } | Notice::WishlistRemoved { .. } => NoticeLevel::Info,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::ItemAdded { .. } => "Added to cart",
            Notice::QuantityUpdated { .. } => "Updated quantity in cart",
            Notice::ItemRemoved { .. } => "Removed from cart",
            Notice::WishlistAdded { .. } => "Added to wishlist",
            Notice::WishlistRemoved { .. } => "Removed from wishlist",
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Cart lines, wishlist entries and the pending notice queue.
///
/// Starts empty and lives for one session; nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct Store {
    cart: Vec<CartLine>,
    wishlist: Vec<WishlistEntry>,
    notices: Vec<Notice>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Cart lines in insertion order.
    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    /// Wishlist entries in insertion order.
    pub fn wishlist(&self) -> &[WishlistEntry] {
        &self.wishlist
    }

    /// Sum of quantities across all lines.
    pub fn cart_count(&self) -> u64 {
        self.cart.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of discounted price × quantity across all lines.
    pub fn cart_total(&self) -> Money {
        self.cart.iter().map(CartLine::line_total).sum()
    }

    pub fn is_in_wishlist(&self, product_id: &str) -> bool {
        self.wishlist.iter().any(|w| w.product.id == product_id)
    }

    /// Takes every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Adds one unit of the chosen variant, up to [`MAX_LINE_QUANTITY`].
    pub fn add_to_cart(&mut self, product: &Product, size: &str, color: &str) {
        if let Some(line) = self
            .cart
            .iter_mut()
            .find(|l| l.matches(&product.id, size, color))
        {
            line.quantity = (line.quantity + 1).min(MAX_LINE_QUANTITY);
            tracing::debug!(
                product_id = %product.id,
                size,
                color,
                quantity = line.quantity,
                "Cart line incremented"
            );
            self.notices.push(Notice::QuantityUpdated {
                product_id: product.id.clone(),
            });
            return;
        }

        self.cart.push(CartLine {
            product: product.clone(),
            size: size.to_string(),
            color: color.to_string(),
            quantity: 1,
        });
        tracing::debug!(product_id = %product.id, size, color, "Cart line added");
        self.notices.push(Notice::ItemAdded {
            product_id: product.id.clone(),
        });
    }

    /// Removes every line of the product, whatever the size or color.
    ///
    /// The notice is emitted even when nothing was removed.
    pub fn remove_from_cart(&mut self, product_id: &str) {
        self.cart.retain(|l| l.product.id != product_id);
        self.notices.push(Notice::ItemRemoved {
            product_id: product_id.to_string(),
        });
    }

    /// Sets the quantity of every line of the product.
    ///
    /// A quantity below 1 or above [`MAX_LINE_QUANTITY`] leaves the cart
    /// untouched; removal is always an explicit [`Store::remove_from_cart`].
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        let Some(quantity) = line_quantity(quantity) else {
            return;
        };

        for line in self.cart.iter_mut().filter(|l| l.product.id == product_id) {
            line.quantity = quantity;
        }
    }

    /// Removes exactly one line. Emits "Removed from cart" only if it existed.
    pub fn remove_line(&mut self, key: &LineKey) {
        let before = self.cart.len();
        self.cart
            .retain(|l| !l.matches(&key.product_id, &key.size, &key.color));

        if self.cart.len() != before {
            self.notices.push(Notice::ItemRemoved {
                product_id: key.product_id.clone(),
            });
        }
    }

    /// Sets the quantity of exactly one line. Out of range is a no-op.
    pub fn set_line_quantity(&mut self, key: &LineKey, quantity: i64) {
        let Some(quantity) = line_quantity(quantity) else {
            return;
        };

        if let Some(line) = self
            .cart
            .iter_mut()
            .find(|l| l.matches(&key.product_id, &key.size, &key.color))
        {
            line.quantity = quantity;
        }
    }

    /// Empties the cart. Used after a successful checkout.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    // -------------------------------------------------------------------------
    // Wishlist
    // -------------------------------------------------------------------------

    /// Adds the product if absent, removes it if present.
    pub fn toggle_wishlist(&mut self, product: &Product) {
        if self.is_in_wishlist(&product.id) {
            self.wishlist.retain(|w| w.product.id != product.id);
            self.notices.push(Notice::WishlistRemoved {
                product_id: product.id.clone(),
            });
        } else {
            self.wishlist.push(WishlistEntry {
                product: product.clone(),
            });
            self.notices.push(Notice::WishlistAdded {
                product_id: product.id.clone(),
            });
        }
    }

    /// Moves a wishlisted product into the cart with the chosen variant.
    ///
    /// Does nothing if the product is not wishlisted. Both halves happen
    /// under the same `&mut self`, so no caller observes an intermediate state.
    pub fn move_to_cart(&mut self, product_id: &str, size: &str, color: &str) {
        let Some(index) = self.wishlist.iter().position(|w| w.product.id == product_id) else {
            return;
        };

        let entry = self.wishlist.remove(index);
        self.add_to_cart(&entry.product, size, color);
    }
}

fn line_quantity(quantity: i64) -> Option<u32> {
    u32::try_from(quantity)
        .ok()
        .filter(|q| (1..=MAX_LINE_QUANTITY).contains(q))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, discount_price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: String::new(),
            category: "T-Shirts".to_string(),
            brand: "Khatti Originals".to_string(),
            price: Money::from_rupees(discount_price + 100),
            discount_price: Money::from_rupees(discount_price),
            stock: 20,
            images: vec![],
            rating: 4.0,
            review_count: 1,
            sizes: vec!["M".to_string(), "L".to_string()],
            colors: vec!["Black".to_string(), "White".to_string()],
            tags: vec![],
        }
    }

    fn assert_aggregates(store: &Store) {
        let count: u64 = store.cart().iter().map(|l| u64::from(l.quantity)).sum();
        let total: i64 = store
            .cart()
            .iter()
            .map(|l| l.product.discount_price.rupees() * l.quantity as i64)
            .sum();
        assert_eq!(store.cart_count(), count);
        assert_eq!(store.cart_total().rupees(), total);
    }

    #[test]
    fn test_add_remove_scenario() {
        let a = product("A", 500);
        let mut store = Store::new();

        store.add_to_cart(&a, "M", "Black");
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart()[0].quantity, 1);

        store.add_to_cart(&a, "M", "Black");
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart()[0].quantity, 2);
        assert_eq!(store.cart()[0].size, "M");
        assert_eq!(store.cart()[0].color, "Black");

        store.remove_from_cart("A");
        assert!(store.cart().is_empty());

        let notices = store.drain_notices();
        assert_eq!(
            notices.iter().map(Notice::message).collect::<Vec<_>>(),
            vec!["Added to cart", "Updated quantity in cart", "Removed from cart"]
        );
        assert!(store.drain_notices().is_empty());
    }

    #[test]
    fn test_variants_are_distinct_lines() {
        let a = product("A", 500);
        let mut store = Store::new();

        store.add_to_cart(&a, "M", "Black");
        store.add_to_cart(&a, "L", "Black");
        store.add_to_cart(&a, "M", "White");

        assert_eq!(store.cart().len(), 3);
        assert_eq!(store.cart_count(), 3);
        assert_eq!(store.cart_total().rupees(), 1500);
    }

    #[test]
    fn test_remove_from_cart_drops_all_variants_and_always_notifies() {
        let a = product("A", 500);
        let b = product("B", 300);
        let mut store = Store::new();

        store.add_to_cart(&a, "M", "Black");
        store.add_to_cart(&a, "L", "White");
        store.add_to_cart(&b, "M", "Black");
        store.drain_notices();

        store.remove_from_cart("A");
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart()[0].product.id, "B");

        store.remove_from_cart("missing");
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.drain_notices().len(), 2);
    }

    #[test]
    fn test_update_quantity_below_one_is_noop() {
        let a = product("A", 500);
        let mut store = Store::new();
        store.add_to_cart(&a, "M", "Black");
        store.add_to_cart(&a, "M", "Black");
        let before = store.cart().to_vec();

        store.update_quantity("A", 0);
        store.update_quantity("A", -3);

        assert_eq!(store.cart(), before.as_slice());
    }

    #[test]
    fn test_quantity_above_cap_is_noop() {
        let a = product("A", 500);
        let mut store = Store::new();
        store.add_to_cart(&a, "M", "Black");
        store.add_to_cart(&a, "L", "White");
        let before = store.cart().to_vec();

        store.update_quantity("A", i64::MAX);
        store.update_quantity("A", i64::from(MAX_LINE_QUANTITY) + 1);
        store.update_quantity("A", i64::from(u32::MAX));
        store.set_line_quantity(&LineKey::new("A", "M", "Black"), 4_294_967_296);
        assert_eq!(store.cart(), before.as_slice());
        assert_eq!(store.cart_count(), 2);

        store.update_quantity("A", i64::from(MAX_LINE_QUANTITY));
        assert_eq!(store.cart_count(), 2 * u64::from(MAX_LINE_QUANTITY));
        assert_aggregates(&store);
    }

    #[test]
    fn test_add_at_cap_keeps_cap() {
        let a = product("A", 500);
        let mut store = Store::new();
        store.add_to_cart(&a, "M", "Black");
        store.update_quantity("A", i64::from(MAX_LINE_QUANTITY));

        store.add_to_cart(&a, "M", "Black");

        assert_eq!(store.cart()[0].quantity, MAX_LINE_QUANTITY);
        assert_aggregates(&store);
    }

    #[test]
    fn test_update_quantity_sets_every_variant() {
        let a = product("A", 500);
        let b = product("B", 300);
        let mut store = Store::new();
        store.add_to_cart(&a, "M", "Black");
        store.add_to_cart(&a, "L", "White");
        store.add_to_cart(&b, "M", "Black");

        store.update_quantity("A", 4);

        assert_eq!(store.cart()[0].quantity, 4);
        assert_eq!(store.cart()[1].quantity, 4);
        assert_eq!(store.cart()[2].quantity, 1);
        assert_eq!(store.cart_count(), 9);
        assert_eq!(store.cart_total().rupees(), 4 * 500 + 4 * 500 + 300);
        assert_aggregates(&store);
    }

    #[test]
    fn test_line_scoped_operations() {
        let a = product("A", 500);
        let mut store = Store::new();
        store.add_to_cart(&a, "M", "Black");
        store.add_to_cart(&a, "L", "White");
        store.drain_notices();

        let m_black = LineKey::new("A", "M", "Black");
        store.set_line_quantity(&m_black, 3);
        store.set_line_quantity(&m_black, 0);
        assert_eq!(store.cart()[0].quantity, 3);
        assert_eq!(store.cart()[1].quantity, 1);

        store.remove_line(&m_black);
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart()[0].key(), LineKey::new("A", "L", "White"));

        // absent line: no notice
        store.remove_line(&m_black);
        assert_eq!(store.drain_notices().len(), 1);
    }

    #[test]
    fn test_toggle_wishlist_round_trip() {
        let b = product("B", 300);
        let mut store = Store::new();

        store.toggle_wishlist(&b);
        assert!(store.is_in_wishlist("B"));
        assert_eq!(store.wishlist().len(), 1);

        store.toggle_wishlist(&b);
        assert!(!store.is_in_wishlist("B"));
        assert!(store.wishlist().is_empty());

        let notices = store.drain_notices();
        assert_eq!(notices[0].message(), "Added to wishlist");
        assert_eq!(notices[0].level(), NoticeLevel::Success);
        assert_eq!(notices[1].message(), "Removed from wishlist");
        assert_eq!(notices[1].level(), NoticeLevel::Info);
    }

    #[test]
    fn test_move_to_cart() {
        let a = product("A", 500);
        let mut store = Store::new();
        store.toggle_wishlist(&a);
        store.add_to_cart(&a, "L", "White");

        store.move_to_cart("A", "L", "White");

        assert!(!store.is_in_wishlist("A"));
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart()[0].quantity, 2);
        assert_aggregates(&store);
    }

    #[test]
    fn test_move_to_cart_when_not_wishlisted_is_noop() {
        let a = product("A", 500);
        let mut store = Store::new();
        store.add_to_cart(&a, "M", "Black");
        store.drain_notices();

        store.move_to_cart("A", "L", "White");

        assert_eq!(store.cart().len(), 1);
        assert!(store.drain_notices().is_empty());
    }

    #[test]
    fn test_clear_cart_keeps_wishlist() {
        let a = product("A", 500);
        let mut store = Store::new();
        store.add_to_cart(&a, "M", "Black");
        store.toggle_wishlist(&a);

        store.clear_cart();

        assert!(store.cart().is_empty());
        assert_eq!(store.cart_count(), 0);
        assert_eq!(store.cart_total(), Money::zero());
        assert!(store.is_in_wishlist("A"));
    }

    #[test]
    fn test_aggregates_after_mixed_sequence() {
        let a = product("A", 899);
        let b = product("B", 2199);
        let mut store = Store::new();

        store.add_to_cart(&a, "M", "Black");
        store.add_to_cart(&b, "L", "White");
        store.add_to_cart(&a, "M", "Black");
        assert_aggregates(&store);

        store.update_quantity("B", 3);
        assert_aggregates(&store);

        store.remove_from_cart("A");
        assert_aggregates(&store);
        assert_eq!(store.cart_total().rupees(), 3 * 2199);
    }
}
