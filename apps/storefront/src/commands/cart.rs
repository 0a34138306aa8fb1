//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │ Summary  │     │  Placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                  │             │
//! │                   add_to_cart                        place_order        │
//! │                   update_cart_item                   (checkout.rs)      │
//! │                   remove_from_cart                        │             │
//! │                        │                                  │             │
//! │                        ▼                                  ▼             │
//! │                   clear_cart ───────────────────► (back to empty)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items are addressed by product id. Giving both size and color narrows an
//! update or removal to that one line.

use serde::{Deserialize, Serialize};
use tracing::debug;

use khatti_core::{CartLine, LineKey, Money, Store, ValidationError, MAX_LINE_QUANTITY};

use crate::error::ApiError;
use crate::state::{CatalogState, StoreState};

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub image: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        CartLineView {
            product_id: line.product.id.clone(),
            name: line.product.name.clone(),
            image: line.product.primary_image().map(str::to_string),
            size: line.size.clone(),
            color: line.color.clone(),
            quantity: line.quantity,
            unit_price: line.product.discount_price,
            line_total: line.line_total(),
        }
    }
}

/// Cart contents and derived totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLineView>,
    /// Sum of quantities (the navbar badge).
    pub count: u64,
    pub subtotal: Money,
}

impl From<&Store> for CartResponse {
    fn from(store: &Store) -> Self {
        CartResponse {
            lines: store.cart().iter().map(CartLineView::from).collect(),
            count: store.cart_count(),
            subtotal: store.cart_total(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyNowResponse {
    pub cart: CartResponse,
    /// Always true: the caller should open the cart/checkout view.
    pub proceed_to_checkout: bool,
}

// =============================================================================
// Requests
// =============================================================================

/// Add-to-cart request from a product card or product page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    /// Defaults to the first listed size.
    pub size: Option<String>,
    /// Defaults to the first listed color.
    pub color: Option<String>,
    /// Defaults to 1.
    pub quantity: Option<u32>,
}

impl AddToCartRequest {
    pub fn new(product_id: impl Into<String>) -> Self {
        AddToCartRequest {
            product_id: product_id.into(),
            ..Default::default()
        }
    }
}

/// Which cart line(s) an update or removal targets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRef {
    pub product_id: String,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl CartItemRef {
    /// Every line of the product.
    pub fn product(product_id: impl Into<String>) -> Self {
        CartItemRef {
            product_id: product_id.into(),
            ..Default::default()
        }
    }

    /// Exactly one line.
    pub fn line(
        product_id: impl Into<String>,
        size: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        CartItemRef {
            product_id: product_id.into(),
            size: Some(size.into()),
            color: Some(color.into()),
        }
    }

    fn line_key(&self) -> Option<LineKey> {
        match (&self.size, &self.color) {
            (Some(size), Some(color)) => Some(LineKey::new(&self.product_id, size, color)),
            _ => None,
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Gets the current cart contents.
pub fn get_cart(store: &StoreState) -> CartResponse {
    debug!("get_cart command");
    store.with_store(|s| CartResponse::from(s))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Size and color default to the first ones the product lists
/// - A size or color the product doesn't offer is rejected
/// - Quantity `n` adds one unit `n` times; a line never grows past
///   [`MAX_LINE_QUANTITY`]
pub fn add_to_cart(
    catalog: &CatalogState,
    store: &StoreState,
    request: AddToCartRequest,
) -> Result<CartResponse, ApiError> {
    let quantity = request.quantity.unwrap_or(1);
    debug!(product_id = %request.product_id, quantity, "add_to_cart command");

    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_LINE_QUANTITY),
        }
        .into());
    }

    let product = catalog.product(&request.product_id)?;
    let size = pick_variant("size", request.size.as_deref(), &product.sizes)?;
    let color = pick_variant("color", request.color.as_deref(), &product.colors)?;

    Ok(store.with_store_mut(|s| {
        for _ in 0..quantity {
            s.add_to_cart(product, size, color);
        }
        CartResponse::from(&*s)
    }))
}

/// Adds to the cart, then tells the caller to open checkout.
pub fn buy_now(
    catalog: &CatalogState,
    store: &StoreState,
    request: AddToCartRequest,
) -> Result<BuyNowResponse, ApiError> {
    debug!(product_id = %request.product_id, "buy_now command");
    let cart = add_to_cart(catalog, store, request)?;

    Ok(BuyNowResponse {
        cart,
        proceed_to_checkout: true,
    })
}

/// Sets the quantity of a product's lines (or of one line).
///
/// Quantities outside `1..=MAX_LINE_QUANTITY` leave the cart unchanged.
pub fn update_cart_item(store: &StoreState, item: CartItemRef, quantity: i64) -> CartResponse {
    debug!(product_id = %item.product_id, quantity, "update_cart_item command");

    store.with_store_mut(|s| {
        match item.line_key() {
            Some(key) => s.set_line_quantity(&key, quantity),
            None => s.update_quantity(&item.product_id, quantity),
        }
        CartResponse::from(&*s)
    })
}

/// Removes a product's lines (or one line) from the cart.
pub fn remove_from_cart(store: &StoreState, item: CartItemRef) -> CartResponse {
    debug!(product_id = %item.product_id, "remove_from_cart command");

    store.with_store_mut(|s| {
        match item.line_key() {
            Some(key) => s.remove_line(&key),
            None => s.remove_from_cart(&item.product_id),
        }
        CartResponse::from(&*s)
    })
}

/// Clears all items from the cart.
pub fn clear_cart(store: &StoreState) -> CartResponse {
    debug!("clear_cart command");

    store.with_store_mut(|s| {
        s.clear_cart();
        CartResponse::from(&*s)
    })
}

/// Resolves a requested variant against the offered ones.
pub(crate) fn pick_variant<'a>(
    field: &str,
    requested: Option<&str>,
    offered: &'a [String],
) -> Result<&'a str, ApiError> {
    let picked = match requested.map(str::trim) {
        Some(wanted) => offered.iter().find(|o| o.eq_ignore_ascii_case(wanted)),
        None => offered.first(),
    };

    picked.map(String::as_str).ok_or_else(|| {
        ApiError::validation(format!(
            "Unavailable {}: choose one of {}",
            field,
            offered.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use khatti_core::{Catalog, Notice};

    fn setup() -> (CatalogState, StoreState) {
        (CatalogState::new(Catalog::builtin().unwrap()), StoreState::new())
    }

    #[test]
    fn test_add_defaults_to_first_variant() {
        let (catalog, store) = setup();
        let cart = add_to_cart(&catalog, &store, AddToCartRequest::new("1")).unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].size, "S");
        assert_eq!(cart.lines[0].color, "Black");
        assert_eq!(cart.count, 1);
        assert_eq!(cart.subtotal, Money::from_rupees(899));
    }

    #[test]
    fn test_add_quantity_repeats_add() {
        let (catalog, store) = setup();
        let request = AddToCartRequest {
            quantity: Some(3),
            size: Some("m".to_string()),
            ..AddToCartRequest::new("1")
        };
        let cart = add_to_cart(&catalog, &store, request).unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].size, "M");
        assert_eq!(cart.lines[0].quantity, 3);

        let notices = store.drain_notices();
        assert_eq!(notices.len(), 3);
        assert!(matches!(notices[0], Notice::ItemAdded { .. }));
        assert!(matches!(notices[2], Notice::QuantityUpdated { .. }));
    }

    #[test]
    fn test_add_rejects_unknown_variant_and_product() {
        let (catalog, store) = setup();
        let request = AddToCartRequest {
            size: Some("XXS".to_string()),
            ..AddToCartRequest::new("1")
        };
        let err = add_to_cart(&catalog, &store, request).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_to_cart(&catalog, &store, AddToCartRequest::new("404")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let zero = AddToCartRequest {
            quantity: Some(0),
            ..AddToCartRequest::new("1")
        };
        assert!(add_to_cart(&catalog, &store, zero).is_err());
        assert_eq!(get_cart(&store).count, 0);
    }

    #[test]
    fn test_buy_now() {
        let (catalog, store) = setup();
        let response = buy_now(&catalog, &store, AddToCartRequest::new("7")).unwrap();
        assert!(response.proceed_to_checkout);
        assert_eq!(response.cart.count, 1);
    }

    #[test]
    fn test_update_and_remove_by_product_and_line() {
        let (catalog, store) = setup();
        for size in ["M", "L"] {
            let request = AddToCartRequest {
                size: Some(size.to_string()),
                ..AddToCartRequest::new("1")
            };
            add_to_cart(&catalog, &store, request).unwrap();
        }

        let cart = update_cart_item(&store, CartItemRef::line("1", "L", "Black"), 4);
        assert_eq!(cart.count, 5);

        let cart = update_cart_item(&store, CartItemRef::product("1"), 0);
        assert_eq!(cart.count, 5);

        let cart = update_cart_item(&store, CartItemRef::product("1"), i64::MAX);
        assert_eq!(cart.count, 5);

        let cart = update_cart_item(&store, CartItemRef::product("1"), 2);
        assert_eq!(cart.count, 4);

        let cart = remove_from_cart(&store, CartItemRef::line("1", "M", "Black"));
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].size, "L");

        let cart = remove_from_cart(&store, CartItemRef::product("1"));
        assert!(cart.lines.is_empty());
    }

    #[test]
    fn test_clear_cart() {
        let (catalog, store) = setup();
        add_to_cart(&catalog, &store, AddToCartRequest::new("3")).unwrap();
        let cart = clear_cart(&store);
        assert_eq!(cart.count, 0);
        assert_eq!(cart.subtotal, Money::zero());
    }
}
