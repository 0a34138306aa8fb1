//! # Wishlist Commands

use serde::Serialize;
use tracing::debug;

use khatti_core::Store;

use crate::commands::cart::{pick_variant, CartResponse};
use crate::commands::catalog::ProductCard;
use crate::error::ApiError;
use crate::state::{CatalogState, StoreState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResponse {
    pub items: Vec<ProductCard>,
    pub count: usize,
}

impl From<&Store> for WishlistResponse {
    fn from(store: &Store) -> Self {
        WishlistResponse {
            items: store.wishlist().iter().map(|w| ProductCard::from(&w.product)).collect(),
            count: store.wishlist().len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleWishlistResponse {
    /// Whether the product is wishlisted after the toggle.
    pub wishlisted: bool,
    pub wishlist: WishlistResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveToCartResponse {
    pub cart: CartResponse,
    pub wishlist: WishlistResponse,
}

pub fn get_wishlist(store: &StoreState) -> WishlistResponse {
    debug!("get_wishlist command");
    store.with_store(|s| WishlistResponse::from(s))
}

/// Heart button: saves the product, or unsaves it.
pub fn toggle_wishlist(
    catalog: &CatalogState,
    store: &StoreState,
    product_id: &str,
) -> Result<ToggleWishlistResponse, ApiError> {
    debug!(product_id = %product_id, "toggle_wishlist command");
    let product = catalog.product(product_id)?;

    Ok(store.with_store_mut(|s| {
        s.toggle_wishlist(product);
        ToggleWishlistResponse {
            wishlisted: s.is_in_wishlist(&product.id),
            wishlist: WishlistResponse::from(&*s),
        }
    }))
}

/// Moves a saved product into the cart, with the first listed size and
/// color unless given. Products not on the wishlist are left alone.
pub fn move_to_cart(
    catalog: &CatalogState,
    store: &StoreState,
    product_id: &str,
    size: Option<&str>,
    color: Option<&str>,
) -> Result<MoveToCartResponse, ApiError> {
    debug!(product_id = %product_id, "move_to_cart command");
    let product = catalog.product(product_id)?;
    let size = pick_variant("size", size, &product.sizes)?;
    let color = pick_variant("color", color, &product.colors)?;

    Ok(store.with_store_mut(|s| {
        s.move_to_cart(&product.id, size, color);
        MoveToCartResponse {
            cart: CartResponse::from(&*s),
            wishlist: WishlistResponse::from(&*s),
        }
    }))
}
