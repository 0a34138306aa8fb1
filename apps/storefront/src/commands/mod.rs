//! # Commands Module
//!
//! One function per storefront action. Each takes only the state it needs
//! and returns a serializable response or an [`ApiError`](crate::error::ApiError).
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog.rs   home, browse, product_detail                              │
//! │  cart.rs      get_cart, add_to_cart, buy_now, update_cart_item,         │
//! │               remove_from_cart, clear_cart                              │
//! │  wishlist.rs  get_wishlist, toggle_wishlist, move_to_cart               │
//! │  checkout.rs  checkout_quote, apply_coupon, place_order                 │
//! │  orders.rs    order_history                                             │
//! │  auth.rs      sign_up, sign_in, sign_out, reset_password,               │
//! │               complete_password_reset, current_user                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store operations leave notices in the store; the caller drains them into
//! the toast queue after each command.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod wishlist;
