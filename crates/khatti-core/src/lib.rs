//! # khatti-core: Pure Business Logic for the Khatti Storefront
//!
//! This crate is the **heart** of the storefront. It contains the shopper's
//! cart/wishlist state, the catalog query engine and checkout pricing as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Khatti Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront Shell / Web UI                    │   │
//! │  │   Browse ──► Product ──► Cart ──► Checkout ──► Order History    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Storefront Commands                          │   │
//! │  │    browse, add_to_cart, toggle_wishlist, place_order, etc.      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ khatti-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │ catalog │ │  store  │ │ pricing │ │ orders  │ │  money  │  │   │
//! │  │   │ filter  │ │  cart   │ │  GST    │ │ assemble│ │  ₹ int  │  │   │
//! │  │   │ sort    │ │ wishlist│ │ coupons │ │  join   │ │         │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    khatti-db (Database Layer)                   │   │
//! │  │           Accounts, password resets, orders, order items        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, UserAccount, etc.)
//! - [`money`] - Money type with integer arithmetic (whole rupees)
//! - [`catalog`] - Static catalog with filtering and sorting
//! - [`store`] - The cart/wishlist state container
//! - [`pricing`] - Shipping, GST and coupon rules
//! - [`orders`] - Order assembly from the cart and history joins
//! - [`collaborators`] - Traits for the auth and order backends
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use khatti_core::{Catalog, PricingRules, Store};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let product = catalog.products().first().unwrap();
//!
//! let mut store = Store::new();
//! store.add_to_cart(product, "M", "Black");
//! store.add_to_cart(product, "M", "Black");
//! assert_eq!(store.cart_count(), 2);
//!
//! let summary = PricingRules::default().summarize(store.cart_total(), None);
//! assert_eq!(summary.subtotal, store.cart_total());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod collaborators;
pub mod error;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, CatalogQuery, SortBy};
pub use collaborators::{AuthProvider, CollaboratorResult, OrderBackend};
pub use error::{CollaboratorError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{AppliedCoupon, CheckoutSummary, PricingRules};
pub use store::{CartLine, LineKey, Notice, NoticeLevel, Store, WishlistEntry};
pub use types::*;
pub use validation::ValidationResult;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Upper bound of the price filter on the listing page (in rupees).
pub const MAX_PRICE_FILTER: i64 = 20_000;

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Products shown in each of the home page's featured and trending rows.
pub const HOME_SECTION_LIMIT: usize = 4;

/// Number of related products shown under a product detail.
pub const RELATED_PRODUCTS_LIMIT: usize = 4;

/// Stock level above which a product is simply shown as "In Stock".
pub const LOW_STOCK_THRESHOLD: u32 = 10;
