//! # Checkout Commands
//!
//! Coupon, order summary and order placement.
//!
//! ## Place Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place_order                                                            │
//! │       │                                                                 │
//! │       ├── no signed-in user ──► "Please sign in to place an order"      │
//! │       ├── empty cart ─────────► "Your cart is empty"                    │
//! │       ▼                                                                 │
//! │  summarize(subtotal, coupon) ──► build_order ──► NewOrder + items        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderBackend::create_order ──► OrderBackend::attach_items              │
//! │       │                              │                                  │
//! │       │ error: cart kept,            │ ok: cart cleared, coupon         │
//! │       │ error toast                  │ cleared, "Order placed           │
//! │       ▼                              ▼ successfully!"                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use khatti_core::orders::build_order;
use khatti_core::{
    AppliedCoupon, CheckoutSummary, CollaboratorError, CoreError, OrderBackend, OrderWithItems,
};

use crate::commands::cart::CartResponse;
use crate::error::ApiError;
use crate::state::{CheckoutState, ConfigState, SessionState, StoreState, Toast, ToastState};

pub const SIGN_IN_TO_ORDER: &str = "Please sign in to place an order";
pub const ORDER_PLACED: &str = "Order placed successfully!";
const ORDER_FAILED: &str = "Failed to place order";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutQuote {
    pub cart: CartResponse,
    pub summary: CheckoutSummary,
    pub coupon: Option<AppliedCoupon>,
    /// GST rate for the summary label, e.g. 18.0
    pub tax_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    /// Short reference such as `#3F2A9C1E`.
    pub reference: String,
    pub order: OrderWithItems,
}

/// Order summary for the current cart and coupon.
pub fn checkout_quote(
    config: &ConfigState,
    store: &StoreState,
    checkout: &CheckoutState,
) -> CheckoutQuote {
    debug!("checkout_quote command");

    let rules = config.pricing_rules();
    let coupon = checkout.coupon();
    let cart = store.with_store(|s| CartResponse::from(s));
    let summary = rules.summarize(cart.subtotal, coupon.as_ref());

    CheckoutQuote {
        cart,
        summary,
        coupon,
        tax_percent: rules.tax_rate.percentage(),
    }
}

/// Applies a coupon code. Unknown codes are rejected and the previous
/// coupon, if any, stays applied.
pub fn apply_coupon(
    config: &ConfigState,
    store: &StoreState,
    checkout: &CheckoutState,
    code: &str,
) -> Result<CheckoutQuote, ApiError> {
    debug!(code = %code, "apply_coupon command");

    let coupon = config.pricing_rules().apply_coupon(code)?;
    checkout.set_coupon(coupon);

    Ok(checkout_quote(config, store, checkout))
}

/// Places an order for the cart as it stands.
///
/// ## Behavior
/// - Requires a signed-in shopper
/// - The order is recorded as paid and pending fulfilment
/// - On success the cart and coupon are cleared
/// - On any collaborator failure the cart is left as it was
pub async fn place_order(
    orders: &impl OrderBackend,
    config: &ConfigState,
    session: &SessionState,
    store: &StoreState,
    checkout: &CheckoutState,
    toasts: &ToastState,
) -> Result<PlaceOrderResponse, ApiError> {
    debug!("place_order command");

    let user = session.require_user(SIGN_IN_TO_ORDER)?;

    let lines = store.with_store(|s| s.cart().to_vec());
    if lines.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let summary = config
        .pricing_rules()
        .summarize(lines.iter().map(|l| l.line_total()).sum(), checkout.coupon().as_ref());
    let (new_order, new_items) = build_order(&user.id, &lines, &summary)?;

    let order = orders
        .create_order(new_order)
        .await
        .map_err(order_failure)?;
    let items = orders
        .attach_items(&order.id, new_items)
        .await
        .map_err(order_failure)?;

    store.with_store_mut(|s| s.clear_cart());
    checkout.clear();
    toasts.push(Toast::success(ORDER_PLACED));

    info!(
        order_id = %order.id,
        user_id = %user.id,
        total = %order.total_amount,
        items = items.len(),
        "Order placed"
    );

    Ok(PlaceOrderResponse {
        reference: order.short_ref(),
        order: OrderWithItems { order, items },
    })
}

fn order_failure(err: CollaboratorError) -> ApiError {
    warn!(error = %err, "Order placement failed");

    if err.to_string().trim().is_empty() {
        return ApiError::from(CollaboratorError::unavailable(ORDER_FAILED));
    }
    ApiError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::{add_to_cart, AddToCartRequest};
    use crate::error::ErrorCode;
    use crate::state::CatalogState;
    use chrono::Utc;
    use khatti_core::{
        AuthProvider, Catalog, CollaboratorResult, Money, NewOrder, NewOrderItem, Order, OrderItem,
        UserAccount,
    };
    use khatti_db::{Database, DbConfig};

    struct Fixture {
        catalog: CatalogState,
        config: ConfigState,
        session: SessionState,
        store: StoreState,
        checkout: CheckoutState,
        toasts: ToastState,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                catalog: CatalogState::new(Catalog::builtin().unwrap()),
                config: ConfigState::default(),
                session: SessionState::new(),
                store: StoreState::new(),
                checkout: CheckoutState::new(),
                toasts: ToastState::new(),
            }
        }

        fn add(&self, product_id: &str, size: &str, color: &str) {
            let request = AddToCartRequest {
                size: Some(size.to_string()),
                color: Some(color.to_string()),
                ..AddToCartRequest::new(product_id)
            };
            add_to_cart(&self.catalog, &self.store, request).unwrap();
        }

        async fn place(&self, orders: &impl OrderBackend) -> Result<PlaceOrderResponse, ApiError> {
            place_order(
                orders,
                &self.config,
                &self.session,
                &self.store,
                &self.checkout,
                &self.toasts,
            )
            .await
        }
    }

    /// Order backend that is always down.
    struct BrokenOrders;

    impl OrderBackend for BrokenOrders {
        async fn create_order(&self, _order: NewOrder) -> CollaboratorResult<Order> {
            Err(CollaboratorError::unavailable("Order service unavailable"))
        }

        async fn attach_items(
            &self,
            _order_id: &str,
            _items: Vec<NewOrderItem>,
        ) -> CollaboratorResult<Vec<OrderItem>> {
            Err(CollaboratorError::unavailable(""))
        }

        async fn orders_for_user(&self, _user_id: &str) -> CollaboratorResult<Vec<Order>> {
            Ok(Vec::new())
        }

        async fn items_for_orders(&self, _ids: &[String]) -> CollaboratorResult<Vec<OrderItem>> {
            Ok(Vec::new())
        }
    }

    fn shopper() -> UserAccount {
        UserAccount {
            id: "u-1".to_string(),
            email: "asha@example.com".to_string(),
            full_name: "Asha".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_quote_small_cart_pays_shipping() {
        let fx = Fixture::new();
        fx.add("11", "Free Size", "Black");
        fx.add("11", "Free Size", "Black");

        let quote = checkout_quote(&fx.config, &fx.store, &fx.checkout);
        assert_eq!(quote.summary.subtotal, Money::from_rupees(1098));
        assert_eq!(quote.summary.shipping, Money::zero());

        fx.store.with_store_mut(|s| s.update_quantity("11", 1));
        let quote = checkout_quote(&fx.config, &fx.store, &fx.checkout);
        assert_eq!(quote.summary.subtotal, Money::from_rupees(549));
        assert_eq!(quote.summary.shipping, Money::from_rupees(99));
        assert_eq!(quote.summary.tax, Money::from_rupees(99));
        assert_eq!(quote.summary.total, Money::from_rupees(747));
        assert_eq!(quote.tax_percent, 18.0);
    }

    #[test]
    fn test_apply_coupon() {
        let fx = Fixture::new();
        fx.add("1", "M", "Black");

        let quote = apply_coupon(&fx.config, &fx.store, &fx.checkout, " khatti10 ").unwrap();
        assert_eq!(quote.coupon.as_ref().map(|c| c.code.as_str()), Some("KHATTI10"));
        assert_eq!(quote.summary.discount, Money::from_rupees(90));

        let err = apply_coupon(&fx.config, &fx.store, &fx.checkout, "FREEBIE").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Invalid coupon code: FREEBIE");
        assert!(fx.checkout.coupon().is_some());
    }

    #[tokio::test]
    async fn test_place_order_requires_sign_in() {
        let fx = Fixture::new();
        fx.add("1", "M", "Black");

        let err = fx.place(&BrokenOrders).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
        assert_eq!(err.message, "Please sign in to place an order");
        assert_eq!(fx.store.with_store(|s| s.cart_count()), 1);
    }

    #[tokio::test]
    async fn test_place_order_empty_cart() {
        let fx = Fixture::new();
        fx.session.sign_in(shopper());

        let err = fx.place(&BrokenOrders).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_place_order_failure_keeps_cart() {
        let fx = Fixture::new();
        fx.session.sign_in(shopper());
        fx.add("1", "M", "Black");
        fx.toasts.drain();

        let err = fx.place(&BrokenOrders).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ServiceUnavailable);
        assert_eq!(err.message, "Order service unavailable");
        assert_eq!(fx.store.with_store(|s| s.cart_count()), 1);
        assert!(fx.toasts.drain().is_empty());
    }

    #[tokio::test]
    async fn test_place_order_success_clears_cart() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let account = db.sign_up("asha@example.com", "khatti123", "Asha").await.unwrap();

        let fx = Fixture::new();
        fx.session.sign_in(account.clone());
        fx.add("1", "M", "Black");
        fx.add("1", "M", "Black");
        fx.add("4", "S", "Black");
        apply_coupon(&fx.config, &fx.store, &fx.checkout, "KHATTI10").unwrap();
        let expected = checkout_quote(&fx.config, &fx.store, &fx.checkout).summary;

        let placed = fx.place(&db).await.unwrap();
        assert!(placed.reference.starts_with('#'));
        assert_eq!(placed.order.order.total_amount, expected.total);
        assert_eq!(placed.order.order.coupon_code.as_deref(), Some("KHATTI10"));
        assert_eq!(placed.order.items.len(), 2);

        assert_eq!(fx.store.with_store(|s| s.cart_count()), 0);
        assert!(fx.checkout.coupon().is_none());
        assert_eq!(fx.toasts.drain(), vec![Toast::success("Order placed successfully!")]);

        let history = db.orders_for_user(&account.id).await.unwrap();
        assert_eq!(history.len(), 1);
    }
}
