//! # Collaborators
//!
//! Narrow request/response contracts for the two external services the
//! storefront talks to. The core never implements them; `khatti-db`
//! provides the SQLite implementations and tests can plug in fakes.
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────────────┐
//! │  storefront command  │──────► │  AuthProvider                    │
//! │  (sign_in, sign_up,  │        │  sign_up / sign_in / reset       │
//! │   place_order, ...)  │        └──────────────────────────────────┘
//! │                      │        ┌──────────────────────────────────┐
//! │                      │──────► │  OrderBackend                    │
//! └──────────────────────┘        │  create_order / attach_items     │
//!                                 │  orders_for_user / items_for_... │
//!                                 └──────────────────────────────────┘
//! ```
//!
//! Every call is a single attempt. Errors are [`CollaboratorError`], whose
//! `Display` is the message shown to the shopper.

use crate::error::CollaboratorError;
use crate::types::{NewOrder, NewOrderItem, Order, OrderItem, UserAccount};

/// Result of a collaborator call.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Account service: registration, credential checks and password resets.
///
/// The current identity and sign-out live in the caller's session state,
/// not here.
pub trait AuthProvider {
    /// Registers a new account and returns it.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> CollaboratorResult<UserAccount>;

    /// Checks credentials and returns the matching account.
    async fn sign_in(&self, email: &str, password: &str) -> CollaboratorResult<UserAccount>;

    /// Starts a password reset for the email.
    ///
    /// Succeeds for unknown emails too, so callers cannot probe which
    /// addresses have accounts.
    async fn request_password_reset(&self, email: &str) -> CollaboratorResult<()>;
}

/// Order persistence service.
pub trait OrderBackend {
    /// Stores an order header and returns it with its id and timestamp.
    async fn create_order(&self, order: NewOrder) -> CollaboratorResult<Order>;

    /// Stores the items of an existing order.
    async fn attach_items(
        &self,
        order_id: &str,
        items: Vec<NewOrderItem>,
    ) -> CollaboratorResult<Vec<OrderItem>>;

    /// Orders of a user, most recent first.
    async fn orders_for_user(&self, user_id: &str) -> CollaboratorResult<Vec<Order>>;

    /// Items belonging to any of the given orders, in no particular order.
    async fn items_for_orders(&self, order_ids: &[String]) -> CollaboratorResult<Vec<OrderItem>>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::orders::{attach_items, build_order};
    use crate::pricing::PricingRules;
    use crate::store::Store;
    use crate::types::Product;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Keeps everything in vectors; ids are sequential.
    #[derive(Default)]
    struct MemoryOrders {
        orders: Mutex<Vec<Order>>,
        items: Mutex<Vec<OrderItem>>,
    }

    impl OrderBackend for MemoryOrders {
        async fn create_order(&self, order: NewOrder) -> CollaboratorResult<Order> {
            let mut orders = self.orders.lock().unwrap();
            let created = Order {
                id: format!("order-{}", orders.len() + 1),
                user_id: order.user_id,
                total_amount: order.total_amount,
                shipping_amount: order.shipping_amount,
                tax_amount: order.tax_amount,
                discount_amount: order.discount_amount,
                payment_status: order.payment_status,
                order_status: order.order_status,
                shipping_address: order.shipping_address,
                coupon_code: order.coupon_code,
                created_at: Utc::now(),
            };
            orders.push(created.clone());
            Ok(created)
        }

        async fn attach_items(
            &self,
            order_id: &str,
            items: Vec<NewOrderItem>,
        ) -> CollaboratorResult<Vec<OrderItem>> {
            let mut stored = self.items.lock().unwrap();
            let base = stored.len();
            let created: Vec<OrderItem> = items
                .into_iter()
                .enumerate()
                .map(|(n, i)| OrderItem {
                    id: format!("item-{}", base + n + 1),
                    order_id: order_id.to_string(),
                    product_id: i.product_id,
                    product_name: i.product_name,
                    product_image: i.product_image,
                    size: i.size,
                    color: i.color,
                    quantity: i.quantity,
                    price: i.price,
                })
                .collect();
            stored.extend(created.iter().cloned());
            Ok(created)
        }

        async fn orders_for_user(&self, user_id: &str) -> CollaboratorResult<Vec<Order>> {
            let orders = self.orders.lock().unwrap();
            Ok(orders
                .iter()
                .rev()
                .filter(|o| o.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn items_for_orders(
            &self,
            order_ids: &[String],
        ) -> CollaboratorResult<Vec<OrderItem>> {
            let items = self.items.lock().unwrap();
            Ok(items
                .iter()
                .filter(|i| order_ids.contains(&i.order_id))
                .cloned()
                .collect())
        }
    }

    fn product() -> Product {
        Product {
            id: "7".to_string(),
            name: "Bandra Low-Top Sneakers".to_string(),
            description: String::new(),
            category: "Sneakers".to_string(),
            brand: "Pav Bhaji Co".to_string(),
            price: Money::from_rupees(5999),
            discount_price: Money::from_rupees(4499),
            stock: 19,
            images: vec!["bandra-1.jpg".to_string()],
            rating: 4.8,
            review_count: 402,
            sizes: vec!["UK 8".to_string()],
            colors: vec!["White".to_string()],
            tags: vec![],
        }
    }

    async fn place(backend: &impl OrderBackend, store: &Store) -> CollaboratorResult<Order> {
        let summary = PricingRules::default().summarize(store.cart_total(), None);
        let (new_order, items) = build_order("u1", store.cart(), &summary)
            .map_err(|e| CollaboratorError::rejected(e.to_string()))?;
        let order = backend.create_order(new_order).await?;
        backend.attach_items(&order.id, items).await?;
        Ok(order)
    }

    #[tokio::test]
    async fn test_place_and_list_through_backend() {
        let backend = MemoryOrders::default();
        let mut store = Store::new();
        store.add_to_cart(&product(), "UK 8", "White");

        let first = place(&backend, &store).await.unwrap();
        store.add_to_cart(&product(), "UK 8", "White");
        let second = place(&backend, &store).await.unwrap();

        let orders = backend.orders_for_user("u1").await.unwrap();
        let ids: Vec<String> = orders.iter().map(|o| o.id.clone()).collect();
        let items = backend.items_for_orders(&ids).await.unwrap();
        let history = attach_items(orders, items);

        assert_eq!(history[0].order.id, second.id);
        assert_eq!(history[1].order.id, first.id);
        assert_eq!(history[0].items[0].quantity, 2);
        assert_eq!(history[0].items[0].price.rupees(), 8998);
        assert!(backend.orders_for_user("someone-else").await.unwrap().is_empty());
    }
}
