//! # Order History Commands

use serde::Serialize;
use tracing::debug;

use khatti_core::orders::attach_items;
use khatti_core::{OrderBackend, OrderWithItems};

use crate::error::ApiError;
use crate::state::SessionState;

pub const SIGN_IN_FOR_ORDERS: &str = "Please sign in to view your orders";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryResponse {
    /// Most recent first.
    pub orders: Vec<OrderWithItems>,
}

/// The signed-in shopper's orders with their items.
pub async fn order_history(
    orders: &impl OrderBackend,
    session: &SessionState,
) -> Result<OrderHistoryResponse, ApiError> {
    let user = session.require_user(SIGN_IN_FOR_ORDERS)?;
    debug!(user_id = %user.id, "order_history command");

    let headers = orders.orders_for_user(&user.id).await?;
    if headers.is_empty() {
        return Ok(OrderHistoryResponse { orders: Vec::new() });
    }

    let ids: Vec<String> = headers.iter().map(|o| o.id.clone()).collect();
    let items = orders.items_for_orders(&ids).await?;

    Ok(OrderHistoryResponse {
        orders: attach_items(headers, items),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use khatti_core::orders::build_order;
    use khatti_core::{AuthProvider, Catalog, PricingRules, Store};
    use khatti_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_requires_sign_in() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = order_history(&db, &SessionState::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[tokio::test]
    async fn test_history_newest_first_with_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let account = db.sign_up("ravi@example.com", "khatti123", "Ravi").await.unwrap();
        let session = SessionState::new();
        session.sign_in(account.clone());

        assert!(order_history(&db, &session).await.unwrap().orders.is_empty());

        let catalog = Catalog::builtin().unwrap();
        let rules = PricingRules::default();
        let mut placed = Vec::new();
        for id in ["2", "9"] {
            let mut store = Store::new();
            store.add_to_cart(catalog.find(id).unwrap(), "M", "Black");
            let summary = rules.summarize(store.cart_total(), None);
            let (order, items) = build_order(&account.id, store.cart(), &summary).unwrap();
            let order = db.create_order(order).await.unwrap();
            db.attach_items(&order.id, items).await.unwrap();
            placed.push(order.id);
        }

        let history = order_history(&db, &session).await.unwrap();
        assert_eq!(history.orders.len(), 2);
        assert_eq!(history.orders[0].order.id, placed[1]);
        assert_eq!(history.orders[0].items[0].product_id, "9");
        assert_eq!(history.orders[1].items[0].product_id, "2");
    }
}
