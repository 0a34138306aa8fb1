//! # Order Repository
//!
//! Orders and their items.
//!
//! ## Order Placement
//! ```text
//! create(new_order)            ──► orders row (uuid, created_at = now)
//!      │
//!      ▼
//! insert_items(order_id, items) ──► order_items rows (one transaction)
//! ```
//!
//! Amounts are stored as whole rupees in INTEGER columns; statuses as their
//! lowercase names. Item rows freeze the product name and image so later
//! catalog edits don't rewrite history.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use khatti_core::{Money, NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, PaymentStatus};

// =============================================================================
// Records
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRecord {
    id: String,
    user_id: String,
    total_amount: i64,
    shipping_amount: i64,
    tax_amount: i64,
    discount_amount: i64,
    payment_status: String,
    order_status: String,
    shipping_address: Option<String>,
    coupon_code: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<OrderRecord> for Order {
    fn from(r: OrderRecord) -> Self {
        Order {
            id: r.id,
            user_id: r.user_id,
            total_amount: Money::from_rupees(r.total_amount),
            shipping_amount: Money::from_rupees(r.shipping_amount),
            tax_amount: Money::from_rupees(r.tax_amount),
            discount_amount: Money::from_rupees(r.discount_amount),
            payment_status: PaymentStatus::from_db_str(&r.payment_status),
            order_status: OrderStatus::from_db_str(&r.order_status),
            shipping_address: r.shipping_address,
            coupon_code: r.coupon_code,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRecord {
    id: String,
    order_id: String,
    product_id: String,
    product_name: String,
    product_image: Option<String>,
    size: Option<String>,
    color: Option<String>,
    quantity: i64,
    price: i64,
}

impl TryFrom<OrderItemRecord> for OrderItem {
    type Error = DbError;

    fn try_from(r: OrderItemRecord) -> DbResult<Self> {
        let quantity = u32::try_from(r.quantity).map_err(|_| {
            DbError::Internal(format!("Bad quantity {} on item {}", r.quantity, r.id))
        })?;

        Ok(OrderItem {
            id: r.id,
            order_id: r.order_id,
            product_id: r.product_id,
            product_name: r.product_name,
            product_image: r.product_image,
            size: r.size,
            color: r.color,
            quantity,
            price: Money::from_rupees(r.price),
        })
    }
}

const ORDER_COLUMNS: &str = "id, user_id, total_amount, shipping_amount, tax_amount, \
     discount_amount, payment_status, order_status, shipping_address, coupon_code, created_at";

// =============================================================================
// Order Repository
// =============================================================================

/// Repository for order operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order header and returns the stored order.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` if the user doesn't exist
    pub async fn create(&self, new_order: &NewOrder) -> DbResult<Order> {
        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: new_order.user_id.clone(),
            total_amount: new_order.total_amount,
            shipping_amount: new_order.shipping_amount,
            tax_amount: new_order.tax_amount,
            discount_amount: new_order.discount_amount,
            payment_status: new_order.payment_status,
            order_status: new_order.order_status,
            shipping_address: new_order.shipping_address.clone(),
            coupon_code: new_order.coupon_code.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, total_amount, shipping_amount, tax_amount,
                discount_amount, payment_status, order_status,
                shipping_address, coupon_code, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.total_amount.rupees())
        .bind(order.shipping_amount.rupees())
        .bind(order.tax_amount.rupees())
        .bind(order.discount_amount.rupees())
        .bind(order.payment_status.as_str())
        .bind(order.order_status.as_str())
        .bind(&order.shipping_address)
        .bind(&order.coupon_code)
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total = order.total_amount.rupees(),
            "Order created"
        );

        Ok(order)
    }

    /// Inserts the items of an order. All or nothing.
    pub async fn insert_items(
        &self,
        order_id: &str,
        items: Vec<NewOrderItem>,
    ) -> DbResult<Vec<OrderItem>> {
        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(items.len());

        for item in items {
            let row = OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.to_string(),
                product_id: item.product_id,
                product_name: item.product_name,
                product_image: item.product_image,
                size: item.size,
                color: item.color,
                quantity: item.quantity,
                price: item.price,
            };

            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id, product_name, product_image,
                    size, color, quantity, price
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&row.id)
            .bind(&row.order_id)
            .bind(&row.product_id)
            .bind(&row.product_name)
            .bind(&row.product_image)
            .bind(&row.size)
            .bind(&row.color)
            .bind(i64::from(row.quantity))
            .bind(row.price.rupees())
            .execute(&mut *tx)
            .await?;

            stored.push(row);
        }

        tx.commit().await?;
        debug!(order_id = %order_id, count = stored.len(), "Order items inserted");

        Ok(stored)
    }

    /// Deletes an order header that has no items.
    ///
    /// Returns whether a row was deleted. Orders with items are never touched.
    pub async fn delete_if_empty(&self, order_id: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM orders
            WHERE id = ?1
              AND NOT EXISTS (SELECT 1 FROM order_items WHERE order_id = ?1)
            "#,
        )
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(order_id = %order_id, "Empty order removed");
        }
        Ok(deleted)
    }

    /// Orders of a user, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC",
            ORDER_COLUMNS
        );
        let records = sqlx::query_as::<_, OrderRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records.into_iter().map(Order::from).collect())
    }

    /// Items belonging to any of the given orders, in insertion order.
    pub async fn items_for_orders(&self, order_ids: &[String]) -> DbResult<Vec<OrderItem>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, order_id, product_id, product_name, product_image, \
             size, color, quantity, price FROM order_items WHERE order_id IN (",
        );
        let mut ids = query.separated(", ");
        for id in order_ids {
            ids.push_bind(id.as_str());
        }
        ids.push_unseparated(") ORDER BY rowid");

        let records = query
            .build_query_as::<OrderItemRecord>()
            .fetch_all(&self.pool)
            .await?;

        records.into_iter().map(OrderItem::try_from).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
