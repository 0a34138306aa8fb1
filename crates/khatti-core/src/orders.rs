//! # Order Assembly
//!
//! Builds the order backend requests from the cart and joins order history
//! back together.
//!
//! ## Place Order Flow
//! ```text
//! cart lines + CheckoutSummary
//!        │
//!        ▼
//! build_order() ──► NewOrder        (paid / pending, totals, coupon)
//!                └► Vec<NewOrderItem> (one per line, snapshot of product)
//!        │
//!        ▼
//! OrderBackend::create_order ──► Order { id }
//! OrderBackend::attach_items(order.id, items)
//! ```
//!
//! ## History Flow
//! ```text
//! orders_for_user(user)  ──► [o3, o2, o1]   (most recent first)
//! items_for_orders(ids)  ──► [i.., i.., ..] (any order)
//!        │
//!        ▼
//! attach_items() ──► [o3+items, o2+items, o1+items]
//! ```

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::pricing::CheckoutSummary;
use crate::store::CartLine;
use crate::types::{
    NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, OrderWithItems, PaymentStatus,
};

/// Builds the order header and its items from the cart.
///
/// Orders are recorded as paid; the payment gateway sits outside the
/// storefront. Fails only when the cart is empty.
pub fn build_order(
    user_id: &str,
    lines: &[CartLine],
    summary: &CheckoutSummary,
) -> CoreResult<(NewOrder, Vec<NewOrderItem>)> {
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let order = NewOrder {
        user_id: user_id.to_string(),
        total_amount: summary.total,
        shipping_amount: summary.shipping,
        tax_amount: summary.tax,
        discount_amount: summary.discount,
        payment_status: PaymentStatus::Paid,
        order_status: OrderStatus::Pending,
        shipping_address: None,
        coupon_code: summary.coupon_code.clone(),
    };

    let items = lines
        .iter()
        .map(|line| NewOrderItem {
            product_id: line.product.id.clone(),
            product_name: line.product.name.clone(),
            product_image: line.product.primary_image().map(str::to_string),
            size: Some(line.size.clone()),
            color: Some(line.color.clone()),
            quantity: line.quantity,
            price: line.line_total(),
        })
        .collect();

    Ok((order, items))
}

/// Joins items onto their orders, keeping the order list's ordering.
///
/// Items whose order is not in `orders` are dropped. Items keep their
/// relative order within each order.
pub fn attach_items(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<OrderWithItems> {
    let mut by_order: HashMap<String, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id.clone()).or_default().push(item);
    }

    orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
