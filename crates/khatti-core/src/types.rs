//! # Domain Types
//!
//! Core domain types used throughout the Khatti storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │   OrderItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (catalog)   │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  price          │   │  user_id        │   │  order_id (FK)  │       │
//! │  │  discount_price │   │  total_amount   │   │  product snapshot│      │
//! │  │  sizes, colors  │   │  order_status   │   │  price = p × q  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   OrderStatus   │   │  PaymentStatus  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Pending        │   │  Pending        │       │
//! │  │  1800 = 18% GST │   │  Confirmed      │   │  Paid           │       │
//! │  └─────────────────┘   │  Shipped ...    │   │  Failed ...     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Catalog records are immutable and identified by short catalog ids
//! (`"1"`, `"12"`). Accounts and orders use UUID v4 ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (GST on apparel above the exemption slab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Catalog Metadata
// =============================================================================

/// A browsable category shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub name: String,
    /// Banner image reference.
    pub image: String,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product. Never mutated once the catalog is loaded.
///
/// Serialized in camelCase so the bundled catalog file and the web front end
/// share one shape (`discountPrice`, `reviewCount`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Catalog identifier.
    pub id: String,

    pub name: String,

    pub description: String,

    pub category: String,

    pub brand: String,

    /// List price (shown struck through).
    pub price: Money,

    /// Selling price. Every cart and order amount is computed from this.
    pub discount_price: Money,

    /// Units available.
    pub stock: u32,

    /// Image references, first one is the primary image.
    pub images: Vec<String>,

    pub rating: f32,

    pub review_count: u32,

    /// Available sizes in display order.
    pub sizes: Vec<String>,

    /// Available colors in display order.
    pub colors: Vec<String>,

    /// Merchandising tags: `featured`, `trending`, `new`.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Product {
    /// Percentage saved against the list price, rounded to a whole percent.
    ///
    /// ## Example
    /// ```rust
    /// # use khatti_core::{Catalog};
    /// let catalog = Catalog::builtin().unwrap();
    /// let product = catalog.find("1").unwrap();
    /// assert!(product.discount_percent() <= 100);
    /// ```
    pub fn discount_percent(&self) -> u32 {
        let price = self.price.rupees();
        if price <= 0 {
            return 0;
        }

        let saved = (price - self.discount_price.rupees()).max(0);
        // round(saved / price × 100) in integer arithmetic
        ((saved * 200 + price) / (price * 2)) as u32
    }

    /// Amount saved per unit against the list price.
    pub fn savings(&self) -> Money {
        self.price - self.discount_price
    }

    /// Stock availability for the product page.
    pub fn stock_status(&self) -> StockStatus {
        if self.stock > LOW_STOCK_THRESHOLD {
            StockStatus::InStock
        } else {
            StockStatus::Low(self.stock)
        }
    }

    /// Size preselected on the product page and used by quick-add.
    pub fn default_size(&self) -> Option<&str> {
        self.sizes.first().map(String::as_str)
    }

    /// Color preselected on the product page and used by quick-add.
    pub fn default_color(&self) -> Option<&str> {
        self.colors.first().map(String::as_str)
    }

    /// Primary image reference.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Checks tag membership (case-sensitive, tags are lowercase).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    #[inline]
    pub fn is_featured(&self) -> bool {
        self.has_tag("featured")
    }

    #[inline]
    pub fn is_trending(&self) -> bool {
        self.has_tag("trending")
    }

    /// Products tagged `new` get a "NEW" badge on their card.
    #[inline]
    pub fn is_new(&self) -> bool {
        self.has_tag("new")
    }
}

/// Stock label shown on the product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// More than [`LOW_STOCK_THRESHOLD`] units.
    InStock,
    /// Few units left (may be zero).
    Low(u32),
}

impl StockStatus {
    pub fn label(&self) -> String {
        match self {
            StockStatus::InStock => "In Stock".to_string(),
            StockStatus::Low(n) => format!("Only {} left!", n),
        }
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// A signed-up shopper, as exposed to the storefront (no credentials).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserAccount {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Lower-cased, trimmed email address.
    pub email: String,
    pub full_name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Parses a stored status. Anything unrecognized is treated as pending.
    pub fn from_db_str(value: &str) -> Self {
        match value {
            "confirmed" => OrderStatus::Confirmed,
            "shipped" => OrderStatus::Shipped,
            "delivered" => OrderStatus::Delivered,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Pending,
        }
    }

    /// Storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Badge text on the order history page.
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Payment Status
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    /// Recorded at checkout; the payment gateway itself is external.
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Parses a stored status. Anything unrecognized is treated as pending.
    pub fn from_db_str(value: &str) -> Self {
        match value {
            "paid" => PaymentStatus::Paid,
            "failed" => PaymentStatus::Failed,
            "refunded" => PaymentStatus::Refunded,
            _ => PaymentStatus::Pending,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    /// Grand total charged (subtotal + shipping + tax − discount).
    pub total_amount: Money,
    pub shipping_amount: Money,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub shipping_address: Option<String>,
    pub coupon_code: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Short human reference: `#` + first 8 characters of the id, upper-cased.
    ///
    /// ## Example
    /// ```text
    /// 3f2a9c1e-77b0-4d4e-9a51-0c5a3b2d9e10  →  #3F2A9C1E
    /// ```
    pub fn short_ref(&self) -> String {
        let prefix: String = self.id.chars().take(8).collect();
        format!("#{}", prefix.to_uppercase())
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line of a placed order.
/// Uses snapshot pattern to freeze product data at time of purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// Product name at time of purchase (frozen).
    pub product_name: String,
    /// Primary image at time of purchase (frozen).
    pub product_image: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,
    /// Line amount: discounted unit price × quantity.
    pub price: Money,
}

// =============================================================================
// Order Requests
// =============================================================================

/// Order header submitted to the order backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrder {
    pub user_id: String,
    pub total_amount: Money,
    pub shipping_amount: Money,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub shipping_address: Option<String>,
    pub coupon_code: Option<String>,
}

/// Order line submitted once the order header exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrderItem {
    pub product_id: String,
    pub product_name: String,
    pub product_image: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,
    pub price: Money,
}

/// An order joined with its items, as shown in the order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, discount_price: i64, stock: u32) -> Product {
        Product {
            id: "p1".to_string(),
            name: "Test Tee".to_string(),
            description: String::new(),
            category: "T-Shirts".to_string(),
            brand: "Khatti".to_string(),
            price: Money::from_rupees(price),
            discount_price: Money::from_rupees(discount_price),
            stock,
            images: vec!["tee-front.jpg".to_string(), "tee-back.jpg".to_string()],
            rating: 4.5,
            review_count: 10,
            sizes: vec!["S".to_string(), "M".to_string()],
            colors: vec!["Black".to_string()],
            tags: vec!["new".to_string()],
        }
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(18.0);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_discount_percent_rounds() {
        // (1999 - 1299) / 1999 = 35.02% → 35
        assert_eq!(product(1999, 1299, 5).discount_percent(), 35);
        // (999 - 666) / 999 = 33.33% → 33
        assert_eq!(product(999, 666, 5).discount_percent(), 33);
        // (200 - 99) / 200 = 50.5% → 51
        assert_eq!(product(200, 99, 5).discount_percent(), 51);
        assert_eq!(product(0, 0, 5).discount_percent(), 0);
    }

    #[test]
    fn test_stock_label() {
        assert_eq!(product(100, 90, 25).stock_status().label(), "In Stock");
        assert_eq!(product(100, 90, 10).stock_status().label(), "Only 10 left!");
        assert_eq!(product(100, 90, 3).stock_status(), StockStatus::Low(3));
    }

    #[test]
    fn test_defaults_and_tags() {
        let p = product(100, 90, 5);
        assert_eq!(p.default_size(), Some("S"));
        assert_eq!(p.default_color(), Some("Black"));
        assert_eq!(p.primary_image(), Some("tee-front.jpg"));
        assert!(p.is_new());
        assert!(!p.is_featured());
    }

    #[test]
    fn test_order_status_unknown_is_pending() {
        assert_eq!(OrderStatus::from_db_str("shipped"), OrderStatus::Shipped);
        assert_eq!(OrderStatus::from_db_str("on_hold"), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_db_str("shipped").label(), "Shipped");
        assert_eq!(PaymentStatus::from_db_str("paid"), PaymentStatus::Paid);
    }

    #[test]
    fn test_short_ref() {
        let order = Order {
            id: "3f2a9c1e-77b0-4d4e-9a51-0c5a3b2d9e10".to_string(),
            user_id: "u1".to_string(),
            total_amount: Money::from_rupees(1000),
            shipping_amount: Money::zero(),
            tax_amount: Money::zero(),
            discount_amount: Money::zero(),
            payment_status: PaymentStatus::Paid,
            order_status: OrderStatus::Pending,
            shipping_address: None,
            coupon_code: None,
            created_at: Utc::now(),
        };
        assert_eq!(order.short_ref(), "#3F2A9C1E");
    }

    #[test]
    fn test_product_json_is_camel_case() {
        let json = serde_json::to_value(product(100, 90, 5)).unwrap();
        assert_eq!(json["discountPrice"], 90);
        assert_eq!(json["reviewCount"], 10);
    }
}
