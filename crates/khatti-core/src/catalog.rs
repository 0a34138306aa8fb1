//! # Catalog
//!
//! The static, read-only product catalog and its query engine.
//!
//! ## Query Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products (catalog order)                                               │
//! │       │                                                                 │
//! │       ├── category == ?          (exact match, optional)                │
//! │       ├── brand == ?             (exact match, optional)                │
//! │       ├── min ≤ discount_price ≤ max   (inclusive, default 0..20000)    │
//! │       ├── search text            (name / brand / category / tags)       │
//! │       └── tag containment        (featured / trending / new)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sort: popularity │ price-low │ price-high │ newest │ rating            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<&Product>   (no pagination, whole list)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All sorts are stable, so products that compare equal keep catalog order.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Category, Product};
use crate::{MAX_PRICE_FILTER, RELATED_PRODUCTS_LIMIT};

/// Catalog bundled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

// =============================================================================
// Sort Order
// =============================================================================

/// Sort order of the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Most reviewed first.
    #[default]
    Popularity,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Reverse catalog order (last added first).
    Newest,
    /// Best rated first.
    Rating,
}

impl SortBy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortBy::Popularity => "popularity",
            SortBy::PriceLow => "price-low",
            SortBy::PriceHigh => "price-high",
            SortBy::Newest => "newest",
            SortBy::Rating => "rating",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popularity" | "popular" => Ok(SortBy::Popularity),
            "price-low" => Ok(SortBy::PriceLow),
            "price-high" => Ok(SortBy::PriceHigh),
            "newest" => Ok(SortBy::Newest),
            "rating" => Ok(SortBy::Rating),
            _ => Err(ValidationError::InvalidFormat {
                field: "sort".to_string(),
                reason: "expected popularity, price-low, price-high, newest or rating"
                    .to_string(),
            }),
        }
    }
}

// =============================================================================
// Catalog Query
// =============================================================================

/// Filters and sort order for [`Catalog::query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub brand: Option<String>,
    /// Inclusive lower bound on the discounted price.
    pub min_price: Money,
    /// Inclusive upper bound on the discounted price.
    pub max_price: Money,
    /// Case-insensitive text search.
    pub search: Option<String>,
    /// Only products carrying this tag.
    pub tag: Option<String>,
    pub sort: SortBy,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            category: None,
            brand: None,
            min_price: Money::zero(),
            max_price: Money::from_rupees(MAX_PRICE_FILTER),
            search: None,
            tag: None,
            sort: SortBy::default(),
        }
    }
}

impl CatalogQuery {
    /// Query matching the whole catalog, most popular first.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn price_range(mut self, min: Money, max: Money) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn sort(mut self, sort: SortBy) -> Self {
        self.sort = sort;
        self
    }

    /// Heading of the listing page: the selected category, or "All Products".
    pub fn title(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => category,
            _ => "All Products",
        }
    }

    fn matches(&self, product: &Product) -> bool {
        if let Some(category) = non_empty(&self.category) {
            if product.category != category {
                return false;
            }
        }

        if let Some(brand) = non_empty(&self.brand) {
            if product.brand != brand {
                return false;
            }
        }

        if product.discount_price < self.min_price || product.discount_price > self.max_price {
            return false;
        }

        if let Some(tag) = non_empty(&self.tag) {
            if !product.has_tag(tag) {
                return false;
            }
        }

        if let Some(text) = non_empty(&self.search) {
            let needle = text.to_lowercase();
            let hit = product.name.to_lowercase().contains(&needle)
                || product.brand.to_lowercase().contains(&needle)
                || product.category.to_lowercase().contains(&needle)
                || product.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    brands: Vec<String>,
    products: Vec<Product>,
}

/// The loaded product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
    brands: Vec<String>,
}

impl Catalog {
    /// Loads the catalog bundled with the crate.
    pub fn builtin() -> CoreResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parses a catalog document.
    ///
    /// ## Rules
    /// - Product ids are unique
    /// - Every product offers at least one size and one color
    /// - Repeated sizes, colors and tags collapse to their first occurrence
    /// - Brands default to the product brands in first-seen order
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidCatalog(e.to_string()))?;

        let mut seen = HashSet::new();
        let mut products = Vec::with_capacity(file.products.len());

        for mut product in file.products {
            if product.id.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "product id".to_string(),
                }
                .into());
            }

            if !seen.insert(product.id.clone()) {
                return Err(ValidationError::Duplicate {
                    field: "product id".to_string(),
                    value: product.id,
                }
                .into());
            }

            dedup_in_order(&mut product.sizes);
            dedup_in_order(&mut product.colors);
            dedup_in_order(&mut product.tags);

            if product.sizes.is_empty() || product.colors.is_empty() {
                return Err(CoreError::InvalidCatalog(format!(
                    "product {} must offer at least one size and one color",
                    product.id
                )));
            }

            products.push(product);
        }

        let mut brands = file.brands;
        if brands.is_empty() {
            brands = products.iter().map(|p| p.brand.clone()).collect();
        }
        dedup_in_order(&mut brands);

        tracing::debug!(
            products = products.len(),
            categories = file.categories.len(),
            brands = brands.len(),
            "Catalog loaded"
        );

        Ok(Self {
            products,
            categories: file.categories,
            brands,
        })
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn brands(&self) -> &[String] {
        &self.brands
    }

    /// Looks up a product by id. `None` is the "not found" state.
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Filters and sorts the catalog.
    ///
    /// ## Example
    /// ```rust
    /// use khatti_core::{Catalog, CatalogQuery, SortBy};
    ///
    /// let catalog = Catalog::builtin().unwrap();
    /// let query = CatalogQuery::new().category("Sneakers").sort(SortBy::PriceLow);
    /// let results = catalog.query(&query);
    ///
    /// assert!(results.iter().all(|p| p.category == "Sneakers"));
    /// assert!(results.windows(2).all(|w| w[0].discount_price <= w[1].discount_price));
    /// ```
    pub fn query(&self, query: &CatalogQuery) -> Vec<&Product> {
        let mut result: Vec<&Product> = self.products.iter().filter(|p| query.matches(p)).collect();

        match query.sort {
            SortBy::PriceLow => result.sort_by(|a, b| a.discount_price.cmp(&b.discount_price)),
            SortBy::PriceHigh => result.sort_by(|a, b| b.discount_price.cmp(&a.discount_price)),
            SortBy::Newest => result.reverse(),
            SortBy::Rating => result.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            SortBy::Popularity => result.sort_by(|a, b| b.review_count.cmp(&a.review_count)),
        }

        result
    }

    /// The first `limit` products tagged `featured`, in catalog order.
    pub fn featured(&self, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_featured())
            .take(limit)
            .collect()
    }

    /// The first `limit` products tagged `trending`, in catalog order.
    pub fn trending(&self, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_trending())
            .take(limit)
            .collect()
    }

    /// "You may also like": same category, excluding the product itself.
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .collect()
    }

    /// [`Catalog::related`] with the product page's default limit.
    pub fn related_default(&self, product: &Product) -> Vec<&Product> {
        self.related(product, RELATED_PRODUCTS_LIMIT)
    }
}

fn dedup_in_order(values: &mut Vec<String>) {
    let mut seen = HashSet::new();
    values.retain(|v| seen.insert(v.clone()));
}

// =============================================================================
// Unit Tests
// =============================================================================
