//! # Catalog Commands
//!
//! Home page, product listing and product detail.
//!
//! ## Browse Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Navbar search / category link / filter sidebar                         │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  browse(CatalogQuery { category, brand, min..max, search, sort })       │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │  1. Validate search text and price range                       │    │
//! │  │  2. Filter (all criteria must hold)                            │    │
//! │  │  3. Stable sort                                                │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  "T-Shirts · 4 products"  +  product cards                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use khatti_core::validation::{validate_price_range, validate_search_query};
use khatti_core::{CatalogQuery, Category, Money, Product, HOME_SECTION_LIMIT};

use crate::error::ApiError;
use crate::state::{CatalogState, StoreState};

/// What a product card shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: Money,
    pub discount_price: Money,
    pub discount_percent: u32,
    pub rating: f32,
    pub review_count: u32,
    pub image: Option<String>,
    pub is_new: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        ProductCard {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            price: product.price,
            discount_price: product.discount_price,
            discount_percent: product.discount_percent(),
            rating: product.rating,
            review_count: product.review_count,
            image: product.primary_image().map(str::to_string),
            is_new: product.is_new(),
        }
    }
}

fn cards(products: Vec<&Product>) -> Vec<ProductCard> {
    products.into_iter().map(ProductCard::from).collect()
}

// =============================================================================
// Home
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub categories: Vec<Category>,
    pub featured: Vec<ProductCard>,
    pub trending: Vec<ProductCard>,
}

/// Home page: categories plus the first [`HOME_SECTION_LIMIT`] featured and
/// trending products.
pub fn home(catalog: &CatalogState) -> HomeResponse {
    debug!("home command");
    let catalog = catalog.catalog();

    HomeResponse {
        categories: catalog.categories().to_vec(),
        featured: cards(catalog.featured(HOME_SECTION_LIMIT)),
        trending: cards(catalog.trending(HOME_SECTION_LIMIT)),
    }
}

// =============================================================================
// Browse
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    /// The category name, or "All Products".
    pub title: String,
    pub count: usize,
    pub products: Vec<ProductCard>,
    /// Brands for the filter sidebar.
    pub brands: Vec<String>,
}

/// Product listing with filters and sort.
pub fn browse(catalog: &CatalogState, mut query: CatalogQuery) -> Result<BrowseResponse, ApiError> {
    debug!(?query, "browse command");

    validate_price_range(query.min_price.rupees(), query.max_price.rupees())?;
    query.search = match query.search.as_deref() {
        Some(text) => Some(validate_search_query(text)?).filter(|t| !t.is_empty()),
        None => None,
    };

    let products = cards(catalog.catalog().query(&query));

    Ok(BrowseResponse {
        title: query.title().to_string(),
        count: products.len(),
        products,
        brands: catalog.catalog().brands().to_vec(),
    })
}

// =============================================================================
// Product Detail
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailResponse {
    pub product: Product,
    pub discount_percent: u32,
    pub savings: Money,
    /// "In Stock" or "Only N left!"
    pub stock_label: String,
    pub wishlisted: bool,
    /// Up to four products from the same category.
    pub related: Vec<ProductCard>,
}

/// Product page. Unknown ids fail with "Product Not Found".
pub fn product_detail(
    catalog: &CatalogState,
    store: &StoreState,
    product_id: &str,
) -> Result<ProductDetailResponse, ApiError> {
    debug!(product_id = %product_id, "product_detail command");

    let product = catalog.product(product_id)?;
    let related = cards(catalog.catalog().related_default(product));
    let wishlisted = store.with_store(|s| s.is_in_wishlist(&product.id));

    Ok(ProductDetailResponse {
        product: product.clone(),
        discount_percent: product.discount_percent(),
        savings: product.savings(),
        stock_label: product.stock_status().label(),
        wishlisted,
        related,
    })
}
