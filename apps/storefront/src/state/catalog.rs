//! # Catalog State
//!
//! The product catalog, loaded once at startup and read-only afterwards.

use std::path::Path;

use tracing::info;

use khatti_core::{Catalog, CoreError, CoreResult, Product};

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct CatalogState {
    catalog: Catalog,
}

impl CatalogState {
    pub fn new(catalog: Catalog) -> Self {
        CatalogState { catalog }
    }

    /// Loads the catalog from `path`, or the bundled one when `None`.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let catalog = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    CoreError::InvalidCatalog(format!("{}: {}", path.display(), e))
                })?;
                Catalog::from_json(&json)?
            }
            None => Catalog::builtin()?,
        };

        info!(
            products = catalog.products().len(),
            categories = catalog.categories().len(),
            "Catalog loaded"
        );

        Ok(CatalogState { catalog })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Looks a product up, failing with "Product Not Found".
    pub fn product(&self, id: &str) -> Result<&Product, ApiError> {
        self.catalog
            .find(id)
            .ok_or_else(|| ApiError::product_not_found(id))
    }
}
