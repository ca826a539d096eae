//! Product catalog service.
//!
//! Pass-through filtering and search over the storage layer.

use std::collections::BTreeSet;
use std::sync::Arc;

use vitrine_core::ProductId;

use crate::models::Product;
use crate::storage::{Storage, StorageError};

/// Catalog queries.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn Storage>,
}

impl ProductService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        self.store.get_product(id).await
    }

    /// Get the full catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    pub async fn get_all(&self) -> Result<Vec<Product>, StorageError> {
        self.store.get_all_products().await
    }

    /// Get all products in a category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    pub async fn get_by_category(&self, category: &str) -> Result<Vec<Product>, StorageError> {
        self.store.get_products_by_category(category).await
    }

    /// Case-insensitive substring search over product names and descriptions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, StorageError> {
        self.store.search_products(query).await
    }

    /// All distinct categories, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    pub async fn categories(&self) -> Result<Vec<String>, StorageError> {
        let products = self.store.get_all_products().await?;
        let categories: BTreeSet<String> =
            products.into_iter().map(|p| p.category).collect();
        Ok(categories.into_iter().collect())
    }
}
