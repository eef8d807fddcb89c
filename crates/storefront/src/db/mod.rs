//! In-memory product database.
//!
//! # Lifetime
//!
//! One `Database` is built per page, filled from the page's featured items
//! (see [`crate::catalog`]) and shared by the cart through an `Arc`. Nothing
//! is persisted; the catalog markup is the source of truth.
//!
//! # Keys
//!
//! Products are keyed by name. The first product stored under a name wins;
//! later inserts with the same name are rejected and the original is kept.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use storefront_cart_core::{Product, ProductKey};
use thiserror::Error;

/// Errors returned by [`Database`] operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    /// A product with this key is already stored.
    #[error("product already exists in database: {0}")]
    DuplicateProduct(ProductKey),
}

#[derive(Debug, Default)]
struct Entries {
    by_key: HashMap<ProductKey, Arc<Product>>,
    order: Vec<ProductKey>,
}

/// Keyed store of catalog products.
#[derive(Debug, Default)]
pub struct Database {
    entries: RwLock<Entries>,
}

impl Database {
    /// Create an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a product under its name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DuplicateProduct` if the name is already
    /// taken. The stored product is left untouched.
    pub fn add_product(&self, product: Product) -> Result<ProductKey, DatabaseError> {
        let key = product.key();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if entries.by_key.contains_key(&key) {
            tracing::warn!(product = %key, "Product already exists in database");
            return Err(DatabaseError::DuplicateProduct(key));
        }

        entries.by_key.insert(key.clone(), Arc::new(product));
        entries.order.push(key.clone());
        tracing::debug!(product = %key, "Product added to database");
        Ok(key)
    }

    /// Look up a product by key.
    #[must_use]
    pub fn get_product(&self, key: &str) -> Option<Arc<Product>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.by_key.get(key).cloned()
    }

    /// Whether a product is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.by_key.contains_key(key)
    }

    /// Number of stored products.
    #[must_use]
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All products in insertion order.
    #[must_use]
    pub fn products(&self) -> Vec<Arc<Product>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .order
            .iter()
            .filter_map(|key| entries.by_key.get(key).cloned())
            .collect()
    }
}
