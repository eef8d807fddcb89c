//! Catalog products and their identity keys.

use core::borrow::Borrow;
use core::fmt;

use serde::{Deserialize, Serialize};

use super::price::{Price, PriceError};

/// Identity key of a product: its display name.
///
/// Names are unique within a catalog, so the name doubles as the key used by
/// the product database and the cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductKey(String);

impl ProductKey {
    /// Create a key from a product name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty (never a valid product).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductKey {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ProductKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for ProductKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A catalog entry shown on the storefront page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name; also the identity key.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Image source URL.
    pub image_url: String,
}

impl Product {
    /// Create a product from an already-validated price.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Price, image_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            image_url: image_url.into(),
        }
    }

    /// Create a product from a currency-formatted price string.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if no price can be extracted from `price_text`.
    pub fn from_price_text(
        name: impl Into<String>,
        price_text: &str,
        image_url: impl Into<String>,
    ) -> Result<Self, PriceError> {
        let price = Price::parse(price_text)?;
        Ok(Self::new(name, price, image_url))
    }

    /// The key this product is stored under.
    #[must_use]
    pub fn key(&self) -> ProductKey {
        ProductKey::new(self.name.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_key_is_name() {
        let product = Product::from_price_text("Mug", "$9.50", "/img/mug.png").unwrap();
        assert_eq!(product.key(), ProductKey::from("Mug"));
        assert_eq!(product.key().as_str(), "Mug");
    }

    #[test]
    fn test_from_price_text_invalid() {
        let result = Product::from_price_text("Mug", "N/A", "/img/mug.png");
        assert!(matches!(result, Err(PriceError::NoMatch(_))));
    }

    #[test]
    fn test_empty_key() {
        assert!(ProductKey::from("").is_empty());
        assert!(!ProductKey::from("Hat").is_empty());
    }

    #[test]
    fn test_product_serializes_price_as_string() {
        let product = Product::from_price_text("Hat", "12.30", "hat.jpg").unwrap();
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["name"], "Hat");
        assert_eq!(json["price"], "12.30");
        assert_eq!(json["image_url"], "hat.jpg");
    }
}
