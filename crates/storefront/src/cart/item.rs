//! A single cart line.

use std::sync::Arc;

use rust_decimal::Decimal;
use storefront_cart_core::{Product, format_amount};

use crate::templates::{Escape, fill, tokens};

/// A product paired with the quantity held in the cart.
///
/// Items are rebuilt from the cart and the database on every render, so they
/// hold a shared reference to the product rather than a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    /// The product, if it is still in the database.
    pub product: Option<Arc<Product>>,
    /// Quantity in the cart.
    pub count: u32,
}

impl CartItem {
    #[must_use]
    pub const fn new(product: Option<Arc<Product>>, count: u32) -> Self {
        Self { product, count }
    }

    /// Line total: unit price times count, zero without a product.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.product
            .as_ref()
            .map_or(Decimal::ZERO, |product| product.price.times(self.count))
    }

    /// Render this line into `template`.
    ///
    /// Returns an empty string if the product is missing.
    #[must_use]
    pub fn html(&self, template: &str, escape: Escape) -> String {
        let Some(product) = &self.product else {
            return String::new();
        };

        let html = fill(template, tokens::NAME, &escape.apply(&product.name));
        let html = fill(&html, tokens::COUNT, &self.count.to_string());
        let html = fill(&html, tokens::PRICE, &product.price.to_string());
        fill(&html, tokens::TOTAL, &format_amount(self.total()))
    }
}
