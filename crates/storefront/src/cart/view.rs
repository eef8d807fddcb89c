//! Display data handed to renderers and the CLI.

use rust_decimal::Decimal;
use serde::Serialize;
use storefront_cart_core::format_amount;

use super::CartItem;

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: "0.00".to_string(),
            item_count: 0,
        }
    }

    /// Build a view from materialised cart items.
    ///
    /// Items whose product has gone missing are skipped.
    #[must_use]
    pub fn from_items(items: &[CartItem], item_count: u32) -> Self {
        let subtotal: Decimal = items.iter().map(CartItem::total).sum();
        Self {
            items: items.iter().filter_map(CartItemView::from_item).collect(),
            subtotal: format_amount(subtotal),
            item_count,
        }
    }
}

impl CartItemView {
    fn from_item(item: &CartItem) -> Option<Self> {
        let product = item.product.as_ref()?;
        Some(Self {
            name: product.name.clone(),
            quantity: item.count,
            price: product.price.to_string(),
            line_price: format_amount(item.total()),
            image_url: (!product.image_url.is_empty()).then(|| product.image_url.clone()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use storefront_cart_core::{Price, Product};

    use super::*;

    #[test]
    fn test_empty() {
        let view = CartView::empty();
        assert!(view.items.is_empty());
        assert_eq!(view.subtotal, "0.00");
        assert_eq!(view, CartView::from_items(&[], 0));
    }

    #[test]
    fn test_from_items() {
        let scarf = Arc::new(Product::new("Scarf", Price::parse("19.99").unwrap(), ""));
        let items = [CartItem::new(Some(scarf), 3), CartItem::new(None, 1)];

        let view = CartView::from_items(&items, 4);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].line_price, "59.97");
        assert_eq!(view.items[0].image_url, None);
        assert_eq!(view.subtotal, "59.97");
        assert_eq!(view.item_count, 4);
    }

    #[test]
    fn test_serializes() {
        let json = serde_json::to_value(CartView::empty()).unwrap();
        assert_eq!(json["subtotal"], "0.00");
        assert_eq!(json["item_count"], 0);
    }
}
