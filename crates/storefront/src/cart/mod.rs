//! Cart bookkeeping and display.
//!
//! The cart keeps a count per product key plus a running total, and renders
//! itself into the page through a [`Page`] adapter.
//!
//! # States
//!
//! ```text
//!            show_cart()                      hide_cart() / timer fires
//!  Hidden ───────────────▶ Visible(timer) ───────────────────────────▶ Hidden
//!                            │    ▲
//!                            └────┘ show_cart(), add/remove while visible
//! ```
//!
//! `show_cart` always hides first, so at most one cart element and one
//! auto-hide timer exist at any time.
//!
//! # Invariants
//!
//! - `cart_items_count()` equals the sum of counts in `cart()`
//! - counts are at least 1; removing a product drops its whole line

mod item;
mod view;

pub use item::CartItem;
pub use view::{CartItemView, CartView};

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use storefront_cart_core::{Product, ProductKey, format_amount};
use tracing::instrument;

use crate::db::Database;
use crate::error::{CartError, Result};
use crate::page::Page;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::templates::{CartTemplates, Escape, fill, tokens};

/// Delay before a shown cart hides itself.
pub const DEFAULT_HIDE_TIMEOUT: Duration = Duration::from_millis(3000);

/// A shopper's cart on one storefront page.
pub struct Cart {
    database: Arc<Database>,
    page: Arc<dyn Page>,
    scheduler: Arc<dyn Scheduler>,
    templates: CartTemplates,
    escape: Escape,
    /// Product key to count, in insertion order.
    items: Vec<(ProductKey, u32)>,
    total_count: u32,
    hide_timer: Option<Box<dyn TimerHandle>>,
    /// How long a shown cart stays on the page.
    pub hide_timeout: Duration,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("items", &self.items)
            .field("total_count", &self.total_count)
            .field("escape", &self.escape)
            .field("hide_timeout", &self.hide_timeout)
            .field(
                "hide_timer_active",
                &self.hide_timer.as_ref().is_some_and(|t| t.is_active()),
            )
            .finish_non_exhaustive()
    }
}

impl Cart {
    /// Create an empty cart with the default templates.
    ///
    /// # Arguments
    ///
    /// * `database` - Products the cart may hold
    /// * `page` - Where the cart renders
    /// * `scheduler` - Runs the auto-hide timer
    #[must_use]
    pub fn new(
        database: Arc<Database>,
        page: Arc<dyn Page>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            database,
            page,
            scheduler,
            templates: CartTemplates::default(),
            escape: Escape::default(),
            items: Vec::new(),
            total_count: 0,
            hide_timer: None,
            hide_timeout: DEFAULT_HIDE_TIMEOUT,
        }
    }

    /// Use `templates` for rendering.
    #[must_use]
    pub fn with_templates(mut self, templates: CartTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Set how product names are escaped.
    #[must_use]
    pub fn with_escape(mut self, escape: Escape) -> Self {
        self.escape = escape;
        self
    }

    /// Set the auto-hide delay.
    #[must_use]
    pub fn with_hide_timeout(mut self, timeout: Duration) -> Self {
        self.hide_timeout = timeout;
        self
    }

    // =========================================================================
    // Bookkeeping
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// Refreshes the display if the cart is currently shown.
    ///
    /// # Errors
    ///
    /// Returns `CartError::EmptyKey` or `CartError::UnknownProduct`; the cart
    /// is unchanged.
    #[instrument(skip(self))]
    pub fn add_to_cart(&mut self, key: &str) -> Result<()> {
        let product = self.lookup(key).inspect_err(|e| {
            tracing::warn!(error = %e, "Error adding product to the cart");
        })?;

        self.total_count += 1;
        match self.items.iter_mut().find(|(k, _)| k.as_str() == key) {
            Some((_, count)) => *count += 1,
            None => self.items.push((ProductKey::from(key), 1)),
        }

        tracing::info!(
            product = %product.name,
            total_count = self.total_count,
            "Added to cart"
        );

        self.refresh();
        Ok(())
    }

    /// Remove a product's whole line, whatever its count.
    ///
    /// Refreshes the display if the cart is currently shown.
    ///
    /// # Errors
    ///
    /// Returns `CartError::EmptyKey`, `CartError::UnknownProduct` or
    /// `CartError::NotInCart`; the cart is unchanged.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, key: &str) -> Result<()> {
        let result = self.lookup(key).and_then(|product| {
            self.items
                .iter()
                .position(|(k, _)| k.as_str() == key)
                .map(|index| (product, index))
                .ok_or_else(|| CartError::NotInCart(ProductKey::from(key)))
        });
        let (product, index) = result.inspect_err(|e| {
            tracing::warn!(error = %e, "Error removing product from the cart");
        })?;

        let (_, count) = self.items.remove(index);
        self.total_count -= count;

        tracing::info!(
            product = %product.name,
            removed = count,
            total_count = self.total_count,
            "Removed from cart"
        );

        self.refresh();
        Ok(())
    }

    fn lookup(&self, key: &str) -> Result<Arc<Product>> {
        if key.is_empty() {
            return Err(CartError::EmptyKey);
        }
        self.database
            .get_product(key)
            .ok_or_else(|| CartError::UnknownProduct(ProductKey::from(key)))
    }

    /// Raw key to count view, in insertion order.
    #[must_use]
    pub fn cart(&self) -> &[(ProductKey, u32)] {
        &self.items
    }

    /// Count held for `key`, zero if absent.
    #[must_use]
    pub fn count_of(&self, key: &str) -> u32 {
        self.items
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map_or(0, |(_, count)| *count)
    }

    /// One item per cart line, in insertion order.
    #[must_use]
    pub fn cart_items(&self) -> Vec<CartItem> {
        self.items
            .iter()
            .map(|(key, count)| CartItem::new(self.database.get_product(key.as_str()), *count))
            .collect()
    }

    /// Total units across all lines.
    #[must_use]
    pub const fn cart_items_count(&self) -> u32 {
        self.total_count
    }

    /// Grand total of all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart_items().iter().map(CartItem::total).sum()
    }

    /// Immutable view of the cart for renderers.
    #[must_use]
    pub fn snapshot(&self) -> CartView {
        CartView::from_items(&self.cart_items(), self.total_count)
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Whether the cart is on the page.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.page.is_cart_rendered()
    }

    /// Render the cart into the page and start the auto-hide timer.
    ///
    /// Any cart already shown is replaced and its timer cancelled.
    pub fn show_cart(&mut self) {
        self.hide_cart();

        let html = self.render();
        self.page.insert_cart(&html);

        let page = Arc::clone(&self.page);
        let timer = self.scheduler.schedule(
            self.hide_timeout,
            Box::new(move || {
                tracing::debug!("Cart auto-hide timer fired");
                page.remove_cart();
            }),
        );
        self.hide_timer = Some(timer);

        tracing::debug!(
            lines = self.items.len(),
            hide_timeout_ms = u64::try_from(self.hide_timeout.as_millis()).unwrap_or(u64::MAX),
            "Cart shown"
        );
    }

    /// Cancel the auto-hide timer and remove the cart from the page.
    ///
    /// Safe to call when already hidden.
    pub fn hide_cart(&mut self) {
        if let Some(mut timer) = self.hide_timer.take() {
            timer.cancel();
        }

        if self.page.is_cart_rendered() {
            self.page.remove_cart();
            tracing::debug!("Cart hidden");
        }
    }

    /// Cart markup built from the current templates and lines.
    #[must_use]
    pub fn render(&self) -> String {
        let items = self.cart_items();

        let items_html: String = items
            .iter()
            .map(|item| item.html(&self.templates.item, self.escape))
            .collect();
        let total: Decimal = items.iter().map(CartItem::total).sum();

        let html = fill(&self.templates.cart, tokens::CART_ITEMS, &items_html);
        fill(&html, tokens::CART_TOTAL, &format_amount(total))
    }

    fn refresh(&mut self) {
        if self.page.is_cart_rendered() {
            self.show_cart();
        }
    }

    // =========================================================================
    // Templates
    // =========================================================================

    /// Replace the outer cart template.
    pub fn update_cart_template(&mut self, template: impl Into<String>) {
        self.templates.cart = template.into();
    }

    /// Replace the per-line template.
    pub fn update_cart_item_template(&mut self, template: impl Into<String>) {
        self.templates.item = template.into();
    }

    #[must_use]
    pub const fn templates(&self) -> &CartTemplates {
        &self.templates
    }
}

impl Drop for Cart {
    fn drop(&mut self) {
        if let Some(mut timer) = self.hide_timer.take() {
            timer.cancel();
        }
    }
}
