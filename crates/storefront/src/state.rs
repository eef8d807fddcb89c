//! Page-wide state and event wiring.
//!
//! One [`Storefront`] exists per page. It owns the product database and the
//! cart and translates page events (add button, cart icon) into cart
//! operations, keeping the icon badge in sync.

use std::sync::Arc;

use tracing::instrument;

use crate::cart::Cart;
use crate::catalog::{CatalogError, CatalogReport, CatalogSelectors, load_catalog};
use crate::config::{ConfigError, WidgetConfig};
use crate::db::Database;
use crate::error::Result;
use crate::page::Page;
use crate::scheduler::Scheduler;

/// Database, cart and page for one storefront page.
pub struct Storefront {
    database: Arc<Database>,
    cart: Cart,
    page: Arc<dyn Page>,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("products", &self.database.len())
            .field("cart", &self.cart)
            .field("cart_rendered", &self.page.is_cart_rendered())
            .finish()
    }
}

impl Storefront {
    /// Create a storefront with an empty database and cart.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Template` if a configured template cannot be read.
    pub fn new(
        config: &WidgetConfig,
        page: Arc<dyn Page>,
        scheduler: Arc<dyn Scheduler>,
    ) -> std::result::Result<Self, ConfigError> {
        let database = Arc::new(Database::new());
        let cart = Cart::new(Arc::clone(&database), Arc::clone(&page), scheduler)
            .with_templates(config.templates()?)
            .with_escape(config.escape)
            .with_hide_timeout(config.hide_timeout);

        page.set_item_count(0);

        Ok(Self {
            database,
            cart,
            page,
        })
    }

    /// Fill the database from the page's featured items.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the selectors are invalid.
    pub fn load_catalog(
        &self,
        html: &str,
        selectors: &CatalogSelectors,
    ) -> std::result::Result<CatalogReport, CatalogError> {
        load_catalog(html, selectors, &self.database)
    }

    /// An item's "Add to Cart" button was clicked.
    ///
    /// # Errors
    ///
    /// Returns the cart error; the badge is left as it was.
    #[instrument(skip(self))]
    pub fn on_add_button(&mut self, key: &str) -> Result<()> {
        self.cart.add_to_cart(key)?;
        self.page.set_item_count(self.cart.cart_items_count());
        Ok(())
    }

    /// A cart line's remove control was clicked.
    ///
    /// # Errors
    ///
    /// Returns the cart error; the badge is left as it was.
    #[instrument(skip(self))]
    pub fn on_remove(&mut self, key: &str) -> Result<()> {
        self.cart.remove_from_cart(key)?;
        self.page.set_item_count(self.cart.cart_items_count());
        Ok(())
    }

    /// The cart icon was clicked: toggle the cart.
    #[instrument(skip(self))]
    pub fn on_cart_icon_click(&mut self) {
        if self.page.is_cart_rendered() {
            self.cart.hide_cart();
        } else {
            self.cart.show_cart();
        }
    }

    #[must_use]
    pub const fn database(&self) -> &Arc<Database> {
        &self.database
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }
}
