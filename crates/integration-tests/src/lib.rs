//! Integration tests for the storefront cart widget.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storefront-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Bookkeeping invariants over the public API
//! - `page_flow` - Catalog loading, event wiring and rendering on a sample page
//! - `auto_hide` - Auto-hide timing on a real tokio runtime
//!
//! This library holds the fixtures the test files share.

use std::sync::Arc;

use storefront_cart::cart::Cart;
use storefront_cart::catalog::CatalogSelectors;
use storefront_cart::config::WidgetConfig;
use storefront_cart::db::Database;
use storefront_cart::page::MemoryPage;
use storefront_cart::scheduler::{ManualScheduler, Scheduler};
use storefront_cart::state::Storefront;
use storefront_cart_core::{Price, Product};

/// A storefront page with four featured items, one of them unpriced.
pub const SAMPLE_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head><title>Brand</title></head>
<body>
<header>
    <div class="leftHeader"><a href="/">Brand</a></div>
    <div class="rightHeader">
        <a class="cartIconWrap" href="#"><img src="/img/cart.svg" alt="cart"><span>0</span></a>
    </div>
</header>
<main>
    <div class="featuredItems">
        <div class="featuredItem">
            <div class="featuredImgWrap"><img src="/img/mug.jpg" alt=""></div>
            <div class="featuredData">
                <div class="featuredName">Mug</div>
                <div class="featuredText">Ceramic, 350 ml.</div>
                <div class="featuredPrice">$9.50</div>
            </div>
            <button>Add to Cart</button>
        </div>
        <div class="featuredItem">
            <div class="featuredImgWrap"><img src="/img/scarf.jpg" alt=""></div>
            <div class="featuredData">
                <div class="featuredName">Scarf</div>
                <div class="featuredPrice">$19.99</div>
            </div>
            <button>Add to Cart</button>
        </div>
        <div class="featuredItem">
            <div class="featuredImgWrap"><img src="/img/tee.jpg" alt=""></div>
            <div class="featuredData">
                <div class="featuredName">Tom &amp; Jerry Tee</div>
                <div class="featuredPrice">$52.00</div>
            </div>
            <button>Add to Cart</button>
        </div>
        <div class="featuredItem">
            <div class="featuredImgWrap"><img src="/img/box.jpg" alt=""></div>
            <div class="featuredData">
                <div class="featuredName">Mystery Box</div>
                <div class="featuredPrice">Sold out</div>
            </div>
            <button>Add to Cart</button>
        </div>
    </div>
</main>
</body>
</html>
"##;

/// Database holding `(name, price)` pairs.
///
/// # Panics
///
/// Panics if a price does not parse or a name repeats.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn database(products: &[(&str, &str)]) -> Arc<Database> {
    let db = Arc::new(Database::new());
    for (name, price) in products {
        let product = Product::new(*name, Price::parse(price).unwrap(), format!("/img/{name}.jpg"));
        db.add_product(product).unwrap();
    }
    db
}

/// Cart over `db` with an in-memory page and the given scheduler.
#[must_use]
pub fn cart(db: Arc<Database>, scheduler: Arc<dyn Scheduler>) -> (Cart, Arc<MemoryPage>) {
    let page = Arc::new(MemoryPage::new());
    let cart = Cart::new(db, page.clone(), scheduler);
    (cart, page)
}

/// Storefront for [`SAMPLE_PAGE`] driven by a manual clock.
///
/// # Panics
///
/// Panics if the sample page fails to load.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn sample_storefront(config: &WidgetConfig) -> (Storefront, Arc<MemoryPage>, ManualScheduler) {
    let page = Arc::new(MemoryPage::new());
    let clock = ManualScheduler::new();
    let store = Storefront::new(config, page.clone(), Arc::new(clock.clone())).unwrap();
    store
        .load_catalog(SAMPLE_PAGE, &CatalogSelectors::default())
        .unwrap();
    (store, page, clock)
}
