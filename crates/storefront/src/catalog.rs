//! Catalog loading from the storefront page markup.
//!
//! The page lists its products as "featured items":
//!
//! ```html
//! <div class="featuredItems">
//!   <div class="featuredItem">
//!     <img src="/img/mug.png">
//!     <div class="featuredName">Mug</div>
//!     <div class="featuredPrice">$9.50</div>
//!     <button>Add to Cart</button>
//!   </div>
//! </div>
//! ```
//!
//! Each item becomes a [`Product`] in the [`Database`]. Items with an
//! unreadable price or a duplicate name are skipped and reported.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use storefront_cart_core::{PriceError, Product, ProductKey};
use thiserror::Error;

use crate::db::{Database, DatabaseError};

/// Errors that stop catalog loading entirely.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
}

/// CSS selectors locating featured items in the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSelectors {
    pub container: String,
    pub item: String,
    pub name: String,
    pub price: String,
    pub image: String,
}

impl Default for CatalogSelectors {
    fn default() -> Self {
        Self {
            container: ".featuredItems".to_string(),
            item: ".featuredItem".to_string(),
            name: ".featuredName".to_string(),
            price: ".featuredPrice".to_string(),
            image: "img".to_string(),
        }
    }
}

/// Raw data scraped from one featured item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturedItem {
    pub name: String,
    pub price_text: String,
    pub image_url: String,
}

/// Why an item did not make it into the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    MissingName,
    InvalidPrice { message: String },
    Duplicate,
}

/// A featured item that was not loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    pub name: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Outcome of [`load_catalog`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogReport {
    /// Keys added, in page order.
    pub added: Vec<ProductKey>,
    pub skipped: Vec<SkippedItem>,
}

struct Compiled {
    container: Selector,
    item: Selector,
    name: Selector,
    price: Selector,
    image: Selector,
}

impl CatalogSelectors {
    fn compile(&self) -> Result<Compiled, CatalogError> {
        Ok(Compiled {
            container: parse_selector(&self.container)?,
            item: parse_selector(&self.item)?,
            name: parse_selector(&self.name)?,
            price: parse_selector(&self.price)?,
            image: parse_selector(&self.image)?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, CatalogError> {
    Selector::parse(selector).map_err(|e| CatalogError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Visible text of an element, whitespace collapsed.
fn inner_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read featured items from page markup, in page order.
///
/// # Errors
///
/// Returns `CatalogError::Selector` if a selector does not parse.
pub fn scrape_featured_items(
    html: &str,
    selectors: &CatalogSelectors,
) -> Result<Vec<FeaturedItem>, CatalogError> {
    let compiled = selectors.compile()?;
    let document = Html::parse_document(html);

    let items = document
        .select(&compiled.container)
        .flat_map(|container| container.select(&compiled.item))
        .map(|item| FeaturedItem {
            name: item
                .select(&compiled.name)
                .next()
                .map(inner_text)
                .unwrap_or_default(),
            price_text: item
                .select(&compiled.price)
                .next()
                .map(inner_text)
                .unwrap_or_default(),
            image_url: item
                .select(&compiled.image)
                .next()
                .and_then(|img| img.value().attr("src"))
                .unwrap_or_default()
                .to_string(),
        })
        .collect();

    Ok(items)
}

/// Scrape featured items and store them as products.
///
/// # Errors
///
/// Returns `CatalogError::Selector` if a selector does not parse. Problems
/// with individual items are logged and reported, not returned.
pub fn load_catalog(
    html: &str,
    selectors: &CatalogSelectors,
    database: &Database,
) -> Result<CatalogReport, CatalogError> {
    let mut report = CatalogReport::default();

    for item in scrape_featured_items(html, selectors)? {
        match add_item(&item, database) {
            Ok(key) => report.added.push(key),
            Err(reason) => {
                tracing::warn!(product = %item.name, ?reason, "Skipping featured item");
                report.skipped.push(SkippedItem {
                    name: item.name,
                    reason,
                });
            }
        }
    }

    tracing::info!(
        added = report.added.len(),
        skipped = report.skipped.len(),
        "Catalog loaded"
    );
    Ok(report)
}

fn add_item(item: &FeaturedItem, database: &Database) -> Result<ProductKey, SkipReason> {
    if item.name.is_empty() {
        return Err(SkipReason::MissingName);
    }

    let product = Product::from_price_text(&item.name, &item.price_text, &item.image_url)
        .map_err(|e: PriceError| SkipReason::InvalidPrice {
            message: e.to_string(),
        })?;

    database.add_product(product).map_err(|e| match e {
        DatabaseError::DuplicateProduct(_) => SkipReason::Duplicate,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <header><div class="rightHeader"></div></header>
        <div class="featuredItems">
            <div class="featuredItem">
                <img src="/img/mug.png" alt="">
                <div class="featuredName">  Mug  </div>
                <div class="featuredPrice">$9.50</div>
                <button>Add to Cart</button>
            </div>
            <div class="featuredItem">
                <img src="/img/scarf.png" alt="">
                <div class="featuredName">Wool <b>Scarf</b></div>
                <div class="featuredPrice">$19.99</div>
            </div>
            <div class="featuredItem">
                <div class="featuredName">Mystery Box</div>
                <div class="featuredPrice">Ask us</div>
            </div>
            <div class="featuredItem">
                <div class="featuredName">Mug</div>
                <div class="featuredPrice">$1.00</div>
            </div>
        </div>
        <div class="featuredItem"><div class="featuredName">Outside</div></div>
        </body></html>
    "#;

    #[test]
    fn test_scrape_featured_items() {
        let items = scrape_featured_items(PAGE, &CatalogSelectors::default()).unwrap();

        assert_eq!(items.len(), 4);
        assert_eq!(
            items.first().unwrap(),
            &FeaturedItem {
                name: "Mug".to_string(),
                price_text: "$9.50".to_string(),
                image_url: "/img/mug.png".to_string(),
            }
        );
        assert_eq!(items.get(1).unwrap().name, "Wool Scarf");
        assert_eq!(items.get(2).unwrap().image_url, "");
    }

    #[test]
    fn test_load_catalog_skips_bad_items() {
        let db = Database::new();
        let report = load_catalog(PAGE, &CatalogSelectors::default(), &db).unwrap();

        assert_eq!(
            report.added,
            [ProductKey::from("Mug"), ProductKey::from("Wool Scarf")]
        );
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(
            report.skipped.first().unwrap().reason,
            SkipReason::InvalidPrice { .. }
        ));
        assert_eq!(report.skipped.get(1).unwrap().reason, SkipReason::Duplicate);

        // First write wins.
        assert_eq!(db.get_product("Mug").unwrap().price.to_string(), "9.50");
        assert_eq!(db.len(), 2);
    }

    #[test]
    fn test_missing_name_skipped() {
        let html = r#"<div class="featuredItems"><div class="featuredItem">
            <div class="featuredPrice">$3.00</div></div></div>"#;
        let db = Database::new();
        let report = load_catalog(html, &CatalogSelectors::default(), &db).unwrap();

        assert!(report.added.is_empty());
        assert_eq!(report.skipped.first().unwrap().reason, SkipReason::MissingName);
    }

    #[test]
    fn test_out_of_range_price_skipped() {
        let html = r#"<div class="featuredItems"><div class="featuredItem">
            <div class="featuredName">Yacht</div>
            <div class="featuredPrice">$50000000000000000000000000000.00</div>
            </div></div>"#;
        let db = Database::new();
        let report = load_catalog(html, &CatalogSelectors::default(), &db).unwrap();

        assert!(report.added.is_empty());
        assert!(matches!(
            report.skipped.first().unwrap().reason,
            SkipReason::InvalidPrice { .. }
        ));
        assert!(db.is_empty());
    }

    #[test]
    fn test_invalid_selector() {
        let selectors = CatalogSelectors {
            item: "[[".to_string(),
            ..CatalogSelectors::default()
        };
        let result = scrape_featured_items(PAGE, &selectors);
        assert!(matches!(result, Err(CatalogError::Selector { .. })));
    }
}
