//! Catalog inspection.
//!
//! # Usage
//!
//! ```bash
//! cart-cli catalog --page index.html
//! cart-cli catalog --page index.html --json
//! ```

use std::path::Path;

use serde::Serialize;
use storefront_cart::catalog::{CatalogReport, CatalogSelectors, load_catalog};
use storefront_cart::db::Database;
use storefront_cart_core::Product;

use super::{CommandError, read_page};

#[derive(Serialize)]
struct CatalogOutput {
    products: Vec<Product>,
    #[serde(flatten)]
    report: CatalogReport,
}

/// Load the page's featured items and print the resulting products.
///
/// # Errors
///
/// Returns `CommandError` if the page cannot be read or serialized.
pub fn list(page: &Path, json: bool) -> Result<(), CommandError> {
    let html = read_page(page)?;
    let database = Database::new();
    let report = load_catalog(&html, &CatalogSelectors::default(), &database)?;

    let output = CatalogOutput {
        products: database.products().iter().map(|p| (**p).clone()).collect(),
        report,
    };

    #[allow(clippy::print_stdout)]
    {
        if json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            for product in &output.products {
                println!("{:<32} {:>10}  {}", product.name, product.price, product.image_url);
            }
            for skipped in &output.report.skipped {
                println!("skipped: {} ({:?})", skipped.name, skipped.reason);
            }
        }
    }

    Ok(())
}
