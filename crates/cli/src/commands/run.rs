//! Event replay against a fresh cart.
//!
//! Events run in the order given. `wait:MS` sleeps in real time so the
//! auto-hide timer can fire.
//!
//! # Usage
//!
//! ```bash
//! cart-cli run --page index.html add:Mug add:Hat remove:Mug click-cart
//! ```

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use storefront_cart::cart::CartView;
use storefront_cart::catalog::{CatalogReport, CatalogSelectors};
use storefront_cart::config::WidgetConfig;
use storefront_cart::page::MemoryPage;
use storefront_cart::scheduler::TokioScheduler;
use storefront_cart::state::Storefront;

use super::{CommandError, read_page};

/// A page interaction to replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// "Add to Cart" clicked on a featured item.
    Add(String),
    /// Cart line removed.
    Remove(String),
    /// Cart icon clicked.
    ClickCart,
    /// Let time pass.
    Wait(Duration),
}

impl FromStr for PageEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "click-cart" {
            return Ok(Self::ClickCart);
        }
        match s.split_once(':') {
            Some(("add", name)) => Ok(Self::Add(name.to_string())),
            Some(("remove", name)) => Ok(Self::Remove(name.to_string())),
            Some(("wait", ms)) => ms
                .parse::<u64>()
                .map(|ms| Self::Wait(Duration::from_millis(ms)))
                .map_err(|e| format!("invalid wait {ms:?}: {e}")),
            _ => Err(format!(
                "unknown event {s:?} (expected add:NAME, remove:NAME, click-cart or wait:MS)"
            )),
        }
    }
}

#[derive(Serialize)]
struct RunOutput {
    catalog: CatalogReport,
    failures: Vec<String>,
    cart: CartView,
    badge: u32,
    cart_visible: bool,
    header_html: String,
}

/// Replay `events` against a cart built from the page's catalog.
///
/// Failed events are logged and reported; they do not stop the replay.
///
/// # Errors
///
/// Returns `CommandError` if the page, templates or runtime are unusable.
pub async fn replay(
    config: &WidgetConfig,
    page_path: &Path,
    events: &[PageEvent],
    json: bool,
) -> Result<(), CommandError> {
    let html = read_page(page_path)?;
    let page = Arc::new(MemoryPage::new());
    let scheduler = Arc::new(TokioScheduler::from_current()?);

    let mut store = Storefront::new(config, page.clone(), scheduler)?;
    let catalog = store.load_catalog(&html, &CatalogSelectors::default())?;

    let mut failures = Vec::new();
    for event in events {
        let result = match event {
            PageEvent::Add(name) => store.on_add_button(name),
            PageEvent::Remove(name) => store.on_remove(name),
            PageEvent::ClickCart => {
                store.on_cart_icon_click();
                Ok(())
            }
            PageEvent::Wait(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(())
            }
        };
        if let Err(e) = result {
            failures.push(format!("{event:?}: {e}"));
        }
    }

    let output = RunOutput {
        catalog,
        failures,
        cart: store.cart().snapshot(),
        badge: page.item_count(),
        cart_visible: store.cart().is_visible(),
        header_html: page.render(),
    };

    #[allow(clippy::print_stdout)]
    {
        if json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", output.header_html);
            println!(
                "items: {}  total: {}  visible: {}",
                output.badge, output.cart.subtotal, output.cart_visible
            );
            for failure in &output.failures {
                println!("failed: {failure}");
            }
        }
    }

    Ok(())
}
