//! Markup templates for the cart widget.
//!
//! Templates are plain strings with literal placeholder tokens. Rendering is
//! a plain string replace of the **first** occurrence of each token, so a
//! template may be swapped at runtime without recompiling.
//!
//! # Tokens
//!
//! | Template | Tokens |
//! |---|---|
//! | cart | `(cartItemsHtml)`, `(cartTotalHtml)` |
//! | item | `(name)`, `(count)`, `(price)`, `(total)` |

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder tokens recognised by the templates.
pub mod tokens {
    /// Concatenated item rows.
    pub const CART_ITEMS: &str = "(cartItemsHtml)";
    /// Cart grand total, two decimals.
    pub const CART_TOTAL: &str = "(cartTotalHtml)";
    /// Product name.
    pub const NAME: &str = "(name)";
    /// Quantity in cart.
    pub const COUNT: &str = "(count)";
    /// Unit price, two decimals.
    pub const PRICE: &str = "(price)";
    /// Line total, two decimals.
    pub const TOTAL: &str = "(total)";
}

/// Outer cart markup.
pub const DEFAULT_CART_TEMPLATE: &str = r#"
<div class="cart">
<div class="cartRow cartHeader">
<div>Product</div>
<div>Qty</div>
<div>Price</div>
<div>Total</div>
</div>
(cartItemsHtml)
<div class="cartTotal">
<div></div>
<div></div>
<div class="cartTotalText">Total:</div>
<div>$(cartTotalHtml)</div>
</div>
</div>"#;

/// Markup for one cart line.
pub const DEFAULT_CART_ITEM_TEMPLATE: &str = r#"
<div class="cartRow">
<div>(name)</div>
<div>(count)</div>
<div>$(price)</div>
<div>$(total)</div>
</div>
"#;

/// Error loading a template from disk.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// How product names are written into markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Escape {
    /// HTML-escape names before interpolation.
    #[default]
    Html,
    /// Interpolate names verbatim.
    None,
}

impl Escape {
    /// Apply this escaping mode to `text`.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Html => html_escape::encode_text(text).into_owned(),
            Self::None => text.to_string(),
        }
    }
}

/// The pair of templates a cart renders with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTemplates {
    /// Outer cart template.
    pub cart: String,
    /// Per-line template.
    pub item: String,
}

impl Default for CartTemplates {
    fn default() -> Self {
        Self {
            cart: DEFAULT_CART_TEMPLATE.to_string(),
            item: DEFAULT_CART_ITEM_TEMPLATE.to_string(),
        }
    }
}

impl CartTemplates {
    /// Load templates, falling back to the defaults for any path not given.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Read` if a given file cannot be read.
    pub fn load(cart_path: Option<&Path>, item_path: Option<&Path>) -> Result<Self, TemplateError> {
        let defaults = Self::default();
        Ok(Self {
            cart: cart_path.map_or(Ok(defaults.cart), read_template)?,
            item: item_path.map_or(Ok(defaults.item), read_template)?,
        })
    }
}

fn read_template(path: &Path) -> Result<String, TemplateError> {
    std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Replace the first occurrence of `token` in `template` with `value`.
#[must_use]
pub fn fill(template: &str, token: &str, value: &str) -> String {
    template.replacen(token, value, 1)
}
