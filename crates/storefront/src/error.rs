//! Errors returned by cart operations.
//!
//! Every failure is non-fatal: the operation is logged, cart state is left
//! unchanged and the error is returned for callers that care. Callers
//! replaying page events may ignore it.

use storefront_cart_core::ProductKey;
use thiserror::Error;

/// Cart operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// No product key was given.
    #[error("product key is empty")]
    EmptyKey,

    /// The key does not name a product in the database.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductKey),

    /// The product is known but not in the cart.
    #[error("product not in cart: {0}")]
    NotInCart(ProductKey),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
