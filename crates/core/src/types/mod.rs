//! Core types for the cart widget.
//!
//! This module provides type-safe wrappers for catalog concepts.

pub mod price;
pub mod product;

pub use price::{Price, PriceError, format_amount};
pub use product::{Product, ProductKey};
