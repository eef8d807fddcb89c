//! Storefront Cart Core - Shared types library.
//!
//! This crate provides the catalog types used across the cart widget:
//! - `storefront` - Cart bookkeeping, templates and the page adapter
//! - `cli` - Command-line host that replays page events
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no page access, no timers.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, product keys and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
