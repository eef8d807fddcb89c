//! Storefront Cart library.
//!
//! A shopping-cart widget for storefront pages: it tracks selected products,
//! computes totals, renders cart markup into the page and hides it again
//! after a timeout.
//!
//! # Architecture
//!
//! - [`db`] and [`cart`] hold the bookkeeping and never touch the page directly
//! - [`page`] is the rendering adapter the host implements
//! - [`scheduler`] runs the auto-hide timer
//! - [`catalog`] reads products from the page's featured items
//! - [`state`] wires page events to the cart
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use storefront_cart::cart::Cart;
//! use storefront_cart::db::Database;
//! use storefront_cart::page::MemoryPage;
//! use storefront_cart::scheduler::ManualScheduler;
//! use storefront_cart_core::Product;
//!
//! let db = Arc::new(Database::new());
//! db.add_product(Product::from_price_text("Mug", "$9.50", "mug.png").unwrap()).unwrap();
//!
//! let page = Arc::new(MemoryPage::new());
//! let mut cart = Cart::new(db, page.clone(), Arc::new(ManualScheduler::new()));
//! cart.add_to_cart("Mug").unwrap();
//! cart.show_cart();
//!
//! assert!(page.render().contains("<div>Mug</div>"));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod page;
pub mod scheduler;
pub mod state;
pub mod templates;
