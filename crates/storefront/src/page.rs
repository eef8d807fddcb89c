//! Rendering adapter over the host page.
//!
//! The cart never touches markup outside this trait. A browser host would
//! implement [`Page`] over the DOM; [`MemoryPage`] keeps the header region in
//! memory for the CLI and tests.
//!
//! Implementations are shared with the auto-hide timer, which may fire on a
//! different task, so they must synchronise internally.

use std::sync::{Mutex, PoisonError};

/// The parts of the storefront page the cart widget writes to.
pub trait Page: Send + Sync {
    /// Whether a cart element is currently on the page.
    fn is_cart_rendered(&self) -> bool;

    /// Append cart markup to the header region.
    fn insert_cart(&self, html: &str);

    /// Remove the cart element, if any.
    fn remove_cart(&self);

    /// Update the cart icon badge.
    fn set_item_count(&self, count: u32);
}

#[derive(Debug, Default)]
struct PageState {
    carts: Vec<String>,
    item_count: u32,
    inserts: usize,
}

/// In-memory page: a header region plus the badge count.
#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<PageState>,
}

impl MemoryPage {
    /// Create a page with an empty header region.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Header region markup including any rendered cart.
    #[must_use]
    pub fn render(&self) -> String {
        self.lock().carts.concat()
    }

    /// Markup of the rendered cart, if any.
    #[must_use]
    pub fn cart_html(&self) -> Option<String> {
        self.lock().carts.first().cloned()
    }

    /// Number of cart elements on the page.
    #[must_use]
    pub fn cart_elements(&self) -> usize {
        self.lock().carts.len()
    }

    /// Value shown on the cart icon badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock().item_count
    }

    /// How many times cart markup has been inserted.
    #[must_use]
    pub fn inserts(&self) -> usize {
        self.lock().inserts
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Page for MemoryPage {
    fn is_cart_rendered(&self) -> bool {
        !self.lock().carts.is_empty()
    }

    fn insert_cart(&self, html: &str) {
        let mut state = self.lock();
        state.carts.push(html.to_string());
        state.inserts += 1;
    }

    fn remove_cart(&self) {
        let mut state = self.lock();
        if !state.carts.is_empty() {
            state.carts.remove(0);
        }
    }

    fn set_item_count(&self, count: u32) {
        self.lock().item_count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let page = MemoryPage::new();
        assert!(!page.is_cart_rendered());

        page.insert_cart("<div class=\"cart\"></div>");
        assert!(page.is_cart_rendered());
        assert_eq!(page.render(), "<div class=\"cart\"></div>");

        page.remove_cart();
        assert!(!page.is_cart_rendered());
        assert_eq!(page.render(), "");
    }

    #[test]
    fn test_remove_without_cart_is_noop() {
        let page = MemoryPage::new();
        page.remove_cart();
        page.remove_cart();
        assert_eq!(page.cart_elements(), 0);
    }

    #[test]
    fn test_insert_twice_keeps_both() {
        let page = MemoryPage::new();
        page.insert_cart("a");
        page.insert_cart("b");
        assert_eq!(page.cart_elements(), 2);
        assert_eq!(page.cart_html().as_deref(), Some("a"));
        assert_eq!(page.inserts(), 2);
    }

    #[test]
    fn test_badge() {
        let page = MemoryPage::new();
        page.set_item_count(7);
        assert_eq!(page.item_count(), 7);
    }
}
