//! The cart store.
//!
//! [`CartStore`] is the only writer of the cart. Every mutation that changes
//! the cart runs to completion before returning: the cart is updated, saved
//! through [`CartStorage`], and the cart panel is re-projected. Mutations that
//! turn out to be no-ops (unknown product, product not in the cart, zero
//! quantity) skip both effects.

use std::sync::Arc;

use dessert_cart_core::{Cart, Catalog, Price, ProductId};
use tracing::{debug, error};

use crate::storage::CartStorage;
use crate::views::CartPanelView;

/// Owns the cart, its persistence, and its latest rendered projection.
#[derive(Debug)]
pub struct CartStore {
    cart: Cart,
    catalog: Arc<Catalog>,
    storage: CartStorage,
    panel: CartPanelView,
    revision: u64,
}

impl CartStore {
    /// Restore the cart from storage and project it.
    ///
    /// A missing or corrupt slot yields an empty cart.
    #[must_use]
    pub fn restore(catalog: Arc<Catalog>, storage: CartStorage) -> Self {
        let cart = storage.load();
        let panel = CartPanelView::project(&cart, &catalog);
        debug!(entries = cart.len(), "Cart restored");
        Self {
            cart,
            catalog,
            storage,
            panel,
            revision: 0,
        }
    }

    /// Add `quantity` units of a catalog product, merging with an existing
    /// entry.
    ///
    /// No-op when the quantity is zero or the product is not in the catalog.
    pub fn add_item(&mut self, product_id: ProductId, quantity: u32) -> bool {
        if !self.catalog.contains(product_id) {
            debug!(%product_id, "add_item: product not in catalog");
            return false;
        }
        self.apply(|cart| cart.add(product_id, quantity))
    }

    /// Add one unit of a product already in the cart.
    ///
    /// Entries whose product left the catalog are not incremented.
    pub fn increment(&mut self, product_id: ProductId) -> bool {
        if !self.catalog.contains(product_id) {
            debug!(%product_id, "increment: product not in catalog");
            return false;
        }
        self.apply(|cart| cart.increment(product_id))
    }

    /// Remove one unit, dropping the entry at zero.
    pub fn decrement(&mut self, product_id: ProductId) -> bool {
        self.apply(|cart| cart.decrement(product_id))
    }

    /// Remove a product entirely.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        self.apply(|cart| cart.remove(product_id))
    }

    /// Empty the cart. Always saves and re-renders, even if already empty.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.commit();
    }

    /// The current cart (read-only).
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The catalog the cart is resolved against.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The most recent cart panel projection.
    #[must_use]
    pub const fn panel(&self) -> &CartPanelView {
        &self.panel
    }

    /// Number of committed mutations since restore.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Sum of entry quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u32 {
        self.cart.total_item_count()
    }

    /// Sum of line subtotals over resolvable entries.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.cart.total_price(&self.catalog)
    }

    fn apply(&mut self, mutation: impl FnOnce(&mut Cart) -> bool) -> bool {
        let changed = mutation(&mut self.cart);
        if changed {
            self.commit();
        }
        changed
    }

    /// Save, then re-project.
    fn commit(&mut self) {
        if let Err(e) = self.storage.save(&self.cart) {
            // The in-memory cart stays authoritative; the next commit retries.
            error!(error = %e, "Failed to save cart");
        }
        self.panel = CartPanelView::project(&self.cart, &self.catalog);
        self.revision += 1;
    }
}
