//! View projection.
//!
//! Maps the catalog and the cart into plain display data for the templates.
//! Projections are rebuilt from scratch on every render; nothing here holds
//! state between renders.

use dessert_cart_core::{Cart, CartEntry, Catalog, PendingQuantity, Product};

/// Product card display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: u32,
    pub title: String,
    pub category: String,
    pub image: String,
    pub price: String,
    pub quantity: QuantityControlView,
}

impl ProductCardView {
    /// Project a product with a freshly reset pending quantity.
    ///
    /// Cards carry nothing derived from the cart, so cart changes never leave
    /// a rendered card stale.
    #[must_use]
    pub fn project(product: &Product) -> Self {
        Self {
            id: product.id.get(),
            title: product.title.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            price: product.price.display(),
            quantity: QuantityControlView::new(product, PendingQuantity::INITIAL),
        }
    }
}

/// The per-card pending quantity control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityControlView {
    pub product_id: u32,
    pub value: u32,
    /// Whether the minus button does anything.
    pub can_decrease: bool,
}

impl QuantityControlView {
    #[must_use]
    pub fn new(product: &Product, pending: PendingQuantity) -> Self {
        Self {
            product_id: product.id.get(),
            value: pending.get(),
            can_decrease: pending > PendingQuantity::INITIAL,
        }
    }
}

/// What the product grid region shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductGridView {
    pub loading: bool,
    pub failed: bool,
    pub message: String,
    pub cards: Vec<ProductCardView>,
}

impl ProductGridView {
    pub const LOADING_MESSAGE: &'static str = "Loading products...";
    pub const FAILED_MESSAGE: &'static str = "Failed to load products. Please try again later.";

    /// Placeholder while the catalog fetch is pending.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            loading: true,
            failed: false,
            message: Self::LOADING_MESSAGE.to_string(),
            cards: Vec::new(),
        }
    }

    /// Placeholder after the catalog failed to load.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            loading: false,
            failed: true,
            message: Self::FAILED_MESSAGE.to_string(),
            cards: Vec::new(),
        }
    }

    /// One card per product, in catalog order.
    #[must_use]
    pub fn project(catalog: &Catalog) -> Self {
        Self {
            loading: false,
            failed: false,
            message: String::new(),
            cards: catalog
                .iter()
                .map(ProductCardView::project)
                .collect(),
        }
    }
}

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub product_id: u32,
    pub title: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
}

impl CartItemView {
    fn project(entry: &CartEntry, product: &Product) -> Self {
        Self {
            product_id: product.id.get(),
            title: product.title.clone(),
            quantity: entry.quantity(),
            unit_price: product.price.display(),
            line_price: entry.subtotal(product.price).display(),
        }
    }
}

/// Cart panel display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPanelView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub total: String,
    /// Drives the empty placeholder; the summary shows otherwise.
    pub is_empty: bool,
}

impl CartPanelView {
    /// A panel for an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::project(&Cart::new(), &Catalog::empty())
    }

    /// Project the cart against the catalog.
    ///
    /// Entries whose product no longer resolves are skipped; they stay in the
    /// cart.
    #[must_use]
    pub fn project(cart: &Cart, catalog: &Catalog) -> Self {
        Self {
            items: line_items(cart, catalog),
            item_count: cart.total_item_count(),
            total: cart.total_price(catalog).display(),
            is_empty: cart.is_empty(),
        }
    }
}

/// Rows for every resolvable entry, in cart order.
#[must_use]
pub fn line_items(cart: &Cart, catalog: &Catalog) -> Vec<CartItemView> {
    cart.entries()
        .iter()
        .filter_map(|entry| {
            catalog
                .get(entry.product_id())
                .map(|product| CartItemView::project(entry, product))
        })
        .collect()
}
