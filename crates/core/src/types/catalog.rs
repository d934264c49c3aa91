//! The product catalog.
//!
//! A [`Catalog`] is loaded once at startup and never mutated afterwards. Every
//! other component refers to products by [`ProductId`] and resolves them here.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// 1-based position in the catalog source.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Category label shown above the title.
    pub category: String,
    /// Image URL (desktop variant when available).
    pub image: String,
}

/// The immutable, loaded-once set of products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from products in load order.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// An empty catalog, used when loading failed.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Resolve a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        // Ids are positions, so the fast path almost always hits.
        let index = usize::try_from(id.get()).ok()?.checked_sub(1)?;
        match self.products.get(index) {
            Some(product) if product.id == id => Some(product),
            _ => self.products.iter().find(|p| p.id == id),
        }
    }

    /// Whether a product id resolves.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Products in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
