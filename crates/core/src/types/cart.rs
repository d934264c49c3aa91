//! The cart and its entries.
//!
//! A [`Cart`] is an ordered list of [`CartEntry`] values keyed by product.
//!
//! ## Invariants
//!
//! - At most one entry per product id. Adding an id that is already present
//!   accumulates onto the existing entry.
//! - Every stored quantity is at least 1. An entry that would drop to zero is
//!   removed.
//! - Entries keep first-add order; updates never reorder.
//!
//! Mutating methods return `true` when the cart contents changed so that the
//! caller can decide whether to persist and re-render.

use serde::{Deserialize, Serialize};

use super::{Catalog, Price, ProductId};

/// One line of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    product_id: ProductId,
    quantity: u32,
}

impl CartEntry {
    /// Create an entry, or `None` for a zero quantity.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: u32) -> Option<Self> {
        if quantity == 0 {
            return None;
        }
        Some(Self {
            product_id,
            quantity,
        })
    }

    /// The referenced product.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Number of units, always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `quantity x price` for the resolved product.
    #[must_use]
    pub fn subtotal(&self, price: Price) -> Price {
        price.times(self.quantity)
    }
}

/// The shopping cart.
///
/// Deserialization normalizes the stored sequence: zero quantities are dropped
/// and duplicate product ids are merged into the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from raw entries, enforcing the cart invariants.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = CartEntry>) -> Self {
        let mut cart = Self::new();
        for entry in entries {
            cart.add(entry.product_id, entry.quantity);
        }
        cart
    }

    /// Add `quantity` units of a product.
    ///
    /// Merges into an existing entry or appends a new one. A zero quantity is
    /// a no-op, as is adding to an entry already at `u32::MAX`.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        match self.entry_mut(product_id) {
            Some(entry) => {
                let merged = entry.quantity.saturating_add(quantity);
                if merged == entry.quantity {
                    return false;
                }
                entry.quantity = merged;
            }
            None => self.entries.push(CartEntry {
                product_id,
                quantity,
            }),
        }
        true
    }

    /// Add one unit of a product that is already in the cart.
    pub fn increment(&mut self, product_id: ProductId) -> bool {
        if !self.contains(product_id) {
            return false;
        }
        self.add(product_id, 1)
    }

    /// Remove one unit of a product, dropping the entry when it reaches zero.
    pub fn decrement(&mut self, product_id: ProductId) -> bool {
        let Some(entry) = self.entry_mut(product_id) else {
            return false;
        };
        if entry.quantity <= 1 {
            return self.remove(product_id);
        }
        entry.quantity -= 1;
        true
    }

    /// Remove a product entirely. Removing an absent product is a no-op.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.product_id != product_id);
        self.entries.len() != before
    }

    /// Remove every entry.
    pub fn clear(&mut self) -> bool {
        let changed = !self.entries.is_empty();
        self.entries.clear();
        changed
    }

    /// Entries in first-add order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id == product_id)
    }

    /// Whether the product has an entry.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Units of a product in the cart (zero when absent).
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, CartEntry::quantity)
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u32 {
        self.entries
            .iter()
            .fold(0_u32, |acc, e| acc.saturating_add(e.quantity))
    }

    /// Sum of line subtotals for entries whose product resolves.
    ///
    /// Entries referencing unknown products contribute nothing.
    #[must_use]
    pub fn total_price(&self, catalog: &Catalog) -> Price {
        self.entries
            .iter()
            .filter_map(|e| catalog.get(e.product_id).map(|p| e.subtotal(p.price)))
            .sum()
    }

    fn entry_mut(&mut self, product_id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.product_id == product_id)
    }
}

impl From<Vec<CartEntry>> for Cart {
    fn from(entries: Vec<CartEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::Product;

    fn id(n: u32) -> ProductId {
        ProductId::new(n).unwrap()
    }

    fn catalog() -> Catalog {
        [(1, 450), (2, 600)]
            .into_iter()
            .map(|(n, cents)| Product {
                id: id(n),
                title: format!("Dessert {n}"),
                price: Price::new(Decimal::new(cents, 2)).unwrap(),
                category: "Cake".to_string(),
                image: String::new(),
            })
            .collect()
    }

    fn price(cents: i64) -> Price {
        Price::new(Decimal::new(cents, 2)).unwrap()
    }

    #[test]
    fn test_repeated_adds_merge() {
        let mut cart = Cart::new();
        for quantity in [2, 5, 1] {
            assert!(cart.add(id(1), quantity));
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(id(1)), 8);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.add(id(1), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_at_max_quantity_is_noop() {
        let mut cart = Cart::new();
        assert!(cart.add(id(1), u32::MAX));
        assert!(!cart.add(id(1), 1));
        assert!(!cart.increment(id(1)));
        assert_eq!(cart.quantity_of(id(1)), u32::MAX);

        assert!(cart.decrement(id(1)));
        assert!(cart.add(id(1), 5));
        assert_eq!(cart.quantity_of(id(1)), u32::MAX);
    }

    #[test]
    fn test_insertion_order_is_first_add_order() {
        let mut cart = Cart::new();
        cart.add(id(2), 1);
        cart.add(id(1), 1);
        cart.add(id(2), 3);
        let order: Vec<u32> = cart.entries().iter().map(|e| e.product_id().get()).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn test_increment_requires_existing_entry() {
        let mut cart = Cart::new();
        assert!(!cart.increment(id(1)));
        assert!(cart.is_empty());

        cart.add(id(1), 1);
        assert!(cart.increment(id(1)));
        assert_eq!(cart.quantity_of(id(1)), 2);
    }

    #[test]
    fn test_decrement_to_zero_removes() {
        let mut cart = Cart::new();
        cart.add(id(1), 2);
        assert!(cart.decrement(id(1)));
        assert_eq!(cart.quantity_of(id(1)), 1);
        assert!(cart.decrement(id(1)));
        assert!(!cart.contains(id(1)));
        assert!(!cart.decrement(id(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(id(1), 1);
        assert!(cart.remove(id(1)));
        assert!(!cart.remove(id(1)));
    }

    #[test]
    fn test_clear_reports_change() {
        let mut cart = Cart::new();
        assert!(!cart.clear());
        cart.add(id(2), 4);
        assert!(cart.clear());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_scenario() {
        let catalog = catalog();
        let mut cart = Cart::new();

        cart.add(id(1), 2);
        assert_eq!(cart.total_price(&catalog), price(900));
        assert_eq!(cart.total_item_count(), 2);

        cart.add(id(2), 1);
        assert_eq!(cart.total_price(&catalog), price(1500));
        assert_eq!(cart.total_item_count(), 3);

        cart.add(id(1), 1);
        assert_eq!(cart.quantity_of(id(1)), 3);
        assert_eq!(cart.total_price(&catalog), price(1950));
        assert_eq!(cart.total_item_count(), 4);

        cart.remove(id(2));
        assert_eq!(cart.total_price(&catalog), price(1350));
        assert_eq!(cart.total_item_count(), 3);
    }

    #[test]
    fn test_total_price_ignores_unknown_products() {
        let mut cart = Cart::new();
        cart.add(id(1), 1);
        cart.add(id(42), 10);
        assert_eq!(cart.total_price(&catalog()), price(450));
        assert_eq!(cart.total_item_count(), 11);
    }

    #[test]
    fn test_serialized_shape() {
        let mut cart = Cart::new();
        cart.add(id(3), 2);
        assert_eq!(
            serde_json::to_string(&cart).unwrap(),
            r#"[{"productId":3,"quantity":2}]"#
        );
    }

    #[test]
    fn test_deserialize_normalizes() {
        let json = r#"[
            {"productId":1,"quantity":2},
            {"productId":2,"quantity":0},
            {"productId":1,"quantity":3}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(id(1)), 5);
    }

    #[test]
    fn test_entry_new_rejects_zero() {
        assert!(CartEntry::new(id(1), 0).is_none());
        assert_eq!(CartEntry::new(id(1), 2).unwrap().subtotal(price(450)), price(900));
    }
}
