//! Application lifecycle and user intents.
//!
//! The storefront starts in [`Phase::Loading`] while the catalog is fetched.
//! The fetch resolves exactly once, to either [`Phase::Ready`] (catalog loaded,
//! cart restored and projected) or [`Phase::Failed`] (nothing interactive).
//!
//! In the ready phase every user action arrives as a [`UserIntent`] and is
//! dispatched to the cart store or the order flow.

use std::sync::Arc;

use dessert_cart_core::{Catalog, ProductId};
use tracing::{error, info};

use crate::cart_store::CartStore;
use crate::catalog::CatalogLoader;
use crate::error::add_breadcrumb;
use crate::order::OrderFlow;
use crate::storage::CartStorage;
use crate::views::{CartPanelView, ProductGridView};

/// A discrete action taken by the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserIntent {
    AddToCart {
        product_id: ProductId,
        quantity: u32,
    },
    Increment(ProductId),
    Decrement(ProductId),
    Remove(ProductId),
    ConfirmOrder,
    StartNewOrder,
}

impl UserIntent {
    const fn name(&self) -> &'static str {
        match self {
            Self::AddToCart { .. } => "add_to_cart",
            Self::Increment(_) => "increment",
            Self::Decrement(_) => "decrement",
            Self::Remove(_) => "remove",
            Self::ConfirmOrder => "confirm_order",
            Self::StartNewOrder => "start_new_order",
        }
    }

    const fn product_id(&self) -> Option<ProductId> {
        match self {
            Self::AddToCart { product_id, .. }
            | Self::Increment(product_id)
            | Self::Decrement(product_id)
            | Self::Remove(product_id) => Some(*product_id),
            Self::ConfirmOrder | Self::StartNewOrder => None,
        }
    }
}

/// What a dispatched intent changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// The cart was saved and re-projected.
    pub cart_changed: bool,
    /// The order flow changed state.
    pub order_changed: bool,
}

/// The interactive storefront: catalog, cart, and order flow.
#[derive(Debug)]
pub struct Shop {
    catalog: Arc<Catalog>,
    store: CartStore,
    order: OrderFlow,
}

impl Shop {
    /// Restore the cart against a loaded catalog.
    #[must_use]
    pub fn open(catalog: Catalog, storage: CartStorage) -> Self {
        let catalog = Arc::new(catalog);
        let store = CartStore::restore(Arc::clone(&catalog), storage);
        Self {
            catalog,
            store,
            order: OrderFlow::new(),
        }
    }

    /// Apply a user intent.
    pub fn dispatch(&mut self, intent: UserIntent) -> Outcome {
        let product_id = intent.product_id().map(|id| id.to_string());
        let data: Vec<(&str, &str)> = product_id
            .iter()
            .map(|id| ("product_id", id.as_str()))
            .collect();
        add_breadcrumb("cart", intent.name(), Some(data.as_slice()));

        match intent {
            UserIntent::AddToCart {
                product_id,
                quantity,
            } => Outcome {
                cart_changed: self.store.add_item(product_id, quantity),
                order_changed: false,
            },
            UserIntent::Increment(product_id) => Outcome {
                cart_changed: self.store.increment(product_id),
                order_changed: false,
            },
            UserIntent::Decrement(product_id) => Outcome {
                cart_changed: self.store.decrement(product_id),
                order_changed: false,
            },
            UserIntent::Remove(product_id) => Outcome {
                cart_changed: self.store.remove_item(product_id),
                order_changed: false,
            },
            UserIntent::ConfirmOrder => Outcome {
                cart_changed: false,
                order_changed: self.order.confirm(&self.store),
            },
            UserIntent::StartNewOrder => {
                let changed = self.order.start_new_order(&mut self.store);
                Outcome {
                    cart_changed: changed,
                    order_changed: changed,
                }
            }
        }
    }

    /// The loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart store.
    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    /// The order flow.
    #[must_use]
    pub const fn order(&self) -> &OrderFlow {
        &self.order
    }

    /// Product grid with every card's pending quantity reset.
    #[must_use]
    pub fn grid(&self) -> ProductGridView {
        ProductGridView::project(&self.catalog)
    }

    /// The latest cart panel projection.
    #[must_use]
    pub const fn panel(&self) -> &CartPanelView {
        self.store.panel()
    }
}

/// Where the storefront is in its lifecycle.
#[derive(Debug, Default)]
pub enum Phase {
    /// Catalog fetch pending.
    #[default]
    Loading,
    /// Catalog loaded; cart restored.
    Ready(Box<Shop>),
    /// Catalog could not be loaded. Only a reload recovers.
    Failed,
}

impl Phase {
    /// Resolve a loading phase from the catalog source.
    ///
    /// Load errors and empty catalogs both end in [`Phase::Failed`]; the cart
    /// is never restored in that case.
    pub async fn boot(loader: &CatalogLoader, storage: CartStorage) -> Self {
        match loader.load().await {
            Ok(catalog) if catalog.is_empty() => {
                error!(source = %loader.source(), "Catalog is empty");
                Self::Failed
            }
            Ok(catalog) => {
                info!(products = catalog.len(), "Catalog loaded");
                Self::Ready(Box::new(Shop::open(catalog, storage)))
            }
            Err(e) => {
                error!(source = %loader.source(), error = %e, "Error fetching products");
                Self::Failed
            }
        }
    }

    /// The shop, once ready.
    #[must_use]
    pub fn shop(&self) -> Option<&Shop> {
        match self {
            Self::Ready(shop) => Some(shop.as_ref()),
            Self::Loading | Self::Failed => None,
        }
    }

    /// Mutable access to the shop, once ready.
    pub fn shop_mut(&mut self) -> Option<&mut Shop> {
        match self {
            Self::Ready(shop) => Some(shop.as_mut()),
            Self::Loading | Self::Failed => None,
        }
    }

    /// Product grid for the current phase.
    #[must_use]
    pub fn grid(&self) -> ProductGridView {
        match self {
            Self::Loading => ProductGridView::loading(),
            Self::Ready(shop) => shop.grid(),
            Self::Failed => ProductGridView::failed(),
        }
    }

    /// Whether the catalog has resolved successfully.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use dessert_cart_core::{Price, Product};
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::CatalogSource;
    use crate::storage::{CART_KEY, MemoryStore};

    fn id(n: u32) -> ProductId {
        ProductId::new(n).unwrap()
    }

    fn shop() -> Shop {
        let catalog: Catalog = [450, 600]
            .into_iter()
            .enumerate()
            .map(|(i, cents)| Product {
                id: ProductId::from_position(i),
                title: format!("Dessert {}", i + 1),
                price: Price::new(Decimal::new(cents, 2)).unwrap(),
                category: "Cake".to_string(),
                image: String::new(),
            })
            .collect();
        Shop::open(catalog, CartStorage::new(Box::new(MemoryStore::new())))
    }

    fn file_loader(body: &str) -> (CatalogLoader, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        let loader = CatalogLoader::new(CatalogSource::File(file.path().to_path_buf()));
        (loader, file)
    }

    #[test]
    fn test_dispatch_cart_intents() {
        let mut shop = shop();

        let outcome = shop.dispatch(UserIntent::AddToCart {
            product_id: id(1),
            quantity: 2,
        });
        assert_eq!(
            outcome,
            Outcome {
                cart_changed: true,
                order_changed: false
            }
        );
        assert!(shop.dispatch(UserIntent::Increment(id(1))).cart_changed);
        assert!(shop.dispatch(UserIntent::Decrement(id(1))).cart_changed);
        assert_eq!(shop.panel().item_count, 2);

        assert!(shop.dispatch(UserIntent::Remove(id(1))).cart_changed);
        assert!(!shop.dispatch(UserIntent::Remove(id(1))).cart_changed);
        assert!(shop.panel().is_empty);
    }

    #[test]
    fn test_dispatch_order_flow() {
        let mut shop = shop();
        assert_eq!(shop.dispatch(UserIntent::ConfirmOrder), Outcome::default());

        shop.dispatch(UserIntent::AddToCart {
            product_id: id(2),
            quantity: 1,
        });
        assert!(shop.dispatch(UserIntent::ConfirmOrder).order_changed);
        assert!(shop.order().is_confirmed());

        let outcome = shop.dispatch(UserIntent::StartNewOrder);
        assert!(outcome.cart_changed && outcome.order_changed);
        assert!(!shop.order().is_confirmed());
        assert!(shop.store().cart().is_empty());
    }

    #[test]
    fn test_grid_unchanged_by_cart_edits() {
        let mut shop = shop();
        let before = shop.grid();

        shop.dispatch(UserIntent::AddToCart {
            product_id: id(2),
            quantity: 3,
        });
        assert_eq!(shop.grid(), before);

        shop.dispatch(UserIntent::ConfirmOrder);
        shop.dispatch(UserIntent::StartNewOrder);
        assert_eq!(shop.grid(), before);
        assert_eq!(before.cards[1].quantity.value, 1);
    }

    #[tokio::test]
    async fn test_boot_ready_restores_cart() {
        let (loader, _file) = file_loader(
            r#"[{"name":"Red Velvet Cake","category":"Cake","price":4.5,"image":{"desktop":"a.jpg"}}]"#,
        );
        let storage = CartStorage::new(Box::new(MemoryStore::with_slot(
            CART_KEY,
            r#"[{"productId":1,"quantity":2}]"#,
        )));

        let phase = Phase::boot(&loader, storage).await;
        assert!(phase.is_ready());
        let shop = phase.shop().unwrap();
        assert_eq!(shop.panel().total, "$9.00");
    }

    #[tokio::test]
    async fn test_boot_failed_on_load_error() {
        let loader = CatalogLoader::new(CatalogSource::File(PathBuf::from(
            "/nonexistent/dessert-cart/data.json",
        )));
        let phase = Phase::boot(&loader, CartStorage::new(Box::new(MemoryStore::new()))).await;
        assert!(matches!(phase, Phase::Failed));
        assert!(phase.grid().failed);
    }

    #[tokio::test]
    async fn test_boot_failed_on_empty_catalog() {
        let (loader, _file) = file_loader("[]");
        let phase = Phase::boot(&loader, CartStorage::new(Box::new(MemoryStore::new()))).await;
        assert!(matches!(phase, Phase::Failed));
    }

    #[test]
    fn test_loading_phase() {
        let mut phase = Phase::default();
        assert!(phase.grid().loading);
        assert!(phase.shop_mut().is_none());
        assert!(!phase.is_ready());
    }
}
