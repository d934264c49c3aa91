//! Persisted cart inspection.

use std::path::Path;

use dessert_cart_core::Cart;
use dessert_cart_storefront::catalog::{CatalogLoader, CatalogSource};
use dessert_cart_storefront::storage::{CartStorage, FileStore};
use dessert_cart_storefront::views::CartPanelView;
use tracing::info;

/// Default directory of the file-backed cart slot.
pub const DEFAULT_DIR: &str = ".dessert-cart";

/// Log the persisted cart.
///
/// With a catalog the cart is priced the same way the storefront panel is;
/// without one only product ids and quantities are shown.
///
/// # Errors
///
/// Returns an error if the slot cannot be read or the catalog fails to load.
pub async fn show(dir: &Path, catalog: Option<&str>) -> Result<Cart, Box<dyn std::error::Error>> {
    let storage = CartStorage::new(Box::new(FileStore::new(dir)));
    if storage.raw()?.is_none() {
        info!(dir = %dir.display(), "No cart saved");
        return Ok(Cart::new());
    }
    let cart = storage.load();

    match catalog {
        Some(source) => {
            let catalog = CatalogLoader::new(CatalogSource::parse_arg(source))
                .load()
                .await?;
            let panel = CartPanelView::project(&cart, &catalog);
            for item in &panel.items {
                info!(
                    quantity = item.quantity,
                    unit_price = %item.unit_price,
                    line_price = %item.line_price,
                    "{}",
                    item.title
                );
            }
            info!(items = panel.item_count, total = %panel.total, "Cart");
        }
        None => {
            for entry in cart.entries() {
                info!(
                    product_id = %entry.product_id(),
                    quantity = entry.quantity(),
                    "Entry"
                );
            }
            info!(items = cart.total_item_count(), "Cart");
        }
    }

    Ok(cart)
}

/// Overwrite the persisted cart with an empty one.
///
/// # Errors
///
/// Returns an error if the slot cannot be written.
pub fn clear(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut storage = CartStorage::new(Box::new(FileStore::new(dir)));
    storage.save(&Cart::new())?;
    info!(dir = %dir.display(), "Cart cleared");
    Ok(())
}
