//! Catalog document checks.

use dessert_cart_core::Catalog;
use dessert_cart_storefront::catalog::{CatalogLoader, CatalogSource};
use tracing::{info, warn};

/// Load a catalog and log a one-line summary per product.
///
/// # Errors
///
/// Returns an error if the document cannot be fetched or parsed, or if it
/// holds no products.
pub async fn check(source: &str) -> Result<Catalog, Box<dyn std::error::Error>> {
    let source = CatalogSource::parse_arg(source);
    info!(%source, "Loading catalog");

    let catalog = CatalogLoader::new(source).load().await?;
    if catalog.is_empty() {
        warn!("Catalog has no products; the storefront would show the failure message");
        return Err("catalog is empty".into());
    }

    for product in catalog.iter() {
        info!(
            id = %product.id,
            category = %product.category,
            price = %product.price,
            "{}",
            product.title
        );
    }
    info!(products = catalog.len(), "Catalog OK");

    Ok(catalog)
}
