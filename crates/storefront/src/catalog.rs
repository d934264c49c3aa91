//! Catalog loader.
//!
//! Fetches the raw product document, validates it, and normalizes each record
//! into a [`Product`]. Ids are assigned by position (1-based), so they are only
//! stable while the source keeps its ordering.
//!
//! # Source format
//!
//! ```json
//! [
//!   {
//!     "name": "Waffle with Berries",
//!     "category": "Waffle",
//!     "price": 6.5,
//!     "image": { "desktop": "...", "thumbnail": "...", "mobile": "...", "tablet": "..." }
//!   }
//! ]
//! ```

use std::fmt;
use std::path::PathBuf;

use dessert_cart_core::{Catalog, Price, Product, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("HTTP error! Status: {0}")]
    Status(reqwest::StatusCode),

    /// Reading a file source failed.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The body is not a JSON array of product records.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record parsed but cannot become a product.
    #[error("Invalid product record at position {position}: {reason}")]
    InvalidRecord { position: usize, reason: String },
}

/// Where the catalog document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Fetched with an HTTP GET.
    Http(Url),
    /// Read from disk.
    File(PathBuf),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl CatalogSource {
    /// Interpret a command-line argument as a URL or a path.
    #[must_use]
    pub fn parse_arg(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Http(url),
            _ => Self::File(PathBuf::from(raw)),
        }
    }
}

// =============================================================================
// Raw Records
// =============================================================================

#[derive(Debug, Deserialize)]
struct RawProduct {
    name: String,
    price: Decimal,
    category: String,
    image: RawImage,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    #[serde(default)]
    desktop: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
}

impl RawImage {
    /// Prefer the desktop variant, falling back to the thumbnail.
    fn resolve(self) -> Option<String> {
        self.desktop
            .filter(|s| !s.is_empty())
            .or_else(|| self.thumbnail.filter(|s| !s.is_empty()))
    }
}

fn normalize(position: usize, raw: RawProduct) -> Result<Product, LoadError> {
    let price = Price::new(raw.price).map_err(|e| LoadError::InvalidRecord {
        position,
        reason: e.to_string(),
    })?;
    let image = raw.image.resolve().ok_or_else(|| LoadError::InvalidRecord {
        position,
        reason: "image has neither a desktop nor a thumbnail variant".to_string(),
    })?;

    Ok(Product {
        id: ProductId::from_position(position),
        title: raw.name,
        price,
        category: raw.category,
        image,
    })
}

/// Parse and normalize a catalog document.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] if the body is not an array of records and
/// [`LoadError::InvalidRecord`] if a record cannot be normalized.
pub fn parse_catalog(body: &str) -> Result<Catalog, LoadError> {
    let records: Vec<RawProduct> = serde_json::from_str(body)?;
    records
        .into_iter()
        .enumerate()
        .map(|(position, raw)| normalize(position, raw))
        .collect()
}

// =============================================================================
// CatalogLoader
// =============================================================================

/// Loads the catalog from its configured source.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    client: reqwest::Client,
    source: CatalogSource,
}

impl CatalogLoader {
    /// Create a loader for a source.
    #[must_use]
    pub fn new(source: CatalogSource) -> Self {
        Self {
            client: reqwest::Client::new(),
            source,
        }
    }

    /// The configured source.
    #[must_use]
    pub const fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Fetch and normalize the catalog.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` on transport failure, non-success status, or a
    /// malformed payload.
    #[instrument(skip(self), fields(source = %self.source))]
    pub async fn load(&self) -> Result<Catalog, LoadError> {
        let body = match &self.source {
            CatalogSource::Http(url) => self.fetch(url).await?,
            CatalogSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
        };

        let catalog = parse_catalog(&body)?;
        debug!(products = catalog.len(), "Catalog parsed");
        Ok(catalog)
    }

    async fn fetch(&self, url: &Url) -> Result<String, LoadError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"[
        {
            "image": {
                "thumbnail": "./images/waffle-thumb.jpg",
                "mobile": "./images/waffle-mobile.jpg",
                "tablet": "./images/waffle-tablet.jpg",
                "desktop": "./images/waffle-desktop.jpg"
            },
            "name": "Waffle with Berries",
            "category": "Waffle",
            "price": 6.5
        },
        {
            "image": { "thumbnail": "./images/brulee-thumb.jpg", "desktop": "" },
            "name": "Vanilla Bean Crème Brûlée",
            "category": "Crème Brûlée",
            "price": 7.0
        }
    ]"#;

    #[test]
    fn test_parse_assigns_positional_ids() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        let ids: Vec<u32> = catalog.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);

        let waffle = catalog.get(ProductId::new(1).unwrap()).unwrap();
        assert_eq!(waffle.title, "Waffle with Berries");
        assert_eq!(waffle.category, "Waffle");
        assert_eq!(waffle.price.to_string(), "$6.50");
    }

    #[test]
    fn test_image_prefers_desktop_then_thumbnail() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        let images: Vec<&str> = catalog.iter().map(|p| p.image.as_str()).collect();
        assert_eq!(
            images,
            vec!["./images/waffle-desktop.jpg", "./images/brulee-thumb.jpg"]
        );
    }

    #[test]
    fn test_non_array_is_parse_error() {
        assert!(matches!(
            parse_catalog(r#"{"products": []}"#),
            Err(LoadError::Parse(_))
        ));
        assert!(matches!(parse_catalog("{not json"), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let body = r#"[{"name": "Macaron", "price": 8, "image": {"desktop": "x"}}]"#;
        assert!(matches!(parse_catalog(body), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_negative_price_is_invalid_record() {
        let body = r#"[{"name": "Tiramisu", "category": "Tiramisu", "price": -1, "image": {"desktop": "x"}}]"#;
        assert!(matches!(
            parse_catalog(body),
            Err(LoadError::InvalidRecord { position: 0, .. })
        ));
    }

    #[test]
    fn test_missing_image_is_invalid_record() {
        let body = r#"[{"name": "Baklava", "category": "Baklava", "price": 4, "image": {}}]"#;
        assert!(matches!(
            parse_catalog(body),
            Err(LoadError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_empty_array_is_empty_catalog() {
        assert!(parse_catalog("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_arg() {
        assert!(matches!(
            CatalogSource::parse_arg("https://example.com/data.json"),
            CatalogSource::Http(_)
        ));
        assert_eq!(
            CatalogSource::parse_arg("static/data.json"),
            CatalogSource::File(PathBuf::from("static/data.json"))
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let loader = CatalogLoader::new(CatalogSource::File(file.path().to_path_buf()));
        let catalog = loader.load().await.unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let loader = CatalogLoader::new(CatalogSource::File(PathBuf::from(
            "/nonexistent/dessert-cart/data.json",
        )));
        assert!(matches!(loader.load().await, Err(LoadError::Io { .. })));
    }
}
