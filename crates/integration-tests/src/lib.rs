//! Integration tests for Dessert Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dessert-cart-integration-tests
//! ```
//!
//! No external services are needed: [`TestContext`] serves the storefront on
//! an ephemeral local port with a catalog file and a cart directory of its
//! own.
//!
//! # Test Categories
//!
//! - `storefront_flow` - HTTP flow against a running server
//! - `cart_properties` - Cart invariants over random operation sequences

#![allow(clippy::missing_panics_doc)]

use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;

use dessert_cart_storefront::config::StorefrontConfig;
use dessert_cart_storefront::routes;
use dessert_cart_storefront::state::AppState;
use reqwest::{Client, Response, header};
use tempfile::{NamedTempFile, TempDir};

/// Four desserts priced 6.50, 7.00, 4.50 and 6.00.
pub const CATALOG: &str = r#"[
  {"name":"Waffle with Berries","category":"Waffle","price":6.5,"image":{"thumbnail":"w-t.jpg","desktop":"w-d.jpg"}},
  {"name":"Vanilla Bean Crème Brûlée","category":"Crème Brûlée","price":7,"image":{"desktop":"c-d.jpg"}},
  {"name":"Red Velvet Cake","category":"Cake","price":4.5,"image":{"thumbnail":"r-t.jpg"}},
  {"name":"Salted Caramel Brownie","category":"Brownie","price":6.0,"image":{"desktop":"b-d.jpg"}}
]"#;

/// A storefront running on a local port.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub state: AppState,
    _catalog: NamedTempFile,
}

impl TestContext {
    /// Serve [`CATALOG`] with the cart persisted under `storage_dir`.
    ///
    /// Returns once the catalog phase has resolved.
    pub async fn start(storage_dir: &Path) -> Self {
        Self::with_catalog(CATALOG, storage_dir).await
    }

    /// Serve an arbitrary catalog document.
    pub async fn with_catalog(catalog: &str, storage_dir: &Path) -> Self {
        let mut file = NamedTempFile::new().expect("Failed to create catalog file");
        file.write_all(catalog.as_bytes())
            .expect("Failed to write catalog file");

        let catalog_path = file.path().to_string_lossy().into_owned();
        let storage_dir = storage_dir.to_string_lossy().into_owned();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_CATALOG_PATH" => Some(catalog_path.clone()),
            "STOREFRONT_STORAGE_DIR" => Some(storage_dir.clone()),
            _ => None,
        })
        .expect("Failed to build configuration");

        let state = AppState::new(config);
        state
            .start_catalog_loading()
            .await
            .expect("Catalog loading task panicked");

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Listener has no address");
        let app = routes::app(state.clone());
        tokio::spawn(async move { axum::serve(listener, app).await });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            state,
            _catalog: file,
        }
    }

    /// GET a path.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET failed")
    }

    /// POST an urlencoded form body.
    pub async fn post(&self, path: &str, form: &str) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form.to_string())
            .send()
            .await
            .expect("POST failed")
    }
}

/// A fresh directory for the cart slot.
#[must_use]
pub fn storage_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create storage dir")
}
