//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::app::Phase;
use crate::catalog::CatalogLoader;
use crate::config::{StorageBackend, StorefrontConfig};
use crate::storage::{CartStorage, FileStore, KeyValueStore, MemoryStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The storefront phase sits
/// behind a single mutex, so cart mutations run one at a time and to
/// completion.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    phase: Mutex<Phase>,
}

impl AppState {
    /// Create a new application state in the loading phase.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self::with_phase(config, Phase::Loading)
    }

    /// Create an application state in a given phase.
    #[must_use]
    pub fn with_phase(config: StorefrontConfig, phase: Phase) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                phase: Mutex::new(phase),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Lock the storefront phase.
    pub async fn phase(&self) -> MutexGuard<'_, Phase> {
        self.inner.phase.lock().await
    }

    /// Open the configured cart storage.
    #[must_use]
    pub fn cart_storage(&self) -> CartStorage {
        let store: Box<dyn KeyValueStore> = match &self.inner.config.storage {
            StorageBackend::File(dir) => Box::new(FileStore::new(dir.clone())),
            StorageBackend::Memory => Box::new(MemoryStore::new()),
        };
        CartStorage::new(store)
    }

    /// Start loading the catalog in the background.
    ///
    /// The phase stays `Loading` until the fetch resolves, then switches to
    /// `Ready` or `Failed` in one step.
    pub fn start_catalog_loading(&self) -> tokio::task::JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let loader = CatalogLoader::new(state.config().catalog.clone());
            let resolved = Phase::boot(&loader, state.cart_storage()).await;
            *state.phase().await = resolved;
        })
    }
}
