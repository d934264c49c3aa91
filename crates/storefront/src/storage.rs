//! Cart persistence.
//!
//! The cart lives in a single string-keyed slot of a [`KeyValueStore`], encoded
//! as a JSON array of `{ "productId": .., "quantity": .. }` objects.
//!
//! Loading never fails: an absent slot is an empty cart, and a slot whose
//! content does not parse is logged and also treated as an empty cart.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use dessert_cart_core::Cart;
use thiserror::Error;
use tracing::{debug, warn};

/// Key of the cart slot.
pub const CART_KEY: &str = "dessertCart";

/// Errors from the underlying key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File system operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serializing the cart failed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Key contains characters that cannot name a slot.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A durable string-keyed store of string values.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a slot, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-process store, lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a pre-populated slot.
    #[must_use]
    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.to_string(), value.to_string());
        Self { slots }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// One file per key (`<dir>/<key>.json`).
///
/// Writes go to a temporary file in the same directory and are renamed into
/// place, so a crash never leaves a half-written slot.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let io_err = |source: std::io::Error| StorageError::Io {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(value.as_bytes()).map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

// =============================================================================
// CartStorage
// =============================================================================

/// Saves and restores the cart through a [`KeyValueStore`].
pub struct CartStorage {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl CartStorage {
    /// Persist the cart under [`CART_KEY`].
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_key(store, CART_KEY)
    }

    /// Persist the cart under a custom key.
    #[must_use]
    pub fn with_key(store: Box<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    /// Serialize and write the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store rejects the write.
    pub fn save(&mut self, cart: &Cart) -> Result<(), StorageError> {
        let value = serde_json::to_string(cart)?;
        self.store.set(&self.key, &value)?;
        debug!(key = %self.key, entries = cart.len(), "Cart saved");
        Ok(())
    }

    /// Read the cart, falling back to an empty cart on any failure.
    #[must_use]
    pub fn load(&self) -> Cart {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read cart from storage");
                return Cart::new();
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to parse cart from storage");
                Cart::new()
            }
        }
    }

    /// Read the raw slot without parsing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be read.
    pub fn raw(&self) -> Result<Option<String>, StorageError> {
        self.store.get(&self.key)
    }
}

impl std::fmt::Debug for CartStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStorage")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
