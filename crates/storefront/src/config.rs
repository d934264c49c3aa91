//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CATALOG_URL` - HTTP(S) URL of the catalog document. Takes
//!   precedence over `STOREFRONT_CATALOG_PATH`.
//! - `STOREFRONT_CATALOG_PATH` - Path of a catalog document on disk
//!   (default: crates/storefront/static/data.json)
//! - `STOREFRONT_STORAGE` - `file` (default) or `memory`
//! - `STOREFRONT_STORAGE_DIR` - Directory holding the persisted cart slot
//!   (default: .dessert-cart)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::catalog::CatalogSource;

const DEFAULT_CATALOG_PATH: &str = "crates/storefront/static/data.json";
const DEFAULT_STORAGE_DIR: &str = ".dessert-cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the cart slot lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON file per key inside this directory.
    File(PathBuf),
    /// Process memory; the cart is lost on restart.
    Memory,
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Where the product catalog is loaded from
    pub catalog: CatalogSource,
    /// Where the cart is persisted
    pub storage: StorageBackend,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env
            .or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string()))?;

        let catalog = catalog_source(&env)?;
        let storage = storage_backend(&env)?;

        Ok(Self {
            host,
            port,
            catalog,
            storage,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

fn catalog_source<F>(env: &Env<F>) -> Result<CatalogSource, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = env.optional("STOREFRONT_CATALOG_URL") {
        let url = Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_CATALOG_URL".to_string(), e.to_string())
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_CATALOG_URL".to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        return Ok(CatalogSource::Http(url));
    }

    let path = env.or_default("STOREFRONT_CATALOG_PATH", DEFAULT_CATALOG_PATH);
    Ok(CatalogSource::File(PathBuf::from(path)))
}

fn storage_backend<F>(env: &Env<F>) -> Result<StorageBackend, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match env.or_default("STOREFRONT_STORAGE", "file").as_str() {
        "file" => Ok(StorageBackend::File(PathBuf::from(
            env.or_default("STOREFRONT_STORAGE_DIR", DEFAULT_STORAGE_DIR),
        ))),
        "memory" => Ok(StorageBackend::Memory),
        other => Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_STORAGE".to_string(),
            format!("expected 'file' or 'memory', got '{other}'"),
        )),
    }
}
