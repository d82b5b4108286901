//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `STOREFRONT_DATABASE_URL` - SQLite connection string for the local store
//!   (falls back to `DATABASE_URL`, then `sqlite://CoffeeShopDB.sqlite3`)
//! - `CATALOG_URL` - Remote catalog JSON document
//!   (default: `https://fake-coffee-api.vercel.app/api`)
//! - `CATALOG_TIMEOUT_SECS` - Catalog request timeout (default: 10)
//! - `STOREFRONT_CURRENCY` - Currency label used when formatting amounts (default: DH)

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::db::STORE_NAME;

const DEFAULT_CATALOG_URL: &str = "https://fake-coffee-api.vercel.app/api";
const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CURRENCY: &str = "DH";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Local embedded store connection URL
    pub database_url: String,
    /// Remote catalog source configuration
    pub catalog: CatalogConfig,
    /// Currency label appended to formatted amounts
    pub currency: String,
}

/// Remote catalog source configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// URL of the JSON product array
    pub url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL");
        let catalog = CatalogConfig::from_env()?;
        let currency = get_env_or_default("STOREFRONT_CURRENCY", DEFAULT_CURRENCY);
        if currency.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_CURRENCY".to_string(),
                "must not be blank".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            catalog,
            currency,
        })
    }

    /// Configuration for an isolated in-memory store, used by tests and tools.
    #[must_use]
    pub fn in_memory(catalog_url: Url) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            catalog: CatalogConfig {
                url: catalog_url,
                timeout: Duration::from_secs(DEFAULT_CATALOG_TIMEOUT_SECS),
            },
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = Url::parse(&get_env_or_default("CATALOG_URL", DEFAULT_CATALOG_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_URL".to_string(), e.to_string()))?;
        let timeout_secs = get_optional_env("CATALOG_TIMEOUT_SECS")
            .map(|value| value.parse::<u64>())
            .transpose()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_TIMEOUT_SECS".to_string(), e.to_string())
            })?
            .unwrap_or(DEFAULT_CATALOG_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get database URL with fallback to generic `DATABASE_URL`, then a file named
/// after the store.
fn get_database_url(primary_key: &str) -> String {
    if let Ok(value) = std::env::var(primary_key) {
        return value;
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return value;
    }
    default_database_url()
}

fn default_database_url() -> String {
    format!("sqlite://{STORE_NAME}.sqlite3")
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_url_is_named_after_store() {
        assert_eq!(default_database_url(), "sqlite://CoffeeShopDB.sqlite3");
    }

    #[test]
    fn test_default_catalog_url_parses() {
        let url = Url::parse(DEFAULT_CATALOG_URL).unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.path(), "/api");
    }

    #[test]
    fn test_in_memory_config() {
        let url = Url::parse("http://127.0.0.1:1234/api").unwrap();
        let config = StorefrontConfig::in_memory(url.clone());
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.catalog.url, url);
        assert_eq!(config.currency, "DH");
        assert_eq!(config.catalog.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_get_env_or_default_uses_default_when_unset() {
        let value = get_env_or_default("COFFEE_SHOP_TEST_SURELY_UNSET_VAR", "fallback");
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_get_optional_env_missing() {
        assert!(get_optional_env("COFFEE_SHOP_TEST_SURELY_UNSET_VAR").is_none());
    }
}
