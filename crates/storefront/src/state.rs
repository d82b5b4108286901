//! Application state shared across the rendering layer.
//!
//! Holds what the page needs between user events: the in-memory catalog,
//! the current view mode, the lazily opened local store and the remote
//! catalog client. Every operation is the error boundary for the work it does:
//! failures are logged here and returned as [`AppError`], and the in-memory
//! state is left as it was.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use coffee_shop_core::ProductId;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::db::{LocalStore, Store};
use crate::error::{AppError, Result};
use crate::models::{CartItem, CartView, Product, ProductSnapshot, QuantityChange};
use crate::search::filter_products;

/// How the product list is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Where a catalog load got its products from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Freshly fetched from the remote source.
    Remote,
    /// Read back from the local store after the fetch failed.
    Local,
}

/// Result of [`AppState::refresh_catalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLoad {
    pub source: CatalogSource,
    pub products: Vec<Product>,
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    store: LocalStore,
    catalog: CatalogClient,
    products: RwLock<Vec<Product>>,
    view_mode: RwLock<ViewMode>,
}

impl AppState {
    /// Create a new application state. The store is not opened until first use.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let store = LocalStore::new(config.database_url.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                catalog,
                products: RwLock::new(Vec::new()),
                view_mode: RwLock::new(ViewMode::default()),
            }),
        })
    }

    /// Get the open local store, opening it on first use.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be opened.
    pub async fn store(&self) -> Result<&Store> {
        report("open_store", self.inner.store.handle().await.map_err(AppError::from))
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the catalog, persisting it locally; on fetch failure use the
    /// locally persisted copy instead.
    ///
    /// A failure to persist a freshly fetched catalog is logged and does not
    /// prevent the products from being returned. An empty local copy is a
    /// legitimate (empty) catalog.
    ///
    /// # Errors
    ///
    /// Returns an error only when the fetch fails and the local copy cannot
    /// be read either.
    #[instrument(skip(self))]
    pub async fn refresh_catalog(&self) -> Result<CatalogLoad> {
        let load = match self.inner.catalog.fetch_products().await {
            Ok(products) => {
                if let Err(e) = self.persist_catalog(&products).await {
                    tracing::error!(error = %e, "Failed to persist fetched catalog");
                }
                tracing::info!(count = products.len(), "Catalog loaded from remote source");
                CatalogLoad {
                    source: CatalogSource::Remote,
                    products,
                }
            }
            Err(fetch_err) => {
                tracing::warn!(error = %fetch_err, "Catalog fetch failed, loading local copy");
                let products = report("load_catalog", self.load_local_catalog().await)?;
                if products.is_empty() {
                    tracing::info!("No products found in local store");
                } else {
                    tracing::info!(count = products.len(), "Catalog loaded from local store");
                }
                CatalogLoad {
                    source: CatalogSource::Local,
                    products,
                }
            }
        };

        self.set_products(load.products.clone());
        Ok(load)
    }

    async fn persist_catalog(&self, products: &[Product]) -> Result<()> {
        let store = self.inner.store.handle().await?;
        store.catalog().replace_all(products).await?;
        Ok(())
    }

    async fn load_local_catalog(&self) -> Result<Vec<Product>> {
        let store = self.inner.store.handle().await?;
        Ok(store.catalog().load_all().await?)
    }

    /// Snapshot of the loaded catalog.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.inner
            .products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Look a product up in the loaded catalog.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.inner
            .products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|product| product.id == id)
            .cloned()
    }

    /// Products in the loaded catalog matching `query` by name or description.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Product> {
        let products = self
            .inner
            .products
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        filter_products(&products, query)
    }

    fn set_products(&self, products: Vec<Product>) {
        *self
            .inner
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner) = products;
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnknownProduct` if `id` is not in the loaded
    /// catalog, or `AppError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, id: ProductId) -> Result<CartItem> {
        report("add_to_cart", self.try_add_to_cart(id).await)
    }

    async fn try_add_to_cart(&self, id: ProductId) -> Result<CartItem> {
        let product = self.product(id).ok_or(AppError::UnknownProduct(id))?;
        let snapshot = ProductSnapshot::from(&product);

        let store = self.inner.store.handle().await?;
        let item = store.cart().upsert_on_add(id, &snapshot).await?;
        tracing::info!(quantity = item.quantity, "Product added to cart");
        Ok(item)
    }

    /// Set a cart line's quantity. Zero or less removes the line.
    ///
    /// Callers pass `current + 1` / `current - 1` for the plus and minus
    /// buttons.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn update_quantity(&self, id: ProductId, new_quantity: i64) -> Result<QuantityChange> {
        report("update_quantity", self.try_update_quantity(id, new_quantity).await)
    }

    async fn try_update_quantity(&self, id: ProductId, new_quantity: i64) -> Result<QuantityChange> {
        let store = self.inner.store.handle().await?;
        Ok(store.cart().set_quantity(id, new_quantity).await?)
    }

    /// Remove a cart line. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store fails.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, id: ProductId) -> Result<bool> {
        report("remove_from_cart", self.try_remove_from_cart(id).await)
    }

    async fn try_remove_from_cart(&self, id: ProductId) -> Result<bool> {
        let store = self.inner.store.handle().await?;
        let removed = store.cart().remove(id).await?;
        if removed {
            tracing::info!("Product removed from cart");
        }
        Ok(removed)
    }

    /// Load the cart and compute its totals.
    ///
    /// An empty cart is `Ok` with no lines; a failed load is `Err`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store fails, or `AppError::Pricing`
    /// if the totals do not fit a decimal.
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<CartView> {
        report("load_cart", self.try_cart().await)
    }

    async fn try_cart(&self) -> Result<CartView> {
        let store = self.inner.store.handle().await?;
        let items = store.cart().load_all().await?;
        CartView::from_items(&items, &self.inner.config.currency).map_err(AppError::from)
    }

    // =========================================================================
    // View
    // =========================================================================

    /// Current product list layout.
    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        *self
            .inner
            .view_mode
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Switch the product list layout.
    pub fn set_view_mode(&self, mode: ViewMode) {
        *self
            .inner
            .view_mode
            .write()
            .unwrap_or_else(PoisonError::into_inner) = mode;
        tracing::debug!(?mode, "View mode changed");
    }
}

/// Log a failed operation before handing the result back.
fn report<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        tracing::error!(operation, error = %err, "Storefront operation failed");
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;

    fn state() -> AppState {
        // Port 9 (discard) on localhost: the fetch fails fast.
        let url = Url::parse("http://127.0.0.1:9/api").unwrap();
        AppState::new(StorefrontConfig::in_memory(url)).unwrap()
    }

    #[test]
    fn test_view_mode_defaults_to_grid_and_toggles() {
        let state = state();
        assert_eq!(state.view_mode(), ViewMode::Grid);

        state.set_view_mode(ViewMode::List);
        assert_eq!(state.view_mode(), ViewMode::List);

        state.set_view_mode(ViewMode::Grid);
        assert_eq!(state.view_mode(), ViewMode::Grid);
    }

    #[test]
    fn test_view_mode_serde() {
        assert_eq!(serde_json::to_string(&ViewMode::List).unwrap(), "\"list\"");
    }

    #[tokio::test]
    async fn test_store_is_not_opened_until_used() {
        let state = state();
        assert!(!state.inner.store.is_open());

        let cart = state.cart().await.unwrap();
        assert!(cart.is_empty());
        assert!(state.inner.store.is_open());
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_rejected() {
        let state = state();

        let err = state.add_to_cart(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, AppError::UnknownProduct(_)));
        assert!(state.cart().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_on_first_run_gives_empty_local_catalog() {
        let state = state();

        let load = state.refresh_catalog().await.unwrap();
        assert_eq!(load.source, CatalogSource::Local);
        assert!(load.products.is_empty());
        assert!(state.products().is_empty());
    }
}
