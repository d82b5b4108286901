//! Integration tests for the Coffee Shop storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p coffee-shop-integration-tests
//! ```
//!
//! No external services are needed: stores are in-memory or in a temporary
//! directory, and the remote catalog is served by a local mock server.
//!
//! # Test Categories
//!
//! - `catalog_store` - Catalog persistence contracts
//! - `cart_store` - Cart persistence contracts and invariants
//! - `store_lifecycle` - Opening, sharing and versioning the store
//! - `storefront_state` - End-to-end flows through the application state
//!
//! This library holds the fixtures shared by those tests.

use coffee_shop_core::ProductId;
use coffee_shop_storefront::config::StorefrontConfig;
use coffee_shop_storefront::db::Store;
use coffee_shop_storefront::models::{Product, ProductSnapshot};
use coffee_shop_storefront::AppState;

/// URL of an in-memory store.
pub const MEMORY_STORE_URL: &str = "sqlite::memory:";

/// Build a product with a deterministic description and image.
///
/// # Panics
///
/// Panics if `price` is not a valid non-negative decimal.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn product(id: i64, name: &str, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: price.parse().unwrap(),
        description: format!("{name} from our roastery"),
        image_url: format!("https://images.example.com/{id}.png"),
    }
}

/// A small catalog in the shape served by the remote source.
#[must_use]
pub fn sample_catalog() -> Vec<Product> {
    vec![
        product(1, "Signature Blend", "12.99"),
        product(2, "Golden Sunrise", "10.99"),
        product(3, "Rainforest Rhapsody", "11.99"),
    ]
}

/// Remote catalog JSON for `products`, with the extra attributes the real
/// source carries.
#[must_use]
pub fn catalog_json(products: &[Product]) -> String {
    let records: Vec<serde_json::Value> = products
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": p.id,
                "name": p.name,
                "description": p.description,
                "price": p.price,
                "region": "Central America",
                "weight": 500,
                "flavor_profile": ["Chocolate", "Caramel"],
                "grind_option": ["Whole Bean"],
                "roast_level": 3,
                "image_url": p.image_url,
            })
        })
        .collect();
    serde_json::Value::Array(records).to_string()
}

/// Snapshot of `product` as copied into a cart line.
#[must_use]
pub fn snapshot(product: &Product) -> ProductSnapshot {
    ProductSnapshot::from(product)
}

/// Open a fresh in-memory store.
///
/// # Panics
///
/// Panics if the store cannot be opened.
#[allow(clippy::unwrap_used)]
pub async fn memory_store() -> Store {
    Store::open(MEMORY_STORE_URL).await.unwrap()
}

/// Application state backed by an in-memory store and the catalog at
/// `catalog_url`.
///
/// # Panics
///
/// Panics if `catalog_url` is not a valid URL.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn state_with_catalog_url(catalog_url: &str) -> AppState {
    let url = url::Url::parse(catalog_url).unwrap();
    AppState::new(StorefrontConfig::in_memory(url)).unwrap()
}

/// Application state backed by the store at `database_url` and the catalog
/// at `catalog_url`.
///
/// # Panics
///
/// Panics if `catalog_url` is not a valid URL.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn state_with_store_url(catalog_url: &str, database_url: &str) -> AppState {
    let url = url::Url::parse(catalog_url).unwrap();
    let config = StorefrontConfig {
        database_url: database_url.to_string(),
        ..StorefrontConfig::in_memory(url)
    };
    AppState::new(config).unwrap()
}
