//! Coffee Shop Storefront - catalog and cart bootstrap.
//!
//! Runs the page-load sequence without a page: loads configuration, refreshes
//! the catalog (falling back to the locally stored copy when the remote
//! source is unreachable) and reports the persisted cart.
//!
//! # Architecture
//!
//! - Remote catalog fetched over HTTPS with `reqwest`
//! - Catalog and cart persisted in a local SQLite store via `sqlx`
//! - Logging via `tracing` (`RUST_LOG` overrides the default filter,
//!   `LOG_FORMAT=json` selects structured output)

#![cfg_attr(not(test), forbid(unsafe_code))]

use coffee_shop_storefront::config::StorefrontConfig;
use coffee_shop_storefront::{AppState, CatalogSource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coffee_shop_storefront=info".into());

    // LOG_FORMAT=json switches to structured output for log collectors
    let is_json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let config = StorefrontConfig::from_env().expect("Failed to load configuration");
    let state = AppState::new(config).expect("Failed to initialize application state");

    match state.refresh_catalog().await {
        Ok(load) => {
            let source = match load.source {
                CatalogSource::Remote => "remote",
                CatalogSource::Local => "local",
            };
            tracing::info!(source, count = load.products.len(), "Catalog ready");
        }
        Err(e) if e.is_store_unavailable() => {
            tracing::warn!("Local store unavailable, continuing with an empty catalog");
        }
        // Already logged by the state; the catalog stays empty.
        Err(_) => {}
    }

    match state.cart().await {
        Ok(cart) if cart.is_empty() => tracing::info!("Cart is empty"),
        Ok(cart) => tracing::info!(
            lines = cart.items.len(),
            items = cart.item_count,
            total = %cart.total_display,
            "Cart loaded"
        ),
        // Already logged by the state; nothing to show.
        Err(_) => {}
    }

    if let Ok(store) = state.store().await {
        store.close().await;
    }
}
