//! Remote catalog source.
//!
//! The catalog is a single JSON array of products served over HTTPS. The
//! client only fetches and decodes it; persisting and falling back to the
//! local copy is the application state's job.
//!
//! # Example
//!
//! ```rust,ignore
//! use coffee_shop_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let products = client.fetch_products().await?;
//! ```

mod client;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when fetching the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("catalog source returned HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// The body is not a JSON product array.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
