//! HTTP client for the remote catalog document.

use std::sync::Arc;

use tracing::instrument;
use url::Url;

use super::CatalogError;
use crate::config::CatalogConfig;
use crate::models::Product;

/// Number of body characters kept in diagnostics.
const BODY_PREVIEW_CHARS: usize = 500;

/// Client for the remote catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

#[derive(Debug)]
struct CatalogClientInner {
    client: reqwest::Client,
    url: Url,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                url: config.url.clone(),
            }),
        })
    }

    /// Fetch and decode the full product list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` on transport failure,
    /// `CatalogError::Status` on a non-success status, and
    /// `CatalogError::Parse` if the body is not a product array.
    #[instrument(skip(self), fields(url = %self.inner.url))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %preview(&response_text),
                "Catalog source returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: preview(&response_text),
            });
        }

        let products: Vec<Product> = match serde_json::from_str(&response_text) {
            Ok(products) => products,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %preview(&response_text),
                    "Failed to parse catalog response"
                );
                return Err(CatalogError::Parse(e));
            }
        };

        tracing::debug!(count = products.len(), "Catalog fetched");
        Ok(products)
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_bodies() {
        let body = "x".repeat(BODY_PREVIEW_CHARS * 2);
        assert_eq!(preview(&body).len(), BODY_PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
