//! Unified error handling for storefront operations.
//!
//! `AppError` is what the rendering layer sees. Every operation on
//! [`AppState`](crate::state::AppState) logs its error before returning it,
//! so callers only decide what to show, never what to report.

use thiserror::Error;

use coffee_shop_core::{PriceError, ProductId};

use crate::catalog::CatalogError;
use crate::db::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Local store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Remote catalog fetch failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The product is not in the loaded catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// A cart amount could not be computed.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PriceError),
}

impl AppError {
    /// Whether the failure came from opening the local store.
    ///
    /// Callers fall back to empty/default state in that case.
    #[must_use]
    pub const fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::Store(StoreError::Open(_)))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::UnknownProduct(ProductId::new(123));
        assert_eq!(err.to_string(), "Unknown product: 123");

        let err = AppError::from(StoreError::Open("blocked".to_string()));
        assert_eq!(err.to_string(), "Store error: failed to open store: blocked");

        let err = AppError::from(PriceError::Overflow);
        assert_eq!(err.to_string(), "Pricing error: amount out of range");
    }

    #[test]
    fn test_store_unavailable_classification() {
        assert!(AppError::from(StoreError::Open("gone".to_string())).is_store_unavailable());
        assert!(!AppError::from(StoreError::InvalidQuantity(-1)).is_store_unavailable());
        assert!(!AppError::UnknownProduct(ProductId::new(1)).is_store_unavailable());
        assert!(!AppError::from(PriceError::Overflow).is_store_unavailable());
    }
}
