//! Catalog product domain type.

use serde::{Deserialize, Serialize};

use coffee_shop_core::{Price, ProductId};

/// A catalog record.
///
/// Immutable once fetched. The remote document carries more attributes
/// (region, weight, roast level, ...); only the persisted ones are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Origin-assigned identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Free-form description (empty when the source omits it).
    #[serde(default)]
    pub description: String,
    /// Image URI, or empty.
    #[serde(default)]
    pub image_url: String,
}

impl Product {
    /// Case-insensitive substring match on name or description.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}
