//! Catalog search.
//!
//! Plain case-insensitive substring matching over name and description.
//! The catalog is small and already in memory, so there is no index.

use crate::models::Product;

/// Products whose name or description contains `query`, in catalog order.
///
/// Surrounding whitespace in `query` is ignored; an empty query matches
/// everything.
#[must_use]
pub fn filter_products(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }

    products
        .iter()
        .filter(|product| product.matches(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coffee_shop_core::ProductId;

    use super::*;

    fn catalog() -> Vec<Product> {
        [
            (1, "Signature Blend", "Rich dark chocolate notes"),
            (2, "Golden Sunrise", "Bright and citrusy"),
            (3, "Rainforest Rhapsody", "Earthy with a hint of Chocolate"),
        ]
        .into_iter()
        .map(|(id, name, description)| Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: "10.00".parse().unwrap(),
            description: description.to_string(),
            image_url: String::new(),
        })
        .collect()
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.as_i64()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything() {
        assert_eq!(ids(&filter_products(&catalog(), "")), vec![1, 2, 3]);
        assert_eq!(ids(&filter_products(&catalog(), "   ")), vec![1, 2, 3]);
    }

    #[test]
    fn test_matches_name_case_insensitively() {
        assert_eq!(ids(&filter_products(&catalog(), "GOLDEN")), vec![2]);
    }

    #[test]
    fn test_matches_description() {
        assert_eq!(ids(&filter_products(&catalog(), "chocolate")), vec![1, 3]);
    }

    #[test]
    fn test_no_match() {
        assert!(filter_products(&catalog(), "decaf").is_empty());
    }
}
