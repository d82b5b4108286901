//! Cart domain types.
//!
//! [`CartItem`] is the persisted line. [`CartView`] is derived on read and
//! never stored: line totals, the cart total and their display strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use coffee_shop_core::{Price, PriceError, ProductId, checked_sum, round_for_display};

use super::Product;

/// A persisted cart line.
///
/// Keyed by the id of the product it was created from. `quantity` is at
/// least 1 for as long as the record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    /// Product id (natural key).
    pub id: ProductId,
    /// Product name at add time.
    pub name: String,
    /// Product image at add time.
    pub image_url: String,
    /// Unit price at add time; not re-synced with the catalog.
    pub price: Price,
    /// Number of units.
    pub quantity: u32,
}

impl CartItem {
    /// `price * quantity`, unrounded.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the amount does not fit a decimal.
    pub fn line_total(&self) -> Result<Decimal, PriceError> {
        self.price.line_total(self.quantity)
    }
}

/// The catalog fields copied into a new cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub name: String,
    pub price: Price,
    pub image_url: String,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
        }
    }
}

/// Outcome of setting a cart line's quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityChange {
    /// No line exists for the id; nothing was written.
    Missing,
    /// The line now has the requested quantity.
    Updated(CartItem),
    /// The requested quantity was zero or less, so the line was deleted.
    Removed,
}

/// Sum of `price * quantity` over all lines, rounded to two decimals.
///
/// # Errors
///
/// Returns `PriceError::Overflow` if a line total or the sum does not fit a
/// decimal.
pub fn cart_total(items: &[CartItem]) -> Result<Decimal, PriceError> {
    let line_totals = items
        .iter()
        .map(CartItem::line_total)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(round_for_display(checked_sum(line_totals)?))
}

/// Format an amount for display (e.g., "8.00 DH").
#[must_use]
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {currency}", round_for_display(amount))
}

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub id: ProductId,
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: Decimal,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: Decimal,
    pub total_display: String,
    pub item_count: u64,
}

impl CartView {
    /// Build the view from persisted lines.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if a line total or the cart total does
    /// not fit a decimal.
    pub fn from_items(items: &[CartItem], currency: &str) -> Result<Self, PriceError> {
        let lines = items
            .iter()
            .map(|item| {
                let line_total = round_for_display(item.line_total()?);
                Ok(CartLineView {
                    id: item.id,
                    name: item.name.clone(),
                    image_url: item.image_url.clone(),
                    quantity: item.quantity,
                    unit_price: format_amount(item.price.amount(), currency),
                    line_total,
                    line_price: format_amount(line_total, currency),
                })
            })
            .collect::<Result<Vec<_>, PriceError>>()?;
        let total = cart_total(items)?;

        Ok(Self {
            items: lines,
            total,
            total_display: format_amount(total, currency),
            item_count: items.iter().map(|item| u64::from(item.quantity)).sum(),
        })
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i64, price: &str, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Coffee {id}"),
            image_url: String::new(),
            price: price.parse().unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_cart_total() {
        let items = [item(1, "2.50", 2), item(2, "1.00", 3)];
        assert_eq!(cart_total(&items).unwrap(), Decimal::new(800, 2));
    }

    #[test]
    fn test_cart_total_empty() {
        assert_eq!(cart_total(&[]).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_cart_total_rounds_sum_not_lines() {
        // 3 * 0.335 = 1.005 -> 1.01
        let items = [item(1, "0.335", 3)];
        assert_eq!(cart_total(&items).unwrap(), Decimal::new(101, 2));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(8, 0), "DH"), "8.00 DH");
        assert_eq!(format_amount(Decimal::new(12999, 3), "DH"), "13.00 DH");
    }

    #[test]
    fn test_cart_view_from_items() {
        let items = [item(1, "2.50", 2), item(2, "1.00", 3)];
        let view = CartView::from_items(&items, "DH").unwrap();

        assert_eq!(view.items.len(), 2);
        assert_eq!(view.item_count, 5);
        assert_eq!(view.total_display, "8.00 DH");

        let first = view.items.first().unwrap();
        assert_eq!(first.unit_price, "2.50 DH");
        assert_eq!(first.line_total, Decimal::new(500, 2));
        assert_eq!(first.line_price, "5.00 DH");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from_items(&[], "DH").unwrap();
        assert!(view.is_empty());
        assert_eq!(view.item_count, 0);
        assert_eq!(view.total_display, "0.00 DH");
    }

    #[test]
    fn test_item_count_beyond_u32() {
        let items = [item(1, "1.00", u32::MAX), item(2, "1.00", 1)];
        let view = CartView::from_items(&items, "DH").unwrap();

        assert_eq!(view.item_count, u64::from(u32::MAX) + 1);
        assert_eq!(view.total, Decimal::from(u64::from(u32::MAX) + 1));
    }

    #[test]
    fn test_cart_view_overflow_is_an_error() {
        let items = [item(1, "100000000000000000000", 4_000_000_000)];
        assert_eq!(
            CartView::from_items(&items, "DH").unwrap_err(),
            PriceError::Overflow
        );
        assert_eq!(cart_total(&items).unwrap_err(), PriceError::Overflow);
    }

    #[test]
    fn test_snapshot_copies_catalog_fields() {
        let product = Product {
            id: ProductId::new(9),
            name: "Cold Brew".to_string(),
            price: "4.25".parse().unwrap(),
            description: "Smooth".to_string(),
            image_url: "https://example.com/cold-brew.png".to_string(),
        };

        let snapshot = ProductSnapshot::from(&product);
        assert_eq!(snapshot.name, "Cold Brew");
        assert_eq!(snapshot.price, product.price);
        assert_eq!(snapshot.image_url, product.image_url);
    }
}
