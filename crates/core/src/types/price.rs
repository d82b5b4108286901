//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel as JSON numbers in the remote catalog document
//! (`"price": 12.99`) and are persisted as exact decimal text so that no
//! binary floating point rounding leaks into stored cart lines.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// An amount derived from prices does not fit a decimal.
    #[error("amount out of range")]
    Overflow,
}

/// A non-negative unit price.
///
/// ## Examples
///
/// ```
/// use coffee_shop_core::Price;
/// use rust_decimal::Decimal;
///
/// let price: Price = "2.50".parse().unwrap();
/// assert_eq!(price.line_total(2), Ok(Decimal::new(500, 2)));
/// assert_eq!(price.to_string(), "2.50");
///
/// assert!("-1".parse::<Price>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Price(Decimal);

impl Price {
    /// Number of decimal places used for display and totals.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Zero price.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The exact amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// `price * quantity`, unrounded.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the product does not fit a decimal.
    pub fn line_total(&self, quantity: u32) -> Result<Decimal, PriceError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .ok_or(PriceError::Overflow)
    }
}

/// Sum of amounts.
///
/// # Errors
///
/// Returns [`PriceError::Overflow`] if the sum does not fit a decimal.
pub fn checked_sum<I>(amounts: I) -> Result<Decimal, PriceError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .ok_or(PriceError::Overflow)
}

/// Round an amount to two decimal places for display.
///
/// Midpoints round away from zero, matching how shoppers expect
/// `0.125` to show as `0.13`.
#[must_use]
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(Price::DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", round_for_display(self.0))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|e| PriceError::Invalid(e.to_string()))?;
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

// SQLx support (with sqlite feature). Stored as TEXT to keep the exact decimal.
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Price {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Price {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(s.parse::<Self>()?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.0.to_string(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_prices() {
        assert_eq!("12.99".parse::<Price>().unwrap().amount(), Decimal::new(1299, 2));
        assert_eq!("0".parse::<Price>().unwrap(), Price::zero());
        assert_eq!(" 3 ".parse::<Price>().unwrap().amount(), Decimal::from(3));
    }

    #[test]
    fn test_parse_rejects_negative() {
        let err = "-0.01".parse::<Price>().unwrap_err();
        assert!(matches!(err, PriceError::Negative(_)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = "twelve".parse::<Price>().unwrap_err();
        assert!(matches!(err, PriceError::Invalid(_)));
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let price: Price = serde_json::from_str("12.99").unwrap();
        assert_eq!(price.amount(), Decimal::new(1299, 2));

        let whole: Price = serde_json::from_str("11").unwrap();
        assert_eq!(whole.amount(), Decimal::from(11));
    }

    #[test]
    fn test_deserialize_rejects_negative_number() {
        assert!(serde_json::from_str::<Price>("-4.5").is_err());
    }

    #[test]
    fn test_serialize_as_json_number() {
        let price: Price = "2.5".parse().unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "2.5");
    }

    #[test]
    fn test_line_total() {
        let price: Price = "2.50".parse().unwrap();
        assert_eq!(price.line_total(3).unwrap(), Decimal::new(750, 2));
        assert_eq!(price.line_total(0).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_line_total_overflow_is_an_error() {
        let price: Price = "100000000000000000000".parse().unwrap();
        assert_eq!(price.line_total(4_000_000_000), Err(PriceError::Overflow));
    }

    #[test]
    fn test_checked_sum() {
        let amounts = [Decimal::new(250, 2), Decimal::new(100, 2)];
        assert_eq!(checked_sum(amounts).unwrap(), Decimal::new(350, 2));
        assert_eq!(checked_sum(Vec::new()).unwrap(), Decimal::ZERO);
        assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), Err(PriceError::Overflow));
    }

    #[test]
    fn test_display_rounds_to_two_places() {
        assert_eq!("3".parse::<Price>().unwrap().to_string(), "3.00");
        assert_eq!("0.125".parse::<Price>().unwrap().to_string(), "0.13");
        assert_eq!("19.994".parse::<Price>().unwrap().to_string(), "19.99");
    }

    #[test]
    fn test_round_for_display_midpoint() {
        assert_eq!(round_for_display(Decimal::new(2345, 3)), Decimal::new(235, 2));
    }
}
