//! Non-negative commodity price backed by decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a decimal number")]
    NotANumber,
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A commodity price.
///
/// Prices are stored and rendered as JSON numbers (`9.99`, not `"9.99"`),
/// while arithmetic and parsing happen on a [`Decimal`] so form input such as
/// `"9.99"` is never routed through binary floating point first.
///
/// Deserialization goes through [`Price::new`], so a negative amount in JSON
/// or in a stored document is rejected like a negative form value.
///
/// ## Examples
///
/// ```
/// use bazaar_core::Price;
///
/// let price = Price::parse("9.99").unwrap();
/// assert_eq!(price.to_string(), "9.99");
///
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("cheap").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price from its textual form (surrounding whitespace ignored).
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a decimal number, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PriceError::NotANumber)?;

        Self::new(amount)
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
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

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_prices() {
        assert_eq!(Price::parse("9.99").unwrap().to_string(), "9.99");
        assert_eq!(Price::parse(" 12 ").unwrap().to_string(), "12");
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
        assert_eq!(Price::parse("1e2").unwrap().amount(), Decimal::from(100));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("   "), Err(PriceError::Empty));
    }

    #[test]
    fn test_parse_not_a_number() {
        assert_eq!(Price::parse("cheap"), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
    }

    #[test]
    fn test_serializes_as_json_number() {
        let price = Price::parse("9.99").unwrap();
        let json = serde_json::to_value(price).unwrap();
        assert_eq!(json, serde_json::json!(9.99));

        let parsed: Price = serde_json::from_str("9.99").unwrap();
        assert_eq!(parsed, price);
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let err = serde_json::from_str::<Price>("-5").unwrap_err();
        assert!(err.to_string().contains("negative"));

        let zero: Price = serde_json::from_str("0").unwrap();
        assert_eq!(zero, Price::ZERO);
    }
}
