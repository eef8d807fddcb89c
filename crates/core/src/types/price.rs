//! Non-negative price representation using decimal arithmetic.
//!
//! Prices scraped from a storefront page arrive as free text such as
//! `"$19.99"` or `"€ 12,50"`. [`Price::parse`] extracts the first amount with
//! a fractional separator and up to two fractional digits.
//!
//! ```
//! use storefront_cart_core::Price;
//!
//! let price = Price::parse("$19.99").unwrap();
//! assert_eq!(price.to_string(), "19.99");
//!
//! // Comma is accepted as the decimal separator.
//! assert_eq!(Price::parse("12,5 EUR").unwrap().to_string(), "12.50");
//!
//! // No amount, no price.
//! assert!(Price::parse("call for price").is_err());
//! ```

use core::fmt;
use core::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Integer part, one fractional separator, up to two fractional digits.
#[allow(clippy::unwrap_used)] // Literal pattern, checked by tests
static PRICE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+[.,][0-9]{0,2}").unwrap());

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The text does not contain an amount.
    #[error("no price found in {0:?}")]
    NoMatch(String),
    /// The extracted amount could not be parsed as a decimal.
    #[error("invalid price amount {0:?}")]
    Invalid(String),
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// A floating-point amount was NaN or infinite.
    #[error("price must be a finite number")]
    NotFinite,
    /// The amount exceeds [`Price::MAX`].
    #[error("price cannot exceed {max} (got {0})", max = Price::MAX)]
    TooLarge(Decimal),
}

/// A non-negative amount in the store's currency, at most [`Price::MAX`].
///
/// Formats with exactly two decimal places. The cap keeps line totals and
/// cart totals within `Decimal` range for any `u32` quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest accepted price, 999 999 999.99.
    pub const MAX: Self = Self(Decimal::from_parts(1_215_752_191, 23, 0, false, 2));

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero, or
    /// [`PriceError::TooLarge`] if it is above [`Price::MAX`].
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge(amount));
        }
        Ok(Self(amount))
    }

    /// Extract a price from currency-formatted text.
    ///
    /// Only the first match counts; anything after the second fractional
    /// digit is ignored (`"1.999"` parses as `1.99`).
    ///
    /// A comma is always read as the decimal separator, so `"12,50"` is
    /// 12.50 rather than 12. Thousands separators are not supported.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NoMatch`] if the text holds no amount with a
    /// fractional separator, or [`PriceError::TooLarge`] if the amount is
    /// above [`Price::MAX`].
    pub fn parse(text: &str) -> Result<Self, PriceError> {
        let found = PRICE_PATTERN
            .find(text)
            .ok_or_else(|| PriceError::NoMatch(text.to_string()))?;

        let normalized = found.as_str().replace(',', ".");
        let normalized = normalized.trim_end_matches('.');

        let amount = Decimal::from_str(normalized)
            .map_err(|_| PriceError::Invalid(found.as_str().to_string()))?;
        Self::from_decimal(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The price of `count` units.
    ///
    /// Cannot overflow: `MAX * u32::MAX` is well inside `Decimal` range.
    #[must_use]
    pub fn times(&self, count: u32) -> Decimal {
        self.0 * Decimal::from(count)
    }
}

/// Format an amount with two decimal places, rounding half away from zero.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format_amount(self.0))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(amount)
    }
}

impl TryFrom<f64> for Price {
    type Error = PriceError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        if !amount.is_finite() {
            return Err(PriceError::NotFinite);
        }
        let amount = Decimal::try_from(amount).map_err(|e| PriceError::Invalid(e.to_string()))?;
        Self::from_decimal(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dollar_amount() {
        let price = Price::parse("$19.99").unwrap();
        assert_eq!(price.amount(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_parse_comma_separator() {
        let price = Price::parse("12,50 EUR").unwrap();
        assert_eq!(price.amount(), Decimal::new(1250, 2));
    }

    #[test]
    fn test_parse_takes_first_match() {
        let price = Price::parse("was 30.00 now 19.99").unwrap();
        assert_eq!(price.to_string(), "30.00");
    }

    #[test]
    fn test_parse_truncates_extra_fraction_digits() {
        let price = Price::parse("1.999").unwrap();
        assert_eq!(price.to_string(), "1.99");
    }

    #[test]
    fn test_parse_trailing_separator() {
        let price = Price::parse("Price: 52.").unwrap();
        assert_eq!(price.to_string(), "52.00");
    }

    #[test]
    fn test_parse_requires_separator() {
        assert_eq!(
            Price::parse("$25"),
            Err(PriceError::NoMatch("$25".to_string()))
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(Price::parse("free!"), Err(PriceError::NoMatch(_))));
        assert!(matches!(Price::parse(""), Err(PriceError::NoMatch(_))));
    }

    #[test]
    fn test_negative_rejected() {
        let result = Price::from_decimal(Decimal::new(-100, 2));
        assert!(matches!(result, Err(PriceError::Negative(_))));
        assert!(Price::try_from(-1.0_f64).is_err());
    }

    #[test]
    fn test_zero_accepted() {
        assert_eq!(Price::from_decimal(Decimal::ZERO).unwrap(), Price::ZERO);
        assert_eq!(Price::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_from_f64() {
        let price = Price::try_from(9.5_f64).unwrap();
        assert_eq!(price.to_string(), "9.50");
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(Price::try_from(f64::NAN), Err(PriceError::NotFinite));
        assert_eq!(Price::try_from(f64::INFINITY), Err(PriceError::NotFinite));
    }

    #[test]
    fn test_times_is_exact() {
        let price = Price::parse("19.99").unwrap();
        assert_eq!(price.times(3), Decimal::new(5997, 2));
        assert_eq!(format_amount(price.times(3)), "59.97");
    }

    #[test]
    fn test_format_amount_rounds_half_up() {
        assert_eq!(format_amount(Decimal::new(1005, 3)), "1.01");
        assert_eq!(format_amount(Decimal::new(19, 0)), "19.00");
    }

    #[test]
    fn test_max_price() {
        assert_eq!(Price::MAX.to_string(), "999999999.99");
        assert_eq!(Price::parse("$999999999.99").unwrap(), Price::MAX);
        assert_eq!(
            Price::MAX.times(u32::MAX),
            Decimal::new(99_999_999_999, 2) * Decimal::from(u32::MAX)
        );
    }

    #[test]
    fn test_too_large_rejected() {
        assert!(matches!(
            Price::parse("50000000000000000000000000000.00"),
            Err(PriceError::TooLarge(_))
        ));
        assert!(matches!(
            Price::parse("1000000000.00"),
            Err(PriceError::TooLarge(_))
        ));
        assert!(matches!(Price::try_from(1e12_f64), Err(PriceError::TooLarge(_))));
    }

    #[test]
    fn test_serde_rejects_negative() {
        let result: Result<Price, _> = serde_json::from_str("\"-4.00\"");
        assert!(result.is_err());

        let price: Price = serde_json::from_str("\"4.25\"").unwrap();
        assert_eq!(price.to_string(), "4.25");
    }
}
