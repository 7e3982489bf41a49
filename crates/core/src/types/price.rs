//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are single-currency (USD) by design and never floats. Amounts are
//! stored at full `Decimal` precision; rounding to two places happens only
//! at display time.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

/// Errors constructing a [`Price`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// Prices must be non-negative.
    #[error("price must be non-negative, got {0}")]
    Negative(Decimal),
}

/// A non-negative amount of money in the store's currency.
///
/// Wraps `rust_decimal::Decimal` so unit prices and totals never go through
/// floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

// Manual Deserialize so the non-negative invariant survives deserialization
// of externally supplied catalog data.
impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(de::Error::custom)
    }
}

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
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

    /// Create a price from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount, at full precision.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount rounded to two decimal places for display.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0.round_dp(2)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.rounded())
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| acc + p)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let price = Price::from_cents(999).unwrap();
        assert_eq!(price.amount(), dec!(9.99));
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(
            Price::new(dec!(-1.00)),
            Err(PriceError::Negative(dec!(-1.00)))
        );
        assert!(Price::from_cents(-1).is_err());
    }

    #[test]
    fn test_zero_allowed() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_sum_is_exact() {
        // 9.99 + 19.99 must be exactly 29.98, not 29.979999...
        let total: Price = [Price::from_cents(999), Price::from_cents(1999)]
            .into_iter()
            .map(Result::unwrap)
            .sum();
        assert_eq!(total.amount(), dec!(29.98));
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Price::from_cents(999).unwrap().display(), "$9.99");
        assert_eq!(Price::new(dec!(5)).unwrap().display(), "$5.00");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_serde_transparent() {
        let price = Price::from_cents(2499).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("\"-9.99\"").is_err());
    }
}
