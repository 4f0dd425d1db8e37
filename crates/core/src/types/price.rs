//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in whole roubles as an exact [`Decimal`]. Cart and
//! order totals are sums of `price × quantity` and must never drift, so no
//! floating point is involved anywhere between the admin form and the order
//! record. Formatting for display happens only at the edges.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A non-negative amount of money.
///
/// Serialized as a decimal string (`"25000"`) so JSON round trips are exact.
/// Deserialization rejects negative amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest accepted unit price, one billion roubles.
    pub const MAX: Self = Self(Decimal::from_parts(1_000_000_000, 0, 0, false, 0));

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativePrice`] if `amount < 0`, or
    /// [`ValidationError::PriceTooHigh`] above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, ValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::NegativePrice);
        }
        if amount > Self::MAX.0 {
            return Err(ValidationError::PriceTooHigh);
        }
        Ok(Self(amount.normalize()))
    }

    /// Create a price from a whole number of roubles.
    #[must_use]
    pub fn from_whole(amount: u64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units. Saturates at the largest decimal.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Human-readable rouble amount with grouped thousands, e.g. `25 000 ₽`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.0.round_dp(2);
        let whole = rounded.trunc().abs().normalize().to_string();
        let fraction = rounded.fract();

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }

        if fraction.is_zero() {
            format!("{grouped} ₽")
        } else {
            let cents = (fraction * Decimal::ONE_HUNDRED)
                .trunc()
                .abs()
                .normalize()
                .to_string();
            format!("{grouped},{cents:0>2} ₽")
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert_eq!(
            Price::new(Decimal::new(-1, 0)),
            Err(ValidationError::NegativePrice)
        );
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [
            Price::from_whole(25_000).times(2),
            Price::from_whole(500).times(3),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, Price::from_whole(51_500));
    }

    #[test]
    fn test_no_float_drift() {
        let dime = Price::new(Decimal::new(10, 2)).unwrap();
        let total: Price = std::iter::repeat_n(dime, 1000).sum();
        assert_eq!(total.amount(), Decimal::from(100));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_whole(25_000).display(), "25 000 ₽");
        assert_eq!(Price::from_whole(500).display(), "500 ₽");
        assert_eq!(Price::from_whole(1_234_567).display(), "1 234 567 ₽");
        assert_eq!(Price::new(Decimal::new(199_050, 2)).unwrap().display(), "1 990,50 ₽");
    }

    #[test]
    fn test_serde_string() {
        let price = Price::from_whole(25_000);
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"25000\"");
        let back: Price = serde_json::from_str("\"25000\"").unwrap();
        assert_eq!(back, price);
        assert!(serde_json::from_str::<Price>("\"-5\"").is_err());
    }

    #[test]
    fn test_rejects_above_max() {
        assert!(Price::new(Price::MAX.amount()).is_ok());
        assert_eq!(
            Price::new(Decimal::from(u64::MAX)),
            Err(ValidationError::PriceTooHigh)
        );
        assert!(serde_json::from_str::<Price>("\"1000000000.01\"").is_err());
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Price::from_whole(u64::MAX);
        let total = huge.times(u32::MAX) + huge.times(u32::MAX);
        assert_eq!(total.amount(), Decimal::MAX);
    }
}
