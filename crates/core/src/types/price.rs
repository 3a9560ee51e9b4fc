//! Price representation using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog price.
///
/// The backend sends prices as JSON numbers in the store currency (USD).
/// Arithmetic stays in `Decimal`; rounding happens only for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        self * Decimal::from(quantity)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0.round_dp(2))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<Decimal> for Price {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self {
        Self(self.0 * rhs)
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
    use std::str::FromStr;

    use super::*;

    fn price(s: &str) -> Price {
        Price::new(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_display_pads_and_rounds() {
        assert_eq!(price("49").to_string(), "$49.00");
        assert_eq!(price("19.9").to_string(), "$19.90");
        assert_eq!(price("10.005").to_string(), "$10.00");
        assert_eq!(price("10.015").to_string(), "$10.02");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [price("2.50").times(3), price("1.25")].into_iter().sum();
        assert_eq!(total, price("8.75"));
    }

    #[test]
    fn test_json_number_round_trip() {
        let p: Price = serde_json::from_str("1299.99").unwrap();
        assert_eq!(p, price("1299.99"));
        let p: Price = serde_json::from_str("15").unwrap();
        assert_eq!(p, price("15"));
        assert_eq!(serde_json::to_string(&price("15.5")).unwrap(), "15.5");
    }
}
