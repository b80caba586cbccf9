//! Exact decimal money amount.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.
//! The currency is carried by configuration, not by the amount itself.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits in the formatted representation.
const DISPLAY_SCALE: u32 = 2;

/// Errors produced while building an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The input is not a decimal number.
    #[error("Invalid amount format: {input:?}")]
    InvalidFormat {
        /// The rejected input.
        input: String,
    },
}

impl AmountError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidFormat { .. } => "INVALID_AMOUNT_FORMAT",
        }
    }
}

/// A signed monetary value.
///
/// Equality compares the decimal value, so `1.0` and `1.00` are the same
/// amount. Negative values are legal for intermediate arithmetic (an
/// overdrawn balance, for instance); callers decide what a negative means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Parses an amount from its decimal representation (`"12.50"`).
    ///
    /// # Errors
    ///
    /// Returns `AmountError::InvalidFormat` when `input` is not a decimal number.
    pub fn of(input: &str) -> Result<Self, AmountError> {
        Decimal::from_str(input.trim())
            .map(Self)
            .map_err(|_| AmountError::InvalidFormat {
                input: input.to_string(),
            })
    }

    /// Wraps an existing decimal.
    #[must_use]
    pub const fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns `self + other`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }

    /// Returns `self - other`, which may be negative.
    #[must_use]
    pub fn subtract(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly below zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns true if the amount is strictly above zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Renders the amount with exactly two fractional digits.
    ///
    /// Rounds half away from zero and never prints a currency symbol.
    #[must_use]
    pub fn formatted(self) -> String {
        let mut rounded = self
            .0
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(DISPLAY_SCALE);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        rounded.to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::of(s)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::add(self, rhs)
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.subtract(rhs)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_of_parses_decimal() {
        let amount = Amount::of("1000").unwrap();
        assert_eq!(amount.value(), dec!(1000));

        let amount = Amount::of(" 12.345 ").unwrap();
        assert_eq!(amount.value(), dec!(12.345));

        let amount = Amount::of("-3.5").unwrap();
        assert!(amount.is_negative());
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("12,50")]
    #[case("1.2.3")]
    fn test_amount_of_rejects_garbage(#[case] input: &str) {
        let err = Amount::of(input).unwrap_err();
        assert_eq!(
            err,
            AmountError::InvalidFormat {
                input: input.to_string()
            }
        );
        assert_eq!(err.error_code(), "INVALID_AMOUNT_FORMAT");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_equality_is_by_value() {
        assert_eq!(Amount::of("1.0").unwrap(), Amount::of("1.00").unwrap());
        assert_ne!(Amount::of("1.00").unwrap(), Amount::of("1.01").unwrap());
    }

    #[test]
    fn test_add_and_subtract() {
        let a = Amount::from_decimal(dec!(300));
        let b = Amount::from_decimal(dec!(100));
        assert_eq!(a.add(b), Amount::from_decimal(dec!(400)));
        assert_eq!(a.subtract(b), Amount::from_decimal(dec!(200)));
        assert_eq!(b.subtract(a), Amount::from_decimal(dec!(-200)));
        assert_eq!(a - b, a.subtract(b));
        assert_eq!(a + b, a.add(b));
        assert_eq!(-b, Amount::from_decimal(dec!(-100)));
    }

    #[test]
    fn test_sum() {
        let total: Amount = [dec!(1.10), dec!(2.20), dec!(-0.30)]
            .into_iter()
            .map(Amount::from_decimal)
            .sum();
        assert_eq!(total, Amount::from_decimal(dec!(3.00)));
    }

    #[rstest]
    #[case(dec!(2499), "2499.00")]
    #[case(dec!(0), "0.00")]
    #[case(dec!(0.5), "0.50")]
    #[case(dec!(1.005), "1.01")]
    #[case(dec!(1.004), "1.00")]
    #[case(dec!(-12.345), "-12.35")]
    #[case(dec!(-0.001), "0.00")]
    fn test_formatted(#[case] value: Decimal, #[case] expected: &str) {
        let amount = Amount::from_decimal(value);
        assert_eq!(amount.formatted(), expected);
        assert_eq!(amount.to_string(), expected);
    }

    #[test]
    fn test_sign_predicates() {
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::ZERO.is_negative());
        assert!(!Amount::ZERO.is_positive());
        assert!(Amount::from_decimal(dec!(0.01)).is_positive());
        assert!(Amount::from_decimal(dec!(-0.01)).is_negative());
    }

    #[test]
    fn test_serde_round_trips_as_decimal() {
        let amount = Amount::from_decimal(dec!(12.50));
        let json = serde_json::to_string(&amount).unwrap();
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
