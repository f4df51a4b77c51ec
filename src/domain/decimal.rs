//! Lossless decimal numeric type backed by rust_decimal.
//!
//! Odds comparisons and form weights go through this type so that a tolerance
//! like 0.05 is applied exactly rather than through binary floating point.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lossless decimal numeric type.
///
/// Serializes to a JSON number (not string).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        let trimmed = s.trim();
        RustDecimal::from_str(trimmed)
            .or_else(|_| RustDecimal::from_scientific(trimmed))
            .map(Decimal)
    }

    /// Format the Decimal as a canonical string (no exponent notation).
    pub fn to_canonical_string(&self) -> String {
        let normalized = self.0.normalize();
        format!("{}", normalized)
    }

    /// Format with exactly `dp` decimal places, rounding half away from zero.
    pub fn to_fixed(&self, dp: u32) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.*}", dp as usize, rounded)
    }

    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    pub fn hundred() -> Self {
        Decimal(RustDecimal::ONE_HUNDRED)
    }

    pub fn from_u32(value: u32) -> Self {
        Decimal(RustDecimal::from(value))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    /// Round half away from zero to a whole number, saturating into `u32`:
    /// negatives give 0, values past `u32::MAX` give `u32::MAX`.
    pub fn round_to_u32(&self) -> u32 {
        let rounded = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_sign_negative() {
            return 0;
        }
        rounded.to_u32().unwrap_or(u32::MAX)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl std::ops::Div for Decimal {
    type Output = Decimal;

    fn div(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 / rhs.0)
    }
}

impl std::iter::Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, d| acc + d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_decimal_parse_trims_whitespace() {
        assert_eq!(d(" 2.50 "), d("2.5"));
    }

    #[test]
    fn test_decimal_canonical_no_trailing_zeros() {
        assert_eq!(d("3.40").to_canonical_string(), "3.4");
        assert_eq!(d("123").to_canonical_string(), "123");
    }

    #[test]
    fn test_decimal_to_fixed_pads_and_rounds() {
        assert_eq!(d("1.8").to_fixed(2), "1.80");
        assert_eq!(d("2.005").to_fixed(2), "2.01");
        assert_eq!(Decimal::zero().to_fixed(2), "0.00");
    }

    #[test]
    fn test_decimal_threshold_is_exact() {
        // 3.15 - 3.10 is exactly 0.05, unlike the f64 difference.
        let diff = (d("3.15") - d("3.10")).abs();
        assert_eq!(diff, d("0.05"));
        assert!(diff <= d("0.05"));
    }

    #[test]
    fn test_round_to_u32_half_away_from_zero() {
        assert_eq!(d("42.5").round_to_u32(), 43);
        assert_eq!(d("42.4999").round_to_u32(), 42);
        assert_eq!(d("-1").round_to_u32(), 0);
        assert_eq!(d("5000000000").round_to_u32(), u32::MAX);
    }

    #[test]
    fn test_decimal_sum() {
        let total: Decimal = vec![d("20"), d("10"), d("0")].into_iter().sum();
        assert_eq!(total, d("30"));
    }

    #[test]
    fn test_decimal_json_serialization() {
        let json = serde_json::to_value(d("1.85")).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "1.85");
    }
}
