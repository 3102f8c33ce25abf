//! # Money Module
//!
//! Provides the `Money` type for cost and selling prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Category report: Σ sellingprice × stock over 1,000 items               │
//! │    accumulates float error in every row                                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    "15.50" ──parse──► 1550 ──× stock──► exact sums                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The browser client sends prices as JSON numbers (`15.5`) or as the raw
//! text of a number input (`"15.50"`). Both parse into the same `Money`.
//! `Money` serializes back out as a JSON number in major units.
//!
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price: Money = "15.50".parse().unwrap();
//! assert_eq!(price.minor_units(), 1550);
//! assert_eq!((price * 3).to_string(), "46.50");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::error::MoneyParseError;

/// Number of decimal places kept for prices.
pub const DECIMAL_PLACES: u32 = 2;

const SCALE: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// Signed so that derived figures like profit can go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (cents, centavos, ...).
    #[inline]
    pub const fn from_minor_units(units: i64) -> Self {
        Money(units)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// Saturates at `i64` bounds; use [`Money::checked_from_major`] for
    /// untrusted input.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).minor_units(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).minor_units(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        let scaled = major.saturating_mul(SCALE);
        if major < 0 {
            Money(scaled.saturating_sub(minor))
        } else {
            Money(scaled.saturating_add(minor))
        }
    }

    /// Whole major units, or `None` if the cents would overflow.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::checked_from_major(15).map(|m| m.minor_units()), Some(1500));
    /// assert!(Money::checked_from_major(i64::MAX / 10).is_none());
    /// ```
    #[inline]
    pub const fn checked_from_major(major: i64) -> Option<Self> {
        match major.checked_mul(SCALE) {
            Some(units) => Some(Money(units)),
            None => None,
        }
    }

    /// Parses a decimal string such as `"15"`, `"15.5"` or `"0.99"`.
    ///
    /// More than two fractional digits are rounded half away from zero,
    /// matching what a price input displays after `toFixed(2)`.
    pub fn parse_decimal(input: &str) -> Result<Self, MoneyParseError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        let invalid = || MoneyParseError::Invalid(input.to_string());

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| MoneyParseError::Overflow)?
        };

        let mut frac_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().is_some_and(|d| d >= 5);

        let mut units = whole_units
            .checked_mul(SCALE)
            .and_then(|u| u.checked_add(tenths * 10 + hundredths))
            .ok_or(MoneyParseError::Overflow)?;
        if round_up {
            units = units.checked_add(1).ok_or(MoneyParseError::Overflow)?;
        }

        Ok(Money(if negative { -units } else { units }))
    }

    /// Converts a float received from JSON.
    ///
    /// Goes through the shortest decimal representation of the float so
    /// that `15.1` becomes 1510 and not 1509.
    pub fn from_f64(value: f64) -> Result<Self, MoneyParseError> {
        if !value.is_finite() {
            return Err(MoneyParseError::Invalid(value.to_string()));
        }
        Money::parse_decimal(&value.to_string())
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / SCALE
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % SCALE).abs()
    }

    /// Returns the value as a float in major units (charts and JSON only).
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a stock count or cart quantity.
    ///
    /// Saturates instead of overflowing, so report math over stored rows
    /// never panics.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let unit = Money::from_minor_units(1000);
    /// assert_eq!(unit.multiply_quantity(3).minor_units(), 3000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal with two places, no currency symbol.
///
/// Used verbatim in CSV exports.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse_decimal(s)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Serde
// =============================================================================

/// Serialized as a JSON number in major units (`1550` → `15.5`).
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % SCALE == 0 {
            serializer.serialize_i64(self.0 / SCALE)
        } else {
            serializer.serialize_f64(self.as_f64())
        }
    }
}

/// Accepts JSON numbers and numeric strings.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl Visitor<'_> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal amount as a number or string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                v.checked_mul(SCALE)
                    .map(Money)
                    .ok_or_else(|| E::custom(MoneyParseError::Overflow))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(|v| v.checked_mul(SCALE))
                    .map(Money)
                    .ok_or_else(|| E::custom(MoneyParseError::Overflow))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                Money::from_f64(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                Money::parse_decimal(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("15").unwrap().minor_units(), 1500);
        assert_eq!(Money::parse_decimal("15.5").unwrap().minor_units(), 1550);
        assert_eq!(Money::parse_decimal("0.99").unwrap().minor_units(), 99);
        assert_eq!(Money::parse_decimal(".5").unwrap().minor_units(), 50);
        assert_eq!(Money::parse_decimal(" 7. ").unwrap().minor_units(), 700);
        assert_eq!(Money::parse_decimal("-5.50").unwrap().minor_units(), -550);
    }

    #[test]
    fn test_parse_decimal_rounds_extra_places() {
        assert_eq!(Money::parse_decimal("10.994").unwrap().minor_units(), 1099);
        assert_eq!(Money::parse_decimal("10.995").unwrap().minor_units(), 1100);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(matches!(Money::parse_decimal(""), Err(MoneyParseError::Empty)));
        assert!(Money::parse_decimal("abc").is_err());
        assert!(Money::parse_decimal("1.2.3").is_err());
        assert!(Money::parse_decimal(".").is_err());
        assert!(Money::parse_decimal("1e5").is_err());
    }

    #[test]
    fn test_from_f64_avoids_binary_rounding() {
        assert_eq!(Money::from_f64(15.1).unwrap().minor_units(), 1510);
        assert_eq!(Money::from_f64(0.29).unwrap().minor_units(), 29);
        assert!(Money::from_f64(f64::NAN).is_err());
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Money::from_minor_units(i64::MAX - 1);
        assert_eq!(big.multiply_quantity(i64::MAX).minor_units(), i64::MAX);
        assert_eq!((big + Money::from_minor_units(10)).minor_units(), i64::MAX);
        assert_eq!(
            [big, big, big].into_iter().sum::<Money>().minor_units(),
            i64::MAX
        );
        assert_eq!(Money::from_major_minor(i64::MAX, 0).minor_units(), i64::MAX);
        assert!(Money::checked_from_major(i64::MAX / SCALE + 1).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor_units(1099).to_string(), "10.99");
        assert_eq!(Money::from_minor_units(500).to_string(), "5.00");
        assert_eq!(Money::from_minor_units(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor_units(1000);
        let b = Money::from_minor_units(500);

        assert_eq!((a + b).minor_units(), 1500);
        assert_eq!((a - b).minor_units(), 500);
        assert_eq!((b - a).minor_units(), -500);
        assert_eq!((a * 3).minor_units(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.minor_units(), 2000);
    }

    #[test]
    fn test_serde_json() {
        let whole = serde_json::to_string(&Money::from_minor_units(1500)).unwrap();
        assert_eq!(whole, "15");
        let fractional = serde_json::to_string(&Money::from_minor_units(1550)).unwrap();
        assert_eq!(fractional, "15.5");

        let from_int: Money = serde_json::from_str("10").unwrap();
        assert_eq!(from_int.minor_units(), 1000);
        let from_float: Money = serde_json::from_str("10.25").unwrap();
        assert_eq!(from_float.minor_units(), 1025);
        let from_text: Money = serde_json::from_str("\"10.25\"").unwrap();
        assert_eq!(from_text.minor_units(), 1025);
        assert!(serde_json::from_str::<Money>("true").is_err());
    }
}
