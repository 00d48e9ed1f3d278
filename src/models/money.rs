//! Money type for representing currency amounts
//!
//! Amounts are stored as whole cents (i64). The engine does its fractional
//! arithmetic (divisions by cycle length, day fractions) in `f64` cents and
//! converts back with [`Money::from_cents_f64`] only when a value is
//! returned, so rounding never compounds across a forecast or a rollover
//! chain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use envelope_planner::models::Money;
    /// let amount = Money::from_cents(1050); // $10.50
    /// assert_eq!(amount.to_string(), "$10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Round a fractional cent value to the nearest cent
    ///
    /// Non-finite input (a stray division by zero upstream) becomes zero
    /// rather than leaking `NaN` into a report.
    pub fn from_cents_f64(cents: f64) -> Self {
        if cents.is_finite() {
            Self(cents.round() as i64)
        } else {
            Self::zero()
        }
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The amount in cents as a float, for intermediate engine math
    pub fn cents_f64(&self) -> f64 {
        self.0 as f64
    }

    /// Get the whole dollars portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Clamp negative amounts to zero
    pub fn non_negative(self) -> Self {
        if self.0 < 0 {
            Self::zero()
        } else {
            self
        }
    }

    /// Divide into a fractional cent value, guarding a zero divisor
    pub fn div_f64(&self, divisor: f64) -> f64 {
        if divisor == 0.0 || !divisor.is_finite() {
            0.0
        } else {
            self.cents_f64() / divisor
        }
    }

    /// This amount as a percentage of `whole`, 0 when `whole` is zero
    pub fn percent_of(&self, whole: Money) -> f64 {
        if whole.is_zero() {
            0.0
        } else {
            self.cents_f64() / whole.cents_f64() * 100.0
        }
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!(
                "-{}{}.{:02}",
                symbol,
                self.dollars().abs(),
                self.cents_part()
            )
        } else {
            format!("{}{}.{:02}", symbol, self.dollars(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, count: u32) -> Self {
        Self(self.0 * i64::from(count))
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "$10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-$10.50");
        assert_eq!(format!("{}", Money::from_cents(5)), "$0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
        assert_eq!((b * 3).cents(), 1500);
    }

    #[test]
    fn test_from_cents_f64_rounds_and_guards() {
        assert_eq!(Money::from_cents_f64(3333.33).cents(), 3333);
        assert_eq!(Money::from_cents_f64(3333.5).cents(), 3334);
        assert_eq!(Money::from_cents_f64(f64::NAN), Money::zero());
        assert_eq!(Money::from_cents_f64(f64::INFINITY), Money::zero());
    }

    #[test]
    fn test_div_f64_guards_zero() {
        let m = Money::from_cents(120000);
        assert_eq!(m.div_f64(12.0), 10000.0);
        assert_eq!(m.div_f64(0.0), 0.0);
    }

    #[test]
    fn test_percent_of() {
        let spent = Money::from_cents(4500);
        assert_eq!(spent.percent_of(Money::from_cents(5000)), 90.0);
        assert_eq!(spent.percent_of(Money::zero()), 0.0);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(Money::from_cents(-250).non_negative(), Money::zero());
        assert_eq!(Money::from_cents(250).non_negative().cents(), 250);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
