//! # Money Module
//!
//! Provides the `Money` type for guaraní amounts and the `Rate` type for
//! commission percentages.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GUARANÍES HAVE NO SUBUNIT                                             │
//! │                                                                         │
//! │  Every price, expense and salary in the shop is a whole number of      │
//! │  guaraníes ("Gs 150.000"). Storing them as i64 keeps sums exact and    │
//! │  makes carry-forward balances reproducible day after day.              │
//! │                                                                         │
//! │  Percentages are the only fractional quantity. They live in `Rate`     │
//! │  as basis points: 10% commission = 1000 bps.                           │
//! │                                                                         │
//! │    production × rate = (gs × bps + 5000) / 10000   (half-up)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use barberia_core::money::{Money, Rate};
//!
//! let production = Money::from_gs(100_000);
//! let commission = production.apply_rate(Rate::from_bps(1000)); // 10%
//! assert_eq!(commission.gs(), 10_000);
//! assert_eq!(commission.to_string(), "Gs 10.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Basis points in 100%.
pub const BPS_PER_UNIT: u32 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in guaraníes.
///
/// ## Design Decisions
/// - **i64 (signed)**: running balances and salary deficits go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No float constructor**: amounts come from forms as whole numbers
///
/// ## Where Money is Used
/// ```text
/// ServiceItem.price ──► Service.total ──► weekly production ──► Salary
///                                    └──► daily income ──────► CashboxDay
/// Expense.amount ─────────────────────────► daily expenses ───┘
/// Advance.amount ─────────────────────────► salary deduction
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from a whole number of guaraníes.
    ///
    /// ## Example
    /// ```rust
    /// use barberia_core::money::Money;
    ///
    /// let haircut = Money::from_gs(50_000);
    /// assert_eq!(haircut.gs(), 50_000);
    /// ```
    #[inline]
    pub const fn from_gs(gs: i64) -> Self {
        Money(gs)
    }

    /// Returns the value in guaraníes.
    #[inline]
    pub const fn gs(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    ///
    /// ## Example
    /// ```rust
    /// use barberia_core::money::Money;
    ///
    /// let deficit = Money::from_gs(-40_000);
    /// assert_eq!(deficit.abs().gs(), 40_000);
    /// ```
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative values to zero.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Multiplies by a rate, rounding half-up to whole guaraníes.
    ///
    /// ## Implementation
    /// Integer math: `(amount × bps + 5000) / 10000`. Negative amounts are
    /// rounded symmetrically so `-x × r == -(x × r)`.
    ///
    /// ## Example
    /// ```rust
    /// use barberia_core::money::{Money, Rate};
    ///
    /// // 50% of 100.000
    /// let half = Money::from_gs(100_000).apply_rate(Rate::from_bps(5000));
    /// assert_eq!(half.gs(), 50_000);
    ///
    /// // 12.5% of 1.001 = 125.125 → 125
    /// let odd = Money::from_gs(1_001).apply_rate(Rate::from_bps(1250));
    /// assert_eq!(odd.gs(), 125);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        // i128 keeps large productions from overflowing during the multiply
        let magnitude = (self.0.unsigned_abs() as i128 * rate.bps() as i128
            + (BPS_PER_UNIT as i128 / 2))
            / BPS_PER_UNIT as i128;
        let signed = if self.0 < 0 { -magnitude } else { magnitude };
        Money(signed as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays money the way the shop prints it: `Gs 1.234.567`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(crate::CURRENCY_SYMBOL))
    }
}

impl Money {
    /// Same as `Display`, with a caller-chosen currency symbol.
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{} {}", sign, symbol, group_thousands(self.0.unsigned_abs()))
    }
}

/// Formats an unsigned integer with `.` as thousands separator.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
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
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. A 35% commission is 3500 bps, which multiplies
/// exactly against integer guaraníes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (for convenience in forms).
    ///
    /// ```rust
    /// use barberia_core::money::Rate;
    ///
    /// assert_eq!(Rate::from_percentage(12.5).bps(), 1250);
    /// ```
    pub fn from_percentage(pct: f64) -> Self {
        Rate((pct * 100.0).round().max(0.0) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_gs(0).to_string(), "Gs 0");
        assert_eq!(Money::from_gs(999).to_string(), "Gs 999");
        assert_eq!(Money::from_gs(1_000).to_string(), "Gs 1.000");
        assert_eq!(Money::from_gs(150_000).to_string(), "Gs 150.000");
        assert_eq!(Money::from_gs(1_234_567).to_string(), "Gs 1.234.567");
        assert_eq!(Money::from_gs(-40_000).to_string(), "-Gs 40.000");
        assert_eq!(Money::from_gs(1_500).format_with_symbol("₲"), "₲ 1.500");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_gs(1000);
        let b = Money::from_gs(500);

        assert_eq!((a + b).gs(), 1500);
        assert_eq!((a - b).gs(), 500);
        assert_eq!((b - a).gs(), -500);
        assert_eq!((-a).gs(), -1000);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_gs(100), Money::from_gs(250), Money::from_gs(-50)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.gs(), 300);

        let empty: Vec<Money> = Vec::new();
        assert_eq!(empty.into_iter().sum::<Money>(), Money::zero());
    }

    #[test]
    fn test_apply_rate() {
        let production = Money::from_gs(100_000);
        assert_eq!(production.apply_rate(Rate::from_bps(5000)).gs(), 50_000);
        assert_eq!(production.apply_rate(Rate::from_bps(1000)).gs(), 10_000);
        assert_eq!(production.apply_rate(Rate::from_bps(10_000)).gs(), 100_000);
        assert_eq!(production.apply_rate(Rate::zero()).gs(), 0);
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // 5 × 10% = 0.5 → 1
        assert_eq!(Money::from_gs(5).apply_rate(Rate::from_bps(1000)).gs(), 1);
        // 4 × 10% = 0.4 → 0
        assert_eq!(Money::from_gs(4).apply_rate(Rate::from_bps(1000)).gs(), 0);
        // symmetric for negatives
        assert_eq!(Money::from_gs(-5).apply_rate(Rate::from_bps(1000)).gs(), -1);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_gs(-1).clamp_non_negative(), Money::zero());
        assert_eq!(Money::from_gs(7).clamp_non_negative().gs(), 7);
    }

    #[test]
    fn test_rate_from_percentage() {
        assert_eq!(Rate::from_percentage(50.0).bps(), 5000);
        assert_eq!(Rate::from_percentage(8.25).bps(), 825);
        assert_eq!(Rate::from_percentage(-3.0).bps(), 0);
        assert_eq!(Rate::from_bps(1250).to_string(), "12.5%");
    }
}
