//! Core types: Cents, Money, and the rounding helpers shared by the engine.

use std::fmt;

/// Monetary amount in the smallest currency unit (cents).
///
/// Every balance, risk amount, limit and P&L in the engine is a `Cents`.
/// Percentage math is done in `f64` and rounded back with [`round_cents`]
/// before it is used as risk.
pub type Cents = i64;

/// Round a floating-point amount to the nearest cent.
///
/// Halves round away from zero, matching `f64::round`. Non-finite input maps
/// to zero so it can never leak into a balance.
#[inline]
pub fn round_cents(value: f64) -> Cents {
    if value.is_finite() {
        value.round() as Cents
    } else {
        0
    }
}

/// `round(amount × percent / 100)`.
#[inline]
pub fn percent_of(amount: Cents, percent: f64) -> Cents {
    round_cents(amount as f64 * percent / 100.0)
}

/// Display wrapper that formats cents as dollars.
///
/// `Money(10050)` displays as `$100.50`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Money(pub Cents);

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dollars = (self.0 / 100).abs();
        let cents = (self.0 % 100).abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        f.pad(&format!("{sign}${dollars}.{cents:02}"))
    }
}
