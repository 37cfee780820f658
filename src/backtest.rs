//! Backtest-informed profiles.
//!
//! Derives a profile's edge (win rate, breakeven rate, reward:risk) from a
//! list of historical trade results so the simulator can replay a trader's
//! own statistics.

use crate::error::ValidationError;
use crate::profile::{RiskProfile, TradeEdge};
use crate::types::Cents;

/// Fewest historical trades accepted.
pub const MIN_HISTORY_TRADES: usize = 10;

/// Aggregated historical trade results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeHistory {
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub gross_win_cents: Cents,
    /// Sum of losing trades, as a positive number.
    pub gross_loss_cents: Cents,
}

impl TradeHistory {
    /// Classify each P&L. Results within `±breakeven_band_cents` of zero
    /// count as breakeven.
    pub fn from_pnls(pnls: &[Cents], breakeven_band_cents: Cents) -> Self {
        let band = breakeven_band_cents.abs();
        let mut h = Self::default();
        for &pnl in pnls {
            if pnl.abs() <= band {
                h.breakevens += 1;
            } else if pnl > 0 {
                h.wins += 1;
                h.gross_win_cents += pnl;
            } else {
                h.losses += 1;
                h.gross_loss_cents -= pnl;
            }
        }
        h
    }

    pub fn total(&self) -> usize {
        self.wins + self.losses + self.breakevens
    }

    /// Derive the trade edge this history implies.
    pub fn edge(&self) -> Result<TradeEdge, ValidationError> {
        let total = self.total();
        if total < MIN_HISTORY_TRADES {
            return Err(ValidationError::InsufficientHistory {
                required: MIN_HISTORY_TRADES,
                found: total,
            });
        }
        if self.losses == 0 {
            return Err(ValidationError::NoLosingTrades);
        }

        let decisive = self.wins + self.losses;
        let avg_loss = self.gross_loss_cents as f64 / self.losses as f64;
        let avg_win = if self.wins > 0 {
            self.gross_win_cents as f64 / self.wins as f64
        } else {
            0.0
        };

        Ok(TradeEdge {
            win_rate: self.wins as f64 / decisive as f64 * 100.0,
            breakeven_rate: self.breakevens as f64 / total as f64 * 100.0,
            reward_risk_ratio: if avg_loss > 0.0 { avg_win / avg_loss } else { 0.0 },
        })
    }

    /// Copy of `profile` with its edge replaced by this history's.
    pub fn apply_to(&self, profile: &RiskProfile) -> Result<RiskProfile, ValidationError> {
        Ok(RiskProfile {
            edge: self.edge()?,
            ..profile.clone()
        })
    }
}
