//! Simulated trade record.

use crate::outcome::Outcome;
use crate::types::Cents;

/// Why a trade was taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TradeMode {
    /// First trade of the day.
    Base,
    /// A rung of the loss-recovery ladder.
    LossRecovery,
    /// Reinvestment of the day's gain.
    GainCompounding,
}

/// One executed trade within a simulated day.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulatedTrade {
    /// Run-wide day number (1-based).
    pub day: u32,
    /// Position within the day (0 is the base trade).
    pub index_in_day: u32,
    pub mode: TradeMode,
    pub risk_cents: Cents,
    pub outcome: Outcome,
    /// Signed P&L after commission.
    pub pnl_cents: Cents,
    /// Day P&L including this trade.
    pub day_pnl_cents: Cents,
    pub balance_after_cents: Cents,
}

impl SimulatedTrade {
    #[inline]
    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }

    #[inline]
    pub fn is_breakeven(&self) -> bool {
        self.outcome == Outcome::Breakeven
    }

    #[inline]
    pub fn is_loss(&self) -> bool {
        self.outcome == Outcome::Loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(outcome: Outcome) -> SimulatedTrade {
        SimulatedTrade {
            day: 1,
            index_in_day: 0,
            mode: TradeMode::Base,
            risk_cents: 100_00,
            outcome,
            pnl_cents: 0,
            day_pnl_cents: 0,
            balance_after_cents: 0,
        }
    }

    #[test]
    fn exactly_one_outcome_flag() {
        for outcome in [Outcome::Win, Outcome::Loss, Outcome::Breakeven] {
            let t = trade(outcome);
            let flags = [t.is_win(), t.is_loss(), t.is_breakeven()];
            assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
        }
    }
}
