//! Single-trade outcome model.

use crate::profile::TradeEdge;
use crate::rng::UniformSource;
use crate::types::{Cents, round_cents};

/// Result class of one trade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    Win,
    Loss,
    Breakeven,
}

/// A drawn outcome and its signed P&L net of commission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TradeOutcome {
    pub outcome: Outcome,
    pub pnl: Cents,
}

/// Draw one trade outcome.
///
/// Breakeven is resolved first over the whole `[0, 100)` range; the remaining
/// mass is rescaled to `[0, 100)` and split by the win rate. A win pays
/// `round(risk × R)`, a loss costs `risk`, a breakeven costs nothing; every
/// trade pays `commission`.
pub fn draw_outcome(
    src: &mut dyn UniformSource,
    edge: &TradeEdge,
    risk: Cents,
    commission: Cents,
) -> TradeOutcome {
    let roll = src.next_unit() * 100.0;
    let outcome = classify(roll, edge);
    let gross = match outcome {
        Outcome::Win => round_cents(risk as f64 * edge.reward_risk_ratio),
        Outcome::Loss => -risk,
        Outcome::Breakeven => 0,
    };
    TradeOutcome {
        outcome,
        pnl: gross - commission,
    }
}

/// Map a roll in `[0, 100)` to an outcome.
fn classify(roll: f64, edge: &TradeEdge) -> Outcome {
    if roll < edge.breakeven_rate {
        return Outcome::Breakeven;
    }
    let decisive = 100.0 - edge.breakeven_rate;
    if decisive <= 0.0 {
        return Outcome::Breakeven;
    }
    let rescaled = (roll - edge.breakeven_rate) / decisive * 100.0;
    if rescaled < edge.win_rate {
        Outcome::Win
    } else {
        Outcome::Loss
    }
}
