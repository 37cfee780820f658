//! Intraday decision tree.
//!
//! Every traded day opens with a base trade. A losing base trade climbs the
//! recovery ladder; a winning one either stops (single target) or compounds
//! the day's gain. A breakeven base trade ends the day.

use crate::outcome::{Outcome, draw_outcome};
use crate::policy::EffectiveRisk;
use crate::profile::{GainMode, RiskProfile, TradeEdge};
use crate::rng::UniformSource;
use crate::trade::{SimulatedTrade, TradeMode};
use crate::types::{Cents, percent_of};

/// Upper bound on compounding trades in one day.
pub const MAX_COMPOUNDING_TRADES: usize = 50;

/// Dominant mode of a simulated day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DayMode {
    /// Base trade lost; the recovery ladder ran.
    LossRecovery,
    /// Base trade won or broke even.
    GainCompounding,
    /// No trades; the day was gated off.
    Idle,
}

/// Why a day was not traded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkipReason {
    WeeklyLimit,
    MonthlyLimit,
    /// A losing-streak rule paused the rest of the week.
    WeekPaused,
    /// A drawdown tier mandates a pause.
    DrawdownPause,
    /// A losing-streak rule stopped trading today.
    LossStreakStop,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkipReason::WeeklyLimit => "weeklyLimit",
            SkipReason::MonthlyLimit => "monthlyLimit",
            SkipReason::WeekPaused => "weekPaused",
            SkipReason::DrawdownPause => "drawdownPause",
            SkipReason::LossStreakStop => "lossStreakStop",
        };
        f.write_str(s)
    }
}

/// One simulated trading day.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulatedDay {
    /// Run-wide day number (1-based).
    pub day: u32,
    /// Run-wide week number (0-based).
    pub week: u32,
    pub mode: DayMode,
    pub trades: Vec<SimulatedTrade>,
    pub pnl_cents: Cents,
    pub target_hit: bool,
    pub skipped: Option<SkipReason>,
}

impl SimulatedDay {
    /// A day that was gated off before any trade.
    pub fn skipped_day(day: u32, week: u32, reason: SkipReason) -> Self {
        Self {
            day,
            week,
            mode: DayMode::Idle,
            trades: Vec::new(),
            pnl_cents: 0,
            target_hit: false,
            skipped: Some(reason),
        }
    }

    #[inline]
    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// Running state while a day is being built.
struct DayBook<'a> {
    day: u32,
    edge: &'a TradeEdge,
    commission: Cents,
    trades: Vec<SimulatedTrade>,
    pnl: Cents,
    balance: Cents,
}

impl DayBook<'_> {
    fn take(&mut self, src: &mut dyn UniformSource, mode: TradeMode, risk: Cents) -> Outcome {
        let drawn = draw_outcome(src, self.edge, risk, self.commission);
        self.pnl += drawn.pnl;
        self.balance += drawn.pnl;
        self.trades.push(SimulatedTrade {
            day: self.day,
            index_in_day: self.trades.len() as u32,
            mode,
            risk_cents: risk,
            outcome: drawn.outcome,
            pnl_cents: drawn.pnl,
            day_pnl_cents: self.pnl,
            balance_after_cents: self.balance,
        });
        drawn.outcome
    }

    /// True if a loss of `risk` now would push the day past `-limit`.
    fn would_breach(&self, limit: Option<Cents>, risk: Cents) -> bool {
        limit.is_some_and(|l| self.pnl - risk - self.commission < -l)
    }
}

/// Simulate one trading day.
///
/// `day` and `week` are run-wide numbers; `start_balance` is the balance
/// before the base trade.
pub fn simulate_day(
    profile: &RiskProfile,
    risk: &EffectiveRisk,
    day: u32,
    week: u32,
    start_balance: Cents,
    src: &mut dyn UniformSource,
) -> SimulatedDay {
    let mut book = DayBook {
        day,
        edge: &profile.edge,
        commission: profile.commission_cents,
        trades: Vec::with_capacity(1 + risk.recovery_ladder.len()),
        pnl: 0,
        balance: start_balance,
    };

    let mode = match book.take(src, TradeMode::Base, risk.base_risk) {
        Outcome::Loss => {
            recover(&mut book, profile, risk, src);
            let recovered = book.pnl;
            if !profile.recovery.stop_after_sequence && recovered > 0 {
                compound(&mut book, profile, risk.daily_limit, recovered, src);
            }
            DayMode::LossRecovery
        }
        Outcome::Win => {
            let gain = book.pnl;
            compound(&mut book, profile, risk.daily_limit, gain, src);
            DayMode::GainCompounding
        }
        Outcome::Breakeven => DayMode::GainCompounding,
    };

    let target_hit = profile.daily_target().is_some_and(|t| book.pnl >= t);

    SimulatedDay {
        day,
        week,
        mode,
        trades: book.trades,
        pnl_cents: book.pnl,
        target_hit,
        skipped: None,
    }
}

/// Climb the recovery ladder after a losing base trade.
fn recover(
    book: &mut DayBook<'_>,
    profile: &RiskProfile,
    risk: &EffectiveRisk,
    src: &mut dyn UniformSource,
) {
    for &step in &risk.recovery_ladder {
        let mut step_risk = step;
        if let Some(limit) = risk.daily_limit {
            if book.pnl <= -limit {
                break;
            }
            // Largest risk whose loss (plus commission) still lands on the limit.
            let budget = limit + book.pnl - book.commission;
            if budget <= 0 {
                break;
            }
            step_risk = step_risk.min(budget);
        }

        let outcome = book.take(src, TradeMode::LossRecovery, step_risk);
        if outcome == Outcome::Win && !profile.recovery.execute_all_steps {
            break;
        }
    }
}

/// Reinvest the day's gain while the policy allows it.
///
/// In single-target mode this is a no-op: the base win is the whole day.
fn compound(
    book: &mut DayBook<'_>,
    profile: &RiskProfile,
    daily_limit: Option<Cents>,
    initial_gain: Cents,
    src: &mut dyn UniformSource,
) {
    let GainMode::Compounding {
        reinvest_percent,
        stop_on_first_loss,
    } = profile.gain_mode
    else {
        return;
    };

    let target = profile.daily_target();
    let mut gain = initial_gain;

    for _ in 0..MAX_COMPOUNDING_TRADES {
        if target.is_some_and(|t| book.pnl >= t) {
            break;
        }
        let next = percent_of(gain, reinvest_percent);
        if next <= 0 || book.would_breach(daily_limit, next) {
            break;
        }

        match book.take(src, TradeMode::GainCompounding, next) {
            Outcome::Win => gain = book.pnl,
            Outcome::Breakeven => {}
            Outcome::Loss => {
                if stop_on_first_loss {
                    break;
                }
                gain = book.pnl.max(0);
                if gain == 0 {
                    break;
                }
            }
        }
    }
}
