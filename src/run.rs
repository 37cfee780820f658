//! Run orchestrator: one independent multi-month trading career.

use crate::day::SimulatedDay;
use crate::month::{MonthSummary, Tally, simulate_month};
use crate::observer::SimulationObserver;
use crate::request::SimulationRequest;
use crate::rng::UniformSource;
use crate::state::AccountState;
use crate::types::Cents;

/// One simulated run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationRun {
    /// Every day of the run, numbered continuously from 1.
    pub days: Vec<SimulatedDay>,
    pub months: Vec<MonthSummary>,
    pub tally: Tally,
    pub total_pnl_cents: Cents,
    pub initial_balance: Cents,
    pub final_balance: Cents,
    pub peak_balance: Cents,
    /// Lowest balance after any trade.
    pub min_balance: Cents,
    pub max_drawdown_cents: Cents,
    pub max_drawdown_percent: f64,
    pub max_consecutive_losing_days: u32,
    pub reached_ruin: bool,
}

impl SimulationRun {
    /// Total P&L as a percentage of the initial balance.
    pub fn return_percent(&self) -> f64 {
        if self.initial_balance > 0 {
            self.total_pnl_cents as f64 / self.initial_balance as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Minimum balance as a percentage of the initial balance.
    pub fn min_balance_percent(&self) -> f64 {
        if self.initial_balance > 0 {
            self.min_balance as f64 / self.initial_balance as f64 * 100.0
        } else {
            0.0
        }
    }

    /// True if any month in the run hit its monthly loss limit.
    #[inline]
    pub fn hit_monthly_limit(&self) -> bool {
        self.tally.monthly_limit_hits > 0
    }
}

/// Simulate run `run` of `request`, chaining `months_per_run` months over a
/// single account.
///
/// Nothing is shared with other runs: the account starts at the request's
/// initial balance with no profit, peak history or streak.
pub fn simulate_run(
    request: &SimulationRequest,
    run: usize,
    src: &mut dyn UniformSource,
    observer: &mut dyn SimulationObserver,
) -> SimulationRun {
    let profile = &request.profile;
    let mut state = AccountState::new(request.initial_balance_cents);
    let per_month = profile.calendar.trading_days_per_month as usize;
    let mut days = Vec::with_capacity(per_month * request.months_per_run as usize);
    let mut months = Vec::with_capacity(request.months_per_run as usize);
    let mut tally = Tally::default();

    for month in 0..request.months_per_run {
        let result = simulate_month(profile, &mut state, month, run, src, observer);
        tally.merge(&result.summary.tally);
        days.extend(result.days);
        months.push(result.summary);
    }

    let result = SimulationRun {
        days,
        months,
        tally,
        total_pnl_cents: state.balance - state.initial_balance,
        initial_balance: state.initial_balance,
        final_balance: state.balance,
        peak_balance: state.peak_balance,
        min_balance: state.lowest_balance(),
        max_drawdown_cents: state.max_drawdown_cents,
        max_drawdown_percent: state.max_drawdown_percent,
        max_consecutive_losing_days: state.max_consecutive_losing_days,
        reached_ruin: state.lowest_balance() as f64 <= request.ruin_balance(),
    };
    observer.on_run(run, &result);
    result
}
