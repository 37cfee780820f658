//! Simulation observers.
//!
//! The engine reports progress through [`SimulationObserver`] instead of
//! printing. Every method has a no-op default, so an observer only overrides
//! what it cares about.

use crate::day::SimulatedDay;
use crate::month::MonthSummary;
use crate::run::SimulationRun;
use crate::trade::SimulatedTrade;
use crate::types::Money;

/// Receives trade, day, month and run events as they are produced.
///
/// `run` is the zero-based run index.
pub trait SimulationObserver {
    fn on_trade(&mut self, _run: usize, _trade: &SimulatedTrade) {}
    fn on_day(&mut self, _run: usize, _day: &SimulatedDay) {}
    fn on_month(&mut self, _run: usize, _month: &MonthSummary) {}
    fn on_run(&mut self, _run: usize, _result: &SimulationRun) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SimulationObserver for NoopObserver {}

/// Emits `log` records for the first `max_runs` runs.
///
/// Trades go to `trace`, days and months to `debug`, run summaries to `info`.
#[derive(Clone, Copy, Debug)]
pub struct LogObserver {
    max_runs: usize,
}

impl LogObserver {
    pub fn new(max_runs: usize) -> Self {
        Self { max_runs }
    }

    #[inline]
    fn enabled(&self, run: usize) -> bool {
        run < self.max_runs
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SimulationObserver for LogObserver {
    fn on_trade(&mut self, run: usize, trade: &SimulatedTrade) {
        if self.enabled(run) {
            log::trace!(
                "run {run} day {} #{} {:?} risk {} -> {:?} {} (day {}, balance {})",
                trade.day,
                trade.index_in_day,
                trade.mode,
                Money(trade.risk_cents),
                trade.outcome,
                Money(trade.pnl_cents),
                Money(trade.day_pnl_cents),
                Money(trade.balance_after_cents),
            );
        }
    }

    fn on_day(&mut self, run: usize, day: &SimulatedDay) {
        if !self.enabled(run) {
            return;
        }
        match day.skipped {
            Some(reason) => log::debug!("run {run} day {} skipped: {reason}", day.day),
            None => log::debug!(
                "run {run} day {} {:?}: {} trades, P&L {}{}",
                day.day,
                day.mode,
                day.trades.len(),
                Money(day.pnl_cents),
                if day.target_hit { " (target hit)" } else { "" },
            ),
        }
    }

    fn on_month(&mut self, run: usize, month: &MonthSummary) {
        if self.enabled(run) {
            log::debug!(
                "run {run} month {}: P&L {} ({:.2}%), balance {}",
                month.month + 1,
                Money(month.pnl_cents),
                month.return_percent,
                Money(month.ending_balance),
            );
        }
    }

    fn on_run(&mut self, run: usize, result: &SimulationRun) {
        if self.enabled(run) {
            log::info!(
                "run {run}: P&L {}, {} trades, max drawdown {:.2}%, final balance {}{}",
                Money(result.total_pnl_cents),
                result.tally.trades,
                result.max_drawdown_percent,
                Money(result.final_balance),
                if result.reached_ruin { ", RUINED" } else { "" },
            );
        }
    }
}

/// Counts events; used by tests to check delivery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountingObserver {
    pub trades: usize,
    pub days: usize,
    pub months: usize,
    pub runs: usize,
}

impl SimulationObserver for CountingObserver {
    fn on_trade(&mut self, _run: usize, _trade: &SimulatedTrade) {
        self.trades += 1;
    }
    fn on_day(&mut self, _run: usize, _day: &SimulatedDay) {
        self.days += 1;
    }
    fn on_month(&mut self, _run: usize, _month: &MonthSummary) {
        self.months += 1;
    }
    fn on_run(&mut self, _run: usize, _result: &SimulationRun) {
        self.runs += 1;
    }
}

impl<O: SimulationObserver + ?Sized> SimulationObserver for &mut O {
    fn on_trade(&mut self, run: usize, trade: &SimulatedTrade) {
        (**self).on_trade(run, trade)
    }
    fn on_day(&mut self, run: usize, day: &SimulatedDay) {
        (**self).on_day(run, day)
    }
    fn on_month(&mut self, run: usize, month: &MonthSummary) {
        (**self).on_month(run, month)
    }
    fn on_run(&mut self, run: usize, result: &SimulationRun) {
        (**self).on_run(run, result)
    }
}
