//! Month simulator: iterates trading days, applies weekly/monthly limits and
//! the pause/stop gates, and books each day into the run's account state.

use crate::day::{DayMode, SimulatedDay, SkipReason, simulate_day};
use crate::observer::SimulationObserver;
use crate::outcome::Outcome;
use crate::policy::resolve;
use crate::profile::RiskProfile;
use crate::rng::UniformSource;
use crate::state::AccountState;
use crate::types::Cents;

/// Event counters shared by months and runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    pub trades: u64,
    pub wins: u64,
    pub losses: u64,
    pub breakevens: u64,
    /// Sum of positive trade P&L.
    pub gross_profit_cents: Cents,
    /// Sum of negative trade P&L, as a positive number.
    pub gross_loss_cents: Cents,
    /// Days on which at least one trade was taken.
    pub trading_days: u32,
    pub recovery_days: u32,
    pub compounding_days: u32,
    pub target_hit_days: u32,
    pub skipped_weekly_limit: u32,
    pub skipped_monthly_limit: u32,
    pub skipped_week_paused: u32,
    pub skipped_drawdown_pause: u32,
    pub skipped_loss_streak: u32,
    /// Weeks in which the weekly loss limit was reached.
    pub weekly_limit_hits: u32,
    /// Months in which the monthly loss limit was reached.
    pub monthly_limit_hits: u32,
}

impl Tally {
    /// Count a traded day and its trades.
    pub fn record_day(&mut self, day: &SimulatedDay) {
        if day.trades.is_empty() {
            return;
        }
        self.trading_days += 1;
        match day.mode {
            DayMode::LossRecovery => self.recovery_days += 1,
            DayMode::GainCompounding => self.compounding_days += 1,
            DayMode::Idle => {}
        }
        if day.target_hit {
            self.target_hit_days += 1;
        }
        for t in &day.trades {
            self.trades += 1;
            match t.outcome {
                Outcome::Win => self.wins += 1,
                Outcome::Loss => self.losses += 1,
                Outcome::Breakeven => self.breakevens += 1,
            }
            if t.pnl_cents > 0 {
                self.gross_profit_cents += t.pnl_cents;
            } else {
                self.gross_loss_cents -= t.pnl_cents;
            }
        }
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::WeeklyLimit => self.skipped_weekly_limit += 1,
            SkipReason::MonthlyLimit => self.skipped_monthly_limit += 1,
            SkipReason::WeekPaused => self.skipped_week_paused += 1,
            SkipReason::DrawdownPause => self.skipped_drawdown_pause += 1,
            SkipReason::LossStreakStop => self.skipped_loss_streak += 1,
        }
    }

    /// Total skipped days for any reason.
    pub fn skipped_days(&self) -> u32 {
        self.skipped_weekly_limit
            + self.skipped_monthly_limit
            + self.skipped_week_paused
            + self.skipped_drawdown_pause
            + self.skipped_loss_streak
    }

    /// Add another tally into this one.
    pub fn merge(&mut self, other: &Tally) {
        self.trades += other.trades;
        self.wins += other.wins;
        self.losses += other.losses;
        self.breakevens += other.breakevens;
        self.gross_profit_cents += other.gross_profit_cents;
        self.gross_loss_cents += other.gross_loss_cents;
        self.trading_days += other.trading_days;
        self.recovery_days += other.recovery_days;
        self.compounding_days += other.compounding_days;
        self.target_hit_days += other.target_hit_days;
        self.skipped_weekly_limit += other.skipped_weekly_limit;
        self.skipped_monthly_limit += other.skipped_monthly_limit;
        self.skipped_week_paused += other.skipped_week_paused;
        self.skipped_drawdown_pause += other.skipped_drawdown_pause;
        self.skipped_loss_streak += other.skipped_loss_streak;
        self.weekly_limit_hits += other.weekly_limit_hits;
        self.monthly_limit_hits += other.monthly_limit_hits;
    }
}

/// Totals for one simulated month.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonthSummary {
    /// Zero-based month index within the run.
    pub month: u32,
    pub starting_balance: Cents,
    pub ending_balance: Cents,
    pub pnl_cents: Cents,
    pub return_percent: f64,
    pub tally: Tally,
    pub weekly_limit_hit: bool,
    pub monthly_limit_hit: bool,
}

/// Days and totals for one simulated month.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthResult {
    pub days: Vec<SimulatedDay>,
    pub summary: MonthSummary,
}

/// Loss limit reached: `pnl <= -limit`.
#[inline]
fn breached(limit: Option<Cents>, pnl: Cents) -> bool {
    limit.is_some_and(|l| pnl <= -l)
}

/// Simulate month `month` (zero-based) of run `run`.
///
/// Day numbers continue from previous months; `state` carries balance, peak,
/// drawdown and losing streak in and out.
pub fn simulate_month(
    profile: &RiskProfile,
    state: &mut AccountState,
    month: u32,
    run: usize,
    src: &mut dyn UniformSource,
    observer: &mut dyn SimulationObserver,
) -> MonthResult {
    let calendar = profile.calendar;
    let days_per_month = calendar.trading_days_per_month;
    let weeks_per_month = days_per_month.div_ceil(calendar.trading_days_per_week.max(1));

    let starting_balance = state.balance;
    let mut days = Vec::with_capacity(days_per_month as usize);
    let mut tally = Tally::default();

    let mut monthly_pnl: Cents = 0;
    let mut weekly_pnl: Cents = 0;
    let mut week_paused = false;
    let mut weekly_hit_this_week = false;
    let mut weekly_limit_hit = false;
    let mut monthly_limit_hit = false;

    for day_of_month in 1..=days_per_month {
        if calendar.starts_week(day_of_month) {
            weekly_pnl = 0;
            week_paused = false;
            weekly_hit_this_week = false;
        }

        let day_no = month * days_per_month + day_of_month;
        let week_no = month * weeks_per_month + calendar.week_of(day_of_month);
        let risk = resolve(profile, &state.snapshot(profile));

        let gate = if breached(risk.monthly_limit, monthly_pnl) {
            Some(SkipReason::MonthlyLimit)
        } else if breached(risk.weekly_limit, weekly_pnl) {
            Some(SkipReason::WeeklyLimit)
        } else if week_paused {
            Some(SkipReason::WeekPaused)
        } else if risk.pause_today {
            Some(SkipReason::DrawdownPause)
        } else if risk.stop_today || risk.pause_week {
            Some(SkipReason::LossStreakStop)
        } else {
            None
        };

        if let Some(reason) = gate {
            if reason == SkipReason::LossStreakStop {
                week_paused |= risk.pause_week;
                state.reset_streak();
            }
            tally.record_skip(reason);
            let day = SimulatedDay::skipped_day(day_no, week_no, reason);
            observer.on_day(run, &day);
            days.push(day);
            continue;
        }

        let day = simulate_day(profile, &risk, day_no, week_no, state.balance, src);
        for trade in &day.trades {
            state.observe_balance(trade.balance_after_cents);
            observer.on_trade(run, trade);
        }
        state.close_day(day.pnl_cents);
        tally.record_day(&day);

        monthly_pnl += day.pnl_cents;
        weekly_pnl += day.pnl_cents;

        if !monthly_limit_hit && breached(risk.monthly_limit, monthly_pnl) {
            monthly_limit_hit = true;
            tally.monthly_limit_hits += 1;
        }
        if !weekly_hit_this_week && breached(risk.weekly_limit, weekly_pnl) {
            weekly_hit_this_week = true;
            weekly_limit_hit = true;
            tally.weekly_limit_hits += 1;
        }

        observer.on_day(run, &day);
        days.push(day);
    }

    let summary = MonthSummary {
        month,
        starting_balance,
        ending_balance: state.balance,
        pnl_cents: monthly_pnl,
        return_percent: if starting_balance > 0 {
            monthly_pnl as f64 / starting_balance as f64 * 100.0
        } else {
            0.0
        },
        tally,
        weekly_limit_hit,
        monthly_limit_hit,
    };
    observer.on_month(run, &summary);

    MonthResult { days, summary }
}
