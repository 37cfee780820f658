//! Per-run account state threaded through the month and run simulators.
//!
//! One `AccountState` lives for exactly one run. Nothing in it is shared
//! between runs.

use crate::policy::AccountSnapshot;
use crate::profile::RiskProfile;
use crate::types::Cents;

/// Running balance, peak/trough tracking and losing-streak count.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountState {
    pub initial_balance: Cents,
    pub balance: Cents,
    /// Profit since the start of the run; drives fixed-ratio sizing.
    pub accumulated_profit: Cents,
    /// Highest end-of-day balance.
    pub peak_balance: Cents,
    /// Lowest balance after any trade; `None` until the first trade.
    pub min_balance: Option<Cents>,
    pub max_drawdown_cents: Cents,
    pub max_drawdown_percent: f64,
    /// Deepest drawdown since the last peak.
    pub trough_drawdown_percent: f64,
    pub consecutive_losing_days: u32,
    pub max_consecutive_losing_days: u32,
}

impl AccountState {
    pub fn new(initial_balance: Cents) -> Self {
        Self {
            initial_balance,
            balance: initial_balance,
            accumulated_profit: 0,
            peak_balance: initial_balance,
            min_balance: None,
            max_drawdown_cents: 0,
            max_drawdown_percent: 0.0,
            trough_drawdown_percent: 0.0,
            consecutive_losing_days: 0,
            max_consecutive_losing_days: 0,
        }
    }

    /// Current retracement from peak, in percent.
    pub fn drawdown_percent(&self) -> f64 {
        if self.peak_balance > 0 {
            (self.peak_balance - self.balance) as f64 / self.peak_balance as f64 * 100.0
        } else {
            0.0
        }
    }

    /// True once `recovery_percent` of the deepest drawdown since the last
    /// peak has been regained.
    pub fn drawdown_recovered(&self, recovery_percent: Option<f64>) -> bool {
        let Some(threshold) = recovery_percent else {
            return false;
        };
        let trough = self.trough_drawdown_percent;
        if trough <= 0.0 {
            return false;
        }
        let regained = (trough - self.drawdown_percent()) / trough * 100.0;
        regained >= threshold
    }

    /// Snapshot handed to the risk policy resolver.
    pub fn snapshot(&self, profile: &RiskProfile) -> AccountSnapshot {
        AccountSnapshot {
            balance: self.balance,
            initial_balance: self.initial_balance,
            accumulated_profit: self.accumulated_profit,
            peak_balance: self.peak_balance,
            drawdown_percent: self.drawdown_percent(),
            consecutive_losing_days: self.consecutive_losing_days,
            drawdown_recovered: self.drawdown_recovered(profile.drawdown.recovery_percent),
        }
    }

    /// Record an intraday balance (after a trade).
    #[inline]
    pub fn observe_balance(&mut self, balance: Cents) {
        self.min_balance = Some(self.min_balance.map_or(balance, |m| m.min(balance)));
    }

    /// Lowest post-trade balance, or the initial balance if nothing traded.
    pub fn lowest_balance(&self) -> Cents {
        self.min_balance.unwrap_or(self.initial_balance)
    }

    /// Book a traded day's P&L: balance, peak, drawdown and streak.
    pub fn close_day(&mut self, pnl: Cents) {
        self.balance += pnl;
        self.accumulated_profit += pnl;
        self.observe_balance(self.balance);

        if self.balance > self.peak_balance {
            self.peak_balance = self.balance;
            self.trough_drawdown_percent = 0.0;
        }

        let dd_cents = self.peak_balance - self.balance;
        let dd_percent = self.drawdown_percent();
        self.max_drawdown_cents = self.max_drawdown_cents.max(dd_cents);
        self.max_drawdown_percent = self.max_drawdown_percent.max(dd_percent);
        self.trough_drawdown_percent = self.trough_drawdown_percent.max(dd_percent);

        if pnl >= 0 {
            self.consecutive_losing_days = 0;
        } else {
            self.consecutive_losing_days += 1;
            self.max_consecutive_losing_days =
                self.max_consecutive_losing_days.max(self.consecutive_losing_days);
        }
    }

    /// A losing-streak rule consumed the streak (stop-day / pause-week).
    #[inline]
    pub fn reset_streak(&mut self) {
        self.consecutive_losing_days = 0;
    }
}
