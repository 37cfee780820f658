//! Risk policy resolution.
//!
//! Turns a [`RiskProfile`] plus the running account state into the concrete
//! numbers used for one trading day: base risk, loss limits, the recovery
//! ladder, and the pause/stop flags raised by drawdown tiers and losing-streak
//! rules.

use crate::profile::{
    LimitMode, LossRuleAction, RiskProfile, SizingMode, TierAction, active_limit,
};
use crate::types::{Cents, percent_of, round_cents};

/// Account state the resolver reads. Built fresh each day.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccountSnapshot {
    pub balance: Cents,
    pub initial_balance: Cents,
    /// Profit accumulated since the start of the run (may be negative).
    pub accumulated_profit: Cents,
    pub peak_balance: Cents,
    /// Current retracement from peak, in percent.
    pub drawdown_percent: f64,
    pub consecutive_losing_days: u32,
    /// True once enough of the drawdown has been regained to lift tiers.
    pub drawdown_recovered: bool,
}

impl AccountSnapshot {
    /// Snapshot of a fresh account: no profit, no drawdown, no streak.
    pub fn fresh(balance: Cents) -> Self {
        Self {
            balance,
            initial_balance: balance,
            accumulated_profit: 0,
            peak_balance: balance,
            drawdown_percent: 0.0,
            consecutive_losing_days: 0,
            drawdown_recovered: false,
        }
    }
}

/// Resolved risk for one day.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveRisk {
    /// Base risk after sizing, before drawdown/streak adjustment.
    pub sized_risk: Cents,
    /// Per-trade risk after adjustment; at least one cent.
    pub base_risk: Cents,
    pub daily_limit: Option<Cents>,
    pub weekly_limit: Option<Cents>,
    pub monthly_limit: Option<Cents>,
    /// Product of the drawdown-tier and losing-streak multipliers.
    pub risk_multiplier: f64,
    /// Recovery ladder rescaled to `base_risk`.
    pub recovery_ladder: Vec<Cents>,
    /// A drawdown tier mandates a full pause.
    pub pause_today: bool,
    /// A losing-streak rule stops trading for the day.
    pub stop_today: bool,
    /// A losing-streak rule pauses the rest of the week.
    pub pause_week: bool,
}

/// Resolve the effective risk for the coming day.
pub fn resolve(profile: &RiskProfile, account: &AccountSnapshot) -> EffectiveRisk {
    let sized_risk = sized_risk(profile, account);
    let (daily_limit, weekly_limit, monthly_limit) = limits(profile, account, sized_risk);

    let (tier_multiplier, pause_today) = if account.drawdown_recovered {
        (1.0, false)
    } else {
        drawdown_adjustment(profile, account.drawdown_percent)
    };
    let streak = streak_adjustment(profile, account.consecutive_losing_days);

    let risk_multiplier = tier_multiplier * streak.multiplier;
    let base_risk = round_cents(sized_risk as f64 * risk_multiplier).max(1);

    let recovery_ladder = profile
        .recovery
        .steps
        .iter()
        .map(|step| {
            let m = step.multiplier(profile.base_risk_cents);
            round_cents(base_risk as f64 * m).max(1)
        })
        .collect();

    EffectiveRisk {
        sized_risk,
        base_risk,
        daily_limit,
        weekly_limit,
        monthly_limit,
        risk_multiplier,
        recovery_ladder,
        pause_today,
        stop_today: streak.stop_day,
        pause_week: streak.pause_week,
    }
}

/// Base risk under the profile's sizing mode.
pub fn sized_risk(profile: &RiskProfile, account: &AccountSnapshot) -> Cents {
    match profile.sizing {
        SizingMode::Fixed => profile.base_risk_cents,
        SizingMode::PercentOfBalance { risk_percent } => {
            percent_of(account.balance, risk_percent).max(1)
        }
        SizingMode::FixedRatio {
            delta_cents,
            contract_risk_cents,
        } => fixed_ratio_contracts(account.accumulated_profit, delta_cents) as Cents
            * contract_risk_cents,
        SizingMode::KellyFractional { divisor } => {
            let f = kelly_fraction(
                profile.edge.win_rate / 100.0,
                profile.edge.reward_risk_ratio,
            );
            let divisor = if divisor > 0.0 { divisor } else { 1.0 };
            round_cents(account.balance as f64 * f / divisor).max(1)
        }
    }
}

/// Ralph Vince fixed-ratio contract count for the given accumulated profit.
///
/// `N = floor((−1 + sqrt(1 + 8·profit/Δ)) / 2) + 1`, with losses treated as
/// zero profit. A non-positive delta pins the count at one contract.
pub fn fixed_ratio_contracts(accumulated_profit: Cents, delta: Cents) -> u64 {
    if delta <= 0 {
        return 1;
    }
    let profit = accumulated_profit.max(0) as f64;
    let n = ((-1.0 + (1.0 + 8.0 * profit / delta as f64).sqrt()) / 2.0).floor();
    n.max(0.0) as u64 + 1
}

/// Full Kelly fraction `max(0, W − (1 − W) / R)`. Zero when `R <= 0`.
pub fn kelly_fraction(win_probability: f64, reward_risk: f64) -> f64 {
    if reward_risk <= 0.0 || !reward_risk.is_finite() {
        return 0.0;
    }
    (win_probability - (1.0 - win_probability) / reward_risk).max(0.0)
}

fn limits(
    profile: &RiskProfile,
    account: &AccountSnapshot,
    sized_risk: Cents,
) -> (Option<Cents>, Option<Cents>, Option<Cents>) {
    let fixed = (
        active_limit(profile.daily_loss_limit_cents),
        active_limit(profile.weekly_loss_limit_cents),
        active_limit(profile.monthly_loss_limit_cents),
    );

    match profile.limit_mode {
        LimitMode::FixedCents => fixed,
        LimitMode::PercentOfInitial {
            daily_percent,
            weekly_percent,
            monthly_percent,
        } => {
            let of_initial = |pct: Option<f64>, fallback: Option<Cents>| match pct {
                Some(p) => active_limit(Some(percent_of(account.initial_balance, p))),
                None => fallback,
            };
            (
                of_initial(daily_percent, fixed.0),
                of_initial(weekly_percent, fixed.1),
                of_initial(monthly_percent, fixed.2),
            )
        }
        LimitMode::RMultiples {
            daily_r,
            weekly_r,
            monthly_r,
        } => {
            let of_risk = |r: Option<f64>, fallback: Option<Cents>| match r {
                Some(r) => active_limit(Some(round_cents(sized_risk as f64 * r))),
                None => fallback,
            };
            (
                of_risk(daily_r, fixed.0),
                of_risk(weekly_r, fixed.1),
                of_risk(monthly_r, fixed.2),
            )
        }
    }
}

/// Multiplier and pause flag from the drawdown tiers.
///
/// The applicable tier with the highest trigger wins. Equal triggers resolve
/// to the more severe action.
pub fn drawdown_adjustment(profile: &RiskProfile, drawdown_percent: f64) -> (f64, bool) {
    let selected = profile
        .drawdown
        .tiers
        .iter()
        .filter(|t| t.trigger_percent <= drawdown_percent)
        .max_by(|a, b| {
            a.trigger_percent
                .total_cmp(&b.trigger_percent)
                .then_with(|| tier_severity(&a.action).total_cmp(&tier_severity(&b.action)))
        });

    match selected.map(|t| t.action) {
        None => (1.0, false),
        Some(TierAction::Pause) => (0.0, true),
        Some(TierAction::ReduceRisk { percent }) => (reduction(percent), false),
    }
}

fn tier_severity(action: &TierAction) -> f64 {
    match *action {
        TierAction::Pause => f64::INFINITY,
        TierAction::ReduceRisk { percent } => percent,
    }
}

/// Outcome of the losing-streak rules for one day.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreakAdjustment {
    pub multiplier: f64,
    pub stop_day: bool,
    pub pause_week: bool,
}

/// Multiplier and flags from the consecutive-loss rules.
///
/// The applicable rule with the highest day-count trigger wins.
pub fn streak_adjustment(profile: &RiskProfile, consecutive_losing_days: u32) -> StreakAdjustment {
    let selected = profile
        .loss_rules
        .iter()
        .filter(|r| r.trigger_days <= consecutive_losing_days)
        .max_by(|a, b| {
            a.trigger_days
                .cmp(&b.trigger_days)
                .then_with(|| rule_severity(&a.action).total_cmp(&rule_severity(&b.action)))
        });

    let mut adj = StreakAdjustment {
        multiplier: 1.0,
        stop_day: false,
        pause_week: false,
    };
    match selected.map(|r| r.action) {
        None => {}
        Some(LossRuleAction::ReduceRisk { percent }) => adj.multiplier = reduction(percent),
        Some(LossRuleAction::StopDay) => {
            adj.multiplier = 0.0;
            adj.stop_day = true;
        }
        Some(LossRuleAction::PauseWeek) => {
            adj.multiplier = 0.0;
            adj.pause_week = true;
        }
    }
    adj
}

fn rule_severity(action: &LossRuleAction) -> f64 {
    match *action {
        LossRuleAction::PauseWeek => f64::INFINITY,
        LossRuleAction::StopDay => f64::MAX,
        LossRuleAction::ReduceRisk { percent } => percent,
    }
}

#[inline]
fn reduction(percent: f64) -> f64 {
    (1.0 - percent / 100.0).clamp(0.0, 1.0)
}
