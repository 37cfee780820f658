//! Risk profile: the statistical edge plus the risk-management policy.
//!
//! Mode-dependent configuration (sizing, limits, gain handling) is modelled as
//! enums so each mode carries exactly the parameters it needs.

use crate::types::Cents;

/// Statistical edge of a strategy. All rates are percentages in `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TradeEdge {
    /// Share of decisive (non-breakeven) trades that win.
    pub win_rate: f64,
    /// Reward:risk ratio of a winning trade (2.0 = a win pays 2R).
    pub reward_risk_ratio: f64,
    /// Share of all trades that close at breakeven.
    pub breakeven_rate: f64,
}

impl Default for TradeEdge {
    fn default() -> Self {
        Self {
            win_rate: 50.0,
            reward_risk_ratio: 2.0,
            breakeven_rate: 0.0,
        }
    }
}

/// How the base risk per trade is sized.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum SizingMode {
    /// Always risk the profile's base risk.
    #[default]
    Fixed,
    /// Risk a percentage of the current balance.
    PercentOfBalance { risk_percent: f64 },
    /// Ralph Vince fixed-ratio: contracts grow with accumulated profit.
    FixedRatio {
        /// Profit required per additional contract step.
        delta_cents: Cents,
        /// Risk carried by one contract.
        contract_risk_cents: Cents,
    },
    /// Kelly fraction of the balance, divided down by `divisor`.
    KellyFractional { divisor: f64 },
}

/// How the daily/weekly/monthly loss limits are expressed.
///
/// Any parameter left as `None` falls back to the fixed-cents limit stored on
/// the profile.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum LimitMode {
    #[default]
    FixedCents,
    /// Percent of the run's initial balance.
    PercentOfInitial {
        #[cfg_attr(feature = "serde", serde(default))]
        daily_percent: Option<f64>,
        #[cfg_attr(feature = "serde", serde(default))]
        weekly_percent: Option<f64>,
        #[cfg_attr(feature = "serde", serde(default))]
        monthly_percent: Option<f64>,
    },
    /// Multiples of the effective base risk.
    RMultiples {
        #[cfg_attr(feature = "serde", serde(default))]
        daily_r: Option<f64>,
        #[cfg_attr(feature = "serde", serde(default))]
        weekly_r: Option<f64>,
        #[cfg_attr(feature = "serde", serde(default))]
        monthly_r: Option<f64>,
    },
}

/// What happens after a winning base trade.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum GainMode {
    /// One winning trade and done; the win may satisfy the daily target.
    #[default]
    SingleTarget,
    /// Reinvest a share of the day's accumulated gain into further trades.
    Compounding {
        reinvest_percent: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        stop_on_first_loss: bool,
    },
}

impl GainMode {
    /// Build from a reinvestment percentage; `0` means single-target mode.
    pub fn from_reinvest_percent(reinvest_percent: f64, stop_on_first_loss: bool) -> Self {
        if reinvest_percent > 0.0 {
            GainMode::Compounding {
                reinvest_percent,
                stop_on_first_loss,
            }
        } else {
            GainMode::SingleTarget
        }
    }
}

/// One rung of the loss-recovery ladder.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RecoveryStep {
    /// Absolute risk, interpreted relative to the profile's base risk.
    Amount(Cents),
    /// Multiple of the base risk.
    Multiplier(f64),
}

impl RecoveryStep {
    /// Multiplier relative to the un-adjusted base risk.
    ///
    /// An `Amount` against a non-positive base risk falls back to the raw
    /// amount, so it is applied as if the base were one cent.
    pub fn multiplier(&self, base_risk: Cents) -> f64 {
        match *self {
            RecoveryStep::Multiplier(m) => m,
            RecoveryStep::Amount(amount) if base_risk > 0 => amount as f64 / base_risk as f64,
            RecoveryStep::Amount(amount) => amount as f64,
        }
    }
}

/// Loss-recovery ladder configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RecoveryPlan {
    pub steps: Vec<RecoveryStep>,
    /// Keep climbing the ladder after a winning step.
    pub execute_all_steps: bool,
    /// End the day once the ladder finishes, even if it recovered into profit.
    pub stop_after_sequence: bool,
}

impl Default for RecoveryPlan {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            execute_all_steps: false,
            stop_after_sequence: true,
        }
    }
}

/// Trading calendar shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Calendar {
    pub trading_days_per_week: u32,
    pub trading_days_per_month: u32,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            trading_days_per_week: 5,
            trading_days_per_month: 22,
        }
    }
}

impl Calendar {
    /// Zero-based week index of a one-based day of the month.
    #[inline]
    pub fn week_of(&self, day_of_month: u32) -> u32 {
        (day_of_month.saturating_sub(1)) / self.trading_days_per_week.max(1)
    }

    /// True when `day_of_month` opens a new trading week.
    #[inline]
    pub fn starts_week(&self, day_of_month: u32) -> bool {
        (day_of_month.saturating_sub(1)) % self.trading_days_per_week.max(1) == 0
    }
}

/// Action taken when a drawdown tier triggers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "action", rename_all = "snake_case"))]
pub enum TierAction {
    ReduceRisk { percent: f64 },
    /// Stop trading. Paused days leave the balance untouched, so the
    /// drawdown never moves again and the pause holds for the rest of the run.
    Pause,
}

/// Drawdown threshold (percent from peak) with its throttle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawdownTier {
    pub trigger_percent: f64,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub action: TierAction,
}

/// Drawdown throttling policy.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DrawdownPolicy {
    pub tiers: Vec<DrawdownTier>,
    /// Share of the deepest drawdown (percent) that must be regained before
    /// the tiers stop applying. `None` keeps tiers active until a new peak.
    pub recovery_percent: Option<f64>,
}

/// Action taken when a losing streak triggers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "action", rename_all = "snake_case"))]
pub enum LossRuleAction {
    ReduceRisk { percent: f64 },
    StopDay,
    PauseWeek,
}

/// Consecutive losing-day circuit breaker.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsecutiveLossRule {
    pub trigger_days: u32,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub action: LossRuleAction,
}

/// Full risk profile. Immutable for the duration of a simulation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RiskProfile {
    pub edge: TradeEdge,
    pub base_risk_cents: Cents,
    pub daily_loss_limit_cents: Option<Cents>,
    pub weekly_loss_limit_cents: Option<Cents>,
    pub monthly_loss_limit_cents: Option<Cents>,
    pub daily_profit_target_cents: Option<Cents>,
    pub recovery: RecoveryPlan,
    pub gain_mode: GainMode,
    pub calendar: Calendar,
    pub commission_cents: Cents,
    pub sizing: SizingMode,
    pub limit_mode: LimitMode,
    pub drawdown: DrawdownPolicy,
    pub loss_rules: Vec<ConsecutiveLossRule>,
}

impl Default for RiskProfile {
    fn default() -> Self {
        Self {
            edge: TradeEdge::default(),
            base_risk_cents: 100_00,
            daily_loss_limit_cents: None,
            weekly_loss_limit_cents: None,
            monthly_loss_limit_cents: None,
            daily_profit_target_cents: None,
            recovery: RecoveryPlan::default(),
            gain_mode: GainMode::SingleTarget,
            calendar: Calendar::default(),
            commission_cents: 0,
            sizing: SizingMode::Fixed,
            limit_mode: LimitMode::FixedCents,
            drawdown: DrawdownPolicy::default(),
            loss_rules: Vec::new(),
        }
    }
}

impl RiskProfile {
    /// Daily profit target, if one is configured (non-positive means none).
    #[inline]
    pub fn daily_target(&self) -> Option<Cents> {
        self.daily_profit_target_cents.filter(|&t| t > 0)
    }
}

/// A limit is active only when set and positive.
#[inline]
pub(crate) fn active_limit(limit: Option<Cents>) -> Option<Cents> {
    limit.filter(|&l| l > 0)
}
