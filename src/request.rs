//! Simulation request and its validation.

use crate::error::ValidationError;
use crate::profile::{
    GainMode, LimitMode, LossRuleAction, RecoveryStep, RiskProfile, SizingMode, TierAction,
};
use crate::types::Cents;

/// Upper bound on independent runs per request.
pub const MAX_SIMULATIONS: u32 = 100_000;
/// Upper bound on months chained per run.
pub const MAX_MONTHS_PER_RUN: u32 = 120;

/// Everything needed for one simulation call.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationRequest {
    pub profile: RiskProfile,
    /// Number of independent runs.
    pub simulation_count: u32,
    pub initial_balance_cents: Cents,
    pub months_per_run: u32,
    /// Loss from the initial balance, in percent, that counts as ruin.
    pub ruin_threshold_percent: f64,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            profile: RiskProfile::default(),
            simulation_count: 1_000,
            initial_balance_cents: 10_000_00,
            months_per_run: 12,
            ruin_threshold_percent: 50.0,
        }
    }
}

impl SimulationRequest {
    /// Balance at or below which a run is ruined.
    pub fn ruin_balance(&self) -> f64 {
        self.initial_balance_cents as f64 * (1.0 - self.ruin_threshold_percent / 100.0)
    }

    /// Check every numeric range the engine relies on.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        count("simulation_count", self.simulation_count, 1, MAX_SIMULATIONS)?;
        count("months_per_run", self.months_per_run, 1, MAX_MONTHS_PER_RUN)?;
        positive("initial_balance_cents", self.initial_balance_cents)?;
        percent("ruin_threshold_percent", self.ruin_threshold_percent)?;
        validate_profile(&self.profile)
    }
}

/// Validate a risk profile on its own.
pub fn validate_profile(p: &RiskProfile) -> Result<(), ValidationError> {
    percent("win_rate", p.edge.win_rate)?;
    percent("breakeven_rate", p.edge.breakeven_rate)?;
    ratio("reward_risk_ratio", p.edge.reward_risk_ratio)?;
    positive("base_risk_cents", p.base_risk_cents)?;
    non_negative("commission_cents", p.commission_cents)?;

    count(
        "trading_days_per_week",
        p.calendar.trading_days_per_week,
        1,
        7,
    )?;
    count(
        "trading_days_per_month",
        p.calendar.trading_days_per_month,
        1,
        31,
    )?;

    for step in &p.recovery.steps {
        match *step {
            RecoveryStep::Amount(a) => positive("recovery_step_amount", a)?,
            RecoveryStep::Multiplier(m) => ratio("recovery_step_multiplier", m)?,
        }
    }

    if let GainMode::Compounding {
        reinvest_percent, ..
    } = p.gain_mode
    {
        percent("reinvest_percent", reinvest_percent)?;
    }

    match p.sizing {
        SizingMode::Fixed => {}
        SizingMode::PercentOfBalance { risk_percent } => percent("risk_percent", risk_percent)?,
        SizingMode::FixedRatio {
            delta_cents,
            contract_risk_cents,
        } => {
            positive("delta_cents", delta_cents)?;
            positive("contract_risk_cents", contract_risk_cents)?;
        }
        SizingMode::KellyFractional { divisor } => {
            ratio("kelly_divisor", divisor)?;
            if divisor == 0.0 {
                return Err(ValidationError::InvalidRatio {
                    field: "kelly_divisor",
                    value: divisor,
                });
            }
        }
    }

    match p.limit_mode {
        LimitMode::FixedCents => {}
        LimitMode::PercentOfInitial {
            daily_percent,
            weekly_percent,
            monthly_percent,
        } => {
            optional_percent("daily_percent", daily_percent)?;
            optional_percent("weekly_percent", weekly_percent)?;
            optional_percent("monthly_percent", monthly_percent)?;
        }
        LimitMode::RMultiples {
            daily_r,
            weekly_r,
            monthly_r,
        } => {
            for (field, r) in [("daily_r", daily_r), ("weekly_r", weekly_r), ("monthly_r", monthly_r)] {
                if let Some(r) = r {
                    ratio(field, r)?;
                }
            }
        }
    }

    for tier in &p.drawdown.tiers {
        percent("tier_trigger_percent", tier.trigger_percent)?;
        if let TierAction::ReduceRisk { percent: pct } = tier.action {
            percent("tier_reduce_percent", pct)?;
        }
    }
    optional_percent("drawdown_recovery_percent", p.drawdown.recovery_percent)?;

    for rule in &p.loss_rules {
        count("loss_rule_trigger_days", rule.trigger_days, 1, u32::MAX)?;
        if let LossRuleAction::ReduceRisk { percent: pct } = rule.action {
            percent("loss_rule_reduce_percent", pct)?;
        }
    }

    Ok(())
}

fn percent(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::PercentOutOfRange { field, value })
    }
}

fn optional_percent(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) => percent(field, v),
        None => Ok(()),
    }
}

fn ratio(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidRatio { field, value })
    }
}

fn positive(field: &'static str, value: Cents) -> Result<(), ValidationError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount { field, value })
    }
}

fn non_negative(field: &'static str, value: Cents) -> Result<(), ValidationError> {
    if value >= 0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeAmount { field, value })
    }
}

fn count(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::CountOutOfRange {
            field,
            value: value as u64,
            min: min as u64,
            max: max as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ConsecutiveLossRule, DrawdownTier};

    #[test]
    fn default_request_is_valid() {
        assert_eq!(SimulationRequest::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_simulations() {
        let req = SimulationRequest {
            simulation_count: 0,
            ..SimulationRequest::default()
        };
        assert!(matches!(
            req.validate(),
            Err(ValidationError::CountOutOfRange {
                field: "simulation_count",
                ..
            })
        ));
    }

    #[test]
    fn rejects_oversized_request() {
        let req = SimulationRequest {
            months_per_run: MAX_MONTHS_PER_RUN + 1,
            ..SimulationRequest::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_bad_win_rate() {
        let mut req = SimulationRequest::default();
        req.profile.edge.win_rate = 101.0;
        assert!(req.validate().is_err());
        req.profile.edge.win_rate = f64::NAN;
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_negative_commission() {
        let mut req = SimulationRequest::default();
        req.profile.commission_cents = -1;
        assert_eq!(
            req.validate(),
            Err(ValidationError::NegativeAmount {
                field: "commission_cents",
                value: -1
            })
        );
    }

    #[test]
    fn rejects_zero_kelly_divisor() {
        let mut req = SimulationRequest::default();
        req.profile.sizing = SizingMode::KellyFractional { divisor: 0.0 };
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_bad_tier_and_rule() {
        let mut req = SimulationRequest::default();
        req.profile.drawdown.tiers.push(DrawdownTier {
            trigger_percent: 150.0,
            action: TierAction::Pause,
        });
        assert!(req.validate().is_err());

        let mut req = SimulationRequest::default();
        req.profile.loss_rules.push(ConsecutiveLossRule {
            trigger_days: 0,
            action: LossRuleAction::StopDay,
        });
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_reinvest_over_hundred() {
        let mut req = SimulationRequest::default();
        req.profile.gain_mode = GainMode::Compounding {
            reinvest_percent: 150.0,
            stop_on_first_loss: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn ruin_balance() {
        let req = SimulationRequest {
            initial_balance_cents: 10_000_00,
            ruin_threshold_percent: 25.0,
            ..SimulationRequest::default()
        };
        assert_eq!(req.ruin_balance(), 7_500_00 as f64);
    }
}
