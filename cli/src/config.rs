//! TOML request file loading and validation.

use std::path::Path;

use serde::Deserialize;
use tradesim::{RiskProfile, SimulationRequest};

use crate::error::{Error, Result};

/// Top-level request file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub profile: RiskProfile,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_initial_balance")]
    pub initial_balance_cents: i64,
    #[serde(default = "default_months")]
    pub months_per_run: u32,
    #[serde(default = "default_ruin_threshold")]
    pub ruin_threshold_percent: f64,
    /// Base seed; a `--seed` flag overrides it.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_count() -> u32 {
    1_000
}
fn default_initial_balance() -> i64 {
    10_000_00
}
fn default_months() -> u32 {
    12
}
fn default_ruin_threshold() -> f64 {
    50.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            initial_balance_cents: default_initial_balance(),
            months_per_run: default_months(),
            ruin_threshold_percent: default_ruin_threshold(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Runs whose events are logged through `LogObserver`.
    #[serde(default = "default_log_runs")]
    pub log_runs: usize,
    /// Keep the sample run's day-by-day detail in JSON output.
    #[serde(default = "default_true")]
    pub sample_days: bool,
}

fn default_log_runs() -> usize {
    1
}
fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_runs: default_log_runs(),
            sample_days: default_true(),
        }
    }
}

impl Config {
    /// Load and validate a request file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the request this file describes.
    pub fn validate(&self) -> Result<()> {
        self.request().validate()?;
        Ok(())
    }

    /// The engine request described by this file.
    pub fn request(&self) -> SimulationRequest {
        SimulationRequest {
            profile: self.profile.clone(),
            simulation_count: self.simulation.count,
            initial_balance_cents: self.simulation.initial_balance_cents,
            months_per_run: self.simulation.months_per_run,
            ruin_threshold_percent: self.simulation.ruin_threshold_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradesim::{GainMode, LossRuleAction, RecoveryStep, SizingMode, TierAction};

    fn example_toml() -> &'static str {
        r#"
[simulation]
count = 500
initial_balance_cents = 2500000
months_per_run = 6
ruin_threshold_percent = 30.0
seed = 42

[profile]
base_risk_cents = 15000
daily_loss_limit_cents = 45000
monthly_loss_limit_cents = 300000
commission_cents = 250

[profile.edge]
win_rate = 55.0
reward_risk_ratio = 1.8
breakeven_rate = 5.0

[profile.recovery]
steps = [{ multiplier = 0.5 }, { amount = 5000 }]

[profile.gain_mode]
mode = "compounding"
reinvest_percent = 50.0
stop_on_first_loss = true

[profile.sizing]
mode = "percent_of_balance"
risk_percent = 1.0

[[profile.drawdown.tiers]]
trigger_percent = 10.0
action = "reduce_risk"
percent = 50.0

[[profile.drawdown.tiers]]
trigger_percent = 25.0
action = "pause"

[[profile.loss_rules]]
trigger_days = 3
action = "stop_day"

[output]
log_runs = 0
"#
    }

    #[test]
    fn parse_example_request() {
        let config = Config::from_toml(example_toml()).unwrap();
        assert_eq!(config.simulation.count, 500);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.profile.base_risk_cents, 150_00);
        assert_eq!(config.profile.edge.win_rate, 55.0);
        assert_eq!(
            config.profile.recovery.steps,
            vec![RecoveryStep::Multiplier(0.5), RecoveryStep::Amount(50_00)]
        );
        assert_eq!(
            config.profile.gain_mode,
            GainMode::Compounding {
                reinvest_percent: 50.0,
                stop_on_first_loss: true
            }
        );
        assert_eq!(
            config.profile.sizing,
            SizingMode::PercentOfBalance { risk_percent: 1.0 }
        );
        assert_eq!(config.profile.drawdown.tiers[1].action, TierAction::Pause);
        assert_eq!(config.profile.loss_rules[0].action, LossRuleAction::StopDay);
        assert_eq!(config.output.log_runs, 0);
        assert!(config.output.sample_days);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        let req = config.request();
        assert_eq!(req, SimulationRequest::default());
    }

    #[test]
    fn partial_edge_table_keeps_defaults() {
        let config = Config::from_toml("[profile.edge]\nwin_rate = 60.0\n").unwrap();
        assert_eq!(config.profile.edge.win_rate, 60.0);
        assert_eq!(config.profile.edge.reward_risk_ratio, 2.0);
    }

    #[test]
    fn validation_rejects_bad_percent() {
        let err = Config::from_toml("[profile.edge]\nwin_rate = 140.0\n").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn oversized_request_rejected() {
        let err = Config::from_toml("[simulation]\ncount = 1000000\n").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = Config::from_toml("[simulation\ncount = 1").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
