//! Subcommand implementations, independent of argument parsing.

use tradesim::{LogObserver, SimulationResult, Simulator, TradeHistory};

use crate::config::Config;
use crate::error::Result;
use crate::report::{BacktestReport, trim_sample};

/// Options shared by `run` and `backtest`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides the request file's seed.
    pub seed: Option<u64>,
    /// Fan runs out over all cores.
    pub parallel: bool,
}

/// Run the simulation described by `config`.
pub fn run(config: &Config, opts: &RunOptions) -> Result<SimulationResult> {
    let request = config.request();
    let mut sim = Simulator::new().observer(LogObserver::new(config.output.log_runs));
    if let Some(seed) = opts.seed.or(config.simulation.seed) {
        sim = sim.seed(seed);
    }

    log::info!(
        "simulating {} runs x {} months",
        request.simulation_count,
        request.months_per_run
    );
    let result = if opts.parallel {
        run_parallel(&mut sim, &request)?
    } else {
        sim.run(&request)?
    };
    Ok(trim_sample(result, config.output.sample_days))
}

#[cfg(feature = "parallel")]
fn run_parallel(
    sim: &mut Simulator<'_>,
    request: &tradesim::SimulationRequest,
) -> Result<SimulationResult> {
    Ok(sim.run_parallel(request)?)
}

#[cfg(not(feature = "parallel"))]
fn run_parallel(
    sim: &mut Simulator<'_>,
    request: &tradesim::SimulationRequest,
) -> Result<SimulationResult> {
    log::warn!("built without the `parallel` feature; running on one thread");
    Ok(sim.run(request)?)
}

/// Replace the profile's edge with the one implied by `history`, then run.
pub fn backtest(config: &Config, history: &TradeHistory, opts: &RunOptions) -> Result<BacktestReport> {
    let profile = history.apply_to(&config.profile)?;
    log::info!(
        "history: {} trades, win rate {:.2}%, breakeven {:.2}%, reward:risk {:.2}",
        history.total(),
        profile.edge.win_rate,
        profile.edge.breakeven_rate,
        profile.edge.reward_risk_ratio
    );

    let derived = Config {
        profile,
        ..config.clone()
    };
    derived.validate()?;
    let result = run(&derived, opts)?;
    Ok(BacktestReport {
        history: *history,
        derived_edge: derived.profile.edge,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn config() -> Config {
        Config::from_toml(
            r#"
[simulation]
count = 25
months_per_run = 1

[output]
log_runs = 0
sample_days = false
"#,
        )
        .unwrap()
    }

    #[test]
    fn seed_flag_is_reproducible() {
        let opts = RunOptions {
            seed: Some(11),
            parallel: false,
        };
        let a = run(&config(), &opts).unwrap();
        let b = run(&config(), &opts).unwrap();
        assert_eq!(a, b);
        assert!(a.sample_run.unwrap().days.is_empty());
    }

    #[test]
    fn parallel_flag_matches_sequential() {
        let seq = run(
            &config(),
            &RunOptions {
                seed: Some(4),
                parallel: false,
            },
        )
        .unwrap();
        let par = run(
            &config(),
            &RunOptions {
                seed: Some(4),
                parallel: true,
            },
        )
        .unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn backtest_uses_history_edge() {
        let mut pnls = vec![300; 6];
        pnls.extend([-100; 4]);
        let history = TradeHistory::from_pnls(&pnls, 0);
        let report = backtest(&config(), &history, &RunOptions::default()).unwrap();
        assert!((report.derived_edge.win_rate - 60.0).abs() < 1e-9);
        assert!((report.derived_edge.reward_risk_ratio - 3.0).abs() < 1e-9);
        assert_eq!(report.result.request.profile.edge, report.derived_edge);
    }

    #[test]
    fn backtest_rejects_short_history() {
        let history = TradeHistory::from_pnls(&[100, -100], 0);
        let err = backtest(&config(), &history, &RunOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
