//! File-based tests: request and history loading through real files.

use std::io::Write;

use tempfile::NamedTempFile;
use tradesim_cli::commands::{self, RunOptions};
use tradesim_cli::config::Config;
use tradesim_cli::error::Error;
use tradesim_cli::history;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f
}

// ============================================================================
// Request files
// ============================================================================

#[test]
fn example_request_file_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("request.example.toml");
    let config = Config::load(&path).unwrap();
    assert_eq!(config.simulation.count, 2000);
    assert_eq!(config.profile.drawdown.tiers.len(), 2);
    assert_eq!(config.profile.loss_rules.len(), 2);
}

#[test]
fn missing_request_file() {
    let err = Config::load(std::path::Path::new("/nonexistent/request.toml")).unwrap_err();
    assert!(matches!(err, Error::ConfigRead { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn invalid_request_file_exits_two() {
    let f = write_temp("[profile]\nbase_risk_cents = 0\n");
    let err = Config::load(f.path()).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn run_from_file() {
    let f = write_temp(
        "[simulation]\ncount = 12\nmonths_per_run = 1\nseed = 3\n[output]\nlog_runs = 0\n",
    );
    let config = Config::load(f.path()).unwrap();
    let result = commands::run(&config, &RunOptions::default()).unwrap();
    assert_eq!(result.statistics.run_count, 12);
    assert_eq!(result.sample_run.unwrap().days.len(), 22);
}

// ============================================================================
// History files
// ============================================================================

#[test]
fn history_file_drives_backtest() {
    let f = write_temp("[simulation]\ncount = 10\nmonths_per_run = 1\n[output]\nlog_runs = 0\n");
    let h = write_temp("[200, 200, 200, 200, 200, -100, -100, -100, -100, -100, 0]");
    let config = Config::load(f.path()).unwrap();
    let hist = history::load(h.path()).unwrap();
    assert_eq!(hist.total(), 11);

    let report = commands::backtest(&config, &hist, &RunOptions::default()).unwrap();
    assert!((report.derived_edge.win_rate - 50.0).abs() < 1e-9);
    assert!((report.derived_edge.reward_risk_ratio - 2.0).abs() < 1e-9);
    assert_eq!(report.result.statistics.run_count, 10);
}

#[test]
fn malformed_history_file() {
    let h = write_temp("not json");
    let err = history::load(h.path()).unwrap_err();
    assert!(matches!(err, Error::HistoryParse { .. }));
}
