//! Text and JSON rendering of simulation results.

use std::fmt;

use serde::Serialize;
use tradesim::{Money, SimulationResult, TradeEdge, TradeHistory};

/// Backtest output: the history, the edge derived from it, and the result.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub history: TradeHistory,
    pub derived_edge: TradeEdge,
    pub result: SimulationResult,
}

/// Drop the sample run's day-by-day detail when it is not wanted.
pub fn trim_sample(mut result: SimulationResult, keep_days: bool) -> SimulationResult {
    if !keep_days {
        if let Some(run) = result.sample_run.as_mut() {
            run.days.clear();
        }
    }
    result
}

fn money(cents: f64) -> Money {
    Money(cents.round() as i64)
}

/// Human-readable summary of a [`SimulationResult`].
pub struct TextReport<'a>(pub &'a SimulationResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        let s = &r.statistics;
        let req = &r.request;

        writeln!(f, "Simulation Summary")?;
        writeln!(
            f,
            "  Runs:            {:>10} x {} months, start {}",
            s.run_count,
            req.months_per_run,
            Money(req.initial_balance_cents)
        )?;
        writeln!(f, "  Median P&L:      {:>10}", money(s.median_pnl_cents))?;
        writeln!(f, "  Mean P&L:        {:>10}", money(s.mean_pnl_cents))?;
        writeln!(f, "  Best (p95):      {:>10}", Money(s.best_case_pnl_cents))?;
        writeln!(f, "  Worst (p5):      {:>10}", Money(s.worst_case_pnl_cents))?;
        writeln!(f, "  Median return:   {:>9.2}%", s.median_return_percent)?;
        writeln!(f, "  Positive runs:   {:>9.2}%", s.positive_run_percent)?;
        writeln!(f, "  Risk of ruin:    {:>9.2}%", s.risk_of_ruin_percent)?;
        writeln!(f, "  Monthly limit:   {:>9.2}%", s.monthly_limit_hit_percent)?;
        writeln!(f, "  Max DD (median): {:>9.2}%", s.median_max_drawdown_percent)?;
        writeln!(f, "  Max DD (p95):    {:>9.2}%", s.p95_max_drawdown_percent)?;
        writeln!(f, "  Min balance:     {:>9.2}%", s.median_min_balance_percent)?;
        writeln!(f, "  Sharpe:          {:>10.3}", s.sharpe_ratio)?;
        writeln!(f, "  Sortino:         {:>10.3}", s.sortino_ratio)?;
        writeln!(f, "  Win rate:        {:>9.2}%", s.observed_win_rate)?;
        writeln!(f, "  Expectancy:      {:>10}", money(s.expectancy_cents))?;
        writeln!(f, "  Profit factor:   {:>10.2}", s.profit_factor)?;
        writeln!(f, "  Daily P&L:       {:>10}", money(s.expected_daily_pnl_cents))?;

        let a = &s.averages;
        writeln!(f, "Per-run averages")?;
        writeln!(f, "  Trades:          {:>10.1}", a.trades)?;
        writeln!(f, "  Trading days:    {:>10.1}", a.trading_days)?;
        writeln!(
            f,
            "  Recovery/gain:   {:>10.1} / {:.1}",
            a.recovery_days, a.compounding_days
        )?;
        writeln!(f, "  Skipped days:    {:>10.1}", a.skipped_days)?;

        if let Some(run) = &r.sample_run {
            writeln!(f, "Sample run (median)")?;
            writeln!(
                f,
                "  Final balance:   {:>10}  (P&L {}, max DD {:.2}%)",
                Money(run.final_balance),
                Money(run.total_pnl_cents),
                run.max_drawdown_percent
            )?;
            for m in &run.months {
                writeln!(
                    f,
                    "  Month {:>3}:       {:>10}  {:>7.2}%{}",
                    m.month + 1,
                    Money(m.pnl_cents),
                    m.return_percent,
                    if m.monthly_limit_hit { "  (monthly limit)" } else { "" }
                )?;
            }
        }

        let peak = r.histogram.buckets.iter().map(|b| b.count).max().unwrap_or(0);
        if peak > 0 {
            writeln!(f, "P&L distribution")?;
            for b in &r.histogram.buckets {
                let bar = "#".repeat(b.count * 40 / peak);
                writeln!(f, "  {:>12} {:>6} {bar}", money(b.lower_cents), b.count)?;
            }
        }
        Ok(())
    }
}
