//! Statistics over a batch of simulated runs.
//!
//! Everything here is a pure reduction over `&[SimulationRun]`. Divisions
//! that could be by zero resolve to 0 (or to [`PROFIT_FACTOR_CAP`]) so no NaN
//! or infinity reaches the output.

use crate::month::Tally;
use crate::run::SimulationRun;
use crate::types::Cents;

/// Number of equal-width histogram buckets.
pub const HISTOGRAM_BUCKETS: usize = 20;

/// Profit factor reported when there are winning trades but no losing ones.
pub const PROFIT_FACTOR_CAP: f64 = 999.0;

// ---------------------------------------------------------------------------
// Order statistics
// ---------------------------------------------------------------------------

/// Nearest-rank percentile of an ascending slice: `sorted[min(n-1, ⌊n·p⌋)]`.
///
/// `p` is a fraction in `[0, 1]`. Returns `None` for an empty slice.
pub fn percentile<T: Copy>(sorted: &[T], p: f64) -> Option<T> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    let idx = ((n as f64 * p).floor().max(0.0) as usize).min(n - 1);
    Some(sorted[idx])
}

/// Median of an ascending slice; averages the two middle values on even
/// lengths. Zero for an empty slice.
pub fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values
}

/// `mean / sample stdev`, or 0 when the deviation is zero or undefined.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    let n = returns.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(returns);
    let variance = returns.iter().map(|r| (r - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    let sd = variance.sqrt();
    if sd > 0.0 { m / sd } else { 0.0 }
}

/// `mean / downside deviation` against a zero target.
///
/// The downside deviation is the RMS of the negative returns alone,
/// `sqrt(Σ r² / k)` over the `k` returns below zero. Zero when none is.
pub fn sortino_ratio(returns: &[f64]) -> f64 {
    let (sum_sq, k) = returns
        .iter()
        .filter(|&&r| r < 0.0)
        .fold((0.0, 0usize), |(sum, k), r| (sum + r * r, k + 1));
    if k == 0 {
        return 0.0;
    }
    let dd = (sum_sq / k as f64).sqrt();
    if dd > 0.0 { mean(returns) / dd } else { 0.0 }
}

/// Gross profit over gross loss, guarded.
pub fn profit_factor(gross_profit: Cents, gross_loss: Cents, trades: u64) -> f64 {
    if trades == 0 || gross_profit <= 0 {
        0.0
    } else if gross_loss <= 0 {
        PROFIT_FACTOR_CAP
    } else {
        (gross_profit as f64 / gross_loss as f64).min(PROFIT_FACTOR_CAP)
    }
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Mean per-run counters.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterMeans {
    pub trades: f64,
    pub trading_days: f64,
    pub recovery_days: f64,
    pub compounding_days: f64,
    pub target_hit_days: f64,
    pub skipped_days: f64,
    pub skipped_weekly_limit: f64,
    pub skipped_monthly_limit: f64,
    pub skipped_week_paused: f64,
    pub skipped_drawdown_pause: f64,
    pub skipped_loss_streak: f64,
    pub weekly_limit_hits: f64,
    pub monthly_limit_hits: f64,
    pub max_consecutive_losing_days: f64,
}

/// Distributional summary of a batch of runs.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationStatistics {
    pub run_count: usize,
    pub median_pnl_cents: f64,
    pub mean_pnl_cents: f64,
    pub median_return_percent: f64,
    pub mean_return_percent: f64,
    /// 95th percentile total P&L.
    pub best_case_pnl_cents: Cents,
    /// 5th percentile total P&L.
    pub worst_case_pnl_cents: Cents,
    pub positive_run_percent: f64,
    /// Runs in which at least one month hit its monthly loss limit.
    pub monthly_limit_hit_percent: f64,
    pub averages: CounterMeans,
    pub median_max_drawdown_percent: f64,
    pub p95_max_drawdown_percent: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    /// Total P&L over total trading days, across all runs.
    pub expected_daily_pnl_cents: f64,
    pub risk_of_ruin_percent: f64,
    /// Median of `min_balance / initial_balance × 100`.
    pub median_min_balance_percent: f64,
    /// Wins over all trades, in percent.
    pub observed_win_rate: f64,
    /// Mean net P&L per trade.
    pub expectancy_cents: f64,
    pub profit_factor: f64,
}

impl SimulationStatistics {
    /// Reduce a batch of runs. An empty batch yields all-zero statistics.
    pub fn from_runs(runs: &[SimulationRun]) -> Self {
        if runs.is_empty() {
            return Self::default();
        }
        let n = runs.len() as f64;
        let share = |count: usize| count as f64 / n * 100.0;

        let mut pnls: Vec<Cents> = runs.iter().map(|r| r.total_pnl_cents).collect();
        pnls.sort_unstable();
        let pnl_f: Vec<f64> = pnls.iter().map(|&p| p as f64).collect();

        let returns: Vec<f64> = runs.iter().map(SimulationRun::return_percent).collect();
        let drawdowns = sorted(runs.iter().map(|r| r.max_drawdown_percent).collect());
        let min_balances = sorted(runs.iter().map(SimulationRun::min_balance_percent).collect());

        let mut total = Tally::default();
        for r in runs {
            total.merge(&r.tally);
        }
        let total_pnl: f64 = pnl_f.iter().sum();
        let trades = total.trades;

        Self {
            run_count: runs.len(),
            median_pnl_cents: median(&pnl_f),
            mean_pnl_cents: mean(&pnl_f),
            median_return_percent: median(&sorted(returns.clone())),
            mean_return_percent: mean(&returns),
            best_case_pnl_cents: percentile(&pnls, 0.95).unwrap_or(0),
            worst_case_pnl_cents: percentile(&pnls, 0.05).unwrap_or(0),
            positive_run_percent: share(runs.iter().filter(|r| r.total_pnl_cents > 0).count()),
            monthly_limit_hit_percent: share(runs.iter().filter(|r| r.hit_monthly_limit()).count()),
            averages: counter_means(runs),
            median_max_drawdown_percent: median(&drawdowns),
            p95_max_drawdown_percent: percentile(&drawdowns, 0.95).unwrap_or(0.0),
            sharpe_ratio: sharpe_ratio(&returns),
            sortino_ratio: sortino_ratio(&returns),
            expected_daily_pnl_cents: if total.trading_days > 0 {
                total_pnl / total.trading_days as f64
            } else {
                0.0
            },
            risk_of_ruin_percent: share(runs.iter().filter(|r| r.reached_ruin).count()),
            median_min_balance_percent: median(&min_balances),
            observed_win_rate: if trades > 0 {
                total.wins as f64 / trades as f64 * 100.0
            } else {
                0.0
            },
            expectancy_cents: if trades > 0 {
                (total.gross_profit_cents - total.gross_loss_cents) as f64 / trades as f64
            } else {
                0.0
            },
            profit_factor: profit_factor(total.gross_profit_cents, total.gross_loss_cents, trades),
        }
    }
}

fn avg(runs: &[SimulationRun], f: impl Fn(&SimulationRun) -> f64) -> f64 {
    runs.iter().map(f).sum::<f64>() / runs.len().max(1) as f64
}

fn counter_means(runs: &[SimulationRun]) -> CounterMeans {
    CounterMeans {
        trades: avg(runs, |r| r.tally.trades as f64),
        trading_days: avg(runs, |r| r.tally.trading_days as f64),
        recovery_days: avg(runs, |r| r.tally.recovery_days as f64),
        compounding_days: avg(runs, |r| r.tally.compounding_days as f64),
        target_hit_days: avg(runs, |r| r.tally.target_hit_days as f64),
        skipped_days: avg(runs, |r| r.tally.skipped_days() as f64),
        skipped_weekly_limit: avg(runs, |r| r.tally.skipped_weekly_limit as f64),
        skipped_monthly_limit: avg(runs, |r| r.tally.skipped_monthly_limit as f64),
        skipped_week_paused: avg(runs, |r| r.tally.skipped_week_paused as f64),
        skipped_drawdown_pause: avg(runs, |r| r.tally.skipped_drawdown_pause as f64),
        skipped_loss_streak: avg(runs, |r| r.tally.skipped_loss_streak as f64),
        weekly_limit_hits: avg(runs, |r| r.tally.weekly_limit_hits as f64),
        monthly_limit_hits: avg(runs, |r| r.tally.monthly_limit_hits as f64),
        max_consecutive_losing_days: avg(runs, |r| r.max_consecutive_losing_days as f64),
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// One histogram bucket: `[lower, upper)`, the last one closed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramBucket {
    pub lower_cents: f64,
    pub upper_cents: f64,
    pub count: usize,
}

/// Distribution of total P&L across runs.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Histogram {
    pub buckets: Vec<HistogramBucket>,
}

impl Histogram {
    /// [`HISTOGRAM_BUCKETS`] equal-width buckets over the observed range.
    ///
    /// A degenerate range (all values equal) uses width 1.
    pub fn from_values(values: &[Cents]) -> Self {
        let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
            return Self::default();
        };
        let span = (max - min) as f64;
        let width = if span > 0.0 {
            span / HISTOGRAM_BUCKETS as f64
        } else {
            1.0
        };

        let mut buckets: Vec<HistogramBucket> = (0..HISTOGRAM_BUCKETS)
            .map(|i| HistogramBucket {
                lower_cents: min as f64 + i as f64 * width,
                upper_cents: min as f64 + (i + 1) as f64 * width,
                count: 0,
            })
            .collect();

        for &v in values {
            let idx = (((v - min) as f64 / width).floor() as usize).min(HISTOGRAM_BUCKETS - 1);
            buckets[idx].count += 1;
        }
        Self { buckets }
    }

    pub fn from_runs(runs: &[SimulationRun]) -> Self {
        let pnls: Vec<Cents> = runs.iter().map(|r| r.total_pnl_cents).collect();
        Self::from_values(&pnls)
    }

    /// Total count over all buckets.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// Index of the representative run: the lower median by total P&L.
///
/// Ties keep their original order.
pub fn sample_run_index(runs: &[SimulationRun]) -> Option<usize> {
    if runs.is_empty() {
        return None;
    }
    let mut order: Vec<usize> = (0..runs.len()).collect();
    order.sort_by_key(|&i| runs[i].total_pnl_cents);
    Some(order[(runs.len() - 1) / 2])
}
