// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! # tradesim
//!
//! A day-aware Monte Carlo trading simulator.
//!
//! Given a statistical trade edge (win rate, reward:risk, breakeven rate) and
//! a risk-management policy, it simulates many independent multi-month
//! trading careers and aggregates distributional statistics.
//!
//! ## Features
//!
//! - **Intraday decision tree**: base trade, loss-recovery ladder, gain compounding
//! - **Cascading loss limits**: daily, weekly and monthly, in cents, % of initial or R-multiples
//! - **Dynamic sizing**: fixed, percent of balance, fixed-ratio, fractional Kelly
//! - **Circuit breakers**: drawdown tiers and consecutive-loss rules
//! - **Integer cents**: every balance and P&L is an `i64`
//!
//! ## Quick Start
//!
//! ```
//! use tradesim::{RiskProfile, SimulationRequest, Simulator, TradeEdge};
//!
//! let request = SimulationRequest {
//!     profile: RiskProfile {
//!         edge: TradeEdge { win_rate: 55.0, reward_risk_ratio: 1.5, breakeven_rate: 5.0 },
//!         base_risk_cents: 100_00,          // $100 per trade
//!         daily_loss_limit_cents: Some(300_00),
//!         ..RiskProfile::default()
//!     },
//!     simulation_count: 200,
//!     initial_balance_cents: 10_000_00,
//!     months_per_run: 3,
//!     ruin_threshold_percent: 50.0,
//! };
//!
//! let result = Simulator::new().seed(1).run(&request).unwrap();
//! assert_eq!(result.statistics.run_count, 200);
//! assert_eq!(result.histogram.total(), 200);
//! ```
//!
//! ## Deterministic draws
//!
//! The engine draws from any [`UniformSource`]. [`SequenceSource`] replays a
//! fixed list, which pins every trade:
//!
//! ```
//! use tradesim::{RiskProfile, SequenceSource, TradeEdge, simulate_day, resolve, AccountSnapshot};
//!
//! let profile = RiskProfile {
//!     edge: TradeEdge { win_rate: 50.0, reward_risk_ratio: 2.0, breakeven_rate: 0.0 },
//!     ..RiskProfile::default()
//! };
//! let risk = resolve(&profile, &AccountSnapshot::fresh(10_000_00));
//! let mut src = SequenceSource::constant(0.0); // always a win
//! let day = simulate_day(&profile, &risk, 1, 0, 10_000_00, &mut src);
//! assert_eq!(day.pnl_cents, 200_00);
//! ```

pub mod backtest;
mod day;
mod error;
mod month;
pub mod observer;
mod outcome;
pub mod policy;
mod profile;
mod request;
mod result;
mod rng;
mod run;
mod simulator;
mod state;
pub mod stats;
mod trade;
mod types;

// Re-export public API
pub use backtest::{MIN_HISTORY_TRADES, TradeHistory};
pub use day::{DayMode, MAX_COMPOUNDING_TRADES, SimulatedDay, SkipReason, simulate_day};
pub use error::{SimulationError, ValidationError};
pub use month::{MonthResult, MonthSummary, Tally, simulate_month};
pub use observer::{CountingObserver, LogObserver, NoopObserver, SimulationObserver};
pub use outcome::{Outcome, TradeOutcome, draw_outcome};
pub use policy::{AccountSnapshot, EffectiveRisk, resolve};
pub use profile::{
    Calendar, ConsecutiveLossRule, DrawdownPolicy, DrawdownTier, GainMode, LimitMode,
    LossRuleAction, RecoveryPlan, RecoveryStep, RiskProfile, SizingMode, TierAction, TradeEdge,
};
pub use request::{MAX_MONTHS_PER_RUN, MAX_SIMULATIONS, SimulationRequest, validate_profile};
pub use result::SimulationResult;
pub use rng::{SequenceSource, UniformSource};
pub use run::{SimulationRun, simulate_run};
pub use simulator::{Simulator, simulate, simulate_with};
pub use state::AccountState;
pub use stats::{Histogram, HistogramBucket, SimulationStatistics};
pub use trade::{SimulatedTrade, TradeMode};
pub use types::{Cents, Money, percent_of, round_cents};
