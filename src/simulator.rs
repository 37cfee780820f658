//! Simulation front door.
//!
//! [`simulate`] is the plain entry point: thread-local randomness, no
//! observer, no validation. [`Simulator`] adds validation, reproducible
//! seeding, an observer, cooperative cancellation and (with the `parallel`
//! feature) a rayon fan-out across runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::SimulationError;
use crate::observer::{NoopObserver, SimulationObserver};
use crate::request::SimulationRequest;
use crate::result::SimulationResult;
use crate::rng::UniformSource;
use crate::run::{SimulationRun, simulate_run};
use crate::types::Money;

/// Run `request` single-threaded with the thread-local RNG.
///
/// The request is assumed valid; see [`SimulationRequest::validate`].
pub fn simulate(request: &SimulationRequest) -> SimulationResult {
    let mut rng = rand::thread_rng();
    simulate_with(request, &mut rng, &mut NoopObserver)
}

/// Run `request` drawing every run from one shared source.
pub fn simulate_with(
    request: &SimulationRequest,
    src: &mut dyn UniformSource,
    observer: &mut dyn SimulationObserver,
) -> SimulationResult {
    let runs = (0..request.simulation_count as usize)
        .map(|i| simulate_run(request, i, src, observer))
        .collect();
    SimulationResult::from_runs(request.clone(), runs)
}

/// Configurable simulation runner.
///
/// ```
/// use tradesim::{SimulationRequest, Simulator};
///
/// let request = SimulationRequest {
///     simulation_count: 50,
///     months_per_run: 1,
///     ..SimulationRequest::default()
/// };
/// let a = Simulator::new().seed(7).run(&request).unwrap();
/// let b = Simulator::new().seed(7).run(&request).unwrap();
/// assert_eq!(a.statistics, b.statistics);
/// ```
pub struct Simulator<'a> {
    seed: Option<u64>,
    observer: Box<dyn SimulationObserver + 'a>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for Simulator<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Simulator<'a> {
    pub fn new() -> Self {
        Self {
            seed: None,
            observer: Box::new(NoopObserver),
            cancel: None,
        }
    }

    /// Fix the base seed. Run `i` draws from `ChaCha8Rng` seeded with
    /// `seed + i`, so results do not depend on thread scheduling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn observer(mut self, observer: impl SimulationObserver + 'a) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Flag checked between runs; raising it aborts with
    /// [`SimulationError::Cancelled`].
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn base_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::thread_rng().r#gen())
    }

    /// Validate and run every run on the calling thread.
    pub fn run(&mut self, request: &SimulationRequest) -> Result<SimulationResult, SimulationError> {
        request.validate()?;
        let base = self.base_seed();
        let count = request.simulation_count as usize;

        let mut runs = Vec::with_capacity(count);
        for i in 0..count {
            if is_cancelled(self.cancel.as_deref()) {
                return Err(SimulationError::Cancelled { completed_runs: i });
            }
            let mut rng = run_rng(base, i);
            runs.push(simulate_run(request, i, &mut rng, &mut *self.observer));
        }

        Ok(self.finish(request, runs))
    }

    /// Validate and fan runs out over the rayon pool.
    ///
    /// Produces the same result as [`Simulator::run`] for the same seed. The
    /// observer only receives `on_run`, in run order, once all runs finish.
    #[cfg(feature = "parallel")]
    pub fn run_parallel(
        &mut self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, SimulationError> {
        use rayon::prelude::*;

        request.validate()?;
        let base = self.base_seed();
        let cancel = self.cancel.clone();

        let runs: Vec<Option<SimulationRun>> = (0..request.simulation_count as usize)
            .into_par_iter()
            .map(|i| {
                if is_cancelled(cancel.as_deref()) {
                    return None;
                }
                let mut rng = run_rng(base, i);
                Some(simulate_run(request, i, &mut rng, &mut NoopObserver))
            })
            .collect();

        let completed = runs.iter().filter(|r| r.is_some()).count();
        if completed < runs.len() {
            return Err(SimulationError::Cancelled {
                completed_runs: completed,
            });
        }

        let runs: Vec<SimulationRun> = runs.into_iter().flatten().collect();
        for (i, run) in runs.iter().enumerate() {
            self.observer.on_run(i, run);
        }
        Ok(self.finish(request, runs))
    }

    fn finish(&self, request: &SimulationRequest, runs: Vec<SimulationRun>) -> SimulationResult {
        let result = SimulationResult::from_runs(request.clone(), runs);
        let s = &result.statistics;
        log::debug!(
            "{} runs: median P&L {}, ruin {:.2}%, median max drawdown {:.2}%, sharpe {:.3}",
            s.run_count,
            Money(s.median_pnl_cents.round() as i64),
            s.risk_of_ruin_percent,
            s.median_max_drawdown_percent,
            s.sharpe_ratio,
        );
        result
    }
}

#[inline]
fn is_cancelled(flag: Option<&AtomicBool>) -> bool {
    flag.is_some_and(|f| f.load(Ordering::Relaxed))
}

fn run_rng(base: u64, run: usize) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(base.wrapping_add(run as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::observer::CountingObserver;

    fn small_request() -> SimulationRequest {
        SimulationRequest {
            simulation_count: 20,
            months_per_run: 2,
            ..SimulationRequest::default()
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let req = small_request();
        let a = Simulator::new().seed(42).run(&req).unwrap();
        let b = Simulator::new().seed(42).run(&req).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let req = small_request();
        let a = Simulator::new().seed(1).run(&req).unwrap();
        let b = Simulator::new().seed(2).run(&req).unwrap();
        assert_ne!(a.sample_run, b.sample_run);
    }

    #[test]
    fn invalid_request_rejected() {
        let mut req = small_request();
        req.profile.edge.win_rate = 150.0;
        let err = Simulator::new().run(&req).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Validation(ValidationError::PercentOutOfRange { field: "win_rate", .. })
        ));
    }

    #[test]
    fn raised_flag_cancels() {
        let flag = Arc::new(AtomicBool::new(true));
        let err = Simulator::new()
            .cancel_flag(flag)
            .run(&small_request())
            .unwrap_err();
        assert_eq!(err, SimulationError::Cancelled { completed_runs: 0 });
    }

    #[test]
    fn observer_sees_every_run() {
        let mut counter = CountingObserver::default();
        let req = small_request();
        Simulator::new().seed(3).observer(&mut counter).run(&req).unwrap();
        assert_eq!(counter.runs, 20);
        assert_eq!(counter.months, 40);
    }

    #[test]
    fn simulate_returns_every_run() {
        let result = simulate(&small_request());
        assert_eq!(result.run_count(), 20);
        assert_eq!(result.histogram.total(), 20);
        assert!(result.sample_run.is_some());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential() {
        let req = small_request();
        let seq = Simulator::new().seed(9).run(&req).unwrap();
        let par = Simulator::new().seed(9).run_parallel(&req).unwrap();
        assert_eq!(seq, par);
    }
}
