//! Output of a full simulation call.

use crate::request::SimulationRequest;
use crate::run::SimulationRun;
use crate::stats::{Histogram, SimulationStatistics, sample_run_index};

/// Statistics, histogram and one representative run.
///
/// Per-trade detail is kept only for the sample run; the statistics are
/// computed over every run before the rest is dropped.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationResult {
    pub request: SimulationRequest,
    pub statistics: SimulationStatistics,
    pub histogram: Histogram,
    /// Lower-median run by total P&L.
    pub sample_run: Option<SimulationRun>,
}

impl SimulationResult {
    /// Reduce a batch of finished runs.
    pub fn from_runs(request: SimulationRequest, mut runs: Vec<SimulationRun>) -> Self {
        let statistics = SimulationStatistics::from_runs(&runs);
        let histogram = Histogram::from_runs(&runs);
        let sample_run = sample_run_index(&runs).map(|i| runs.swap_remove(i));
        Self {
            request,
            statistics,
            histogram,
            sample_run,
        }
    }

    pub fn run_count(&self) -> usize {
        self.statistics.run_count
    }
}
