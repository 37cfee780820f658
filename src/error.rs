//! Validation and simulation errors.
//!
//! The engine itself is total over validated input; these errors are raised
//! by [`SimulationRequest::validate`](crate::SimulationRequest::validate) and
//! by the [`Simulator`](crate::Simulator) front door.

/// A request field outside its allowed range.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ValidationError {
    /// A percentage outside `[0, 100]` (or non-finite).
    #[error("{field} must be a percentage in [0, 100], got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },

    /// A ratio or multiplier that must be finite and non-negative.
    #[error("{field} must be finite and >= 0, got {value}")]
    InvalidRatio { field: &'static str, value: f64 },

    /// A money amount that must be strictly positive.
    #[error("{field} must be greater than zero, got {value}")]
    NonPositiveAmount { field: &'static str, value: i64 },

    /// A money amount that must not be negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: i64 },

    /// A count outside `[min, max]`.
    #[error("{field} must be in [{min}, {max}], got {value}")]
    CountOutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// Not enough historical trades to derive an edge.
    #[error("need at least {required} historical trades, got {found}")]
    InsufficientHistory { required: usize, found: usize },

    /// Historical trades contain no losses, so reward:risk is undefined.
    #[error("historical trades contain no losing trades")]
    NoLosingTrades,
}

/// Errors returned by [`Simulator::run`](crate::Simulator::run).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The cancel flag was raised between runs.
    #[error("simulation cancelled after {completed_runs} runs")]
    Cancelled { completed_runs: usize },
}
