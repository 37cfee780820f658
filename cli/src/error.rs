//! Error types for the CLI.

use std::path::PathBuf;

use tradesim::{SimulationError, ValidationError};

/// All errors that can occur while running the CLI.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read request file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse request file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to read trade history {path}: {source}")]
    HistoryRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse trade history {path}: {source}")]
    HistoryParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("simulation cancelled after {0} runs")]
    Cancelled(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SimulationError> for Error {
    fn from(e: SimulationError) -> Self {
        match e {
            SimulationError::Validation(v) => Error::Validation(v),
            SimulationError::Cancelled { completed_runs } => Error::Cancelled(completed_runs),
        }
    }
}

impl Error {
    /// Short machine-readable kind, used in the JSON envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ConfigRead { .. } | Error::ConfigParse(_) => "config",
            Error::Validation(_) => "validation",
            Error::HistoryRead { .. } | Error::HistoryParse { .. } => "history",
            Error::Cancelled(_) => "cancelled",
            Error::Json(_) | Error::Io(_) => "output",
        }
    }

    /// Process exit code: 2 for rejected input, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
