//! Historical trade file (history.json) loading.
//!
//! Accepts either a bare array of P&L values in cents or an object with a
//! breakeven band:
//!
//! ```json
//! { "breakeven_band_cents": 100, "pnls": [12000, -5000, 0, 8000] }
//! ```

use std::path::Path;

use serde::Deserialize;
use tradesim::{Cents, TradeHistory};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum HistoryFile {
    Plain(Vec<Cents>),
    Banded {
        pnls: Vec<Cents>,
        #[serde(default)]
        breakeven_band_cents: Cents,
    },
}

impl HistoryFile {
    fn into_history(self) -> TradeHistory {
        match self {
            HistoryFile::Plain(pnls) => TradeHistory::from_pnls(&pnls, 0),
            HistoryFile::Banded {
                pnls,
                breakeven_band_cents,
            } => TradeHistory::from_pnls(&pnls, breakeven_band_cents),
        }
    }
}

/// Load a trade history file.
pub fn load(path: &Path) -> Result<TradeHistory> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::HistoryRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file: HistoryFile = serde_json::from_str(&contents).map_err(|e| Error::HistoryParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(file.into_history())
}

/// Parse from a JSON string (useful for testing).
pub fn from_json(json: &str) -> Result<TradeHistory> {
    let file: HistoryFile = serde_json::from_str(json)?;
    Ok(file.into_history())
}
