//! Uniform JSON response envelope: `{ ok, data | error, generated_at }`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};

/// Error body carried by a failed envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<tradesim::ValidationError>,
}

impl From<&Error> for ErrorBody {
    fn from(e: &Error) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
            details: match e {
                Error::Validation(v) => Some(v.clone()),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub generated_at: DateTime<Utc>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
            generated_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Envelope<()> {
    pub fn failure(error: &Error) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(ErrorBody::from(error)),
            generated_at: Utc::now(),
        }
    }
}
