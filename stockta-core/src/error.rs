//! Error types for the indicator engine and its importers.
//!
//! Undefined numeric points (RSI 0/0 and friends) are never errors: they are
//! encoded as absent values in a `DerivedSeries`. Everything here aborts the
//! call that raised it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or non-monotonic input series.
    #[error("validation error: {0}")]
    Validation(String),

    /// A window or smoothing parameter outside its legal range.
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },

    #[error("config error: {0}")]
    Config(String),

    /// The data provider answered, but with an error payload instead of bars.
    #[error("provider error: {0}")]
    Provider(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for the period check shared by every windowed primitive.
    pub(crate) fn zero_period(name: &'static str) -> Self {
        Error::InvalidParameter {
            name,
            value: 0,
            reason: "period must be >= 1",
        }
    }
}
