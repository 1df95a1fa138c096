use thiserror::Error;

/// Errors raised by the blowdown model and its IO layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Invalid time grid: {0}")]
    InvalidTimeGrid(String),

    #[error("Series length mismatch: expected {expected} samples, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Sample {index} at t={time} s is outside the valid blowdown domain")]
    OutOfDomain { index: usize, time: f64 },

    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("Error parsing run file")]
    Config(#[from] toml::de::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fails with [`Error::InvalidParameter`] unless `value` is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be finite and > 0",
        })
    }
}
