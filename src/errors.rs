use std::io;

use chrono::NaiveDate;
use thiserror::Error;

/// Rejections raised while validating an inbound forecast request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("history[{index}]: invalid date `{value}`, expected YYYY-MM-DD")]
    InvalidDate { index: usize, value: String },
    #[error("history[{index}]: amount must be a finite number")]
    InvalidAmount { index: usize },
    #[error("months_ahead must be a positive integer, got {0}")]
    NonPositiveHorizon(i64),
    /// Horizons above [`MAX_MONTHS_AHEAD`](crate::domain::request::MAX_MONTHS_AHEAD) are refused.
    #[error("months_ahead is too large: {0} (at most 1200)")]
    HorizonTooLarge(i64),
}

/// Rejections raised when a monthly series is assembled from caller-supplied totals.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("entry {index}: {date} is not the last day of its month")]
    NotMonthEnd { index: usize, date: NaiveDate },
    #[error("entry {index}: month ending {date} appears more than once")]
    DuplicateMonth { index: usize, date: NaiveDate },
    #[error("entry {index}: month ending {date} is earlier than the previous entry")]
    OutOfOrder { index: usize, date: NaiveDate },
    #[error("entry {index}: total must be a finite number")]
    NonFiniteTotal { index: usize },
}

/// Failures reported by a statistical backend while fitting or predicting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Insufficient data: need at least {required} monthly observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    #[error("Model fit failed: normal equations are singular")]
    Singular,
    #[error("Model produced a non-finite estimate")]
    NonFinite,
    #[error("Model returned {actual} predictions for a horizon of {expected}")]
    HorizonMismatch { expected: usize, actual: usize },
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level error returned by the forecast entry points.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("Malformed request: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Forecast computation failed: {0}")]
    Model(#[from] ModelError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ForecastError {
    /// True when the caller sent bad input and retrying the same request is pointless.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Malformed(_))
    }
}
