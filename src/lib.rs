#![doc(test(attr(deny(warnings))))]

//! Spend Forecast predicts monthly spending in a budget category from a sparse,
//! irregular history of dated transaction amounts.
//!
//! The pipeline aggregates transactions into month-end totals, chooses a model
//! configuration from the amount of data, fits an additive trend/seasonality
//! model and returns clamped, non-negative predictions for the coming months.
//!
//! ```
//! use chrono::NaiveDate;
//! use spend_forecast::{core::Forecaster, domain::HistoryPoint};
//!
//! let history = vec![
//!     HistoryPoint::new(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(), 100.0),
//!     HistoryPoint::new(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(), 200.0),
//! ];
//! let today = NaiveDate::from_ymd_opt(2023, 3, 10).unwrap();
//! let response = Forecaster::default().forecast(&history, 2, today).unwrap();
//! assert_eq!(response.dates.len(), 2);
//! assert!(response.predictions.iter().all(|p| *p >= 0.0));
//! ```

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod time;
pub mod utils;

pub use crate::core::{ForecastService, Forecaster};
pub use crate::domain::{ForecastRequest, ForecastResponse, HistoryPoint};
pub use crate::errors::ForecastError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Spend Forecast tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
