use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Future month-end dates paired positionally with non-negative spend predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub dates: Vec<NaiveDate>,
    pub predictions: Vec<f64>,
}

impl ForecastResponse {
    /// Pairs each date with its prediction, replacing negative estimates with zero.
    pub fn clamped(dates: Vec<NaiveDate>, raw: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), raw.len());
        let predictions = raw
            .into_iter()
            .map(|value| if value > 0.0 { value } else { 0.0 })
            .collect();
        Self { dates, predictions }
    }

    /// Zero prediction for every date.
    pub fn zeros(dates: Vec<NaiveDate>) -> Self {
        let predictions = vec![0.0; dates.len()];
        Self { dates, predictions }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
