use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated spending observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub amount: f64,
}

impl HistoryPoint {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}
