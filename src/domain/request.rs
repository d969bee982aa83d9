use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::time::parse_iso_date;

use super::history::HistoryPoint;

/// Horizon used when a request omits `months_ahead`.
pub const DEFAULT_MONTHS_AHEAD: u32 = 3;

/// Largest accepted horizon (one hundred years of month-ends).
pub const MAX_MONTHS_AHEAD: u32 = 1200;

/// History entry as received on the wire, before date parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHistoryPoint {
    pub date: String,
    pub amount: f64,
}

/// Inbound forecast request. `user_id` and `category` are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub category: String,
    pub history: Vec<RawHistoryPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months_ahead: Option<i64>,
}

/// Request whose dates, amounts and horizon have been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub user_id: String,
    pub category: String,
    pub history: Vec<HistoryPoint>,
    pub months_ahead: u32,
}

impl ForecastRequest {
    pub fn new(user_id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            category: category.into(),
            history: Vec::new(),
            months_ahead: None,
        }
    }

    pub fn with_point(mut self, date: impl Into<String>, amount: f64) -> Self {
        self.history.push(RawHistoryPoint {
            date: date.into(),
            amount,
        });
        self
    }

    pub fn with_months_ahead(mut self, months_ahead: i64) -> Self {
        self.months_ahead = Some(months_ahead);
        self
    }

    /// Parses every history date and checks the horizon. The first offending entry is reported.
    pub fn validate(&self, default_months_ahead: u32) -> Result<ValidatedRequest, ValidationError> {
        let months_ahead = match self.months_ahead {
            None => default_months_ahead,
            Some(value) if value <= 0 => return Err(ValidationError::NonPositiveHorizon(value)),
            Some(value) => u32::try_from(value)
                .ok()
                .filter(|months| *months <= MAX_MONTHS_AHEAD)
                .ok_or(ValidationError::HorizonTooLarge(value))?,
        };
        if months_ahead == 0 {
            return Err(ValidationError::NonPositiveHorizon(0));
        }

        let history = self
            .history
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let date = parse_iso_date(&raw.date).ok_or_else(|| ValidationError::InvalidDate {
                    index,
                    value: raw.date.clone(),
                })?;
                if !raw.amount.is_finite() {
                    return Err(ValidationError::InvalidAmount { index });
                }
                Ok(HistoryPoint::new(date, raw.amount))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedRequest {
            user_id: self.user_id.clone(),
            category: self.category.clone(),
            history,
            months_ahead,
        })
    }
}
