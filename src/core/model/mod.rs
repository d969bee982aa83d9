//! Statistical backends behind the forecaster.

pub mod additive;
pub(crate) mod linalg;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::MonthlySeries;
use crate::errors::ModelError;

pub use additive::{AdditiveModel, AdditiveModelSettings, FittedAdditiveModel};

/// Shape of the trend component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Growth {
    Linear,
    Flat,
}

/// Per-fit model configuration chosen by the forecaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub yearly_seasonality: bool,
    pub weekly_seasonality: bool,
    pub daily_seasonality: bool,
    pub growth: Growth,
}

impl ModelConfig {
    /// Linear growth with only the yearly seasonality optionally enabled.
    pub fn linear(yearly_seasonality: bool) -> Self {
        Self {
            yearly_seasonality,
            weekly_seasonality: false,
            daily_seasonality: false,
            growth: Growth::Linear,
        }
    }

    /// Same growth, every seasonal component switched off.
    pub fn simplified(self) -> Self {
        Self {
            yearly_seasonality: false,
            weekly_seasonality: false,
            daily_seasonality: false,
            ..self
        }
    }

    pub fn has_seasonality(&self) -> bool {
        self.yearly_seasonality || self.weekly_seasonality || self.daily_seasonality
    }
}

/// A backend able to fit a monthly series and predict values at arbitrary future dates.
pub trait SeriesModel: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Fits `series` under `config` and returns one point estimate per `horizon` date.
    fn fit_predict(
        &self,
        series: &MonthlySeries,
        config: &ModelConfig,
        horizon: &[NaiveDate],
    ) -> Result<Vec<f64>, ModelError>;
}
