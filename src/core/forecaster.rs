//! Monthly spend forecasting: aggregation, configuration choice, fit, horizon and clamping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::request::{DEFAULT_MONTHS_AHEAD, MAX_MONTHS_AHEAD};
use crate::domain::{ForecastResponse, HistoryPoint, MonthlySeries};
use crate::errors::{ConfigError, ModelError};
use crate::time::month_end_range;

use super::aggregator::aggregate;
use super::model::{AdditiveModel, ModelConfig, SeriesModel};

/// Knobs governing how the forecaster picks a model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecasterSettings {
    /// Monthly entries needed before yearly seasonality is enabled.
    pub yearly_seasonality_threshold: usize,
    /// Monthly entries needed before a model is fitted at all; fewer yields zero predictions.
    pub min_observations: usize,
    /// Horizon applied when a request leaves `months_ahead` out.
    pub default_months_ahead: u32,
}

impl Default for ForecasterSettings {
    fn default() -> Self {
        Self {
            yearly_seasonality_threshold: 12,
            min_observations: 2,
            default_months_ahead: DEFAULT_MONTHS_AHEAD,
        }
    }
}

impl ForecasterSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.yearly_seasonality_threshold == 0 {
            return Err(ConfigError::Invalid(
                "yearly_seasonality_threshold must be at least 1".into(),
            ));
        }
        if self.min_observations < 2 {
            return Err(ConfigError::Invalid(format!(
                "min_observations must be at least 2, got {}",
                self.min_observations
            )));
        }
        if self.default_months_ahead == 0 || self.default_months_ahead > MAX_MONTHS_AHEAD {
            return Err(ConfigError::Invalid(format!(
                "default_months_ahead must be between 1 and {MAX_MONTHS_AHEAD}, got {}",
                self.default_months_ahead
            )));
        }
        Ok(())
    }
}

/// How a forecast was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStrategy {
    /// No history at all: zero for every month.
    EmptyHistory,
    /// History present but too few months to fit: zero for every month.
    InsufficientData,
    /// Model fitted with the planned configuration.
    Fitted,
    /// Planned configuration failed; refitted with seasonality disabled.
    Simplified,
}

/// Forecast response plus the decisions taken to build it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastOutcome {
    pub response: ForecastResponse,
    pub strategy: ForecastStrategy,
    /// Configuration actually fitted, absent for the zero fallbacks.
    pub config: Option<ModelConfig>,
    /// Monthly entries after aggregation.
    pub observations: usize,
}

/// Stateless forecaster; every call aggregates, fits and predicts from scratch.
pub struct Forecaster {
    settings: ForecasterSettings,
    model: Box<dyn SeriesModel>,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new(
            ForecasterSettings::default(),
            Box::new(AdditiveModel::default()),
        )
    }
}

impl std::fmt::Debug for Forecaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forecaster")
            .field("settings", &self.settings)
            .field("model", &self.model.name())
            .finish()
    }
}

impl Forecaster {
    pub fn new(settings: ForecasterSettings, model: Box<dyn SeriesModel>) -> Self {
        Self { settings, model }
    }

    pub fn settings(&self) -> &ForecasterSettings {
        &self.settings
    }

    /// Linear growth; yearly seasonality only once the series is long enough.
    pub fn plan(&self, series: &MonthlySeries) -> ModelConfig {
        ModelConfig::linear(series.len() >= self.settings.yearly_seasonality_threshold)
    }

    /// `months_ahead` month-ends starting with the month containing `today`.
    pub fn horizon(&self, today: NaiveDate, months_ahead: u32) -> Vec<NaiveDate> {
        month_end_range(today, months_ahead)
    }

    pub fn forecast(
        &self,
        history: &[HistoryPoint],
        months_ahead: u32,
        today: NaiveDate,
    ) -> Result<ForecastResponse, ModelError> {
        self.forecast_detailed(history, months_ahead, today)
            .map(|outcome| outcome.response)
    }

    pub fn forecast_detailed(
        &self,
        history: &[HistoryPoint],
        months_ahead: u32,
        today: NaiveDate,
    ) -> Result<ForecastOutcome, ModelError> {
        let horizon = self.horizon(today, months_ahead);

        if history.is_empty() {
            info!(months_ahead, "empty history, returning zero forecast");
            return Ok(ForecastOutcome {
                response: ForecastResponse::zeros(horizon),
                strategy: ForecastStrategy::EmptyHistory,
                config: None,
                observations: 0,
            });
        }

        let series = aggregate(history);
        if series.len() < self.settings.min_observations {
            info!(
                observations = series.len(),
                required = self.settings.min_observations,
                "too few months to fit, returning zero forecast"
            );
            return Ok(ForecastOutcome {
                response: ForecastResponse::zeros(horizon),
                strategy: ForecastStrategy::InsufficientData,
                config: None,
                observations: series.len(),
            });
        }

        let planned = self.plan(&series);
        debug!(
            observations = series.len(),
            yearly = planned.yearly_seasonality,
            model = self.model.name(),
            "fitting monthly series"
        );

        let (raw, config, strategy) = match self.predict(&series, &planned, &horizon) {
            Ok(raw) => (raw, planned, ForecastStrategy::Fitted),
            Err(err) if planned.has_seasonality() => {
                warn!(error = %err, "seasonal fit failed, retrying without seasonality");
                let simplified = planned.simplified();
                let raw = self.predict(&series, &simplified, &horizon)?;
                (raw, simplified, ForecastStrategy::Simplified)
            }
            Err(err) => return Err(err),
        };

        Ok(ForecastOutcome {
            response: ForecastResponse::clamped(horizon, raw),
            strategy,
            config: Some(config),
            observations: series.len(),
        })
    }

    fn predict(
        &self,
        series: &MonthlySeries,
        config: &ModelConfig,
        horizon: &[NaiveDate],
    ) -> Result<Vec<f64>, ModelError> {
        let raw = self.model.fit_predict(series, config, horizon)?;
        if raw.len() != horizon.len() {
            return Err(ModelError::HorizonMismatch {
                expected: horizon.len(),
                actual: raw.len(),
            });
        }
        if raw.iter().any(|value| !value.is_finite()) {
            return Err(ModelError::NonFinite);
        }
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Returns a fixed value per horizon date and fails seasonal fits when asked to.
    struct ScriptedModel {
        value: f64,
        fail_seasonal: bool,
        calls: Arc<AtomicUsize>,
    }

    impl SeriesModel for ScriptedModel {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn fit_predict(
            &self,
            _series: &MonthlySeries,
            config: &ModelConfig,
            horizon: &[NaiveDate],
        ) -> Result<Vec<f64>, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_seasonal && config.has_seasonality() {
                return Err(ModelError::Singular);
            }
            Ok(vec![self.value; horizon.len()])
        }
    }

    fn scripted(value: f64, fail_seasonal: bool) -> (Forecaster, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = ScriptedModel {
            value,
            fail_seasonal,
            calls: Arc::clone(&calls),
        };
        (
            Forecaster::new(ForecasterSettings::default(), Box::new(model)),
            calls,
        )
    }

    fn months(count: u32) -> Vec<HistoryPoint> {
        month_end_range(date(2022, 1, 1), count)
            .into_iter()
            .map(|d| HistoryPoint::new(d, 100.0))
            .collect()
    }

    #[test]
    fn empty_history_skips_the_model() {
        let (forecaster, calls) = scripted(5.0, false);
        let outcome = forecaster
            .forecast_detailed(&[], 3, date(2026, 10, 18))
            .expect("forecast");
        assert_eq!(outcome.strategy, ForecastStrategy::EmptyHistory);
        assert_eq!(outcome.response.predictions, vec![0.0; 3]);
        assert_eq!(outcome.response.dates[0], date(2026, 10, 31));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn single_month_takes_the_zero_fallback() {
        let (forecaster, calls) = scripted(5.0, false);
        let history = [
            HistoryPoint::new(date(2024, 3, 1), 10.0),
            HistoryPoint::new(date(2024, 3, 9), 20.0),
        ];
        let outcome = forecaster
            .forecast_detailed(&history, 2, date(2024, 5, 2))
            .expect("forecast");
        assert_eq!(outcome.strategy, ForecastStrategy::InsufficientData);
        assert_eq!(outcome.observations, 1);
        assert_eq!(outcome.response.predictions, vec![0.0, 0.0]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn negative_model_output_is_clamped() {
        let (forecaster, _) = scripted(-40.0, false);
        let response = forecaster
            .forecast(&months(4), 3, date(2022, 6, 15))
            .expect("forecast");
        assert_eq!(response.predictions, vec![0.0; 3]);
    }

    #[test]
    fn yearly_seasonality_needs_twelve_months() {
        let forecaster = Forecaster::default();
        assert!(!forecaster.plan(&aggregate(&months(11))).yearly_seasonality);
        assert!(forecaster.plan(&aggregate(&months(12))).yearly_seasonality);
        let config = forecaster.plan(&aggregate(&months(12)));
        assert!(!config.weekly_seasonality);
        assert!(!config.daily_seasonality);
    }

    #[test]
    fn failed_seasonal_fit_retries_without_seasonality() {
        let (forecaster, calls) = scripted(12.0, true);
        let outcome = forecaster
            .forecast_detailed(&months(12), 2, date(2023, 1, 10))
            .expect("forecast");
        assert_eq!(outcome.strategy, ForecastStrategy::Simplified);
        assert_eq!(outcome.config, Some(ModelConfig::linear(false)));
        assert_eq!(outcome.response.predictions, vec![12.0, 12.0]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_plain_fit_is_surfaced() {
        struct Broken;
        impl SeriesModel for Broken {
            fn name(&self) -> &'static str {
                "broken"
            }
            fn fit_predict(
                &self,
                _: &MonthlySeries,
                _: &ModelConfig,
                _: &[NaiveDate],
            ) -> Result<Vec<f64>, ModelError> {
                Err(ModelError::Singular)
            }
        }
        let forecaster = Forecaster::new(ForecasterSettings::default(), Box::new(Broken));
        let err = forecaster
            .forecast(&months(3), 2, date(2022, 6, 1))
            .unwrap_err();
        assert_eq!(err, ModelError::Singular);
    }

    #[test]
    fn short_model_output_is_rejected() {
        struct Short;
        impl SeriesModel for Short {
            fn name(&self) -> &'static str {
                "short"
            }
            fn fit_predict(
                &self,
                _: &MonthlySeries,
                _: &ModelConfig,
                _: &[NaiveDate],
            ) -> Result<Vec<f64>, ModelError> {
                Ok(vec![1.0])
            }
        }
        let forecaster = Forecaster::new(ForecasterSettings::default(), Box::new(Short));
        let err = forecaster
            .forecast(&months(3), 2, date(2022, 6, 1))
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::HorizonMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn settings_validation() {
        assert!(ForecasterSettings::default().validate().is_ok());
        let settings = ForecasterSettings {
            min_observations: 1,
            ..ForecasterSettings::default()
        };
        assert!(settings.validate().is_err());
        let settings = ForecasterSettings {
            default_months_ahead: 0,
            ..ForecasterSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
