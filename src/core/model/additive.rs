//! Additive trend + Fourier seasonality regression.
//!
//! The model follows the usual decomposable layout `y(t) = g(t) + s(t) + e`:
//!
//! - `g(t)` is a piecewise-linear trend with hinge terms at candidate changepoints
//!   spread over the first part of the history (or a constant for [`Growth::Flat`]).
//! - `s(t)` is a sum of Fourier series, one per enabled seasonality, evaluated on
//!   days since 1970-01-01 so the phase does not depend on where the history starts.
//!
//! Coefficients are the MAP estimate under Gaussian priors, which reduces to a ridge
//! regression with penalty `(noise_scale / prior_scale)^2` on changepoint and seasonal
//! terms. Intercept and base slope are left unpenalised. Values are scaled by the
//! largest absolute observation and time by the history span before fitting, so the
//! prior scales are unit free.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::MonthlySeries;
use crate::errors::{ConfigError, ModelError};
use crate::time::days_since_epoch;

use super::linalg::solve_ridge;
use super::{Growth, ModelConfig, SeriesModel};

const YEARLY_PERIOD_DAYS: f64 = 365.25;
const WEEKLY_PERIOD_DAYS: f64 = 7.0;
const DAILY_PERIOD_DAYS: f64 = 1.0;

/// Fewest observations the regression accepts.
pub const MIN_FIT_OBSERVATIONS: usize = 2;

/// Tunables for [`AdditiveModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditiveModelSettings {
    /// Upper bound on candidate trend changepoints.
    pub n_changepoints: usize,
    /// Fraction of the history in which changepoints may be placed.
    pub changepoint_range: f64,
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    /// Assumed observation noise on the scaled series.
    pub noise_scale: f64,
    pub yearly_fourier_order: usize,
    pub weekly_fourier_order: usize,
    pub daily_fourier_order: usize,
}

impl Default for AdditiveModelSettings {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            noise_scale: 0.1,
            yearly_fourier_order: 10,
            weekly_fourier_order: 3,
            daily_fourier_order: 4,
        }
    }
}

impl AdditiveModelSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "changepoint_range must be in (0, 1], got {}",
                self.changepoint_range
            )));
        }
        for (name, value) in [
            ("changepoint_prior_scale", self.changepoint_prior_scale),
            ("seasonality_prior_scale", self.seasonality_prior_scale),
            ("noise_scale", self.noise_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.yearly_fourier_order == 0
            || self.weekly_fourier_order == 0
            || self.daily_fourier_order == 0
        {
            return Err(ConfigError::Invalid(
                "fourier orders must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn penalty(&self, prior_scale: f64) -> f64 {
        (self.noise_scale / prior_scale).powi(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Seasonality {
    period_days: f64,
    order: usize,
}

/// Column layout of the design matrix, fixed at fit time and reused for prediction.
#[derive(Debug, Clone)]
struct FeatureLayout {
    growth: Growth,
    start: NaiveDate,
    span_days: f64,
    changepoints: Vec<f64>,
    seasonalities: Vec<Seasonality>,
}

impl FeatureLayout {
    fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64 / self.span_days
    }

    fn width(&self) -> usize {
        let trend = match self.growth {
            Growth::Linear => 2,
            Growth::Flat => 1,
        };
        trend
            + self.changepoints.len()
            + self
                .seasonalities
                .iter()
                .map(|season| 2 * season.order)
                .sum::<usize>()
    }

    fn row(&self, date: NaiveDate) -> Vec<f64> {
        let t = self.scaled_time(date);
        let mut row = Vec::with_capacity(self.width());
        row.push(1.0);
        if self.growth == Growth::Linear {
            row.push(t);
        }
        row.extend(self.changepoints.iter().map(|&s| (t - s).max(0.0)));

        let day = days_since_epoch(date);
        for season in &self.seasonalities {
            for k in 1..=season.order {
                let angle = 2.0 * std::f64::consts::PI * k as f64 * day / season.period_days;
                row.push(angle.sin());
                row.push(angle.cos());
            }
        }
        row
    }
}

/// Coefficients of a fitted [`AdditiveModel`].
#[derive(Debug, Clone)]
pub struct FittedAdditiveModel {
    layout: FeatureLayout,
    y_scale: f64,
    coefficients: Vec<f64>,
}

impl FittedAdditiveModel {
    /// Point estimates in the original units, one per date.
    pub fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<f64>, ModelError> {
        dates
            .iter()
            .map(|&date| {
                let row = self.layout.row(date);
                let scaled: f64 = row
                    .iter()
                    .zip(&self.coefficients)
                    .map(|(x, beta)| x * beta)
                    .sum();
                let value = scaled * self.y_scale;
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(ModelError::NonFinite)
                }
            })
            .collect()
    }

    pub fn changepoint_count(&self) -> usize {
        self.layout.changepoints.len()
    }

    pub fn seasonal_terms(&self) -> usize {
        self.layout
            .seasonalities
            .iter()
            .map(|season| 2 * season.order)
            .sum()
    }
}

/// Default backend: regularised additive regression fitted per call.
#[derive(Debug, Clone, Default)]
pub struct AdditiveModel {
    settings: AdditiveModelSettings,
}

impl AdditiveModel {
    pub fn new(settings: AdditiveModelSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AdditiveModelSettings {
        &self.settings
    }

    pub fn fit(
        &self,
        series: &MonthlySeries,
        config: &ModelConfig,
    ) -> Result<FittedAdditiveModel, ModelError> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) if series.len() >= MIN_FIT_OBSERVATIONS => {
                (first.month_end, last.month_end)
            }
            _ => {
                return Err(ModelError::InsufficientData {
                    required: MIN_FIT_OBSERVATIONS,
                    actual: series.len(),
                })
            }
        };
        let span_days = (last - first).num_days() as f64;
        if span_days <= 0.0 {
            return Err(ModelError::InsufficientData {
                required: MIN_FIT_OBSERVATIONS,
                actual: 1,
            });
        }

        let values = series.values();
        let y_scale = match values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())) {
            scale if scale > 0.0 => scale,
            _ => 1.0,
        };

        let mut layout = FeatureLayout {
            growth: config.growth,
            start: first,
            span_days,
            changepoints: Vec::new(),
            seasonalities: self.seasonalities(config),
        };
        if config.growth == Growth::Linear {
            let times: Vec<f64> = series
                .iter()
                .map(|entry| layout.scaled_time(entry.month_end))
                .collect();
            layout.changepoints = self.changepoints(&times);
        }

        let design: Vec<Vec<f64>> = series.iter().map(|entry| layout.row(entry.month_end)).collect();
        let target: Vec<f64> = values.iter().map(|value| value / y_scale).collect();
        let penalties = self.penalties(&layout);

        let coefficients = solve_ridge(&design, &target, &penalties)?;
        Ok(FittedAdditiveModel {
            layout,
            y_scale,
            coefficients,
        })
    }

    fn seasonalities(&self, config: &ModelConfig) -> Vec<Seasonality> {
        [
            (
                config.yearly_seasonality,
                YEARLY_PERIOD_DAYS,
                self.settings.yearly_fourier_order,
            ),
            (
                config.weekly_seasonality,
                WEEKLY_PERIOD_DAYS,
                self.settings.weekly_fourier_order,
            ),
            (
                config.daily_seasonality,
                DAILY_PERIOD_DAYS,
                self.settings.daily_fourier_order,
            ),
        ]
        .into_iter()
        .filter(|(enabled, _, _)| *enabled)
        .map(|(_, period_days, order)| Seasonality { period_days, order })
        .collect()
    }

    /// Evenly spaced observation times within the first `changepoint_range` of history,
    /// excluding the very first observation.
    fn changepoints(&self, times: &[f64]) -> Vec<f64> {
        let hist_size = (times.len() as f64 * self.settings.changepoint_range).floor() as usize;
        let count = self
            .settings
            .n_changepoints
            .min(hist_size.saturating_sub(1));
        if count == 0 {
            return Vec::new();
        }
        let last_index = (hist_size - 1) as f64;
        (1..=count)
            .map(|i| {
                let index = (i as f64 * last_index / count as f64).round() as usize;
                times[index]
            })
            .collect()
    }

    fn penalties(&self, layout: &FeatureLayout) -> Vec<f64> {
        let trend = match layout.growth {
            Growth::Linear => 2,
            Growth::Flat => 1,
        };
        let mut penalties = vec![0.0; trend];
        penalties.extend(
            std::iter::repeat(self.settings.penalty(self.settings.changepoint_prior_scale))
                .take(layout.changepoints.len()),
        );
        let seasonal_terms: usize = layout
            .seasonalities
            .iter()
            .map(|season| 2 * season.order)
            .sum();
        penalties.extend(
            std::iter::repeat(self.settings.penalty(self.settings.seasonality_prior_scale))
                .take(seasonal_terms),
        );
        penalties
    }
}

impl SeriesModel for AdditiveModel {
    fn name(&self) -> &'static str {
        "additive"
    }

    fn fit_predict(
        &self,
        series: &MonthlySeries,
        config: &ModelConfig,
        horizon: &[NaiveDate],
    ) -> Result<Vec<f64>, ModelError> {
        self.fit(series, config)?.predict(horizon)
    }
}
