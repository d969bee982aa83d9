use tracing::{info_span, warn};

use crate::domain::{ForecastRequest, ForecastResponse};
use crate::errors::ForecastError;
use crate::time::{Clock, SystemClock};

use super::forecaster::{ForecastOutcome, Forecaster};

/// Entry point for request handlers: validates, forecasts against the clock's today, renders.
#[derive(Debug)]
pub struct ForecastService<C: Clock = SystemClock> {
    forecaster: Forecaster,
    clock: C,
}

impl ForecastService<SystemClock> {
    pub fn new(forecaster: Forecaster) -> Self {
        Self::with_clock(forecaster, SystemClock)
    }
}

impl<C: Clock> ForecastService<C> {
    pub fn with_clock(forecaster: Forecaster, clock: C) -> Self {
        Self { forecaster, clock }
    }

    pub fn forecaster(&self) -> &Forecaster {
        &self.forecaster
    }

    pub fn handle(&self, request: &ForecastRequest) -> Result<ForecastResponse, ForecastError> {
        self.handle_detailed(request)
            .map(|outcome| outcome.response)
    }

    pub fn handle_detailed(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastOutcome, ForecastError> {
        let span = info_span!(
            "forecast",
            user_id = %request.user_id,
            category = %request.category
        );
        let _guard = span.enter();

        let validated = request
            .validate(self.forecaster.settings().default_months_ahead)
            .inspect_err(|err| warn!(error = %err, "rejected forecast request"))?;
        let outcome = self.forecaster.forecast_detailed(
            &validated.history,
            validated.months_ahead,
            self.clock.today(),
        )?;
        Ok(outcome)
    }

    /// JSON in, JSON out.
    pub fn handle_json(&self, body: &str) -> Result<String, ForecastError> {
        let request: ForecastRequest = serde_json::from_str(body)?;
        let response = self.handle(&request)?;
        Ok(serde_json::to_string(&response)?)
    }
}
