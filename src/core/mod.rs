pub mod aggregator;
pub mod forecaster;
pub mod model;
pub mod service;

pub use aggregator::aggregate;
pub use forecaster::{ForecastOutcome, ForecastStrategy, Forecaster, ForecasterSettings};
pub use model::{AdditiveModel, AdditiveModelSettings, Growth, ModelConfig, SeriesModel};
pub use service::ForecastService;
