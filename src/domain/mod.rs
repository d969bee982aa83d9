pub mod history;
pub mod request;
pub mod response;
pub mod series;

pub use history::HistoryPoint;
pub use request::{ForecastRequest, RawHistoryPoint, ValidatedRequest};
pub use response::ForecastResponse;
pub use series::{MonthlySeries, MonthlyTotal};
