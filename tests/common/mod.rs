#![allow(dead_code)]

use chrono::NaiveDate;
use spend_forecast::{
    core::{ForecastService, Forecaster},
    domain::HistoryPoint,
    time::{month_end_range, FixedClock},
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// The pinned "today" used across integration tests.
pub fn today() -> NaiveDate {
    date(2026, 10, 18)
}

pub fn service() -> ForecastService<FixedClock> {
    ForecastService::with_clock(Forecaster::default(), FixedClock::on(today()))
}

/// Two or three transactions in each of `months` consecutive months starting at `start`.
pub fn irregular_history(start: NaiveDate, months: u32) -> Vec<HistoryPoint> {
    month_end_range(start, months)
        .into_iter()
        .enumerate()
        .flat_map(|(idx, month_end)| {
            let base = 120.0 + 7.5 * idx as f64;
            let mut points = vec![
                HistoryPoint::new(month_end - chrono::Duration::days(20), base * 0.6),
                HistoryPoint::new(month_end - chrono::Duration::days(3), base * 0.4),
            ];
            if idx % 3 == 0 {
                points.push(HistoryPoint::new(month_end, 15.0));
            }
            points
        })
        .collect()
}

/// One point per month dated at each month-end.
pub fn monthly_history(start: NaiveDate, values: &[f64]) -> Vec<HistoryPoint> {
    month_end_range(start, values.len() as u32)
        .into_iter()
        .zip(values)
        .map(|(date, &amount)| HistoryPoint::new(date, amount))
        .collect()
}

pub fn assert_strictly_increasing_month_ends(dates: &[NaiveDate]) {
    for window in dates.windows(2) {
        assert!(window[0] < window[1], "dates not increasing: {dates:?}");
    }
    for date in dates {
        assert!(
            spend_forecast::time::is_month_end(*date),
            "{date} is not a month-end"
        );
    }
}
