mod common;

use common::{date, irregular_history, monthly_history};
use spend_forecast::{
    core::aggregate,
    domain::{HistoryPoint, MonthlySeries},
    errors::SeriesError,
};

#[test]
fn split_january_spend_aggregates_to_month_ends() {
    let history = vec![
        HistoryPoint::new(date(2023, 1, 15), 100.0),
        HistoryPoint::new(date(2023, 1, 20), 50.0),
        HistoryPoint::new(date(2023, 2, 1), 200.0),
    ];
    let series = aggregate(&history);
    assert_eq!(series.dates(), vec![date(2023, 1, 31), date(2023, 2, 28)]);
    assert_eq!(series.values(), vec![150.0, 200.0]);
}

#[test]
fn aggregation_is_idempotent_on_monthly_series() {
    let history = monthly_history(date(2022, 3, 1), &[10.0, 20.0, 30.0, 25.0, 5.0]);
    let once = aggregate(&history);
    let twice = aggregate(&once.to_history());
    assert_eq!(once, twice);
    assert_eq!(once.to_history(), history);
}

#[test]
fn aggregation_ignores_arrival_order() {
    let history = irregular_history(date(2021, 6, 1), 14);
    let mut reversed = history.clone();
    reversed.reverse();
    let mut interleaved: Vec<HistoryPoint> = history.iter().step_by(2).copied().collect();
    interleaved.extend(history.iter().skip(1).step_by(2).copied());

    let expected = aggregate(&history);
    assert_eq!(aggregate(&reversed).dates(), expected.dates());
    assert_eq!(aggregate(&interleaved).dates(), expected.dates());
    for (left, right) in aggregate(&reversed).values().iter().zip(expected.values()) {
        assert!((left - right).abs() < 1e-9);
    }
    for (left, right) in aggregate(&interleaved).values().iter().zip(expected.values()) {
        assert!((left - right).abs() < 1e-9);
    }
}

#[test]
fn entry_count_never_exceeds_distinct_months() {
    let history = irregular_history(date(2020, 1, 1), 30);
    let series = aggregate(&history);
    assert_eq!(series.len(), 30);
    let total: f64 = history.iter().map(|point| point.amount).sum();
    let aggregated: f64 = series.values().iter().sum();
    assert!((total - aggregated).abs() < 1e-6);
}

#[test]
fn aggregation_does_not_touch_its_input() {
    let history = irregular_history(date(2023, 1, 1), 3);
    let snapshot = history.clone();
    let _ = aggregate(&history);
    assert_eq!(history, snapshot);
}

#[test]
fn aggregated_entries_rebuild_the_same_series() {
    let series = aggregate(&irregular_history(date(2022, 1, 1), 9));
    let rebuilt = MonthlySeries::from_monthly_totals(series.entries().to_vec()).expect("valid");
    assert_eq!(rebuilt, series);

    let mut reversed = series.entries().to_vec();
    reversed.reverse();
    assert!(matches!(
        MonthlySeries::from_monthly_totals(reversed),
        Err(SeriesError::OutOfOrder { index: 1, .. })
    ));
}
