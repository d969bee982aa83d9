//! Monthly aggregation of raw spending history.

use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::debug;

use crate::domain::{HistoryPoint, MonthlySeries, MonthlyTotal};
use crate::time::month_end;

/// Sums `history` per calendar month, keyed by each month's last day, in ascending order.
///
/// Months without points are left out. The input slice is not modified and its order is
/// irrelevant.
pub fn aggregate(history: &[HistoryPoint]) -> MonthlySeries {
    let mut months: BTreeMap<(i32, u32), MonthlyTotal> = BTreeMap::new();
    for point in history {
        months
            .entry((point.date.year(), point.date.month()))
            .or_insert_with(|| MonthlyTotal {
                month_end: month_end(point.date),
                total: 0.0,
            })
            .total += point.amount;
    }
    debug!(
        points = history.len(),
        months = months.len(),
        "aggregated history into monthly totals"
    );
    MonthlySeries::from_sorted(months.into_values().collect())
}
