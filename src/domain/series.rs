use chrono::NaiveDate;
use serde::Serialize;

use super::history::HistoryPoint;
use crate::errors::SeriesError;
use crate::time::is_month_end;

/// Total spend for one calendar month, keyed by the month's last day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month_end: NaiveDate,
    pub total: f64,
}

/// Chronologically ordered monthly totals, at most one entry per calendar month.
///
/// Months without activity are absent rather than zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonthlySeries {
    entries: Vec<MonthlyTotal>,
}

impl MonthlySeries {
    /// Builds a series from entries already sorted by month with unique month-end keys.
    pub(crate) fn from_sorted(entries: Vec<MonthlyTotal>) -> Self {
        debug_assert!(entries
            .windows(2)
            .all(|pair| pair[0].month_end < pair[1].month_end));
        Self { entries }
    }

    /// Builds a series from caller-supplied totals, e.g. for driving a custom backend.
    ///
    /// Every entry must sit on a month-end, carry a finite total and come strictly after the
    /// previous one.
    pub fn from_monthly_totals(entries: Vec<MonthlyTotal>) -> Result<Self, SeriesError> {
        for (index, entry) in entries.iter().enumerate() {
            let date = entry.month_end;
            if !is_month_end(date) {
                return Err(SeriesError::NotMonthEnd { index, date });
            }
            if !entry.total.is_finite() {
                return Err(SeriesError::NonFiniteTotal { index });
            }
            if let Some(previous) = index.checked_sub(1).map(|prev| entries[prev].month_end) {
                if previous == date {
                    return Err(SeriesError::DuplicateMonth { index, date });
                }
                if previous > date {
                    return Err(SeriesError::OutOfOrder { index, date });
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonthlyTotal> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[MonthlyTotal] {
        &self.entries
    }

    pub fn first(&self) -> Option<&MonthlyTotal> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&MonthlyTotal> {
        self.entries.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.entries.iter().map(|entry| entry.month_end).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|entry| entry.total).collect()
    }

    /// One history point per month, dated at the month-end.
    pub fn to_history(&self) -> Vec<HistoryPoint> {
        self.entries
            .iter()
            .map(|entry| HistoryPoint::new(entry.month_end, entry.total))
            .collect()
    }
}

impl<'a> IntoIterator for &'a MonthlySeries {
    type Item = &'a MonthlyTotal;
    type IntoIter = std::slice::Iter<'a, MonthlyTotal>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(y: i32, m: u32, d: u32, amount: f64) -> MonthlyTotal {
        MonthlyTotal {
            month_end: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            total: amount,
        }
    }

    #[test]
    fn accepts_ascending_month_ends_with_gaps() {
        let series = MonthlySeries::from_monthly_totals(vec![
            total(2024, 1, 31, 100.0),
            total(2024, 2, 29, -20.0),
            total(2024, 5, 31, 40.0),
        ])
        .expect("valid series");
        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), vec![100.0, -20.0, 40.0]);
        assert!(MonthlySeries::from_monthly_totals(Vec::new())
            .expect("empty")
            .is_empty());
    }

    #[test]
    fn rejects_dates_inside_a_month() {
        let err = MonthlySeries::from_monthly_totals(vec![
            total(2024, 1, 31, 1.0),
            total(2024, 2, 28, 1.0),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SeriesError::NotMonthEnd {
                index: 1,
                date: NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            }
        );
    }

    #[test]
    fn rejects_a_repeated_month() {
        let err = MonthlySeries::from_monthly_totals(vec![
            total(2024, 3, 31, 1.0),
            total(2024, 3, 31, 2.0),
        ])
        .unwrap_err();
        assert!(matches!(err, SeriesError::DuplicateMonth { index: 1, .. }));
    }

    #[test]
    fn rejects_descending_months() {
        let err = MonthlySeries::from_monthly_totals(vec![
            total(2024, 4, 30, 1.0),
            total(2024, 6, 30, 1.0),
            total(2024, 5, 31, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, SeriesError::OutOfOrder { index: 2, .. }));
    }

    #[test]
    fn rejects_non_finite_totals() {
        let err = MonthlySeries::from_monthly_totals(vec![total(2024, 4, 30, f64::NAN)])
            .unwrap_err();
        assert_eq!(err, SeriesError::NonFiniteTotal { index: 0 });
    }
}
