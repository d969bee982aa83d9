//! Clock abstraction and month-end calendar arithmetic.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// `num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Clock abstracts access to the current timestamp so forecasts remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC date. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// Pins the clock to midnight UTC of `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self::new(DateTime::from_naive_utc_and_offset(
            date.and_time(NaiveTime::MIN),
            Utc,
        ))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = (date.year(), date.month());
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .unwrap_or(date)
}

pub fn is_month_end(date: NaiveDate) -> bool {
    month_end(date) == date
}

/// Month-end `months` months away from the month containing `date`. Negative values go back.
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let first = date.with_day(1)?;
    let shifted = if months >= 0 {
        first.checked_add_months(Months::new(months.unsigned_abs()))?
    } else {
        first.checked_sub_months(Months::new(months.unsigned_abs()))?
    };
    Some(month_end(shifted))
}

/// `periods` consecutive month-ends, the first being the month-end on or after `start`.
pub fn month_end_range(start: NaiveDate, periods: u32) -> Vec<NaiveDate> {
    let Some(first) = start.with_day(1) else {
        return Vec::new();
    };
    (0..periods)
        .map_while(|offset| first.checked_add_months(Months::new(offset)))
        .map(month_end)
        .collect()
}

/// Parses a `YYYY-MM-DD` calendar date, ignoring surrounding whitespace.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).ok()
}

/// Days since 1970-01-01, the time axis used for Fourier seasonality.
pub(crate) fn days_since_epoch(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
}
