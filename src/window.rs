//! Rolling-window aggregation across month partitions.
//!
//! A window runs from `start` to `start + days`. Every month it touches is
//! loaded: the first is cut at `start`, the last at `end`, and months in
//! between are taken whole. Both cut points are midnight, compared against
//! the dropoff timestamp, and inclusive.

use anyhow::Result;
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info};

use crate::error::TripDataError;
use crate::fetch::HttpClient;
use crate::month::MonthKey;
use crate::source::TripSource;
use crate::stats::mean_trip_distance;
use crate::trips::TripRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

/// Dropoff bounds applied to one month's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropoffBounds {
    pub lower: Option<NaiveDateTime>,
    pub upper: Option<NaiveDateTime>,
}

impl DropoffBounds {
    pub fn admits(&self, trip: &TripRecord) -> bool {
        self.lower.is_none_or(|lower| trip.dropoff >= lower)
            && self.upper.is_none_or(|upper| trip.dropoff <= upper)
    }
}

impl DateWindow {
    pub fn new(start: NaiveDate, days: u64) -> Result<Self, TripDataError> {
        let end = start
            .checked_add_days(Days::new(days))
            .ok_or(TripDataError::WindowOverflow { start, days })?;
        Ok(Self { start, end })
    }

    /// Window of `days` days starting at midnight of `year-month-day`.
    pub fn starting(year: i32, month: u32, day: u32, days: u64) -> Result<Self, TripDataError> {
        let start = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(TripDataError::InvalidDate { year, month, day })?;
        Self::new(start, days)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Every month partition the window touches, in order.
    pub fn months(&self) -> Vec<MonthKey> {
        let last = MonthKey::of_date(self.end);
        let mut key = MonthKey::of_date(self.start);
        let mut months = vec![key];
        while key < last {
            key = key.succ();
            months.push(key);
        }
        months
    }

    pub fn bounds_for(&self, key: MonthKey) -> DropoffBounds {
        let midnight = |date: NaiveDate| date.and_time(NaiveTime::MIN);
        DropoffBounds {
            lower: (key == MonthKey::of_date(self.start)).then(|| midnight(self.start)),
            upper: (key == MonthKey::of_date(self.end)).then(|| midnight(self.end)),
        }
    }
}

/// Loads every month of `window` and keeps the records inside it.
#[tracing::instrument(skip(source), fields(start = %window.start(), end = %window.end()))]
pub fn collect_window<C: HttpClient>(
    source: &TripSource<C>,
    window: &DateWindow,
) -> Result<Vec<TripRecord>> {
    let mut selected = Vec::new();

    for key in window.months() {
        let bounds = window.bounds_for(key);
        let trips = source.get_month(key)?;
        let total = trips.len();

        selected.extend(trips.into_iter().filter(|t| bounds.admits(t)));
        debug!(month = %key, total, kept = selected.len(), "Month filtered");
    }

    info!(trips = selected.len(), "Window collected");
    Ok(selected)
}

/// Average trip distance of all yellow-taxi trips dropped off within `days`
/// days of `year-month-day`.
pub fn rolling_average<C: HttpClient>(
    source: &TripSource<C>,
    year: i32,
    month: u32,
    day: u32,
    days: u64,
) -> Result<f64> {
    let window = DateWindow::starting(year, month, day, days)?;
    let trips = collect_window(source, &window)?;
    mean_trip_distance(&trips, &format!("{} to {}", window.start(), window.end()))
}
