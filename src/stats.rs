//! Aggregate statistics over trip records.

use anyhow::Result;

use crate::error::TripDataError;
use crate::fetch::HttpClient;
use crate::month::MonthKey;
use crate::source::TripSource;
use crate::trips::TripRecord;

/// Arithmetic mean of `values`, or `None` when there are none.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Mean `trip_distance` of `trips`. `label` names the record set in the
/// error returned when it is empty.
pub fn mean_trip_distance(trips: &[TripRecord], label: &str) -> Result<f64> {
    mean(trips.iter().map(|t| t.trip_distance))
        .ok_or_else(|| TripDataError::NoTrips(label.to_string()).into())
}

/// Mean pickup-to-dropoff time of `trips`, in minutes.
pub fn mean_trip_duration(trips: &[TripRecord], label: &str) -> Result<f64> {
    mean(trips.iter().map(TripRecord::duration_minutes))
        .ok_or_else(|| TripDataError::NoTrips(label.to_string()).into())
}

/// Average trip distance of all yellow-taxi trips in the given month.
#[tracing::instrument(skip(source))]
pub fn average_trip_length<C: HttpClient>(
    source: &TripSource<C>,
    year: i32,
    month: u32,
) -> Result<f64> {
    let key = MonthKey::new(year, month);
    let trips = source.get_month(key)?;
    mean_trip_distance(&trips, &key.to_string())
}

/// Average trip duration, in minutes, of all yellow-taxi trips in the given
/// month.
#[tracing::instrument(skip(source))]
pub fn average_trip_duration<C: HttpClient>(
    source: &TripSource<C>,
    year: i32,
    month: u32,
) -> Result<f64> {
    let key = MonthKey::new(year, month);
    let trips = source.get_month(key)?;
    mean_trip_duration(&trips, &key.to_string())
}
