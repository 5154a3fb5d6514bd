//! Domain errors raised by the trip data pipeline.
//!
//! Transport, I/O and CSV failures travel as plain [`anyhow::Error`]s; the
//! variants here are the ones callers may want to match on via
//! `err.downcast_ref::<TripDataError>()`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TripDataError {
    /// The dataset only publishes months between 2009-01 and 2021-12.
    #[error("No data available for year={year} and month={month}.")]
    OutOfRange { year: i32, month: u32 },

    /// The rolling window start does not name a real calendar day.
    #[error("Invalid start date: year={year}, month={month}, day={day}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// `start + days` falls outside the representable calendar.
    #[error("Window of {days} days starting {start} overflows the calendar")]
    WindowOverflow { start: NaiveDate, days: u64 },

    /// The selected record set is empty, so no mean exists.
    #[error("No trips found for {0}")]
    NoTrips(String),
}
