//! Month partitions of the trip dataset.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::TripDataError;

/// First year published by the dataset.
pub const FIRST_YEAR: i32 = 2009;
/// Last year published by the dataset.
pub const LAST_YEAR: i32 = 2021;

const FILE_PREFIX: &str = "yellow_tripdata_";
const FILE_SUFFIX: &str = ".csv";

/// A `(year, month)` pair identifying one monthly CSV partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Rejects keys the remote dataset does not publish.
    pub fn ensure_available(&self) -> Result<(), TripDataError> {
        if !(1..=12).contains(&self.month) || !(FIRST_YEAR..=LAST_YEAR).contains(&self.year) {
            return Err(TripDataError::OutOfRange {
                year: self.year,
                month: self.month,
            });
        }
        Ok(())
    }

    /// File name shared by the remote object and its cached copy,
    /// e.g. `yellow_tripdata_2020-01.csv`.
    pub fn file_name(&self) -> String {
        format!("{FILE_PREFIX}{}-{:02}{FILE_SUFFIX}", self.year, self.month)
    }

    /// Inverse of [`MonthKey::file_name`]; `None` for anything else.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
        let (year, month) = stem.split_once('-')?;
        let digits =
            |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(year, 4) || !digits(month, 2) {
            return None;
        }
        let month: u32 = month.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self::new(year.parse().ok()?, month))
    }

    /// The following calendar month.
    pub fn succ(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
