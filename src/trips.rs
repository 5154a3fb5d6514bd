//! CSV parser for monthly yellow-taxi trip files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The columns of a trip row that the aggregations read.
///
/// The dataset renamed its columns twice over the years; every generation of
/// header names is accepted. All other columns are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TripRecord {
    #[serde(
        alias = "tpep_pickup_datetime",
        alias = "pickup_datetime",
        alias = "Trip_Pickup_DateTime",
        deserialize_with = "deserialize_timestamp"
    )]
    pub pickup: NaiveDateTime,

    #[serde(
        alias = "tpep_dropoff_datetime",
        alias = "dropoff_datetime",
        alias = "Trip_Dropoff_DateTime",
        deserialize_with = "deserialize_timestamp"
    )]
    pub dropoff: NaiveDateTime,

    #[serde(alias = "Trip_Distance")]
    pub trip_distance: f64,
}

impl TripRecord {
    /// Time between pickup and dropoff in minutes.
    pub fn duration_minutes(&self) -> f64 {
        (self.dropoff - self.pickup).num_seconds() as f64 / 60.0
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
}

/// Decodes trip rows from any CSV source with a header line.
///
/// # Errors
///
/// Returns an error on malformed CSV or on a row whose timestamp or distance
/// cannot be parsed.
pub fn parse_trips<R: Read>(reader: R) -> Result<Vec<TripRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut trips = Vec::new();
    for result in rdr.deserialize() {
        let record: TripRecord = result?;
        trips.push(record);
    }

    Ok(trips)
}

/// Reads and decodes a trip CSV file from disk.
pub fn read_trips_file(path: &Path) -> Result<Vec<TripRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_trips(file).with_context(|| format!("parsing {}", path.display()))
}
