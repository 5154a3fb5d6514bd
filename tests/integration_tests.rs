use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use taxi_trip_stats::{
    MonthKey, TripDataError, TripSource, average_trip_duration, average_trip_length,
    cache::TripCache,
    fetch::{HttpClient, month_url},
    rolling_average,
    window::DateWindow,
};
use tempfile::TempDir;

const BASE_URL: &str = "https://trips.test/trip+data";

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Serves the CSV fixtures by file name and records every request.
#[derive(Default)]
struct FixtureClient {
    requests: RefCell<Vec<String>>,
}

impl FixtureClient {
    fn requested_months(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .filter_map(|url| url.rsplit('/').next())
            .map(str::to_string)
            .collect()
    }
}

impl HttpClient for FixtureClient {
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.borrow_mut().push(url.to_string());
        let name = url.rsplit('/').next().unwrap_or_default();
        fs::read(fixture_path(name)).map_err(|_| anyhow!("404 Not Found for url ({url})"))
    }
}

fn fixture_source() -> (TripSource<FixtureClient>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let source = TripSource::new(
        FixtureClient::default(),
        TripCache::new(temp_dir.path()),
        BASE_URL,
    );
    (source, temp_dir)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_monthly_average_downloads_then_reads_cache() {
    let (source, temp_dir) = fixture_source();

    assert_close(average_trip_length(&source, 2020, 1).unwrap(), 3.0);
    assert_eq!(
        *source.client().requests.borrow(),
        vec![month_url(BASE_URL, MonthKey::new(2020, 1))]
    );

    let cached = temp_dir.path().join("yellow_tripdata_2020-01.csv");
    assert_eq!(
        fs::read(cached).unwrap(),
        fs::read(fixture_path("yellow_tripdata_2020-01.csv")).unwrap()
    );

    assert_close(average_trip_duration(&source, 2020, 1).unwrap(), 20.0);
    assert_eq!(source.client().requests.borrow().len(), 1);
}

#[test]
fn test_fetch_month_matches_cached_read() {
    let (source, _temp_dir) = fixture_source();
    let key = MonthKey::new(2020, 2);

    let fetched = source.fetch_month(key).unwrap();
    let cached = source.cache().load(key).unwrap();

    assert_eq!(fetched.len(), 4);
    assert_eq!(fetched, cached);
}

#[test]
fn test_invalid_month_fails_before_network() {
    let (source, _temp_dir) = fixture_source();

    let err = average_trip_length(&source, 2020, 13).unwrap_err();
    assert_eq!(
        err.downcast_ref::<TripDataError>(),
        Some(&TripDataError::OutOfRange {
            year: 2020,
            month: 13
        })
    );

    let err = average_trip_length(&source, 2008, 1).unwrap_err();
    assert!(err.to_string().contains("year=2008"));

    assert!(source.client().requests.borrow().is_empty());
}

#[test]
fn test_missing_remote_month_propagates() {
    let (source, _temp_dir) = fixture_source();

    assert!(average_trip_length(&source, 2021, 6).is_err());
    assert!(!source.cache().contains(MonthKey::new(2021, 6)));
}

#[test]
fn test_rolling_28_days_stays_in_january() {
    let (source, _temp_dir) = fixture_source();

    assert_close(rolling_average(&source, 2020, 1, 1, 28).unwrap(), 2.5);
    assert_eq!(
        source.client().requested_months(),
        vec!["yellow_tripdata_2020-01.csv"]
    );
}

#[test]
fn test_rolling_45_days_uses_january_and_february() {
    let (source, _temp_dir) = fixture_source();

    assert_close(rolling_average(&source, 2020, 1, 1, 45).unwrap(), 18.0 / 7.0);
    assert_eq!(
        source.client().requested_months(),
        vec!["yellow_tripdata_2020-01.csv", "yellow_tripdata_2020-02.csv"]
    );
}

#[test]
fn test_rolling_60_days_reaches_march() {
    let (source, _temp_dir) = fixture_source();

    assert_close(rolling_average(&source, 2020, 1, 1, 60).unwrap(), 34.0 / 9.0);
    assert_eq!(
        source.client().requested_months(),
        vec![
            "yellow_tripdata_2020-01.csv",
            "yellow_tripdata_2020-02.csv",
            "yellow_tripdata_2020-03.csv"
        ]
    );
}

#[test]
fn test_rolling_mid_month_start_takes_february_whole() {
    let (source, _temp_dir) = fixture_source();

    assert_close(rolling_average(&source, 2020, 1, 20, 45).unwrap(), 30.0 / 7.0);
}

#[test]
fn test_rolling_reuses_cached_months() {
    let (source, _temp_dir) = fixture_source();

    rolling_average(&source, 2020, 1, 1, 45).unwrap();
    rolling_average(&source, 2020, 1, 1, 60).unwrap();

    assert_eq!(
        source.client().requested_months(),
        vec![
            "yellow_tripdata_2020-01.csv",
            "yellow_tripdata_2020-02.csv",
            "yellow_tripdata_2020-03.csv"
        ]
    );
    assert_eq!(
        source.cache().list().unwrap(),
        DateWindow::starting(2020, 1, 1, 90).unwrap().months()
    );
}
