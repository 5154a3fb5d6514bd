//! Report formatting and persistence.
//!
//! Supports plain and JSON rendering for the console, and CSV append.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Mean trip distance in miles.
    MeanTripDistance,
    /// Mean pickup-to-dropoff time in minutes.
    MeanTripDuration,
}

/// One computed statistic, as printed and as appended to a CSV log.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub computed_at: DateTime<Utc>,
    pub metric: Metric,
    /// `2020-01` for a month, `2020-01-01..2020-02-15` for a window.
    pub period: String,
    pub value: f64,
}

impl Report {
    pub fn new(metric: Metric, period: impl Into<String>, value: f64) -> Self {
        Self {
            computed_at: Utc::now(),
            metric,
            period: period.into(),
            value,
        }
    }
}

/// Renders a report for the console: the bare value, or pretty JSON.
pub fn render(report: &Report, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(report)?)
    } else {
        Ok(report.value.to_string())
    }
}

/// Appends a [`Report`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, report: &Report) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(report)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn report() -> Report {
        Report::new(Metric::MeanTripDistance, "2020-01", 2.5)
    }

    #[test]
    fn test_render_plain_is_value() {
        assert_eq!(render(&report(), false).unwrap(), "2.5");
    }

    #[test]
    fn test_render_json() {
        let out = render(&report(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["metric"], "mean_trip_distance");
        assert_eq!(value["period"], "2020-01");
        assert_eq!(value["value"], 2.5);
    }

    #[test]
    fn test_append_record_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports.csv");

        append_record(&path, &report()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("computed_at,metric,period,value"));
        assert!(content.contains("mean_trip_distance,2020-01,2.5"));
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports.csv");

        append_record(&path, &report()).unwrap();
        append_record(
            &path,
            &Report::new(Metric::MeanTripDuration, "2020-01-01..2020-02-15", 14.0),
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines.iter().filter(|l| l.contains("computed_at")).count(),
            1
        );
        assert!(lines[2].contains("mean_trip_duration"));
    }
}
