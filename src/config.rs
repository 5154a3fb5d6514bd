//! Runtime settings read from the environment (and `.env`).

use std::env;
use std::path::PathBuf;

use crate::fetch::DEFAULT_BASE_URL;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_FILE: &str = "logs/taxi_trip_stats.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the cached monthly CSV files.
    pub data_dir: PathBuf,
    /// Remote location the monthly files are downloaded from.
    pub base_url: String,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            base_url: DEFAULT_BASE_URL.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    /// Reads `TAXI_DATA_DIR`, `TAXI_BASE_URL` and `LOG_FILE_PATH`, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: lookup("TAXI_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            base_url: lookup("TAXI_BASE_URL")
                .map_or(defaults.base_url, |url| url.trim_end_matches('/').to_string()),
            log_file: lookup("LOG_FILE_PATH").map_or(defaults.log_file, PathBuf::from),
        }
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, base_url: Option<String>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(url) = base_url {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        self
    }
}
