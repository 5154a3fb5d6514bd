mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::month::MonthKey;

/// Public location of the yellow-taxi trip files.
pub const DEFAULT_BASE_URL: &str = "https://s3.amazonaws.com/nyc-tlc/trip+data";

/// Remote URL of the CSV file for `key` under `base_url`.
pub fn month_url(base_url: &str, key: MonthKey) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key.file_name())
}
