pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod month;
pub mod output;
pub mod source;
pub mod stats;
pub mod trips;
pub mod window;

pub use error::TripDataError;
pub use month::MonthKey;
pub use source::TripSource;
pub use stats::{average_trip_duration, average_trip_length};
pub use window::rolling_average;
