//! Month-level access to trip data: cache first, network second.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cache::TripCache;
use crate::fetch::{HttpClient, month_url};
use crate::month::MonthKey;
use crate::trips::{TripRecord, parse_trips};

/// Downloads slower than this are logged as a warning.
const SLOW_DOWNLOAD_SECS: u64 = 30;

/// Serves monthly trip records from a local [`TripCache`], downloading
/// missing months from `base_url` through `client`.
pub struct TripSource<C> {
    client: C,
    cache: TripCache,
    base_url: String,
}

impl<C: HttpClient> TripSource<C> {
    pub fn new(client: C, cache: TripCache, base_url: impl Into<String>) -> Self {
        Self {
            client,
            cache,
            base_url: base_url.into(),
        }
    }

    pub fn cache(&self) -> &TripCache {
        &self.cache
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Downloads `key` unconditionally, parses it, stores the body verbatim
    /// in the cache and returns the parsed records. A body that does not
    /// parse is never cached.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::error::TripDataError::OutOfRange`] before any
    /// request is made when the dataset does not publish `key`. Transport,
    /// HTTP status and parse failures are returned as-is; nothing is retried.
    #[tracing::instrument(skip(self), fields(month = %key))]
    pub fn fetch_month(&self, key: MonthKey) -> Result<Vec<TripRecord>> {
        let body = self.download(key)?;
        let trips = parse_trips(body.as_slice())?;
        self.cache.store(key, &body)?;
        Ok(trips)
    }

    /// Returns the records for `key`, reading the cached copy when present.
    pub fn get_month(&self, key: MonthKey) -> Result<Vec<TripRecord>> {
        if self.cache.contains(key) {
            debug!(month = %key, "Cache hit");
            return self.cache.load(key);
        }

        debug!(month = %key, "Cache miss");
        self.fetch_month(key)
    }

    /// Downloads `key` only if it is not cached yet and returns its cache
    /// path. Returns whether a download happened alongside the path. As with
    /// [`TripSource::fetch_month`], a body that does not parse is not stored.
    #[tracing::instrument(skip(self), fields(month = %key))]
    pub fn ensure_cached(&self, key: MonthKey) -> Result<(PathBuf, bool)> {
        if self.cache.contains(key) {
            return Ok((self.cache.path_for(key), false));
        }

        let body = self.download(key)?;
        parse_trips(body.as_slice())?;
        let path = self.cache.store(key, &body)?;
        Ok((path, true))
    }

    fn download(&self, key: MonthKey) -> Result<Vec<u8>> {
        key.ensure_available()?;

        let url = month_url(&self.base_url, key);
        info!(url = %url, "Downloading month");

        let started = Instant::now();
        let body = self.client.get_bytes(&url)?;
        let elapsed = started.elapsed();
        if elapsed.as_secs() > SLOW_DOWNLOAD_SECS {
            warn!(elapsed_secs = elapsed.as_secs(), "Month download was slow");
        }
        info!(bytes = body.len(), elapsed_ms = elapsed.as_millis() as u64, "Download complete");

        Ok(body)
    }
}
