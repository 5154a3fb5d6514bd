//! On-disk cache of monthly trip files.
//!
//! Each month is stored as a verbatim copy of the remote CSV under its
//! original file name. A cached file is authoritative: it is never refreshed
//! or compared against the remote copy.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::month::MonthKey;
use crate::trips::{TripRecord, read_trips_file};

#[derive(Debug, Clone)]
pub struct TripCache {
    dir: PathBuf,
}

impl TripCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the cached file for `key`, whether or not it exists.
    pub fn path_for(&self, key: MonthKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Whether `key` has already been downloaded. Never touches the disk
    /// beyond a metadata lookup.
    pub fn contains(&self, key: MonthKey) -> bool {
        self.path_for(key).is_file()
    }

    /// Writes the raw CSV body for `key`, creating the cache directory if
    /// needed.
    pub fn store(&self, key: MonthKey, body: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating cache directory {}", self.dir.display()))?;

        let path = self.path_for(key);
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        debug!(month = %key, path = %path.display(), bytes = body.len(), "Cached month");

        Ok(path)
    }

    pub fn load(&self, key: MonthKey) -> Result<Vec<TripRecord>> {
        read_trips_file(&self.path_for(key))
    }

    /// All months currently cached, in chronological order. Files that do
    /// not follow the naming convention are skipped.
    pub fn list(&self) -> Result<Vec<MonthKey>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(key) = entry.file_name().to_str().and_then(MonthKey::from_file_name) {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }
}
