//! TLE disk caching module
//!
//! Keeps the last good TLE on disk. A copy younger than the revalidation
//! window is served without touching the network; older copies are only
//! trusted while their epoch is within the expiration threshold.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::tle::types::TleSet;

/// Serialized cache entry stored as JSON on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedTle {
    pub norad: u32,
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
    pub epoch_utc: DateTime<Utc>,
    pub cached_at: DateTime<Utc>,
}

impl CachedTle {
    pub fn from_tle(norad: u32, tle: &TleSet, cached_at: DateTime<Utc>) -> Self {
        Self {
            norad,
            name: tle.name.clone(),
            line1: tle.line1.clone(),
            line2: tle.line2.clone(),
            epoch_utc: tle.epoch_utc,
            cached_at,
        }
    }

    pub fn to_tle(&self) -> TleSet {
        TleSet {
            name: self.name.clone(),
            line1: self.line1.clone(),
            line2: self.line2.clone(),
            epoch_utc: self.epoch_utc,
        }
    }
}

/// TLE disk cache manager
#[derive(Debug, Clone)]
pub struct TleCache {
    cache_dir: PathBuf,
    expiration_days: i64,
    revalidate: Duration,
}

impl TleCache {
    /// Create a cache in the platform cache directory:
    /// - macOS: ~/Library/Caches/iss_tracker/tle/
    /// - Linux: ~/.cache/iss_tracker/tle/
    /// - Windows: %LOCALAPPDATA%\iss_tracker\tle\
    pub fn new(expiration_days: i64, revalidate: std::time::Duration) -> anyhow::Result<Self> {
        let proj_dirs = ProjectDirs::from("", "", "iss_tracker")
            .ok_or_else(|| anyhow::anyhow!("Failed to resolve cache directory"))?;

        let cache_dir = proj_dirs.cache_dir().join("tle");
        Self::new_in_dir(cache_dir, expiration_days, revalidate)
    }

    /// Create a new TLE cache rooted at a specific directory
    pub fn new_in_dir(
        cache_dir: PathBuf,
        expiration_days: i64,
        revalidate: std::time::Duration,
    ) -> anyhow::Result<Self> {
        fs::create_dir_all(&cache_dir)?;

        Ok(Self {
            cache_dir,
            expiration_days,
            revalidate: Duration::from_std(revalidate)?,
        })
    }

    /// Read a cached TLE entry by NORAD ID.
    ///
    /// Returns Ok(None) on a cache miss, Err if the file exists but is unreadable.
    pub fn read(&self, norad: u32) -> anyhow::Result<Option<CachedTle>> {
        let path = self.cache_path(norad);

        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let cached: CachedTle = serde_json::from_str(&contents)?;

        Ok(Some(cached))
    }

    /// Write a TLE entry to disk cache, replacing any previous one
    pub fn write(&self, entry: &CachedTle) -> anyhow::Result<()> {
        let path = self.cache_path(entry.norad);
        let contents = serde_json::to_string_pretty(entry)?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// True while the TLE epoch is within the expiration threshold
    pub fn is_valid(&self, entry: &CachedTle, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.epoch_utc) < Duration::days(self.expiration_days)
    }

    /// True while the entry was written within the revalidation window
    pub fn is_fresh(&self, entry: &CachedTle, now: DateTime<Utc>) -> bool {
        self.is_valid(entry, now) && now.signed_duration_since(entry.cached_at) < self.revalidate
    }

    fn cache_path(&self, norad: u32) -> PathBuf {
        self.cache_dir.join(format!("{}.json", norad))
    }
}
