//! Tracker configuration resources

use bevy::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the upstream TLE URL
pub const TLE_UPSTREAM_ENV: &str = "TLE_UPSTREAM_URL";
pub const DEFAULT_TLE_UPSTREAM_URL: &str = "https://celestrak.com/NORAD/elements/stations.txt";
pub const ISS_NORAD_ID: u32 = 25544;

/// Finest trail sample spacing accepted
pub const MIN_ORBIT_SAMPLE_SECONDS: f64 = 1.0;
/// Longest trail window accepted, one week
pub const MAX_ORBIT_WINDOW_MINUTES: f64 = 7.0 * 24.0 * 60.0;
/// Longest refresh period accepted for either timer
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Visualization and trail configuration
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Asset path of the tracked object's model; not interpreted by the core
    pub model_path: String,
    pub model_scale: f32,
    /// Earth sphere radius in scene units
    pub scene_earth_radius: f64,
    /// How far ahead the trail reaches
    pub orbit_window_minutes: f64,
    /// Spacing between trail samples
    pub orbit_sample_seconds: f64,
    pub trail_refresh_interval: Duration,
    pub tle_refresh_interval: Duration,
    pub trail_color: Color,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            model_path: "models/ISS_stationary.glb".to_string(),
            model_scale: 0.002,
            scene_earth_radius: 2.0,
            orbit_window_minutes: 90.0,
            orbit_sample_seconds: 15.0,
            trail_refresh_interval: Duration::from_secs(1),
            tle_refresh_interval: Duration::from_secs(30 * 60),
            trail_color: Color::srgba_u8(0x4a, 0x90, 0xe2, 242),
        }
    }
}

impl TrackerConfig {
    /// Replace non-positive or non-finite numeric settings with defaults and
    /// clamp the rest into workable ranges.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.scene_earth_radius) {
            self.scene_earth_radius = defaults.scene_earth_radius;
        }
        if !valid(self.orbit_window_minutes) {
            self.orbit_window_minutes = defaults.orbit_window_minutes;
        }
        if !valid(self.orbit_sample_seconds) {
            self.orbit_sample_seconds = defaults.orbit_sample_seconds;
        }
        self.orbit_window_minutes = self.orbit_window_minutes.min(MAX_ORBIT_WINDOW_MINUTES);
        self.orbit_sample_seconds = self.orbit_sample_seconds.max(MIN_ORBIT_SAMPLE_SECONDS);
        if self.trail_refresh_interval.is_zero() {
            self.trail_refresh_interval = defaults.trail_refresh_interval;
        }
        if self.tle_refresh_interval.is_zero() {
            self.tle_refresh_interval = defaults.tle_refresh_interval;
        }
        self.trail_refresh_interval = self.trail_refresh_interval.min(MAX_REFRESH_INTERVAL);
        self.tle_refresh_interval = self.tle_refresh_interval.min(MAX_REFRESH_INTERVAL);
        self
    }
}

/// Where and how TLE text is obtained
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TleSourceConfig {
    pub norad_id: u32,
    pub upstream_url: String,
    /// Bundled copy used when the upstream is unreachable
    pub local_fallback_path: PathBuf,
    /// A cached copy younger than this is served without hitting the network
    pub revalidate: Duration,
    /// Cached entries whose epoch is older than this are ignored
    pub cache_expiration_days: i64,
    pub request_timeout: Duration,
    pub use_disk_cache: bool,
}

impl Default for TleSourceConfig {
    fn default() -> Self {
        Self {
            norad_id: ISS_NORAD_ID,
            upstream_url: DEFAULT_TLE_UPSTREAM_URL.to_string(),
            local_fallback_path: PathBuf::from("assets").join("tle").join("iss.txt"),
            revalidate: Duration::from_secs(2 * 60 * 60),
            cache_expiration_days: 7,
            request_timeout: Duration::from_secs(10),
            use_disk_cache: true,
        }
    }
}

impl TleSourceConfig {
    /// Defaults with the upstream URL taken from `TLE_UPSTREAM_URL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(TLE_UPSTREAM_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                config.upstream_url = url.to_string();
            }
        }
        config
    }
}
