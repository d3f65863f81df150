//! TLE (Two-Line Element) data management module
//!
//! This module handles TLE fetching, caching and parsing for the tracked
//! object, with Celestrak as the upstream source.

use bevy::prelude::*;

pub mod cache;
pub mod fetcher;
pub mod parser;
pub mod systems;
pub mod types;

#[cfg(test)]
pub mod mock_data;

pub use fetcher::{HttpTleSource, start_tle_worker};
pub use systems::{process_fetch_results_system, request_tle_refresh_system};
pub use types::{FetchChannels, FetchCommand, FetchResultMsg, TleOrigin, TleSet};

use crate::config::TleSourceConfig;

/// Plugin for TLE data management and processing
pub struct TlePlugin;

impl Plugin for TlePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<TleSourceConfig>() {
            app.insert_resource(TleSourceConfig::from_env());
        }
        app.add_systems(Startup, setup_tle_worker).add_systems(
            Update,
            (request_tle_refresh_system, process_fetch_results_system).chain(),
        );
    }
}

/// Setup system to start the TLE worker
fn setup_tle_worker(mut commands: Commands, config: Res<TleSourceConfig>) {
    match HttpTleSource::new(config.clone()) {
        Ok(source) => {
            info!(
                "[INIT] TLE worker started (norad={}, upstream={})",
                config.norad_id, config.upstream_url
            );
            commands.insert_resource(start_tle_worker(source));
        }
        Err(e) => warn!("[INIT] TLE worker not started: {}", e),
    }
}
