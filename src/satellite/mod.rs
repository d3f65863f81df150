//! Satellite tracking module
//!
//! Live position/orientation of the tracked object and its forward orbit
//! trail, plus the Bevy systems that drive them.

use bevy::prelude::*;

pub mod components;
pub mod live;
pub mod resources;
pub mod systems;
pub mod trail;
pub mod tracker;

pub use components::TrackedIss;
pub use live::{IssReadout, LiveStateUpdater, ReadoutSink, TrackedObjectHandle};
pub use resources::IssReadoutRes;
pub use systems::{
    apply_config_system, live_state_system, start_tracker_system, teardown_on_removal_system,
    trail_refresh_system,
};
pub use trail::{OrbitTrailBuilder, TrailBuffer, TrailConfig, TrailState};
pub use tracker::IssTracker;

use crate::config::TrackerConfig;

/// Plugin for ISS propagation and trail maintenance
pub struct SatellitePlugin;

impl Plugin for SatellitePlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<TrackerConfig>()
            .cloned()
            .unwrap_or_default();
        app.insert_resource(IssTracker::new(config.clone()))
            .insert_resource(config)
            .init_resource::<IssReadoutRes>()
            .add_systems(Startup, start_tracker_system)
            .add_systems(
                Update,
                (
                    apply_config_system,
                    trail_refresh_system,
                    live_state_system,
                    teardown_on_removal_system,
                )
                    .chain(),
            );
    }
}
