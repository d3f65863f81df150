//! Visualization module
//!
//! Earth, the ISS model, its orbit trail and the scene lights.

use bevy::prelude::*;

pub mod earth;
pub mod iss;
pub mod lighting;

pub use earth::EarthPlugin;
pub use iss::{apply_model_scale_system, draw_orbit_trail, spawn_iss, sphere_in_view};
pub use lighting::{SunLight, spawn_lights};

/// Plugin for scene rendering systems
pub struct VisualizationPlugin;

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EarthPlugin)
            .add_systems(Startup, (spawn_lights, spawn_iss))
            .add_systems(Update, (apply_model_scale_system, draw_orbit_trail));
    }
}
