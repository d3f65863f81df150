//! Real-time ISS tracker
//!
//! Propagates the ISS from its latest TLE with SGP4, places a model over a
//! textured Earth and draws the next orbit ahead of it.

use bevy::prelude::*;

pub mod config;
pub mod core;
pub mod orbital;
pub mod satellite;
pub mod tle;
pub mod ui;
pub mod visualization;

pub use config::{TleSourceConfig, TrackerConfig};

use orbital::OrbitalPlugin;
use satellite::SatellitePlugin;
use tle::TlePlugin;
use ui::UiPlugin;
use visualization::VisualizationPlugin;

/// Every tracker plugin, minus windowing and camera
pub struct IssTrackerPlugins;

impl Plugin for IssTrackerPlugins {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            OrbitalPlugin,
            SatellitePlugin,
            TlePlugin,
            VisualizationPlugin,
            UiPlugin,
        ));
    }
}
