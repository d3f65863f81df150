//! User interface module
//!
//! Text overlay showing the tracker title and the live ISS readout.

use bevy::prelude::*;

pub mod overlay;

pub use overlay::{ReadoutField, spawn_overlay, update_readout_text};

/// Marker for the main 3D camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for user interface management
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_overlay)
            .add_systems(Update, update_readout_text);
    }
}
