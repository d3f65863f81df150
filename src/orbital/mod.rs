//! Orbital mechanics module
//!
//! SGP4 propagation of the tracked object and the wall-clock time sources
//! that drive it.

use bevy::prelude::*;

pub mod propagation;
pub mod time;

pub use propagation::{
    KinematicSample, OrbitPropagator, OrbitalState, PropagationError, minutes_since_epoch,
};
pub use time::{Clock, IntervalTimer, ManualClock, SystemClock, WallClock};

/// Plugin for orbital time sources
pub struct OrbitalPlugin;

impl Plugin for OrbitalPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WallClock>();
    }
}
