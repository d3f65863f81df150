//! Scene-space mapping
//!
//! The renderer draws the Earth as a sphere of `scene_earth_radius` units with
//! +Y up. ECEF has +Z through the north pole, so the mapping both scales
//! kilometers down and rotates the axes: scene (x, y, z) = (ECEF.x, ECEF.z, -ECEF.y).

use bevy::math::{DVec3, Vec3};

use crate::core::coordinates::EARTH_RADIUS_KM;

/// Pure ECEF km -> scene units mapping.
///
/// The live marker and every trail sample must go through the same instance,
/// otherwise the trail drifts away from the marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneMapper {
    scale: f64,
}

impl SceneMapper {
    pub fn new(scene_earth_radius: f64) -> Self {
        Self {
            scale: scene_earth_radius / EARTH_RADIUS_KM,
        }
    }

    /// Render units per kilometer.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_scene(&self, ecef_km: DVec3) -> Vec3 {
        ecef_axes_to_scene(ecef_km * self.scale).as_vec3()
    }

    /// Like [`Self::to_scene`] but returns `None` when any component is NaN or infinite.
    pub fn to_scene_finite(&self, ecef_km: DVec3) -> Option<Vec3> {
        let scene = self.to_scene(ecef_km);
        scene.is_finite().then_some(scene)
    }
}

impl Default for SceneMapper {
    fn default() -> Self {
        Self::new(2.0)
    }
}

/// Axis permutation only: (x, y, z) -> (x, z, -y)
pub fn ecef_axes_to_scene(v: DVec3) -> DVec3 {
    DVec3::new(v.x, v.z, -v.y)
}
