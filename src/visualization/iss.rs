//! ISS model and forward orbit trail rendering

use bevy::math::bounding::BoundingSphere;
use bevy::prelude::*;

use crate::config::TrackerConfig;
use crate::satellite::{IssTracker, TrackedIss};
use crate::ui::MainCamera;

/// Spawn the ISS glTF scene as the tracked entity. Its transform is driven by
/// the live state system; until the first TLE arrives it sits at the origin.
pub fn spawn_iss(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<TrackerConfig>,
) {
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(config.model_path.clone()));
    commands.spawn((
        SceneRoot(scene),
        Transform::from_scale(Vec3::splat(config.model_scale)),
        Visibility::Visible,
        TrackedIss,
        Name::new("ISS"),
    ));
}

/// Follow `model_scale` edits. Translation and rotation stay with the live state system.
pub fn apply_model_scale_system(
    config: Res<TrackerConfig>,
    mut q: Query<&mut Transform, With<TrackedIss>>,
) {
    if !config.is_changed() || config.is_added() {
        return;
    }
    for mut transform in &mut q {
        transform.scale = Vec3::splat(config.model_scale);
    }
}

/// Draw the visible prefix of the trail as one line strip, skipping it when
/// its bounding sphere is entirely outside the main camera's view.
pub fn draw_orbit_trail(
    tracker: Res<IssTracker>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut gizmos: Gizmos,
) {
    let trail = tracker.trail();
    let points = trail.visible();
    if points.len() < 2 {
        return;
    }
    if let (Some(bounds), Ok((camera, camera_transform))) = (trail.bounds(), cameras.single()) {
        let view_from_world = Mat4::from(camera_transform.affine().inverse());
        let clip_from_world = camera.clip_from_view() * view_from_world;
        if !sphere_in_view(&bounds, &clip_from_world) {
            return;
        }
    }
    gizmos.linestrip(points.iter().copied(), tracker.config().trail_color);
}

/// Conservative sphere test against the frustum planes of `clip_from_world`.
///
/// Planes are extracted Gribb-Hartmann style for a 0..1 depth range. Degenerate
/// planes, such as the far plane of an infinite projection, are ignored.
pub fn sphere_in_view(bounds: &BoundingSphere, clip_from_world: &Mat4) -> bool {
    let r0 = clip_from_world.row(0);
    let r1 = clip_from_world.row(1);
    let r2 = clip_from_world.row(2);
    let r3 = clip_from_world.row(3);
    let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2];

    let center = Vec3::from(bounds.center);
    let radius = bounds.radius();
    planes.iter().all(|plane| {
        let normal = plane.truncate();
        let length = normal.length();
        if length < f32::EPSILON {
            return true;
        }
        (normal.dot(center) + plane.w) / length >= -radius
    })
}
