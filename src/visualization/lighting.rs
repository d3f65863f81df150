//! Scene lighting

use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;

/// Marker component for the key directional light
#[derive(Component)]
pub struct SunLight;

/// Dim ambient fill, a key light from (5, 5, 5) and a weaker point light
/// from the opposite side
pub fn spawn_lights(mut commands: Commands) {
    commands.insert_resource(GlobalAmbientLight {
        brightness: 150.0,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        SunLight,
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("Key Light"),
    ));

    commands.spawn((
        PointLight {
            intensity: 400_000.0,
            range: 40.0,
            ..default()
        },
        Transform::from_xyz(-5.0, -5.0, -5.0),
        Name::new("Fill Light"),
    ));
}
