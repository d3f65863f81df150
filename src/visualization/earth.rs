use bevy::prelude::*;

use crate::config::TrackerConfig;

pub const EARTH_TEXTURE: &str = "textures/earth_day_4k.jpg";

/// Plugin for Earth rendering
pub struct EarthPlugin;

impl Plugin for EarthPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_earth)
            .add_systems(Update, rescale_earth_system);
    }
}

#[derive(Component)]
pub struct Earth;

/// Spawn the textured Earth sphere at the scene origin, sized to the mapper radius.
///
/// The mesh is a unit sphere; the radius lives in the transform scale so a
/// config change only has to touch the transform.
pub fn spawn_earth(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    config: Res<TrackerConfig>,
) {
    let radius = config.clone().sanitized().scene_earth_radius as f32;
    let mesh = meshes.add(Sphere::new(1.0).mesh().uv(64, 64));
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(asset_server.load(EARTH_TEXTURE)),
        perceptual_roughness: 1.0,
        ..default()
    });

    commands.spawn((
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_scale(Vec3::splat(radius)),
        Visibility::Visible,
        Earth,
        Name::new("Earth"),
    ));
}

/// Keep the Earth sphere in step with `scene_earth_radius` edits
pub fn rescale_earth_system(
    config: Res<TrackerConfig>,
    mut q: Query<&mut Transform, With<Earth>>,
) {
    if !config.is_changed() || config.is_added() {
        return;
    }
    let radius = config.clone().sanitized().scene_earth_radius as f32;
    for mut transform in &mut q {
        transform.scale = Vec3::splat(radius);
    }
}
