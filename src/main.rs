use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{RenderCreation, WgpuSettings};
use bevy::window::{PresentMode, Window, WindowPlugin};

use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};

#[cfg(feature = "dev")]
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;

use iss_tracker::IssTrackerPlugins;
use iss_tracker::config::{TleSourceConfig, TrackerConfig};
use iss_tracker::ui::MainCamera;

// Setup camera
pub fn setup(mut commands: Commands) {
    let initial_distance = 8.0;

    let pan_orbit = PanOrbitCamera {
        focus: Vec3::ZERO,
        radius: Some(initial_distance),
        yaw: Some(0.0),
        pitch: Some(0.0),
        zoom_lower_limit: 3.0,
        zoom_upper_limit: Some(20.0),
        force_update: true,
        ..default()
    };

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 45.0_f32.to_radians(),
            near: 0.01,
            far: 1_000.0,
            ..default()
        }),
        Camera {
            order: 0,
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        pan_orbit,
        MainCamera,
        Tonemapping::TonyMcMapface,
        Transform::from_xyz(0.0, 0.0, initial_distance).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn main() {
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "ISS Tracker".to_string(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            })
            .set(RenderPlugin {
                render_creation: RenderCreation::Automatic(WgpuSettings { ..default() }),
                ..default()
            }),
    );

    #[cfg(feature = "dev")]
    app.add_plugins(FpsOverlayPlugin::default());

    app.insert_resource(TrackerConfig::default())
        .insert_resource(TleSourceConfig::from_env())
        .add_plugins(PanOrbitCameraPlugin)
        .add_plugins(IssTrackerPlugins)
        .add_systems(Startup, setup)
        .run();
}
