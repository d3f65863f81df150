//! Header and live readout bar drawn over the 3D view

use bevy::prelude::*;

use crate::satellite::{IssReadout, IssReadoutRes};

pub const TITLE: &str = "International Space Station Tracker";
pub const SUBTITLE: &str = "Watch the ISS orbiting Earth in real-time!";

const PANEL_BG: Color = Color::srgba(0.0, 0.0, 0.0, 0.3);

/// Which readout value a text node shows
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadoutField {
    Lat,
    Lon,
    Altitude,
    Velocity,
}

impl ReadoutField {
    pub const ALL: [ReadoutField; 4] = [
        ReadoutField::Lat,
        ReadoutField::Lon,
        ReadoutField::Altitude,
        ReadoutField::Velocity,
    ];

    /// Label and value; placeholders until the first readout arrives
    pub fn format(self, readout: Option<&IssReadout>) -> String {
        match (self, readout) {
            (ReadoutField::Lat, Some(r)) => format!("Lat: {:.4}", r.lat),
            (ReadoutField::Lon, Some(r)) => format!("Lon: {:.4}", r.lon),
            (ReadoutField::Altitude, Some(r)) => format!("Altitude: {:.2} km", r.alt_km),
            (ReadoutField::Velocity, Some(r)) => format!("Velocity: {:.2} km/h", r.speed_kmh),
            (ReadoutField::Lat, None) => "Lat: --".to_string(),
            (ReadoutField::Lon, None) => "Lon: --".to_string(),
            (ReadoutField::Altitude, None) => "Altitude: -- km".to_string(),
            (ReadoutField::Velocity, None) => "Velocity: -- km/h".to_string(),
        }
    }
}

pub fn spawn_overlay(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                left: Val::Px(0.0),
                width: Val::Percent(100.0),
                padding: UiRect::all(Val::Px(16.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                ..default()
            },
            BackgroundColor(PANEL_BG),
            Name::new("Header"),
        ))
        .with_children(|header| {
            header.spawn((
                Text::new(TITLE),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            header.spawn((
                Text::new(SUBTITLE),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::srgb(0.82, 0.84, 0.86)),
            ));
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(0.0),
                left: Val::Px(0.0),
                width: Val::Percent(100.0),
                padding: UiRect::all(Val::Px(16.0)),
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            },
            BackgroundColor(PANEL_BG),
            Name::new("Readout Bar"),
        ))
        .with_children(|bar| {
            for field in ReadoutField::ALL {
                bar.spawn((
                    Text::new(field.format(None)),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    field,
                ));
            }
        });
}

/// Rewrite the readout texts whenever a new readout is published
pub fn update_readout_text(
    readout: Res<IssReadoutRes>,
    mut texts: Query<(&ReadoutField, &mut Text)>,
) {
    if !readout.is_changed() {
        return;
    }
    for (field, mut text) in texts.iter_mut() {
        text.0 = field.format(readout.latest.as_ref());
    }
}
