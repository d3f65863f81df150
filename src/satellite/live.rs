//! Per-frame live state of the tracked object
//!
//! Re-propagates at "now", moves the object and publishes a rounded readout.

use bevy::math::{DVec3, Mat3, Quat, Vec3};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::space::SceneMapper;
use crate::orbital::{KinematicSample, OrbitPropagator};

/// Scene-space speed below which the heading is considered undefined
pub const MIN_HEADING_SPEED: f32 = 1e-6;

/// Whatever the live updater moves. Implemented for Bevy's `Transform`.
pub trait TrackedObjectHandle {
    fn set_position(&mut self, position: Vec3);
    fn set_orientation(&mut self, rotation: Quat);
}

/// Receiver of the once-per-frame readout
pub trait ReadoutSink {
    fn publish(&mut self, readout: IssReadout);
}

impl ReadoutSink for Vec<IssReadout> {
    fn publish(&mut self, readout: IssReadout) {
        self.push(readout);
    }
}

impl ReadoutSink for Option<IssReadout> {
    fn publish(&mut self, readout: IssReadout) {
        *self = Some(readout);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionKm {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<DVec3> for PositionKm {
    fn from(v: DVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Display-ready snapshot. Angles in degrees; position is ECEF km, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssReadout {
    pub lat: f64,
    pub lon: f64,
    pub alt_km: f64,
    pub speed_kmh: f64,
    pub position_km: PositionKm,
}

impl IssReadout {
    pub fn from_sample(sample: &KinematicSample, gmst: f64) -> Option<Self> {
        let geo = sample.geodetic(gmst);
        let speed = sample.speed_kmh();
        if !geo.is_finite() || !speed.is_finite() {
            return None;
        }
        Some(Self {
            lat: round_to(geo.latitude_deg(), 4),
            lon: round_to(geo.longitude_deg(), 4),
            alt_km: round_to(geo.height_km, 2),
            speed_kmh: round_to(speed, 1),
            position_km: sample.position_ecef(gmst).into(),
        })
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Nudge applied to the forward axis when it lines up with +Y
const UP_PARALLEL_NUDGE: f32 = 1e-4;

/// Rotation whose local +Z points against `velocity`, with +Y as up.
///
/// `None` when the velocity is too small to define a heading. A heading
/// parallel to the up axis is nudged along +Z so a rotation still exists.
pub fn orientation_from_velocity(velocity: Vec3) -> Option<Quat> {
    if !velocity.is_finite() || velocity.length() < MIN_HEADING_SPEED {
        return None;
    }
    let mut z = -velocity.normalize();
    let mut x = Vec3::Y.cross(z);
    if x.length_squared() < f32::EPSILON {
        z.z += UP_PARALLEL_NUDGE;
        z = z.normalize();
        x = Vec3::Y.cross(z);
    }
    let x = x.normalize_or_zero();
    if x == Vec3::ZERO {
        return None;
    }
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)))
}

/// What one frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No orbital state loaded
    Idle,
    /// Propagation failed; nothing touched
    Skipped,
    /// Readout published, transform left as is
    ReadoutOnly,
    Updated {
        oriented: bool,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LiveStateUpdater {
    mapper: SceneMapper,
}

impl LiveStateUpdater {
    pub fn new(mapper: SceneMapper) -> Self {
        Self { mapper }
    }

    pub fn set_mapper(&mut self, mapper: SceneMapper) {
        self.mapper = mapper;
    }

    pub fn update<H, S>(
        &self,
        propagator: &OrbitPropagator,
        now: DateTime<Utc>,
        handle: &mut H,
        sink: &mut S,
    ) -> FrameOutcome
    where
        H: TrackedObjectHandle + ?Sized,
        S: ReadoutSink + ?Sized,
    {
        if !propagator.is_loaded() {
            return FrameOutcome::Idle;
        }
        let sample = match propagator.propagate(now) {
            Ok(sample) => sample,
            Err(_) => return FrameOutcome::Skipped,
        };

        let gmst = sample.gmst();
        let readout = IssReadout::from_sample(&sample, gmst);
        let position = self.mapper.to_scene_finite(sample.position_ecef(gmst));

        let outcome = match position {
            Some(position) => {
                handle.set_position(position);
                let velocity = self.mapper.to_scene(sample.velocity_ecef(gmst));
                let rotation = orientation_from_velocity(velocity);
                if let Some(rotation) = rotation {
                    handle.set_orientation(rotation);
                }
                FrameOutcome::Updated {
                    oriented: rotation.is_some(),
                }
            }
            None if readout.is_some() => FrameOutcome::ReadoutOnly,
            None => return FrameOutcome::Skipped,
        };

        if let Some(readout) = readout {
            sink.publish(readout);
        }
        outcome
    }
}
