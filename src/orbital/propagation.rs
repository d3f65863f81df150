//! SGP4 orbit propagation
//!
//! Wraps `sgp4::Constants` behind an explicit success/failure result so that
//! callers never have to guess whether a prediction is usable.

use bevy::math::DVec3;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use crate::core::coordinates::{Geodetic, eci_to_ecef_km, eci_to_geodetic, gmst_rad};
use crate::tle::TleSet;
use crate::tle::parser::parse_tle_epoch_to_utc;

/// Why a sample could not be produced
#[derive(Debug, Clone, PartialEq)]
pub enum PropagationError {
    /// No orbital elements have been loaded yet
    NoElements,
    /// The TLE could not be turned into SGP4 constants
    InvalidElements(String),
    /// SGP4 reported a numerical failure (decay, diverging eccentricity, ...)
    Diverged(String),
    /// Position or velocity contained NaN or infinity
    NonFinite,
}

impl fmt::Display for PropagationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropagationError::NoElements => write!(f, "no orbital elements loaded"),
            PropagationError::InvalidElements(e) => write!(f, "invalid elements: {}", e),
            PropagationError::Diverged(e) => write!(f, "propagation diverged: {}", e),
            PropagationError::NonFinite => write!(f, "non-finite state vector"),
        }
    }
}

impl std::error::Error for PropagationError {}

/// Calculate minutes since epoch for SGP4 propagation
pub fn minutes_since_epoch(sim_utc: DateTime<Utc>, epoch: DateTime<Utc>) -> f64 {
    let delta = sim_utc - epoch;
    delta.num_seconds() as f64 / 60.0 + (delta.subsec_nanos() as f64) / 60.0 / 1.0e9
}

/// Inertial state vector at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicSample {
    pub time: DateTime<Utc>,
    /// TEME position, km
    pub position_eci: DVec3,
    /// TEME velocity, km/s
    pub velocity_eci: DVec3,
}

impl KinematicSample {
    /// Build a sample, rejecting any NaN/infinite component.
    pub fn checked(
        time: DateTime<Utc>,
        position_eci: DVec3,
        velocity_eci: DVec3,
    ) -> Result<Self, PropagationError> {
        if !position_eci.is_finite() || !velocity_eci.is_finite() {
            return Err(PropagationError::NonFinite);
        }
        Ok(Self {
            time,
            position_eci,
            velocity_eci,
        })
    }

    pub fn gmst(&self) -> f64 {
        gmst_rad(self.time)
    }

    pub fn position_ecef(&self, gmst: f64) -> DVec3 {
        eci_to_ecef_km(self.position_eci, gmst)
    }

    pub fn velocity_ecef(&self, gmst: f64) -> DVec3 {
        eci_to_ecef_km(self.velocity_eci, gmst)
    }

    pub fn geodetic(&self, gmst: f64) -> Geodetic {
        eci_to_geodetic(self.position_eci, gmst)
    }

    /// Inertial speed, km/h
    pub fn speed_kmh(&self) -> f64 {
        self.velocity_eci.length() * 3600.0
    }
}

/// SGP4 constants derived from one TLE
pub struct OrbitalState {
    pub name: Option<String>,
    pub epoch_utc: DateTime<Utc>,
    constants: sgp4::Constants,
}

impl fmt::Debug for OrbitalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrbitalState")
            .field("name", &self.name)
            .field("epoch_utc", &self.epoch_utc)
            .finish_non_exhaustive()
    }
}

impl OrbitalState {
    /// Parse the TLE and build SGP4 constants: TLE -> Elements -> Constants
    pub fn from_tle(tle: &TleSet) -> Result<Self, PropagationError> {
        let elements = sgp4::Elements::from_tle(
            tle.name.clone(),
            tle.line1.as_bytes(),
            tle.line2.as_bytes(),
        )
        .map_err(|e| PropagationError::InvalidElements(e.to_string()))?;
        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| PropagationError::InvalidElements(e.to_string()))?;
        let epoch_utc = parse_tle_epoch_to_utc(&tle.line1).unwrap_or(tle.epoch_utc);

        Ok(Self {
            name: tle.name.clone(),
            epoch_utc,
            constants,
        })
    }

    pub fn propagate(&self, t: DateTime<Utc>) -> Result<KinematicSample, PropagationError> {
        let mins = minutes_since_epoch(t, self.epoch_utc);
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(mins))
            .map_err(|e| PropagationError::Diverged(e.to_string()))?;
        KinematicSample::checked(
            t,
            DVec3::from_array(prediction.position),
            DVec3::from_array(prediction.velocity),
        )
    }
}

/// Holds the current orbital state; replaced wholesale when a new TLE lands.
#[derive(Debug, Clone, Default)]
pub struct OrbitPropagator {
    state: Option<Arc<OrbitalState>>,
}

impl OrbitPropagator {
    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&Arc<OrbitalState>> {
        self.state.as_ref()
    }

    /// Build a new state from `tle` and swap it in. On error the previous
    /// state stays in effect.
    pub fn load_tle(&mut self, tle: &TleSet) -> Result<Arc<OrbitalState>, PropagationError> {
        let state = Arc::new(OrbitalState::from_tle(tle)?);
        self.state = Some(Arc::clone(&state));
        Ok(state)
    }

    pub fn clear(&mut self) {
        self.state = None;
    }

    pub fn propagate(&self, t: DateTime<Utc>) -> Result<KinematicSample, PropagationError> {
        match &self.state {
            Some(state) => state.propagate(t),
            None => Err(PropagationError::NoElements),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tle::mock_data::mock_iss_tle;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_minutes_since_epoch() {
        let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let sim_time = Utc.with_ymd_and_hms(2000, 1, 1, 1, 0, 0).unwrap();
        assert!((minutes_since_epoch(sim_time, epoch) - 60.0).abs() < 1e-10);

        let sim_time_frac = Utc.with_ymd_and_hms(2000, 1, 1, 0, 1, 30).unwrap();
        assert!((minutes_since_epoch(sim_time_frac, epoch) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_minutes_since_epoch_negative() {
        let epoch = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let before = epoch - Duration::seconds(90);
        assert!((minutes_since_epoch(before, epoch) + 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_minutes_since_epoch_high_precision() {
        let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let micro_time = epoch + Duration::microseconds(1);
        let expected = 1.0 / (60.0 * 1_000_000.0);
        assert!((minutes_since_epoch(micro_time, epoch) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_iss_at_epoch_is_in_low_earth_orbit() {
        let tle = mock_iss_tle();
        let state = OrbitalState::from_tle(&tle).expect("valid TLE");
        let sample = state.propagate(state.epoch_utc).expect("sample at epoch");

        let r = sample.position_eci.length();
        assert!((6700.0..=6900.0).contains(&r), "|r| = {} km", r);

        let speed = sample.speed_kmh();
        assert!((26_000.0..=29_000.0).contains(&speed), "speed = {} km/h", speed);
    }

    #[test]
    fn test_geodetic_bounds_over_one_day() {
        let tle = mock_iss_tle();
        let state = OrbitalState::from_tle(&tle).expect("valid TLE");
        for step in 0..=144 {
            let t = state.epoch_utc + Duration::minutes(step * 10);
            let sample = state.propagate(t).expect("sample");
            let geo = sample.geodetic(sample.gmst());
            let (lat, lon) = (geo.latitude_deg(), geo.longitude_deg());
            assert!((-90.0..=90.0).contains(&lat), "lat = {}", lat);
            assert!((-180.0..=180.0).contains(&lon), "lon = {}", lon);
            assert!(geo.height_km > 0.0, "alt = {}", geo.height_km);
            // ISS inclination bounds the reachable latitude
            assert!(lat.abs() < 52.5, "lat beyond inclination: {}", lat);
        }
    }

    #[test]
    fn test_epoch_parsed_from_line1() {
        let tle = mock_iss_tle();
        let state = OrbitalState::from_tle(&tle).expect("valid TLE");
        let expected = Utc.with_ymd_and_hms(2020, 7, 12, 0, 0, 0).unwrap();
        let diff = (state.epoch_utc - expected).num_hours();
        assert!((21..=22).contains(&diff), "epoch = {}", state.epoch_utc);
    }

    #[test]
    fn test_malformed_tle_yields_no_sample() {
        let tle = TleSet {
            name: None,
            line1: String::new(),
            line2: String::new(),
            epoch_utc: Utc::now(),
        };
        let mut propagator = OrbitPropagator::default();
        assert!(matches!(
            propagator.load_tle(&tle),
            Err(PropagationError::InvalidElements(_))
        ));
        assert!(!propagator.is_loaded());

        let now = Utc::now();
        for minutes in [0, 15, 90, 600] {
            let t = now + Duration::minutes(minutes);
            assert_eq!(propagator.propagate(t), Err(PropagationError::NoElements));
        }
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let mut propagator = OrbitPropagator::default();
        let first = propagator.load_tle(&mock_iss_tle()).expect("valid TLE");

        let broken = TleSet {
            name: None,
            line1: "1 garbage".to_string(),
            line2: "2 garbage".to_string(),
            epoch_utc: Utc::now(),
        };
        assert!(propagator.load_tle(&broken).is_err());

        let current = propagator.state().expect("state retained");
        assert!(Arc::ptr_eq(current, &first));
    }

    #[test]
    fn test_load_swaps_whole_state() {
        let mut propagator = OrbitPropagator::default();
        let first = propagator.load_tle(&mock_iss_tle()).expect("valid TLE");
        let second = propagator.load_tle(&mock_iss_tle()).expect("valid TLE");
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(propagator.state().unwrap(), &second));
    }

    #[test]
    fn test_checked_sample_rejects_non_finite() {
        let t = Utc::now();
        let ok = DVec3::new(6800.0, 0.0, 0.0);
        assert_eq!(
            KinematicSample::checked(t, DVec3::new(f64::NAN, 0.0, 0.0), ok),
            Err(PropagationError::NonFinite)
        );
        assert_eq!(
            KinematicSample::checked(t, ok, DVec3::new(0.0, f64::INFINITY, 0.0)),
            Err(PropagationError::NonFinite)
        );
        assert!(KinematicSample::checked(t, ok, ok).is_ok());
    }
}
