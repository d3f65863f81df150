//! Earth-frame transformations and time utilities
//!
//! Everything needed to take an SGP4 state vector (TEME/ECI, km) into the
//! Earth-fixed frame and on to geodetic latitude/longitude/altitude:
//! - Julian date and Greenwich Mean Sidereal Time
//! - ECI -> ECEF rotation about Z
//! - ECEF/ECI -> geodetic on the WGS-84 ellipsoid

use bevy::math::DVec3;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::f64::consts::{PI, TAU};

/// Mean Earth radius used for scene scaling.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS-84 semi-major axis (km)
pub const WGS84_A_KM: f64 = 6378.137;
/// WGS-84 semi-minor axis (km)
pub const WGS84_B_KM: f64 = 6356.7523142;

const GEODETIC_ITERATIONS: usize = 20;

/// Geodetic position. Angles are stored in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
    pub height_km: f64,
}

impl Geodetic {
    pub fn latitude_deg(&self) -> f64 {
        self.latitude.to_degrees()
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude.to_degrees()
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.height_km.is_finite()
    }
}

/// Compute the Julian Date (UTC) for a given timestamp.
/// Uses the standard Gregorian calendar to JD conversion.
pub fn julian_date_utc(t: DateTime<Utc>) -> f64 {
    let mut y = t.year();
    let mut m = t.month() as i32;
    let d = t.day() as i32;

    let hour = t.hour() as f64;
    let minute = t.minute() as f64;
    let sec = t.second() as f64 + (t.nanosecond() as f64) * 1e-9_f64;
    let day_fraction = (hour + (minute + sec / 60.0) / 60.0) / 24.0;

    if m <= 2 {
        y -= 1;
        m += 12;
    }

    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    let jd0 = (365.25 * (y as f64 + 4716.0)).floor()
        + (30.6001 * ((m + 1) as f64)).floor()
        + d as f64
        + b
        - 1524.5;

    jd0 + day_fraction
}

/// Greenwich Mean Sidereal Time (radians) using the IAU 1982 polynomial.
/// Assumes UT1 ~= UTC.
pub fn gmst_rad(t: DateTime<Utc>) -> f64 {
    let jd = julian_date_utc(t);
    let t_cent = (jd - 2451545.0) / 36525.0;

    let gmst_sec =
        67310.54841 + (876600.0 * 3600.0 + 8640184.812866) * t_cent + 0.093104 * t_cent * t_cent
            - 6.2e-6 * t_cent * t_cent * t_cent;

    gmst_sec.rem_euclid(86400.0) * (TAU / 86400.0)
}

/// Rotate ECI (TEME) -> ECEF by -GMST about Z.
///
/// Also used for velocity vectors; the Earth-rotation cross term is ignored,
/// which is fine for orienting a model.
pub fn eci_to_ecef_km(eci: DVec3, gmst: f64) -> DVec3 {
    let (s, c) = gmst.sin_cos();
    let x = c * eci.x + s * eci.y;
    let y = -s * eci.x + c * eci.y;
    DVec3::new(x, y, eci.z)
}

/// Convert an ECEF position (km) to geodetic coordinates on WGS-84.
pub fn ecef_to_geodetic(ecef: DVec3) -> Geodetic {
    let f = (WGS84_A_KM - WGS84_B_KM) / WGS84_A_KM;
    let e2 = 2.0 * f - f * f;
    let r = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();

    let longitude = wrap_pi(ecef.y.atan2(ecef.x));

    let mut latitude = ecef.z.atan2(r);
    let mut c = 1.0;
    for _ in 0..GEODETIC_ITERATIONS {
        let sin_lat = latitude.sin();
        c = 1.0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        latitude = (ecef.z + WGS84_A_KM * c * e2 * sin_lat).atan2(r);
    }
    let height_km = r / latitude.cos() - WGS84_A_KM * c;

    Geodetic {
        latitude,
        longitude,
        height_km,
    }
}

/// Convert an ECI position (km) to geodetic coordinates at the given GMST.
pub fn eci_to_geodetic(eci: DVec3, gmst: f64) -> Geodetic {
    ecef_to_geodetic(eci_to_ecef_km(eci, gmst))
}

fn wrap_pi(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid maps +PI onto -PI; keep the sign of the input at the seam
    if wrapped == -PI && angle > 0.0 {
        PI
    } else {
        wrapped
    }
}
