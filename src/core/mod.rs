//! Core coordinate utilities
//!
//! Frame conversions (ECI/ECEF/geodetic) and the mapping from Earth-fixed
//! kilometers into renderer scene units. Nothing in here touches ECS types.

pub mod coordinates;
pub mod space;

pub use coordinates::{
    EARTH_RADIUS_KM, Geodetic, ecef_to_geodetic, eci_to_ecef_km, eci_to_geodetic, gmst_rad,
};
pub use space::SceneMapper;
