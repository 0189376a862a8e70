//! Keplerian orbital mechanics: pure math, no scene dependencies.
//!
//! Uses f64 throughout; positions are only narrowed to f32 when written
//! into scene nodes.

pub mod frame;
pub mod kepler;
pub mod path;

use std::f64::consts::TAU;
use glam::DVec3;

use crate::model::body::OrbitalElements;

pub use frame::OrbitOrientation;
pub use kepler::{polar_position, solve_kepler, true_anomaly, wrap_angle, KEPLER_ITERATIONS};
pub use path::{sample_orbit_path, PathExtent};

/// Days per Julian year.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Mean motion in radians per simulated day.
pub fn mean_motion(orbital_period_years: f64) -> f64 {
    TAU / (orbital_period_years * DAYS_PER_YEAR)
}

/// Mean anomaly at `days` simulated days, wrapped into [0, 2π).
pub fn mean_anomaly_at(elements: &OrbitalElements, days: f64) -> f64 {
    let m0 = (elements.mean_longitude_deg - elements.periapsis_longitude_deg).to_radians();
    wrap_angle(m0 + mean_motion(elements.orbital_period_years) * days)
}

/// Full orbital state at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    /// Heliocentric distance (AU).
    pub radius: f64,
    /// True anomaly (radians).
    pub true_anomaly: f64,
    /// Ecliptic position (AU), Y-up.
    pub position: DVec3,
}

/// Orbital state for a mean anomaly.
pub fn state_at_mean_anomaly(elements: &OrbitalElements, mean_anomaly: f64) -> OrbitState {
    let (radius, nu) = polar_position(elements.semi_major_axis, elements.eccentricity, mean_anomaly);
    let orientation = OrbitOrientation::from_degrees(
        elements.inclination_deg,
        elements.ascending_node_deg,
        elements.periapsis_longitude_deg,
    );
    OrbitState {
        radius,
        true_anomaly: nu,
        position: orientation.polar_to_ecliptic(radius, nu),
    }
}

/// Orbital state at `days` simulated days.
pub fn state_at(elements: &OrbitalElements, days: f64) -> OrbitState {
    state_at_mean_anomaly(elements, mean_anomaly_at(elements, days))
}

/// Heliocentric ecliptic position in AU at `days` simulated days.
pub fn position_at(elements: &OrbitalElements, days: f64) -> DVec3 {
    state_at(elements, days).position
}
