//! Orbital plane → ecliptic frame.
//!
//! The ecliptic frame is Y-up: `x` and `z` span the reference plane and `y`
//! is height above it, matching the renderer's world axes.

use glam::DVec3;

/// Orientation of an orbital plane, all angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitOrientation {
    /// Inclination `i`.
    pub inclination: f64,
    /// Longitude of the ascending node `Ω`.
    pub ascending_node: f64,
    /// Argument of periapsis `ω = ϖ - Ω`.
    pub arg_periapsis: f64,
}

impl OrbitOrientation {
    pub const IDENTITY: Self = Self {
        inclination: 0.0,
        ascending_node: 0.0,
        arg_periapsis: 0.0,
    };

    /// Build from degrees as stored on a body: inclination, node longitude, periapsis longitude.
    pub fn from_degrees(inclination_deg: f64, ascending_node_deg: f64, periapsis_longitude_deg: f64) -> Self {
        let node = ascending_node_deg.to_radians();
        Self {
            inclination: inclination_deg.to_radians(),
            ascending_node: node,
            arg_periapsis: periapsis_longitude_deg.to_radians() - node,
        }
    }

    /// Rotate an orbital-plane point (periapsis along +x) into the ecliptic frame.
    /// 3-1-3 Euler rotation: argument of periapsis, then inclination, then node.
    pub fn to_ecliptic(&self, x_orb: f64, y_orb: f64) -> DVec3 {
        let (sin_w, cos_w) = self.arg_periapsis.sin_cos();
        let (sin_o, cos_o) = self.ascending_node.sin_cos();
        let (sin_i, cos_i) = self.inclination.sin_cos();

        let x = x_orb * (cos_w * cos_o - sin_w * sin_o * cos_i)
            - y_orb * (sin_w * cos_o + cos_w * sin_o * cos_i);
        let z = x_orb * (cos_w * sin_o + sin_w * cos_o * cos_i)
            + y_orb * (cos_w * cos_o * cos_i - sin_w * sin_o);
        let y = x_orb * (sin_w * sin_i) + y_orb * (cos_w * sin_i);

        DVec3::new(x, y, z)
    }

    /// Ecliptic position of a polar orbital-plane point `(r, ν)`.
    pub fn polar_to_ecliptic(&self, r: f64, true_anomaly: f64) -> DVec3 {
        let (sin_nu, cos_nu) = true_anomaly.sin_cos();
        self.to_ecliptic(r * cos_nu, r * sin_nu)
    }
}
