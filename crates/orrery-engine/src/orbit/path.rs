use std::f64::consts::TAU;
use glam::Vec3;

use crate::model::body::OrbitalElements;
use super::state_at_mean_anomaly;

/// How much of the orbit a path covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathExtent {
    /// Closed loop: last point repeats the first.
    Full,
    /// Periapsis to apoapsis only, for long-period bodies whose full loop would dominate the view.
    Half,
}

/// Sample an orbit into a world-space poly-line.
///
/// Evaluates `samples` evenly spaced mean anomalies per full revolution and
/// scales AU to world units. Deterministic: identical inputs give identical points.
pub fn sample_orbit_path(elements: &OrbitalElements, samples: usize, extent: PathExtent, au_scale: f64) -> Vec<Vec3> {
    let samples = samples.max(3);
    let sections = match extent {
        PathExtent::Full => samples,
        PathExtent::Half => samples / 2,
    };

    (0..=sections)
        .map(|j| {
            let m = j as f64 / samples as f64 * TAU;
            (state_at_mean_anomaly(elements, m).position * au_scale).as_vec3()
        })
        .collect()
}
