//! Kepler's equation by fixed-point iteration.
//!
//! `E ← M + e·sin(E)`, seeded with `E₀ = M`, for a fixed number of rounds.
//! This is not Newton's method and carries no convergence guarantee: the
//! residual after `k` rounds is bounded by `e^(k+1)`, which is small for the
//! planetary eccentricities this engine draws and grows quickly as `e → 1`.
//! It is an accepted approximation, not a general Kepler solver.

use std::f64::consts::TAU;

/// Fixed-point rounds per solve.
pub const KEPLER_ITERATIONS: usize = 5;

/// Wrap an angle into [0, 2π).
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Solve `M = E - e·sin(E)` for the eccentric anomaly `E`.
/// `mean_anomaly` in radians (any real value), `eccentricity` in [0, 1).
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    debug_assert!(
        (0.0..1.0).contains(&eccentricity),
        "eccentricity {eccentricity} outside [0, 1): reject it at ingestion"
    );
    let m = wrap_angle(mean_anomaly);
    let mut ea = m;
    for _ in 0..KEPLER_ITERATIONS {
        ea = m + eccentricity * ea.sin();
    }
    ea
}

/// True anomaly from eccentric anomaly.
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    2.0 * ((1.0 + eccentricity).sqrt() * half.sin()).atan2((1.0 - eccentricity).sqrt() * half.cos())
}

/// Orbital-plane polar position `(r, ν)` for a mean anomaly.
/// `r` is in the same unit as `semi_major_axis`.
pub fn polar_position(semi_major_axis: f64, eccentricity: f64, mean_anomaly: f64) -> (f64, f64) {
    let ea = solve_kepler(mean_anomaly, eccentricity);
    let nu = true_anomaly(ea, eccentricity);
    let r = semi_major_axis * (1.0 - eccentricity * ea.cos());
    (r, nu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn residual(m: f64, e: f64) -> f64 {
        let ea = solve_kepler(m, e);
        (m - (ea - e * ea.sin())).abs()
    }

    #[test]
    fn circular_orbit_is_identity() {
        let ea = solve_kepler(1.0, 0.0);
        assert!((ea - 1.0).abs() < 1e-12);
        assert!((true_anomaly(ea, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn residual_within_tolerance_for_moderate_eccentricity() {
        for ei in 0..=30 {
            let e = ei as f64 * 0.01;
            for mi in 0..360 {
                let m = mi as f64 / 360.0 * TAU;
                let r = residual(m, e);
                assert!(r < 1e-3, "e={e} M={m} residual={r}");
            }
        }
    }

    #[test]
    fn residual_bounded_by_contraction_up_to_high_eccentricity() {
        for ei in 0..=90 {
            let e = ei as f64 * 0.01;
            let bound = e.powi(KEPLER_ITERATIONS as i32 + 1) + 1e-12;
            for mi in 0..360 {
                let m = mi as f64 / 360.0 * TAU;
                let r = residual(m, e);
                assert!(r <= bound, "e={e} M={m} residual={r} bound={bound}");
            }
        }
    }

    #[test]
    fn mean_anomaly_is_wrapped() {
        let a = solve_kepler(0.5, 0.2);
        let b = solve_kepler(0.5 + 3.0 * TAU, 0.2);
        let c = solve_kepler(0.5 - TAU, 0.2);
        assert!((a - b).abs() < 1e-9);
        assert!((a - c).abs() < 1e-9);
    }

    #[test]
    fn wrap_angle_range() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
        assert!(wrap_angle(-1e-20) < TAU);
        assert!((wrap_angle(7.0 * PI) - PI).abs() < 1e-9);
    }

    #[test]
    fn periapsis_and_apoapsis_radius() {
        let (r_peri, nu_peri) = polar_position(2.0, 0.5, 0.0);
        assert!((r_peri - 1.0).abs() < 1e-12);
        assert!(nu_peri.abs() < 1e-12);

        let (r_apo, nu_apo) = polar_position(2.0, 0.5, PI);
        assert!((r_apo - 3.0).abs() < 1e-9, "r_apo = {r_apo}");
        assert!((nu_apo - PI).abs() < 1e-9, "nu_apo = {nu_apo}");
    }
}
