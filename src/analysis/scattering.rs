//! Scattering angles from finished particle states

use crate::simulation::states::{NVec2, Particle};

/// Final scattering angle for one impact parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatteringResult {
    pub b: f64, // impact parameter
    pub theta: f64, // atan2(v_y, v_x) of the final velocity, in (-pi, pi]
}

/// Direction of `v` relative to the +x axis (the initial direction of motion)
pub fn scattering_angle(v: &NVec2) -> f64 {
    v.y.atan2(v.x)
}

/// One result per particle, paired with `impact_parameters` in input order.
/// Both slices must have the same length and order.
pub fn scattering_results(particles: &[Particle], impact_parameters: &[f64]) -> Vec<ScatteringResult> {
    debug_assert_eq!(
        particles.len(),
        impact_parameters.len(),
        "one impact parameter per particle"
    );
    particles
        .iter()
        .zip(impact_parameters)
        .map(|(p, &b)| ScatteringResult {
            b,
            theta: scattering_angle(&p.velocity()),
        })
        .collect()
}

/// Analytic Rutherford deflection magnitude `2 atan(|g| / (m v0^2 b))`
///
/// Exact for a particle coming from and leaving to infinity; used as a
/// reference for the finite-region simulation. Returns pi for `b == 0`.
pub fn rutherford_angle(g: f64, mass: f64, v0: f64, b: f64) -> f64 {
    2.0 * (g.abs() / (mass * v0 * v0 * b.abs())).atan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn angle_quadrants() {
        assert_eq!(scattering_angle(&NVec2::new(1.0, 0.0)), 0.0);
        assert_relative_eq!(scattering_angle(&NVec2::new(0.0, 2.0)), FRAC_PI_2);
        assert_relative_eq!(scattering_angle(&NVec2::new(-1.0, 0.0)), PI);
        assert_relative_eq!(scattering_angle(&NVec2::new(-1.0, -1.0)), -3.0 * PI / 4.0);
    }

    #[test]
    fn results_keep_input_order() {
        let a = Particle::new(1.0, NVec2::zeros(), NVec2::new(0.0, 1.0)).unwrap();
        let b = Particle::new(1.0, NVec2::zeros(), NVec2::new(1.0, 0.0)).unwrap();
        let res = scattering_results(&[a, b], &[0.5, 1.5]);
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].b, 0.5);
        assert_relative_eq!(res[0].theta, FRAC_PI_2);
        assert_eq!(res[1], ScatteringResult { b: 1.5, theta: 0.0 });
    }

    #[test]
    fn rutherford_limits() {
        // tan(theta / 2) = 1 for |g| = m v0^2 b
        assert_relative_eq!(rutherford_angle(-1.0, 1.0, 1.0, 1.0), FRAC_PI_2);
        assert_relative_eq!(rutherford_angle(1.0, 1.0, 1.0, 0.0), PI);
        assert!(rutherford_angle(1.0, 1.0, 1.0, 4.0) < rutherford_angle(1.0, 1.0, 1.0, 2.0));
    }
}
