//! # Kepler's equation and anomalies
//!
//! Elliptic orbits go through the eccentric anomaly (`M = E − e·sin E`); parabolic orbits
//! through Barker's equation, solved by [`crate::cubic`]. Both end in a true anomaly and a
//! radius vector, which is all the position pipeline needs.
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::almagest_errors::{ensure_finite, AlmagestError};
use crate::angle::wrap_rad;
use crate::constants::{AstronomicalUnit, Radian, GAUSS_GRAV};
use crate::cubic::{solve_cubic, CubicRoots};
use crate::iteration::{bounded_loop, SolverParams};

/// Position of a body along its orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalPosition {
    /// True anomaly in `[0, 2π)`
    pub true_anomaly: Radian,
    /// Heliocentric distance
    pub radius: AstronomicalUnit,
}

fn check_eccentricity(e: f64) -> Result<f64, AlmagestError> {
    ensure_finite(e, "eccentricity")?;
    if !(0.0..1.0).contains(&e) {
        return Err(AlmagestError::OutOfDomain(format!(
            "eccentricity {e} outside [0, 1)"
        )));
    }
    Ok(e)
}

/// Solve Kepler's equation `M = E − e·sin E` for the eccentric anomaly.
///
/// Starts from `E₀ = M` and applies Newton steps
/// `E ← E − (E − e·sin E − M) / (1 − e·cos E)` until the step falls below
/// `params.angle_tolerance`.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: mean anomaly M in radians (any finite value).
/// * `eccentricity`: e in `[0, 1)`.
/// * `params`: tolerance and iteration cap.
///
/// Return
/// ------
/// * The eccentric anomaly E in radians, on the same turn as `mean_anomaly`.
///
/// Errors
/// ------
/// * `NonFiniteInput` / `OutOfDomain` for invalid inputs.
/// * `NoConvergence` when `params.max_iterations` steps were not enough.
///
/// # Examples
///
/// ```rust
/// use almagest::iteration::SolverParams;
/// use almagest::kepler::eccentric_anomaly;
///
/// let e = eccentric_anomaly(1.0, 0.5, &SolverParams::default()).unwrap();
/// assert!((e - 0.5 * e.sin() - 1.0).abs() < 1e-9);
/// ```
pub fn eccentric_anomaly(
    mean_anomaly: Radian,
    eccentricity: f64,
    params: &SolverParams,
) -> Result<Radian, AlmagestError> {
    ensure_finite(mean_anomaly, "mean anomaly")?;
    let e = check_eccentricity(eccentricity)?;

    let mut ea = mean_anomaly;
    let out = bounded_loop("kepler", params.max_iterations, |_| {
        let delta = (ea - e * ea.sin() - mean_anomaly) / (1.0 - e * ea.cos());
        ea -= delta;
        Ok(if delta.abs() < params.angle_tolerance {
            ControlFlow::Break(ea)
        } else {
            ControlFlow::Continue(())
        })
    })?;

    out.map(|(ea, _)| ea).ok_or(AlmagestError::NoConvergence {
        solver: "kepler",
        iterations: params.max_iterations,
    })
}

/// True anomaly in `[0, 2π)` from the eccentric anomaly.
///
/// Uses the half-angle form `tan(ν/2) = √((1+e)/(1−e))·tan(E/2)` written with `atan2`, so
/// it stays defined at `E = π`.
pub fn true_anomaly(eccentric_anomaly: Radian, eccentricity: f64) -> Radian {
    let (s, c) = (eccentric_anomaly / 2.0).sin_cos();
    let nu = 2.0 * ((1.0 + eccentricity).sqrt() * s).atan2((1.0 - eccentricity).sqrt() * c);
    wrap_rad(nu)
}

/// Radius vector `a·(1 − e·cos E)`.
pub fn radius_vector(
    semi_major_axis: AstronomicalUnit,
    eccentricity: f64,
    eccentric_anomaly: Radian,
) -> AstronomicalUnit {
    semi_major_axis * (1.0 - eccentricity * eccentric_anomaly.cos())
}

/// Equation of centre `ν − M` to third order in `e`.
pub fn equation_of_centre(mean_anomaly: Radian, eccentricity: f64) -> Radian {
    let e = eccentricity;
    let m = mean_anomaly;
    (2.0 * e - e.powi(3) / 4.0) * m.sin()
        + 1.25 * e * e * (2.0 * m).sin()
        + 13.0 / 12.0 * e.powi(3) * (3.0 * m).sin()
}

/// Elliptic orbit: mean anomaly → true anomaly and radius.
pub fn solve_elliptic(
    mean_anomaly: Radian,
    eccentricity: f64,
    semi_major_axis: AstronomicalUnit,
    params: &SolverParams,
) -> Result<OrbitalPosition, AlmagestError> {
    let ea = eccentric_anomaly(mean_anomaly, eccentricity, params)?;
    Ok(OrbitalPosition {
        true_anomaly: true_anomaly(ea, eccentricity),
        radius: radius_vector(semi_major_axis, eccentricity, ea),
    })
}

/// Parabolic orbit: Barker's equation.
///
/// With `W = 3k / √2 · (t − T) / q^{3/2}` (`k` the Gaussian constant), the cubic
/// `s³ + 3s − W = 0` has a single real root `s = tan(ν/2)`, and `r = q·(1 + s²)`.
///
/// Arguments
/// ---------
/// * `perihelion_distance`: q in AU, strictly positive.
/// * `days_from_perihelion`: `t − T` in days, negative before perihelion.
pub fn solve_barker(
    perihelion_distance: AstronomicalUnit,
    days_from_perihelion: f64,
) -> Result<OrbitalPosition, AlmagestError> {
    ensure_finite(perihelion_distance, "perihelion distance")?;
    ensure_finite(days_from_perihelion, "time from perihelion")?;
    if perihelion_distance <= 0.0 {
        return Err(AlmagestError::OutOfDomain(format!(
            "perihelion distance {perihelion_distance} must be > 0"
        )));
    }
    let w = 3.0 * GAUSS_GRAV / std::f64::consts::SQRT_2 * days_from_perihelion
        / (perihelion_distance * perihelion_distance.sqrt());

    let s = match solve_cubic(0.0, 3.0, -w)? {
        CubicRoots::One(s) => s,
        // the derivative 3s² + 3 never vanishes, so there is exactly one real root
        CubicRoots::Three(xs) => xs[0],
    };

    Ok(OrbitalPosition {
        true_anomaly: wrap_rad(2.0 * s.atan()),
        radius: perihelion_distance * (1.0 + s * s),
    })
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use crate::constants::{DPI, RADEG};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_eccentric_anomaly() {
        let params = SolverParams::default();
        // Sun 1988-07-27: M = 201.958°, e = 0.016718
        let m = 3.5248_f64;
        let ea = eccentric_anomaly(m, 0.016718, &params).unwrap();
        assert_abs_diff_eq!(ea - 0.016718 * ea.sin(), m, epsilon = 1e-9);

        assert_eq!(eccentric_anomaly(0.0, 0.3, &params).unwrap(), 0.0);
        assert_abs_diff_eq!(
            eccentric_anomaly(1.2, 0.0, &params).unwrap(),
            1.2,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_high_eccentricity() {
        let params = SolverParams::default();
        for &m in &[0.01, 0.5, 3.0, 6.0] {
            let ea = eccentric_anomaly(m, 0.9, &params).unwrap();
            assert_abs_diff_eq!(ea - 0.9 * ea.sin(), m, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_invalid_eccentricity() {
        let params = SolverParams::default();
        assert!(matches!(
            eccentric_anomaly(1.0, 1.0, &params),
            Err(AlmagestError::OutOfDomain(_))
        ));
        assert!(eccentric_anomaly(1.0, -0.1, &params).is_err());
        assert_eq!(
            eccentric_anomaly(f64::NAN, 0.1, &params),
            Err(AlmagestError::NonFiniteInput("mean anomaly"))
        );
    }

    #[test]
    fn test_iteration_cap() {
        let params = SolverParams::builder()
            .angle_tolerance(1e-15)
            .max_iterations(1)
            .build()
            .unwrap();
        assert_eq!(
            eccentric_anomaly(2.0, 0.8, &params),
            Err(AlmagestError::NoConvergence {
                solver: "kepler",
                iterations: 1
            })
        );
    }

    #[test]
    fn test_true_anomaly_and_radius() {
        assert_abs_diff_eq!(true_anomaly(0.0, 0.5), 0.0);
        assert_abs_diff_eq!(true_anomaly(std::f64::consts::PI, 0.5), std::f64::consts::PI, epsilon = 1e-12);
        let nu = true_anomaly(1.0, 0.0);
        assert_abs_diff_eq!(nu, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(radius_vector(2.0, 0.5, 0.0), 1.0);
        assert!(true_anomaly(-0.5, 0.2) < DPI && true_anomaly(-0.5, 0.2) > 0.0);
    }

    #[test]
    fn test_equation_of_centre_matches_kepler() {
        let params = SolverParams::default();
        let (m, e) = (201.958 * RADEG, 0.016718);
        let ea = eccentric_anomaly(m, e, &params).unwrap();
        let nu = true_anomaly(ea, e);
        let eoc = equation_of_centre(m, e);
        assert_abs_diff_eq!(wrap_rad(m + eoc), nu, epsilon = 1e-6);
    }

    #[test]
    fn test_barker() {
        // at perihelion
        let p = solve_barker(0.5, 0.0).unwrap();
        assert_abs_diff_eq!(p.true_anomaly, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.radius, 0.5, epsilon = 1e-12);

        // W = 4 gives s = 1: ν = 90°, r = 2q
        let q = 1.0;
        let days = 4.0 / (3.0 * GAUSS_GRAV / std::f64::consts::SQRT_2);
        let p = solve_barker(q, days).unwrap();
        assert_abs_diff_eq!(p.true_anomaly, 90.0 * RADEG, epsilon = 1e-9);
        assert_abs_diff_eq!(p.radius, 2.0, epsilon = 1e-9);

        // before perihelion the anomaly is on the descending half
        let p = solve_barker(q, -days).unwrap();
        assert_abs_diff_eq!(p.true_anomaly, 270.0 * RADEG, epsilon = 1e-9);

        assert!(solve_barker(0.0, 10.0).is_err());
    }
}
