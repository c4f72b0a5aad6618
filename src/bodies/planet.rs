//! # Planets and comets
//!
//! A planet and a comet differ only in the data they carry: an [`OrbitingBody`] is a set of
//! [`OrbitalElements`] plus a (possibly empty) [`CorrectionTable`]. Both go through the same
//! staged pipeline:
//!
//! 1. position in orbit (Kepler or Barker) → true anomaly `ν` and radius `r`;
//! 2. orbital longitude `l = ν + ω + Ω`;
//! 3. longitude corrections;
//! 4. projection onto the ecliptic through the inclination and the node;
//! 5. latitude corrections;
//! 6. radius corrections;
//! 7. light time: stages 1 to 6 again at `t − τ`, `τ = 0.0057755183·Δ` days;
//! 8. geocentric vector `p − e`, the Earth's heliocentric position `e` coming from its own
//!    elements;
//! 9. ecliptic → equatorial with the true obliquity of the date.
//!
//! Elements are referred to the ecliptic and equinox of their epoch; no precession is
//! applied.
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::angle::wrap_deg;
use crate::bodies::perturbation::{CorrectionTable, CorrectionTarget, FundamentalArguments};
use crate::constants::{AstronomicalUnit, Degree, LIGHT_TIME_PER_AU, RADEG};
use crate::coordinates::{
    ecliptic_to_equatorial_at, spherical_angles, unit_vector, EclipticCoordinate,
    EquatorialCoordinate,
};
use crate::iteration::SolverParams;
use crate::orbit_type::{cometary_element::CometaryElements, OrbitalElements};
use crate::time::JulianDay;

/// A body on a heliocentric orbit: elements plus first-order corrections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitingBody {
    pub elements: OrbitalElements,
    #[serde(default)]
    pub corrections: CorrectionTable,
}

impl OrbitingBody {
    pub fn new(elements: impl Into<OrbitalElements>, corrections: CorrectionTable) -> Self {
        OrbitingBody {
            elements: elements.into(),
            corrections,
        }
    }

    /// A comet: cometary elements and no correction terms.
    pub fn comet(elements: CometaryElements) -> Self {
        Self::new(elements, CorrectionTable::none())
    }
}

/// Where a body is seen from the Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryPosition {
    /// Heliocentric ecliptic position at the light-time corrected instant
    pub heliocentric: EclipticCoordinate,
    pub heliocentric_distance: AstronomicalUnit,
    pub geocentric: EclipticCoordinate,
    pub equatorial: EquatorialCoordinate,
    /// Distance from the Earth
    pub distance: AstronomicalUnit,
    /// Light time, in days
    pub light_time: f64,
    /// Illuminated fraction of the disc
    pub phase: f64,
    /// Angle between the body and the Sun seen from the Earth
    pub elongation: Degree,
}

/// Output of stages 1 to 6.
#[derive(Debug, Clone, Copy)]
struct Heliocentric {
    ecliptic: EclipticCoordinate,
    radius: AstronomicalUnit,
    cartesian: Vector3<f64>,
}

/// Stages 2 and 3: orbital longitude plus the longitude corrections.
fn orbital_longitude(
    body: &OrbitingBody,
    true_anomaly: Degree,
    args: &FundamentalArguments,
) -> Degree {
    let o = body.elements.orientation();
    true_anomaly
        + o.periapsis_argument
        + o.ascending_node_longitude
        + body.corrections.sum(CorrectionTarget::Longitude, args)
}

/// Stage 4: project the orbital longitude onto the ecliptic.
fn project_on_ecliptic(body: &OrbitingBody, orbital_longitude: Degree) -> EclipticCoordinate {
    let o = body.elements.orientation();
    let u = (orbital_longitude - o.ascending_node_longitude) * RADEG;
    let i = o.inclination * RADEG;
    EclipticCoordinate {
        longitude: wrap_deg(
            (u.sin() * i.cos()).atan2(u.cos()) / RADEG + o.ascending_node_longitude,
        ),
        latitude: (u.sin() * i.sin()).asin() / RADEG,
    }
}

/// Stages 1 to 6 at `jd`.
fn heliocentric(
    body: &OrbitingBody,
    jd: JulianDay,
    params: &SolverParams,
) -> Result<Heliocentric, AlmagestError> {
    let at = body.elements.position_in_orbit(jd, params)?;
    let args = FundamentalArguments::at(jd);
    let corrections = &body.corrections;

    let l = orbital_longitude(body, at.true_anomaly / RADEG, &args);
    let mut ecliptic = project_on_ecliptic(body, l);
    ecliptic.latitude += corrections.sum(CorrectionTarget::Latitude, &args);
    let radius = at.radius + corrections.sum(CorrectionTarget::Radius, &args);

    Ok(Heliocentric {
        ecliptic,
        radius,
        cartesian: radius * unit_vector(ecliptic.longitude, ecliptic.latitude),
    })
}

/// Heliocentric ecliptic position and distance of `body` at `jd`, without light time.
pub fn heliocentric_position(
    body: &OrbitingBody,
    jd: JulianDay,
    params: &SolverParams,
) -> Result<(EclipticCoordinate, AstronomicalUnit), AlmagestError> {
    let h = heliocentric(body, jd, params)?;
    Ok((h.ecliptic, h.radius))
}

/// Geocentric position of a planet or comet.
///
/// Arguments
/// ---------
/// * `body`: the planet or comet.
/// * `earth`: the Earth's own elements (and corrections, usually none).
/// * `jd`: Julian Day (UT) of the observation.
/// * `params`: bounds for the Kepler solves.
///
/// Return
/// ------
/// * A [`PlanetaryPosition`]. The body is taken at the retarded instant `jd − τ`; the
///   Earth at `jd`.
///
/// Errors
/// ------
/// * `InvalidOrbit` for elements outside their domain.
/// * `NoConvergence` from the Kepler solver.
///
/// # Examples
///
/// ```rust
/// use almagest::bodies::perturbation::CorrectionTable;
/// use almagest::bodies::planet::{planet_position, OrbitingBody};
/// use almagest::iteration::SolverParams;
/// use almagest::orbit_type::keplerian_element::KeplerianElements;
/// use almagest::time::JulianDay;
///
/// let epoch = 2452965.5;
/// let d = epoch - 2451543.5;
/// let earth = OrbitingBody::new(
///     KeplerianElements {
///         reference_epoch: epoch,
///         semi_major_axis: 1.0,
///         eccentricity: 0.016709 - 1.151e-9 * d,
///         inclination: 0.0,
///         ascending_node_longitude: 0.0,
///         periapsis_argument: 282.9404 + 4.70935e-5 * d + 180.0,
///         mean_anomaly: (356.0470 + 0.9856002585 * d) % 360.0,
///         mean_daily_motion: None,
///     },
///     CorrectionTable::none(),
/// );
/// let jupiter = OrbitingBody::new(
///     KeplerianElements {
///         reference_epoch: epoch,
///         semi_major_axis: 5.20256,
///         eccentricity: 0.048498 + 4.469e-9 * d,
///         inclination: 1.3030 - 1.557e-7 * d,
///         ascending_node_longitude: 100.4542 + 2.76854e-5 * d,
///         periapsis_argument: 273.8777 + 1.64505e-5 * d,
///         mean_anomaly: (19.8950 + 0.0830853001 * d) % 360.0,
///         mean_daily_motion: None,
///     },
///     CorrectionTable::jupiter(),
/// );
///
/// let jd = JulianDay::new(epoch).unwrap();
/// let p = planet_position(&jupiter, &earth, jd, &SolverParams::default()).unwrap();
/// assert!((p.equatorial.right_ascension - 11.1756).abs() < 1e-3);
/// ```
pub fn planet_position(
    body: &OrbitingBody,
    earth: &OrbitingBody,
    jd: JulianDay,
    params: &SolverParams,
) -> Result<PlanetaryPosition, AlmagestError> {
    let e = heliocentric(earth, jd, params)?.cartesian;

    let first = heliocentric(body, jd, params)?;
    let light_time = LIGHT_TIME_PER_AU * (first.cartesian - e).norm();
    let retarded = heliocentric(body, jd.add_days(-light_time), params)?;

    let p = retarded.cartesian;
    let geo = p - e;
    let (longitude, latitude) = spherical_angles(&geo);
    let geocentric = EclipticCoordinate {
        longitude,
        latitude,
    };

    let phase_angle = (-p).angle(&(e - p));
    let elongation = (-e).angle(&geo) / RADEG;

    Ok(PlanetaryPosition {
        heliocentric: retarded.ecliptic,
        heliocentric_distance: retarded.radius,
        geocentric,
        equatorial: ecliptic_to_equatorial_at(&geocentric, jd),
        distance: geo.norm(),
        light_time: LIGHT_TIME_PER_AU * geo.norm(),
        phase: (1.0 + phase_angle.cos()) / 2.0,
        elongation,
    })
}

#[cfg(test)]
mod planet_test {
    use super::*;
    use crate::orbit_type::keplerian_element::KeplerianElements;
    use approx::assert_abs_diff_eq;

    fn circular(a: f64, node: f64, inclination: f64) -> OrbitingBody {
        OrbitingBody::new(
            KeplerianElements {
                reference_epoch: 2451545.0,
                semi_major_axis: a,
                eccentricity: 0.0,
                inclination,
                ascending_node_longitude: node,
                periapsis_argument: 0.0,
                mean_anomaly: 0.0,
                mean_daily_motion: None,
            },
            CorrectionTable::none(),
        )
    }

    #[test]
    fn test_projection_on_ecliptic() {
        let body = circular(1.0, 40.0, 10.0);
        let on_node = project_on_ecliptic(&body, 40.0);
        assert_abs_diff_eq!(on_node.longitude, 40.0, epsilon = 1e-12);
        assert_abs_diff_eq!(on_node.latitude, 0.0, epsilon = 1e-12);
        let highest = project_on_ecliptic(&body, 130.0);
        assert_abs_diff_eq!(highest.longitude, 130.0, epsilon = 1e-9);
        assert_abs_diff_eq!(highest.latitude, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_heliocentric_on_circular_orbit() {
        let params = SolverParams::default();
        let body = circular(2.0, 0.0, 0.0);
        let jd = JulianDay::new(2451545.0).unwrap();
        let (ecl, r) = heliocentric_position(&body, jd, &params).unwrap();
        assert_abs_diff_eq!(r, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ecl.longitude, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_opposition_geometry() {
        // body and Earth on the same line on the same side of the Sun
        let params = SolverParams::default();
        let earth = circular(1.0, 0.0, 0.0);
        let mut outer = circular(4.0, 0.0, 0.0);
        if let OrbitalElements::Keplerian(ke) = &mut outer.elements {
            // long period: the retarded position barely moves
            ke.mean_daily_motion = Some(1e-9);
        }
        let jd = JulianDay::new(2451545.0).unwrap();
        let p = planet_position(&outer, &earth, jd, &params).unwrap();
        assert_abs_diff_eq!(p.distance, 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.light_time, 3.0 * LIGHT_TIME_PER_AU, epsilon = 1e-9);
        assert_abs_diff_eq!(p.phase, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.elongation, 180.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.geocentric.longitude, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_corrections_shift_longitude() {
        let params = SolverParams::default();
        let plain = circular(5.2, 100.0, 1.3);
        let mut corrected = plain.clone();
        corrected.corrections = CorrectionTable::jupiter();
        let jd = JulianDay::new(2452965.5).unwrap();
        let (a, _) = heliocentric_position(&plain, jd, &params).unwrap();
        let (b, _) = heliocentric_position(&corrected, jd, &params).unwrap();
        let expected = CorrectionTable::jupiter()
            .sum(CorrectionTarget::Longitude, &FundamentalArguments::at(jd));
        assert_abs_diff_eq!(b.longitude - a.longitude, expected, epsilon = 1e-3);
    }

    #[test]
    fn test_invalid_body() {
        let params = SolverParams::default();
        let earth = circular(1.0, 0.0, 0.0);
        let bad = circular(-1.0, 0.0, 0.0);
        let jd = JulianDay::new(2451545.0).unwrap();
        assert!(matches!(
            planet_position(&bad, &earth, jd, &params),
            Err(AlmagestError::InvalidOrbit(_))
        ));
    }
}
