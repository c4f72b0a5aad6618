#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use almagest::bodies::perturbation::CorrectionTable;
use almagest::bodies::planet::OrbitingBody;
use almagest::coordinates::EquatorialCoordinate;
use almagest::events::RiseSetResult;
use almagest::orbit_type::keplerian_element::KeplerianElements;
use almagest::time::DatedTime;

/// Epoch of the osculating-element polynomials, 1999 December 31.0
pub const ELEMENT_EPOCH: f64 = 2_451_543.5;

fn elements_at(
    jd: f64,
    a: f64,
    e: (f64, f64),
    i: (f64, f64),
    node: (f64, f64),
    peri: (f64, f64),
    m: (f64, f64),
) -> KeplerianElements {
    let d = jd - ELEMENT_EPOCH;
    KeplerianElements {
        reference_epoch: jd,
        semi_major_axis: a,
        eccentricity: e.0 + e.1 * d,
        inclination: i.0 + i.1 * d,
        ascending_node_longitude: (node.0 + node.1 * d).rem_euclid(360.0),
        periapsis_argument: (peri.0 + peri.1 * d).rem_euclid(360.0),
        mean_anomaly: (m.0 + m.1 * d).rem_euclid(360.0),
        mean_daily_motion: None,
    }
}

/// Earth elements for `jd` (argument of perihelion of the Sun plus 180°).
pub fn earth(jd: f64) -> OrbitingBody {
    OrbitingBody::new(
        elements_at(
            jd,
            1.0,
            (0.016709, -1.151e-9),
            (0.0, 0.0),
            (0.0, 0.0),
            (282.9404 + 180.0, 4.70935e-5),
            (356.0470, 0.9856002585),
        ),
        CorrectionTable::none(),
    )
}

pub fn jupiter(jd: f64) -> OrbitingBody {
    OrbitingBody::new(
        elements_at(
            jd,
            5.20256,
            (0.048498, 4.469e-9),
            (1.3030, -1.557e-7),
            (100.4542, 2.76854e-5),
            (273.8777, 1.64505e-5),
            (19.8950, 0.0830853001),
        ),
        CorrectionTable::jupiter(),
    )
}

pub fn saturn(jd: f64) -> OrbitingBody {
    OrbitingBody::new(
        elements_at(
            jd,
            9.55475,
            (0.055546, -9.499e-9),
            (2.4886, -1.081e-7),
            (113.6634, 2.38980e-5),
            (339.3939, 2.97661e-5),
            (316.9670, 0.0334442282),
        ),
        CorrectionTable::saturn(),
    )
}

pub fn mars(jd: f64) -> OrbitingBody {
    OrbitingBody::new(
        elements_at(
            jd,
            1.523688,
            (0.093405, 2.516e-9),
            (1.8497, -1.78e-8),
            (49.5574, 2.11081e-5),
            (286.5016, 2.92961e-5),
            (18.6021, 0.5240207766),
        ),
        CorrectionTable::none(),
    )
}

pub fn assert_equatorial_close(
    actual: &EquatorialCoordinate,
    right_ascension: f64,
    declination: f64,
    epsilon_hours: f64,
    epsilon_degrees: f64,
) {
    assert_abs_diff_eq!(
        actual.right_ascension,
        right_ascension,
        epsilon = epsilon_hours
    );
    assert_abs_diff_eq!(actual.declination, declination, epsilon = epsilon_degrees);
}

/// Unwrap a crossing, failing the test for any other outcome.
pub fn expect_crossing(result: RiseSetResult) -> (DatedTime, f64) {
    match result {
        RiseSetResult::Normal {
            local_time,
            azimuth,
        } => (local_time, azimuth),
        other => panic!("expected a crossing, got {other:?}"),
    }
}

pub fn hms(h: f64, m: f64, s: f64) -> f64 {
    h + m / 60.0 + s / 3600.0
}
