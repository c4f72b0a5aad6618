mod common;

use approx::assert_abs_diff_eq;
use common::{assert_equatorial_close, earth, jupiter, mars, saturn};

use almagest::bodies::planet::{heliocentric_position, planet_position, OrbitingBody};
use almagest::iteration::SolverParams;
use almagest::orbit_type::cometary_element::CometaryElements;
use almagest::time::{CalendarDate, JulianDay};
use almagest::AlmagestError;

fn jd_of(year: i32, month: u32, day: f64) -> JulianDay {
    CalendarDate::new(year, month, day).unwrap().to_julian_day()
}

#[test]
fn test_jupiter_november_2003() {
    let jd = jd_of(2003, 11, 22.0);
    let p = planet_position(
        &jupiter(jd.value()),
        &earth(jd.value()),
        jd,
        &SolverParams::default(),
    )
    .unwrap();

    // 11h 10m 32.0s, +6° 25′ 43″
    assert_equatorial_close(&p.equatorial, 11.175555, 6.428681, 1e-5, 1e-4);
    assert_abs_diff_eq!(p.geocentric.longitude, 166.123125, epsilon = 1e-4);
    assert_abs_diff_eq!(p.geocentric.latitude, 1.035243, epsilon = 1e-4);
    assert_abs_diff_eq!(p.heliocentric.longitude, 156.030165, epsilon = 1e-4);
    assert_abs_diff_eq!(p.heliocentric_distance, 5.395393, epsilon = 1e-5);
    assert_abs_diff_eq!(p.distance, 5.598323, epsilon = 1e-5);
    assert_abs_diff_eq!(p.light_time, 0.0057755183 * 5.598323, epsilon = 1e-6);
    assert_abs_diff_eq!(p.phase, 0.992265, epsilon = 1e-5);
    assert_abs_diff_eq!(p.elongation, 73.145855, epsilon = 1e-4);
}

#[test]
fn test_saturn_with_latitude_corrections() {
    let jd = jd_of(2010, 1, 1.0);
    let p = planet_position(
        &saturn(jd.value()),
        &earth(jd.value()),
        jd,
        &SolverParams::default(),
    )
    .unwrap();

    assert_equatorial_close(&p.equatorial, 12.335386, 0.313696, 1e-5, 1e-4);
    assert_abs_diff_eq!(p.heliocentric.latitude, 2.250091, epsilon = 1e-5);
    assert_abs_diff_eq!(p.distance, 9.331273, epsilon = 1e-5);
    assert_abs_diff_eq!(p.elongation, 95.957324, epsilon = 1e-4);
}

#[test]
fn test_mars_near_opposition() {
    // closest approach of August 2003
    let jd = jd_of(2003, 8, 27.0);
    let p = planet_position(
        &mars(jd.value()),
        &earth(jd.value()),
        jd,
        &SolverParams::default(),
    )
    .unwrap();

    assert_equatorial_close(&p.equatorial, 22.654832, -15.678680, 1e-5, 1e-4);
    assert_abs_diff_eq!(p.distance, 0.372979, epsilon = 1e-5);
    assert_abs_diff_eq!(p.phase, 0.998017, epsilon = 1e-5);
    assert!(p.elongation > 170.0);
}

#[test]
fn test_heliocentric_position_matches_pipeline() {
    let jd = jd_of(2003, 11, 22.0);
    let params = SolverParams::default();
    let body = jupiter(jd.value());
    let p = planet_position(&body, &earth(jd.value()), jd, &params).unwrap();

    // the pipeline reports the body at the retarded instant
    let (ecliptic, radius) = heliocentric_position(&body, jd.add_days(-p.light_time), &params).unwrap();
    assert_abs_diff_eq!(ecliptic.longitude, p.heliocentric.longitude, epsilon = 1e-9);
    assert_abs_diff_eq!(ecliptic.latitude, p.heliocentric.latitude, epsilon = 1e-9);
    assert_abs_diff_eq!(radius, p.heliocentric_distance, epsilon = 1e-9);
}

#[test]
fn test_halley_before_perihelion() {
    let halley = OrbitingBody::comet(CometaryElements {
        perihelion_epoch: 2446470.5,
        perihelion_distance: 0.587104,
        eccentricity: 0.967277,
        inclination: 162.2422,
        ascending_node_longitude: 58.1540,
        periapsis_argument: 111.8466,
    });
    let jd = jd_of(1986, 1, 1.0);
    let p = planet_position(&halley, &earth(jd.value()), jd, &SolverParams::default()).unwrap();

    assert_equatorial_close(&p.equatorial, 22.233569, -2.661911, 1e-4, 1e-3);
    assert_abs_diff_eq!(p.heliocentric_distance, 0.999842, epsilon = 1e-4);
    assert_abs_diff_eq!(p.distance, 1.168712, epsilon = 1e-4);
    assert_abs_diff_eq!(p.phase, 0.799243, epsilon = 1e-4);
}

#[test]
fn test_parabolic_comet_after_perihelion() {
    // Kohler 1977m
    let kohler = OrbitingBody::comet(CometaryElements {
        perihelion_epoch: 2443458.0674,
        perihelion_distance: 0.990662,
        eccentricity: 1.0,
        inclination: 48.7196,
        ascending_node_longitude: 181.8175,
        periapsis_argument: 163.4799,
    });
    let jd = JulianDay::new(2443458.0674 + 30.0).unwrap();
    let p = planet_position(&kohler, &earth(jd.value()), jd, &SolverParams::default()).unwrap();

    assert_equatorial_close(&p.equatorial, 22.024611, -30.331759, 1e-5, 1e-4);
    assert_abs_diff_eq!(p.heliocentric_distance, 1.115568, epsilon = 1e-5);
    assert_abs_diff_eq!(p.heliocentric.latitude, -16.769796, epsilon = 1e-4);
    assert_abs_diff_eq!(p.distance, 1.096339, epsilon = 1e-5);
}

#[test]
fn test_invalid_comet_is_rejected() {
    let broken = OrbitingBody::comet(CometaryElements {
        perihelion_epoch: 2443458.0674,
        perihelion_distance: -1.0,
        eccentricity: 1.0,
        inclination: 48.7196,
        ascending_node_longitude: 181.8175,
        periapsis_argument: 163.4799,
    });
    let jd = JulianDay::new(2443488.0).unwrap();
    let err = planet_position(&broken, &earth(jd.value()), jd, &SolverParams::default()).unwrap_err();
    assert!(matches!(err, AlmagestError::InvalidOrbit(_)));
}

#[test]
fn test_position_serializes() {
    let jd = jd_of(2003, 11, 22.0);
    let p = planet_position(
        &jupiter(jd.value()),
        &earth(jd.value()),
        jd,
        &SolverParams::default(),
    )
    .unwrap();
    let json = serde_json::to_string(&p).unwrap();
    assert!(json.contains("\"elongation\""));
}
