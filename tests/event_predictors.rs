mod common;

use approx::assert_abs_diff_eq;
use common::{expect_crossing, hms};

use almagest::bodies::moon::moon_phase;
use almagest::coordinates::GeographicLocation;
use almagest::events::eclipse::{lunar_eclipse_occurrence, EclipseOccurrence};
use almagest::events::moon_events::{moonrise, moonset};
use almagest::events::sun_events::{evening_twilight, morning_twilight, sunrise, sunset};
use almagest::events::syzygy::{full_moon, new_moon, Phase};
use almagest::events::{RiseSetResult, TwilightKind};
use almagest::iteration::SolverParams;
use almagest::time::{CalendarDate, TimeZoneSpec};

fn date(year: i32, month: u32, day: f64) -> CalendarDate {
    CalendarDate::new(year, month, day).unwrap()
}

#[test]
fn test_equinox_sun_at_the_origin() {
    let params = SolverParams::default();
    let origin = GeographicLocation::new(0.0, 0.0).unwrap();
    let utc = TimeZoneSpec::utc();
    let d = date(2024, 3, 20.0);

    let (rise, rise_az) = expect_crossing(sunrise(&d, &origin, &utc, &params).unwrap());
    assert_abs_diff_eq!(rise.hours, 6.067520, epsilon = 1e-4);
    assert_abs_diff_eq!(rise_az, 89.950547, epsilon = 1e-3);
    assert_eq!(rise.date.whole_day(), 20);

    let (set, set_az) = expect_crossing(sunset(&d, &origin, &utc, &params).unwrap());
    assert_abs_diff_eq!(set.hours, 18.176127, epsilon = 1e-4);
    assert_abs_diff_eq!(set_az, 270.248801, epsilon = 1e-3);
}

#[test]
fn test_crossings_stay_on_the_requested_local_date() {
    let params = SolverParams::default();
    let d = date(2024, 3, 20.0);

    let sydney = GeographicLocation::new(-33.8688, 151.2093).unwrap();
    let aest = TimeZoneSpec::new(10.0, false).unwrap();
    let (rise, _) = expect_crossing(sunrise(&d, &sydney, &aest, &params).unwrap());
    assert_eq!(rise.date, d);
    assert_abs_diff_eq!(rise.hours, 5.972396, epsilon = 1e-4);
    let (set, _) = expect_crossing(sunset(&d, &sydney, &aest, &params).unwrap());
    assert_eq!(set.date, d);
    assert_abs_diff_eq!(set.hours, 18.105226, epsilon = 1e-4);

    let honolulu = GeographicLocation::new(21.3069, -157.8583).unwrap();
    let hst = TimeZoneSpec::new(-10.0, false).unwrap();
    let (rise, _) = expect_crossing(sunrise(&d, &honolulu, &hst, &params).unwrap());
    assert_eq!(rise.date, d);
    assert_abs_diff_eq!(rise.hours, 6.579374, epsilon = 1e-4);
    let (set, az) = expect_crossing(sunset(&d, &honolulu, &hst, &params).unwrap());
    assert_eq!(set.date, d);
    assert_abs_diff_eq!(set.hours, 18.712886, epsilon = 1e-4);
    assert_abs_diff_eq!(az, 270.778230, epsilon = 1e-3);
}

#[test]
fn test_polar_day_and_night() {
    let params = SolverParams::default();
    let arctic = GeographicLocation::new(70.0, 0.0).unwrap();
    let utc = TimeZoneSpec::utc();

    let midsummer = sunset(&date(2024, 6, 21.0), &arctic, &utc, &params).unwrap();
    assert_eq!(midsummer, RiseSetResult::Circumpolar);
    assert!(!midsummer.is_normal());

    let midwinter = sunrise(&date(2024, 12, 21.0), &arctic, &utc, &params).unwrap();
    assert_eq!(midwinter, RiseSetResult::NeverRises);
    assert_eq!(midwinter.local_time(), None);
}

#[test]
fn test_twilight_brackets_the_day() {
    let params = SolverParams::default();
    let boston = GeographicLocation::new(42.3667, -71.05).unwrap();
    let zone = TimeZoneSpec::new(-5.0, false).unwrap();
    let d = date(1986, 3, 10.0);

    let rise = expect_crossing(sunrise(&d, &boston, &zone, &params).unwrap()).0;
    let set = expect_crossing(sunset(&d, &boston, &zone, &params).unwrap()).0;
    let mut previous = None;
    for kind in [
        TwilightKind::Civil,
        TwilightKind::Nautical,
        TwilightKind::Astronomical,
    ] {
        let dawn = expect_crossing(morning_twilight(&d, &boston, &zone, kind, &params).unwrap()).0;
        let dusk = expect_crossing(evening_twilight(&d, &boston, &zone, kind, &params).unwrap()).0;
        assert!(dawn.hours < rise.hours);
        assert!(dusk.hours > set.hours);
        // each deeper twilight starts earlier and ends later
        if let Some((d0, e0)) = previous {
            assert!(dawn.hours < d0);
            assert!(dusk.hours > e0);
        }
        previous = Some((dawn.hours, dusk.hours));
    }
}

#[test]
fn test_moonrise_and_moonset_boston() {
    let params = SolverParams::default();
    let boston = GeographicLocation::new(42.3667, -71.05).unwrap();
    let zone = TimeZoneSpec::new(-5.0, false).unwrap();
    let d = date(1986, 3, 6.0);

    let (rise, rise_az) = expect_crossing(moonrise(&d, &boston, &zone, &params).unwrap());
    assert_abs_diff_eq!(rise.hours, hms(4.0, 20.0, 45.02), epsilon = 1e-4);
    assert_abs_diff_eq!(rise_az, 127.336204, epsilon = 1e-3);

    let (set, set_az) = expect_crossing(moonset(&d, &boston, &zone, &params).unwrap());
    assert_abs_diff_eq!(set.hours, hms(13.0, 7.0, 31.45), epsilon = 1e-4);
    assert_abs_diff_eq!(set_az, 234.049254, epsilon = 1e-3);
}

#[test]
fn test_lunation_of_march_2015() {
    let params = SolverParams::default();
    let d = date(2015, 4, 1.0);

    // total solar eclipse of 20 March 2015
    let nm = new_moon(&d, &params).unwrap();
    assert_eq!(nm.phase, Phase::NewMoon);
    assert_eq!(nm.lunation, 1425.0);
    assert_abs_diff_eq!(nm.julian_day.value(), 2457101.900855, epsilon = 2e-5);
    assert_eq!((nm.ut.date.month(), nm.ut.date.whole_day()), (3, 20));
    assert_abs_diff_eq!(nm.ut.hours, 9.620515, epsilon = 1e-3);
    assert!(moon_phase(nm.julian_day).illuminated_fraction < 0.005);

    let fm = full_moon(&d, &params).unwrap();
    assert_eq!(fm.lunation, 1425.5);
    assert_abs_diff_eq!(fm.julian_day.value(), 2457117.004653, epsilon = 2e-5);
    assert!(moon_phase(fm.julian_day).illuminated_fraction > 0.995);
}

#[test]
fn test_new_moon_of_august_2003() {
    let params = SolverParams::default();
    let nm = new_moon(&date(2003, 8, 27.0), &params).unwrap();
    assert_eq!(nm.lunation, 1282.0);
    // the mean syzygy seed 2452879.2268 refines about 40 s later
    assert_abs_diff_eq!(nm.julian_day.value(), 2452879.227257, epsilon = 2e-5);
    assert_eq!((nm.ut.date.month(), nm.ut.date.whole_day()), (8, 27));
}

#[test]
fn test_eclipse_check_agrees_with_full_moon() {
    let params = SolverParams::default();
    let d = date(2015, 4, 1.0);

    let check = lunar_eclipse_occurrence(&d).unwrap();
    assert_eq!(check.occurrence, EclipseOccurrence::Certain);
    assert_eq!(
        (check.full_moon_ut.date.month(), check.full_moon_ut.date.whole_day()),
        (4, 4)
    );

    // the screening uses the mean full moon, within hours of the true one
    let fm = full_moon(&d, &params).unwrap();
    assert_abs_diff_eq!(check.full_moon.value(), fm.julian_day.value(), epsilon = 0.5);
    assert!(check.moon_latitude.abs() < 0.6);
}
