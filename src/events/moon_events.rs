//! Moonrise and moonset.
//!
//! The Moon moves about 13° a day, so its position and its vertical displacement (which
//! depends on the parallax) are recomputed at every step of the search. The crossing found
//! from a seed at local noon may fall on the neighbouring local date; the returned
//! [`DatedTime`](crate::time::DatedTime) says which.
use crate::almagest_errors::AlmagestError;
use crate::bodies::moon::{moon_position, vertical_displacement};
use crate::constants::Degree;
use crate::coordinates::{EquatorialCoordinate, GeographicLocation};
use crate::events::rise_set::{find_crossing, RiseSetTarget};
use crate::events::{Crossing, RiseSetResult};
use crate::iteration::SolverParams;
use crate::time::{CalendarDate, JulianDay, TimeZoneSpec};

struct LunarTarget;

impl RiseSetTarget for LunarTarget {
    fn position_at(
        &self,
        jd: JulianDay,
    ) -> Result<(EquatorialCoordinate, Degree), AlmagestError> {
        let moon = moon_position(jd);
        Ok((
            moon.equatorial,
            vertical_displacement(moon.horizontal_parallax),
        ))
    }
}

pub fn moonrise(
    date: &CalendarDate,
    location: &GeographicLocation,
    zone: &TimeZoneSpec,
    params: &SolverParams,
) -> Result<RiseSetResult, AlmagestError> {
    find_crossing(&LunarTarget, date, location, zone, Crossing::Rise, params)
}

pub fn moonset(
    date: &CalendarDate,
    location: &GeographicLocation,
    zone: &TimeZoneSpec,
    params: &SolverParams,
) -> Result<RiseSetResult, AlmagestError> {
    find_crossing(&LunarTarget, date, location, zone, Crossing::Set, params)
}

#[cfg(test)]
mod moon_events_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_moonrise_moonset_boston() {
        // 1986-03-06, 42.3667°N 71.05°W, EST
        let date = CalendarDate::new(1986, 3, 6.0).unwrap();
        let location = GeographicLocation::new(42.3667, -71.05).unwrap();
        let zone = TimeZoneSpec::new(-5.0, false).unwrap();
        let params = SolverParams::default();

        match moonrise(&date, &location, &zone, &params).unwrap() {
            RiseSetResult::Normal {
                local_time,
                azimuth,
            } => {
                // 09:20:45.02 UT
                assert_eq!(local_time.date.whole_day(), 6);
                assert_abs_diff_eq!(
                    local_time.hours,
                    4.0 + 20.0 / 60.0 + 45.02 / 3600.0,
                    epsilon = 1e-4
                );
                assert_abs_diff_eq!(azimuth, 127.336204, epsilon = 1e-3);
            }
            other => panic!("unexpected {other:?}"),
        }

        match moonset(&date, &location, &zone, &params).unwrap() {
            RiseSetResult::Normal {
                local_time,
                azimuth,
            } => {
                // 18:07:31.45 UT
                assert_abs_diff_eq!(
                    local_time.hours,
                    13.0 + 7.0 / 60.0 + 31.45 / 3600.0,
                    epsilon = 1e-4
                );
                assert_abs_diff_eq!(azimuth, 234.049254, epsilon = 1e-3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
