use crate::almagest_errors::AlmagestError;
use crate::bodies::sun::sun_position;
use crate::constants::Degree;
use crate::coordinates::{EquatorialCoordinate, GeographicLocation};
use crate::events::rise_set::{find_crossing, RiseSetTarget};
use crate::events::{Crossing, RiseSetResult, TwilightKind};
use crate::iteration::SolverParams;
use crate::time::{CalendarDate, JulianDay, TimeZoneSpec};

/// Refraction (34') plus the solar semi-diameter (16'), in degrees
pub const SUNRISE_DISPLACEMENT: Degree = 0.8333;

/// The apparent Sun with a fixed vertical displacement.
struct SolarTarget {
    vertical_displacement: Degree,
}

impl RiseSetTarget for SolarTarget {
    fn position_at(
        &self,
        jd: JulianDay,
    ) -> Result<(EquatorialCoordinate, Degree), AlmagestError> {
        let sun = sun_position(jd);
        Ok((sun.apparent_equatorial(jd), self.vertical_displacement))
    }
}

fn solar_crossing(
    date: &CalendarDate,
    location: &GeographicLocation,
    zone: &TimeZoneSpec,
    vertical_displacement: Degree,
    crossing: Crossing,
    params: &SolverParams,
) -> Result<RiseSetResult, AlmagestError> {
    let target = SolarTarget {
        vertical_displacement,
    };
    find_crossing(&target, date, location, zone, crossing, params)
}

/// Local time and azimuth of sunrise (upper limb on the refracted horizon).
pub fn sunrise(
    date: &CalendarDate,
    location: &GeographicLocation,
    zone: &TimeZoneSpec,
    params: &SolverParams,
) -> Result<RiseSetResult, AlmagestError> {
    solar_crossing(date, location, zone, SUNRISE_DISPLACEMENT, Crossing::Rise, params)
}

/// Local time and azimuth of sunset.
pub fn sunset(
    date: &CalendarDate,
    location: &GeographicLocation,
    zone: &TimeZoneSpec,
    params: &SolverParams,
) -> Result<RiseSetResult, AlmagestError> {
    solar_crossing(date, location, zone, SUNRISE_DISPLACEMENT, Crossing::Set, params)
}

/// Start of morning twilight: the Sun climbs through the depression of `kind`.
///
/// `Circumpolar` means the Sun never sinks that far (twilight all night); `NeverRises`
/// means it never climbs that high.
pub fn morning_twilight(
    date: &CalendarDate,
    location: &GeographicLocation,
    zone: &TimeZoneSpec,
    kind: TwilightKind,
    params: &SolverParams,
) -> Result<RiseSetResult, AlmagestError> {
    solar_crossing(date, location, zone, kind.depression(), Crossing::Rise, params)
}

/// End of evening twilight: the Sun sinks through the depression of `kind`.
pub fn evening_twilight(
    date: &CalendarDate,
    location: &GeographicLocation,
    zone: &TimeZoneSpec,
    kind: TwilightKind,
    params: &SolverParams,
) -> Result<RiseSetResult, AlmagestError> {
    solar_crossing(date, location, zone, kind.depression(), Crossing::Set, params)
}
