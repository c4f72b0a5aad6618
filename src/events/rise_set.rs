//! # Horizon-crossing search
//!
//! A body crosses the altitude `−vd` (its vertical displacement: refraction, semi-diameter,
//! parallax or twilight depression folded into one number) at the hour angle `H` given by
//!
//! ```text
//! cos H = −(sin vd + sin φ·sin δ) / (cos φ·cos δ)
//! ```
//!
//! The body moves while the Earth turns, so the search iterates: starting from local noon,
//! compute the position at the current UT estimate, derive `H`, then
//! `LST = α ∓ H → GST → UT` on the Greenwich date of the seed, and repeat until the UT
//! update is below `time_tolerance_hours`.
//!
//! A UT on the Greenwich date of the seed can land on the local date before or after the
//! requested one when the zone offset is large. Such an estimate is moved by one sidereal
//! day, which brings back the same hour angle on the requested local date.
use std::ops::ControlFlow;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::constants::{Degree, Hours, RADEG, SOLAR_RATE};
use crate::coordinates::{EquatorialCoordinate, GeographicLocation};
use crate::events::{Crossing, RiseSetResult};
use crate::iteration::{bounded_loop, SolverParams};
use crate::time::{
    gst_to_ut, local_to_universal, lst_to_gst, universal_to_local, CalendarDate, DatedTime,
    JulianDay, TimeZoneSpec,
};

/// Length of a sidereal day in solar hours
const SIDEREAL_DAY: Hours = 24.0 * SOLAR_RATE;

/// Anything whose rising and setting can be searched for.
pub trait RiseSetTarget {
    /// Equatorial position and vertical displacement (degrees) at `jd`.
    fn position_at(
        &self,
        jd: JulianDay,
    ) -> Result<(EquatorialCoordinate, Degree), AlmagestError>;
}

/// A body at a fixed equatorial position, such as a star.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedTarget {
    pub position: EquatorialCoordinate,
    pub vertical_displacement: Degree,
}

impl RiseSetTarget for FixedTarget {
    fn position_at(
        &self,
        _jd: JulianDay,
    ) -> Result<(EquatorialCoordinate, Degree), AlmagestError> {
        Ok((self.position, self.vertical_displacement))
    }
}

/// Where the geometry puts the crossing, before any time conversion.
enum HourAngle {
    Crossing(Degree),
    Circumpolar,
    NeverRises,
}

fn crossing_hour_angle(declination: Degree, latitude: Degree, vd: Degree) -> HourAngle {
    let (sd, cd) = (declination * RADEG).sin_cos();
    let (sp, cp) = (latitude * RADEG).sin_cos();
    let cos_h = -((vd * RADEG).sin() + sp * sd) / (cp * cd);
    if cos_h <= -1.0 {
        HourAngle::Circumpolar
    } else if cos_h < 1.0 {
        HourAngle::Crossing(cos_h.acos() / RADEG)
    } else {
        // also catches the NaN of a pole with the body on the equator
        HourAngle::NeverRises
    }
}

/// Rising azimuth; the setting azimuth is its complement to 360°.
fn crossing_azimuth(declination: Degree, latitude: Degree, vd: Degree, crossing: Crossing) -> Degree {
    let (sv, cv) = (vd * RADEG).sin_cos();
    let sp = (latitude * RADEG).sin();
    let cp = (latitude * RADEG).cos();
    let cos_az = ((declination * RADEG).sin() + sv * sp) / (cv * cp);
    let az = cos_az.clamp(-1.0, 1.0).acos() / RADEG;
    match crossing {
        Crossing::Rise => az,
        Crossing::Set => 360.0 - az,
    }
}

/// Search for the rising or setting of `target` on the local date `date`.
///
/// Arguments
/// ---------
/// * `target`: supplies the position and vertical displacement at each UT estimate.
/// * `date`: local civil date; any time of day it carries is ignored.
/// * `location`, `zone`: observer.
/// * `crossing`: rise (east of the meridian) or set (west).
/// * `params`: `time_tolerance_hours` and `max_iterations` bound the search.
///
/// Return
/// ------
/// * [`RiseSetResult::Normal`] with the local civil time and azimuth on convergence.
/// * [`RiseSetResult::Circumpolar`] / [`RiseSetResult::NeverRises`] when `|cos H| ≥ 1` at
///   any step.
/// * [`RiseSetResult::NoConvergence`] when the cap is reached.
///
/// Errors
/// ------
/// * Errors raised by `target`.
pub fn find_crossing<T: RiseSetTarget + ?Sized>(
    target: &T,
    date: &CalendarDate,
    location: &GeographicLocation,
    zone: &TimeZoneSpec,
    crossing: Crossing,
    params: &SolverParams,
) -> Result<RiseSetResult, AlmagestError> {
    let local_noon = DatedTime::new(date.date_only(), 12.0)?;
    let mut ut = local_to_universal(&local_noon, zone);
    let greenwich_date = ut.date;
    let requested = date.date_only().to_julian_day().value();

    // whole days between the local date of `t` and the requested date
    let day_offset = |t: &DatedTime| {
        universal_to_local(t, zone).date.to_julian_day().value() - requested
    };

    let outcome = bounded_loop("rise_set", params.max_iterations, |i| {
        let (position, vd) = target.position_at(ut.to_julian_day())?;
        let h = match crossing_hour_angle(position.declination, location.latitude, vd) {
            HourAngle::Crossing(h) => h / 15.0,
            HourAngle::Circumpolar => return Ok(ControlFlow::Break(RiseSetResult::Circumpolar)),
            HourAngle::NeverRises => return Ok(ControlFlow::Break(RiseSetResult::NeverRises)),
        };
        let lst = match crossing {
            Crossing::Rise => position.right_ascension - h,
            Crossing::Set => position.right_ascension + h,
        };
        let gst = lst_to_gst(lst, location.longitude)?;
        let mut next = gst_to_ut(gst, &greenwich_date)?.ut;
        let offset = day_offset(&next);
        if offset.abs() > 0.5 {
            let shifted = next.add_hours(-offset.signum() * SIDEREAL_DAY);
            // no crossing on the requested date: keep the adjacent one
            if day_offset(&shifted).abs() < 0.5 {
                next = shifted;
            }
        }
        let delta = (next.to_julian_day().value() - ut.to_julian_day().value()) * 24.0;
        trace!("rise_set: iteration {i}, UT {:.6} h, ΔUT {delta:.3e} h", next.hours);
        ut = next;

        if delta.abs() < params.time_tolerance_hours {
            Ok(ControlFlow::Break(RiseSetResult::Normal {
                local_time: universal_to_local(&ut, zone),
                azimuth: crossing_azimuth(position.declination, location.latitude, vd, crossing),
            }))
        } else {
            Ok(ControlFlow::Continue(()))
        }
    })?;

    Ok(match outcome {
        Some((result, _)) => result,
        None => RiseSetResult::NoConvergence {
            iterations: params.max_iterations,
        },
    })
}

/// Rising and setting of a body at a fixed equatorial position.
///
/// `vertical_displacement` is in degrees: 0.5667 for refraction alone, as is usual for
/// stars.
pub fn rise_set_fixed(
    position: &EquatorialCoordinate,
    vertical_displacement: Degree,
    date: &CalendarDate,
    location: &GeographicLocation,
    zone: &TimeZoneSpec,
    params: &SolverParams,
) -> Result<(RiseSetResult, RiseSetResult), AlmagestError> {
    let target = FixedTarget {
        position: *position,
        vertical_displacement,
    };
    Ok((
        find_crossing(&target, date, location, zone, Crossing::Rise, params)?,
        find_crossing(&target, date, location, zone, Crossing::Set, params)?,
    ))
}
