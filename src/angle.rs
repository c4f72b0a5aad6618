//! # Angle utilities
//!
//! Normalisation of angles and times of day into their canonical range, and the
//! sexagesimal (degrees/hours, minutes, seconds) split used throughout the formula set.
//!
//! Public entry points validate their input and return [`AlmagestError`] on NaN or
//! infinities. The crate-internal [`wrap`] family performs the same reduction without
//! checks and is used once a value is known to be finite.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::almagest_errors::{ensure_finite, AlmagestError};
use crate::constants::{Degree, Hours, Radian, DEGREES_PER_HOUR, DPI};

/// Reduce `x` into `[0, period)`.
///
/// The reduction is a single floor division, so it terminates in constant time for any
/// finite input however large.
///
/// Errors
/// ------
/// * `NonFiniteInput` when `x` is NaN or infinite.
/// * `OutOfDomain` when `period` is not a finite positive number.
pub fn unwind(x: f64, period: f64) -> Result<f64, AlmagestError> {
    ensure_finite(x, "angle")?;
    if !(period.is_finite() && period > 0.0) {
        return Err(AlmagestError::OutOfDomain(format!(
            "unwind period must be finite and positive (got {period})"
        )));
    }
    Ok(wrap(x, period))
}

/// [`unwind`] with a period of 360 degrees.
pub fn unwind_deg(x: Degree) -> Result<Degree, AlmagestError> {
    unwind(x, 360.0)
}

/// [`unwind`] with a period of 24 hours.
pub fn unwind_hours(x: Hours) -> Result<Hours, AlmagestError> {
    unwind(x, 24.0)
}

/// [`unwind`] with a period of 2π radians.
pub fn unwind_rad(x: Radian) -> Result<Radian, AlmagestError> {
    unwind(x, DPI)
}

/// Unchecked reduction into `[0, period)` for values already known to be finite.
#[inline]
pub(crate) fn wrap(x: f64, period: f64) -> f64 {
    let r = x - period * (x / period).floor();
    // x slightly below a multiple of the period can round up to exactly `period`
    if r >= period {
        r - period
    } else {
        r
    }
}

#[inline]
pub(crate) fn wrap_deg(x: Degree) -> Degree {
    wrap(x, 360.0)
}

#[inline]
pub(crate) fn wrap_hours(x: Hours) -> Hours {
    wrap(x, 24.0)
}

#[inline]
pub(crate) fn wrap_rad(x: Radian) -> Radian {
    wrap(x, DPI)
}

/// Difference `a - b` wound into `(-period/2, period/2]`.
pub fn signed_difference(a: f64, b: f64, period: f64) -> f64 {
    let d = wrap(a - b, period);
    if d > period / 2.0 {
        d - period
    } else {
        d
    }
}

/// Sign of `x`: -1, 0 or 1.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Fractional part `x - floor(x)`, always in `[0, 1)`.
pub fn fract(x: f64) -> f64 {
    x - x.floor()
}

pub fn degrees_to_hours(x: Degree) -> Hours {
    x / DEGREES_PER_HOUR
}

pub fn hours_to_degrees(x: Hours) -> Degree {
    x * DEGREES_PER_HOUR
}

/// A value split into whole units (degrees or hours), minutes and seconds.
///
/// The sign is carried once, in `negative`; the three components are magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sexagesimal {
    pub negative: bool,
    pub units: u32,
    pub minutes: u32,
    pub seconds: f64,
}

/// A floored, non-negative component of `value` as `u32`.
fn whole_component(floored: f64, value: f64) -> Result<u32, AlmagestError> {
    // `as u64` saturates, so anything past u32::MAX fails the conversion
    u32::try_from(floored as u64).map_err(|_| {
        AlmagestError::OutOfDomain(format!("{value} is too large for a sexagesimal split"))
    })
}

impl Sexagesimal {
    /// Split a decimal value into units, minutes and seconds.
    pub fn from_decimal(value: f64) -> Result<Self, AlmagestError> {
        ensure_finite(value, "sexagesimal value")?;
        let total = value.abs() * 3600.0;
        let units = (total / 3600.0).floor();
        let minutes = ((total - units * 3600.0) / 60.0).floor();
        let seconds = total - units * 3600.0 - minutes * 60.0;
        Ok(Sexagesimal {
            negative: value.is_sign_negative() && value != 0.0,
            units: whole_component(units, value)?,
            minutes: whole_component(minutes, value)?,
            seconds,
        })
    }

    /// Recombine into a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let magnitude =
            self.units as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Round the seconds to `places` decimals, carrying 60 s into minutes and 60 min
    /// into units.
    pub fn round_seconds(self, places: u32) -> Self {
        let scale = 10f64.powi(places as i32);
        let mut seconds = (self.seconds * scale).round() / scale;
        let mut minutes = self.minutes;
        let mut units = self.units;
        if seconds >= 60.0 {
            seconds -= 60.0;
            minutes += 1;
        }
        if minutes >= 60 {
            minutes -= 60;
            units += 1;
        }
        Sexagesimal {
            seconds,
            minutes,
            units,
            ..self
        }
    }
}

impl fmt::Display for Sexagesimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        write!(
            f,
            "{sign}{} {:02} {:05.2}",
            self.units, self.minutes, self.seconds
        )
    }
}

/// Degrees, arcminutes and arcseconds to decimal degrees.
///
/// The result takes the sign of `degrees` (a `-0.0` degrees component counts as
/// negative); the signs of `minutes` and `seconds` are ignored.
///
/// # Examples
///
/// ```rust
/// use almagest::angle::dms_to_degrees;
///
/// let d = dms_to_degrees(182.0, 31.0, 27.0).unwrap();
/// assert!((d - 182.524167).abs() < 1e-6);
/// let s = dms_to_degrees(-0.0, 30.0, 0.0).unwrap();
/// assert_eq!(s, -0.5);
/// ```
pub fn dms_to_degrees(degrees: f64, minutes: f64, seconds: f64) -> Result<Degree, AlmagestError> {
    sexagesimal_to_decimal(degrees, minutes, seconds)
}

/// Decimal degrees to degrees, arcminutes and arcseconds.
pub fn degrees_to_dms(value: Degree) -> Result<Sexagesimal, AlmagestError> {
    Sexagesimal::from_decimal(value)
}

pub(crate) fn sexagesimal_to_decimal(
    units: f64,
    minutes: f64,
    seconds: f64,
) -> Result<f64, AlmagestError> {
    ensure_finite(units, "units")?;
    ensure_finite(minutes, "minutes")?;
    ensure_finite(seconds, "seconds")?;
    let magnitude = units.abs() + minutes.abs() / 60.0 + seconds.abs() / 3600.0;
    Ok(if units.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    })
}
