//! # New and full moons
//!
//! The search runs in two steps:
//!
//! 1. the mean-syzygy series gives the instant of the new (or full) moon of lunation `k`
//!    to within a few hours, `k` counting lunations from 1900 January;
//! 2. a bounded loop nudges it until the apparent elongation of the Moon from the Sun
//!    equals 0° (or 180°), dividing the residual by the mean elongation rate of
//!    12.190749°/day.
use std::ops::ControlFlow;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::angle::{fract, signed_difference, wrap_deg};
use crate::bodies::moon::moon_position;
use crate::bodies::sun::sun_position;
use crate::constants::{Degree, Radian, J1900, RADEG};
use crate::iteration::{bounded_loop, SolverParams};
use crate::time::{CalendarDate, DatedTime, JulianDay};

/// Mean elongation rate of the Moon from the Sun (degrees/day)
const ELONGATION_RATE: f64 = 12.190749;
/// Lunations per year
const LUNATIONS_PER_YEAR: f64 = 12.3685;

/// Which syzygy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    NewMoon,
    FullMoon,
}

impl Phase {
    fn elongation(self) -> Degree {
        match self {
            Phase::NewMoon => 0.0,
            Phase::FullMoon => 180.0,
        }
    }

    fn lunation_offset(self) -> f64 {
        match self {
            Phase::NewMoon => 0.0,
            Phase::FullMoon => 0.5,
        }
    }
}

/// A new or full moon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Syzygy {
    pub phase: Phase,
    /// Lunation number, half-integer for full moons
    pub lunation: f64,
    pub julian_day: JulianDay,
    /// Greenwich date and universal time
    pub ut: DatedTime,
}

/// Number of the lunation in progress at `date`, counted from 1900 January.
pub fn lunation_number(date: &CalendarDate) -> Result<f64, AlmagestError> {
    let jan_0 = CalendarDate::new(date.year(), 1, 1.0)?.to_julian_day().value() - 1.0;
    let day = date.date_only().to_julian_day().value() - jan_0;
    let years = (date.year() - 1900) as f64 + day / 365.0;
    Ok((years * LUNATIONS_PER_YEAR + 0.5).floor())
}

/// Mean syzygy of lunation `k`: Julian Day and the Moon's argument of latitude `F` in
/// `[0, 2π)`.
pub(crate) fn mean_syzygy(k: f64) -> (f64, Radian) {
    let t = k / 1236.85;
    let t2 = t * t;
    let e = 29.53 * k;

    let c = (166.56 + (132.87 - 0.009173 * t) * t) * RADEG;
    let b = 0.00058868 * k + (0.0001178 - 0.000000155 * t) * t2 + 0.00033 * c.sin() + 0.75933;
    let sun_anomaly = wrap_deg(
        359.2242 + 360.0 * fract(k / 12.36886) - (0.0000333 + 0.00000347 * t) * t2,
    ) * RADEG;
    let moon_anomaly = wrap_deg(
        306.0253 + 360.0 * fract(k / 0.9330851) + (0.0107306 + 0.00001236 * t) * t2,
    ) * RADEG;
    let f = wrap_deg(21.2964 + 360.0 * fract(k / 0.9214926) - (0.0016528 + 0.00000239 * t) * t2)
        * RADEG;

    let (a1, a2) = (sun_anomaly, moon_anomaly);
    let correction = (0.1734 - 0.000393 * t) * a1.sin() + 0.0021 * (2.0 * a1).sin()
        - 0.4068 * a2.sin()
        + 0.0161 * (2.0 * a2).sin()
        - 0.0004 * (3.0 * a2).sin()
        + 0.0104 * (2.0 * f).sin()
        - 0.0051 * (a1 + a2).sin()
        - 0.0074 * (a1 - a2).sin()
        + 0.0004 * (2.0 * f + a1).sin()
        - 0.0004 * (2.0 * f - a1).sin()
        - 0.0006 * (2.0 * f + a2).sin()
        + 0.001 * (2.0 * f - a2).sin()
        + 0.0005 * (a1 + 2.0 * a2).sin();

    (J1900 + e.floor() + b + correction + fract(e), f)
}

/// Apparent elongation of the Moon from the Sun, in `[0, 360)`.
fn elongation(jd: JulianDay) -> Degree {
    wrap_deg(moon_position(jd).ecliptic.longitude - sun_position(jd).apparent_longitude)
}

fn refine(seed: f64, target: Degree, params: &SolverParams) -> Result<JulianDay, AlmagestError> {
    let mut jd = JulianDay::new(seed)?;
    let converged = bounded_loop("syzygy", params.max_iterations, |i| {
        let residual = signed_difference(elongation(jd), target, 360.0);
        let step = residual / ELONGATION_RATE;
        jd = jd.add_days(-step);
        trace!("syzygy: iteration {i}, step {:.3e} h", step * 24.0);
        Ok(if step.abs() * 24.0 < params.time_tolerance_hours {
            ControlFlow::Break(jd)
        } else {
            ControlFlow::Continue(())
        })
    })?;
    converged
        .map(|(jd, _)| jd)
        .ok_or(AlmagestError::NoConvergence {
            solver: "syzygy",
            iterations: params.max_iterations,
        })
}

/// The new or full moon of the lunation in progress at `date`.
///
/// Errors
/// ------
/// * `NoConvergence` when the refinement does not settle within `params.max_iterations`.
pub fn syzygy(
    date: &CalendarDate,
    phase: Phase,
    params: &SolverParams,
) -> Result<Syzygy, AlmagestError> {
    let k = lunation_number(date)? + phase.lunation_offset();
    let (seed, _) = mean_syzygy(k);
    let jd = refine(seed, phase.elongation(), params)?;
    Ok(Syzygy {
        phase,
        lunation: k,
        julian_day: jd,
        ut: DatedTime::from_julian_day(jd),
    })
}

/// New moon of the lunation in progress at `date`.
///
/// ```rust
/// use almagest::events::syzygy::new_moon;
/// use almagest::iteration::SolverParams;
/// use almagest::time::CalendarDate;
///
/// let date = CalendarDate::new(2003, 8, 27.0).unwrap();
/// let nm = new_moon(&date, &SolverParams::default()).unwrap();
/// assert_eq!(nm.ut.date.whole_day(), 27);
/// assert!((nm.ut.hours - 17.45).abs() < 0.01);
/// ```
pub fn new_moon(date: &CalendarDate, params: &SolverParams) -> Result<Syzygy, AlmagestError> {
    syzygy(date, Phase::NewMoon, params)
}

/// Full moon following the new moon of the lunation in progress at `date`.
pub fn full_moon(date: &CalendarDate, params: &SolverParams) -> Result<Syzygy, AlmagestError> {
    syzygy(date, Phase::FullMoon, params)
}
