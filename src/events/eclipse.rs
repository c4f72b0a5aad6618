//! Lunar eclipse screening.
//!
//! An eclipse needs the full moon to fall close to a node of the lunar orbit. The test is
//! geometric and single-pass: the Moon's argument of latitude `F` at the mean full moon is
//! folded into a distance from the nearest node, then compared with two limits.
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::bodies::moon::moon_position;
use crate::constants::{Degree, Radian};
use crate::events::syzygy::{lunation_number, mean_syzygy};
use crate::time::{CalendarDate, DatedTime, JulianDay};

/// Node distance under which an eclipse is certain (radians)
const CERTAIN_LIMIT: Radian = 0.242600766;
/// Node distance beyond which no eclipse is possible (radians)
const POSSIBLE_LIMIT: Radian = 0.37;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EclipseOccurrence {
    Certain,
    Possible,
    None,
}

/// Outcome of the eclipse check for one lunation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LunarEclipseCheck {
    pub occurrence: EclipseOccurrence,
    /// Mean full moon of the lunation
    pub full_moon: JulianDay,
    /// Greenwich date and universal time of the full moon
    pub full_moon_ut: DatedTime,
    /// Ecliptic latitude of the Moon at the full moon
    pub moon_latitude: Degree,
    /// Folded distance of the Moon from its node (radians)
    pub node_distance: Radian,
}

fn node_distance(argument_of_latitude: Radian) -> Radian {
    let pi = std::f64::consts::PI;
    let df = (argument_of_latitude - pi * (argument_of_latitude / pi).floor()).abs();
    if df > POSSIBLE_LIMIT {
        pi - df
    } else {
        df
    }
}

fn classify(df: Radian) -> EclipseOccurrence {
    if df < CERTAIN_LIMIT {
        EclipseOccurrence::Certain
    } else if df <= POSSIBLE_LIMIT {
        EclipseOccurrence::Possible
    } else {
        EclipseOccurrence::None
    }
}

/// Whether a lunar eclipse can happen at the full moon of the lunation in progress at
/// `date`.
///
/// # Examples
///
/// ```rust
/// use almagest::events::eclipse::{lunar_eclipse_occurrence, EclipseOccurrence};
/// use almagest::time::CalendarDate;
///
/// let check = lunar_eclipse_occurrence(&CalendarDate::new(2015, 4, 1.0).unwrap()).unwrap();
/// assert_eq!(check.occurrence, EclipseOccurrence::Certain);
/// assert_eq!(check.full_moon_ut.date.whole_day(), 4);
/// ```
pub fn lunar_eclipse_occurrence(date: &CalendarDate) -> Result<LunarEclipseCheck, AlmagestError> {
    let k = lunation_number(date)? + 0.5;
    let (jd, f) = mean_syzygy(k);
    let full_moon = JulianDay::new(jd)?;
    let df = node_distance(f);

    Ok(LunarEclipseCheck {
        occurrence: classify(df),
        full_moon,
        full_moon_ut: DatedTime::from_julian_day(full_moon),
        moon_latitude: moon_position(full_moon).ecliptic.latitude,
        node_distance: df,
    })
}
