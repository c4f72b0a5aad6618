//! # Event predictors
//!
//! Rising, setting and twilight for the Sun, the Moon and fixed stars, new and full moons,
//! and lunar eclipse screening.
//!
//! Rise, set and twilight searches all go through [`rise_set::find_crossing`], a bounded
//! fixed-point iteration on the universal time of the horizon crossing. They report a
//! [`RiseSetResult`] rather than an error when the body stays above or below the horizon
//! all day, or when the iteration does not settle.
//!
//! ## Example
//!
//! ```rust
//! use almagest::coordinates::GeographicLocation;
//! use almagest::events::{sun_events::sunrise, RiseSetResult};
//! use almagest::iteration::SolverParams;
//! use almagest::time::{CalendarDate, TimeZoneSpec};
//!
//! let date = CalendarDate::new(2024, 3, 20.0).unwrap();
//! let equator = GeographicLocation::new(0.0, 0.0).unwrap();
//! let rise = sunrise(&date, &equator, &TimeZoneSpec::utc(), &SolverParams::default()).unwrap();
//! match rise {
//!     RiseSetResult::Normal { local_time, azimuth } => {
//!         assert!((local_time.hours - 6.07).abs() < 0.01);
//!         assert!((azimuth - 90.0).abs() < 0.1);
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
use serde::{Deserialize, Serialize};

use crate::constants::Degree;
use crate::time::DatedTime;

/// Generic horizon-crossing search.
pub mod rise_set;

/// Sunrise, sunset and twilight.
pub mod sun_events;

/// Moonrise and moonset.
pub mod moon_events;

/// New and full moons.
pub mod syzygy;

/// Lunar eclipse occurrence.
pub mod eclipse;

/// Outcome of a rise, set or twilight search.
///
/// Variants
/// --------
/// * `Normal` – The crossing happens; `local_time` is the local civil time with its own
///   date, which may differ from the requested one. `azimuth` in degrees from north.
/// * `Circumpolar` – The body stays above the altitude threshold all day.
/// * `NeverRises` – The body stays below the altitude threshold all day.
/// * `NoConvergence` – The fixed-point search hit its iteration cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RiseSetResult {
    Normal {
        local_time: DatedTime,
        azimuth: Degree,
    },
    Circumpolar,
    NeverRises,
    NoConvergence {
        iterations: usize,
    },
}

impl RiseSetResult {
    pub fn is_normal(&self) -> bool {
        matches!(self, RiseSetResult::Normal { .. })
    }

    /// Local time of the crossing, if there is one.
    pub fn local_time(&self) -> Option<DatedTime> {
        match self {
            RiseSetResult::Normal { local_time, .. } => Some(*local_time),
            _ => None,
        }
    }
}

/// Which side of the meridian the crossing is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crossing {
    Rise,
    Set,
}

/// Twilight definitions by solar depression below the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TwilightKind {
    /// 6°
    Civil,
    /// 12°
    Nautical,
    /// 18°
    Astronomical,
}

impl TwilightKind {
    /// Depression of the Sun's centre below the horizon, in degrees.
    pub fn depression(self) -> Degree {
        match self {
            TwilightKind::Civil => 6.0,
            TwilightKind::Nautical => 12.0,
            TwilightKind::Astronomical => 18.0,
        }
    }
}

#[cfg(test)]
mod events_test {
    use super::*;
    use crate::time::CalendarDate;

    #[test]
    fn test_twilight_depression() {
        assert_eq!(TwilightKind::Civil.depression(), 6.0);
        assert_eq!(TwilightKind::Nautical.depression(), 12.0);
        assert_eq!(TwilightKind::Astronomical.depression(), 18.0);
    }

    #[test]
    fn test_result_accessors() {
        let t = DatedTime::new(CalendarDate::new(2024, 1, 1.0).unwrap(), 6.5).unwrap();
        let r = RiseSetResult::Normal {
            local_time: t,
            azimuth: 120.0,
        };
        assert!(r.is_normal());
        assert_eq!(r.local_time(), Some(t));
        assert_eq!(RiseSetResult::Circumpolar.local_time(), None);
        assert!(!RiseSetResult::NoConvergence { iterations: 50 }.is_normal());
    }
}
