//! # Obliquity of the ecliptic and nutation
//!
//! Low-precision models referred to the 1900 January 0.5 epoch. All angles are in degrees.
use serde::{Deserialize, Serialize};

use crate::angle::fract;
use crate::constants::{Degree, J1900, RADEG};
use crate::time::JulianDay;

/// Compute the mean obliquity of the ecliptic at a given date.
///
/// The obliquity ε is the angle between the Earth's equator and the ecliptic plane,
/// evaluated as a cubic polynomial in Julian centuries since J2000 (here expressed from
/// the 1900 epoch):
///
/// ```text
/// c = (JD - 2415020) / 36525 - 1
/// ε = 23.43929167 - c·(46.815 + c·(0.0006 - 0.00181·c)) / 3600
/// ```
///
/// Arguments
/// ---------
/// * `jd`: Julian Day (UT).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in degrees.
///
/// # See also
/// * [`true_obliquity`] – adds the nutation in obliquity
pub fn mean_obliquity(jd: JulianDay) -> Degree {
    let c = jd.centuries_since(J1900) - 1.0;
    let d = c * (46.815 + c * (0.0006 - c * 0.00181));
    23.43929167 - d / 3600.0
}

/// Nutation angles, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nutation {
    /// Nutation in longitude (Δψ)
    pub longitude: Degree,
    /// Nutation in obliquity (Δε)
    pub obliquity: Degree,
}

/// Compute the nutation in longitude and obliquity.
///
/// The series keeps the dominant lunisolar terms, driven by five fundamental arguments:
/// - the Sun's mean longitude (L),
/// - the Moon's mean longitude (D),
/// - the Sun's mean anomaly (M),
/// - the Moon's mean anomaly (M'),
/// - the longitude of the Moon's ascending node (Ω).
///
/// Each argument is a linear rate in centuries since 1900 January 0.5 plus a small
/// quadratic term; the linear part is reduced with `fract` before scaling so that the
/// multiplication by 360° does not lose precision far from the epoch.
///
/// Arguments
/// ---------
/// * `jd`: Julian Day (UT).
///
/// Returns
/// --------
/// * A [`Nutation`] with Δψ and Δε in degrees. Both stay below 20″ in magnitude.
pub fn nutation(jd: JulianDay) -> Nutation {
    let t = jd.centuries_since(J1900);
    let t2 = t * t;

    let l2 = 2.0 * (279.6967 + 0.000303 * t2 + 360.0 * fract(100.0021358 * t)) * RADEG;
    let d2 = 2.0 * (270.4342 - 0.001133 * t2 + 360.0 * fract(1336.855231 * t)) * RADEG;
    let m1 = (358.4758 - 0.00015 * t2 + 360.0 * fract(99.99736056 * t)) * RADEG;
    let m2 = (296.1046 + 0.009192 * t2 + 360.0 * fract(1325.552359 * t)) * RADEG;
    let n1 = (259.1833 + 0.002078 * t2 - 360.0 * fract(5.372616667 * t)) * RADEG;
    let n2 = 2.0 * n1;

    // arcseconds
    let dpsi = (-17.2327 - 0.01737 * t) * n1.sin()
        + (-1.2729 - 0.00013 * t) * l2.sin()
        + 0.2088 * n2.sin()
        - 0.2037 * d2.sin()
        + (0.1261 - 0.00031 * t) * m1.sin()
        + 0.0675 * m2.sin()
        - (0.0497 - 0.00012 * t) * (l2 + m1).sin()
        - 0.0342 * (d2 - n1).sin()
        - 0.0261 * (d2 + m2).sin()
        + 0.0214 * (l2 - m1).sin()
        - 0.0149 * (l2 - d2 + m2).sin()
        + 0.0124 * (l2 - n1).sin()
        + 0.0114 * (d2 - m2).sin();

    let deps = (9.21 + 0.00091 * t) * n1.cos()
        + (0.5522 - 0.00029 * t) * l2.cos()
        - 0.0904 * n2.cos()
        + 0.0884 * d2.cos()
        + 0.0216 * (l2 + m1).cos()
        + 0.0183 * (d2 - n1).cos()
        + 0.0113 * (d2 + m2).cos()
        - 0.0093 * (l2 - m1).cos()
        - 0.0066 * (l2 - n1).cos();

    Nutation {
        longitude: dpsi / 3600.0,
        obliquity: deps / 3600.0,
    }
}

/// Mean obliquity corrected by the nutation in obliquity, in degrees.
///
/// This is the obliquity used by every ecliptic → equatorial conversion of the Sun, the
/// Moon and the planets.
pub fn true_obliquity(jd: JulianDay) -> Degree {
    mean_obliquity(jd) + nutation(jd).obliquity
}

#[cfg(test)]
mod earth_orientation_test {
    use super::*;
    use crate::time::CalendarDate;
    use approx::assert_abs_diff_eq;

    fn jd(year: i32, month: u32, day: f64) -> JulianDay {
        CalendarDate::new(year, month, day).unwrap().to_julian_day()
    }

    #[test]
    fn test_mean_obliquity() {
        // 2009-07-06: 23°26'17"
        assert_abs_diff_eq!(mean_obliquity(jd(2009, 7, 6.0)), 23.438055, epsilon = 1e-6);
        // J2000 is the constant term of the polynomial
        assert_abs_diff_eq!(
            mean_obliquity(JulianDay::new(2451545.0).unwrap()),
            23.43929167,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_nutation() {
        let n = nutation(jd(1988, 9, 1.0));
        assert_abs_diff_eq!(n.longitude, 0.0014243, epsilon = 1e-6);
        assert_abs_diff_eq!(n.obliquity, 0.0025596, epsilon = 1e-6);
    }

    #[test]
    fn test_true_obliquity() {
        assert_abs_diff_eq!(true_obliquity(jd(2009, 7, 6.0)), 23.439232, epsilon = 1e-6);
    }
}
