//! # Position of the Sun
//!
//! Two theories are provided:
//!
//! - [`sun_position`]: the 1900-epoch theory. Mean longitude, mean anomaly and
//!   eccentricity are polynomials in centuries since 1900 January 0.5; the equation of
//!   centre is the closed form to third order in `e`, and first-order perturbations by
//!   Venus, Jupiter and the Moon are added to the longitude and radius vector.
//! - [`approximate_sun_position`]: elements frozen at 2010 January 0.0 and a first-order
//!   equation of centre.
//!
//! The reported ecliptic longitude is geometric. [`SolarPosition::apparent_longitude`]
//! adds nutation and aberration and is what the event predictors use.
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::angle::{fract, wrap_deg};
use crate::constants::{
    AstronomicalUnit, Degree, Kilometer, ABERRATION, AU, EPOCH_2010, J1900, RADEG, TROPICAL_YEAR,
};
use crate::coordinates::{ecliptic_to_equatorial, EclipticCoordinate, EquatorialCoordinate};
use crate::earth_orientation::{nutation, true_obliquity};
use crate::kepler::equation_of_centre;
use crate::time::{gst_to_ut, CalendarDate, JulianDay};

/// Angular diameter of the Sun at 1 AU (degrees)
const ANGULAR_DIAMETER_1AU: Degree = 0.533128;
/// Horizontal parallax of the Sun at 1 AU (degrees)
const PARALLAX_1AU: Degree = 8.794 / 3600.0;

/// Geocentric position of the Sun.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPosition {
    /// Geometric ecliptic longitude; latitude is always zero
    pub ecliptic: EclipticCoordinate,
    /// Longitude corrected for nutation and aberration
    pub apparent_longitude: Degree,
    pub equatorial: EquatorialCoordinate,
    pub distance_au: AstronomicalUnit,
    pub distance_km: Kilometer,
    pub angular_diameter: Degree,
    pub horizontal_parallax: Degree,
    /// Mean anomaly of the Sun (degrees)
    pub mean_anomaly: Degree,
    /// Eccentricity of the Earth's orbit
    pub eccentricity: f64,
}

impl SolarPosition {
    fn from_geometric(
        jd: JulianDay,
        longitude: Degree,
        radius: AstronomicalUnit,
        mean_anomaly: Degree,
        eccentricity: f64,
    ) -> Self {
        let jd0 = jd.midnight();
        let ecliptic = EclipticCoordinate {
            longitude: wrap_deg(longitude),
            latitude: 0.0,
        };
        SolarPosition {
            ecliptic,
            apparent_longitude: wrap_deg(longitude + nutation(jd0).longitude - ABERRATION),
            equatorial: ecliptic_to_equatorial(&ecliptic, true_obliquity(jd0)),
            distance_au: radius,
            distance_km: radius * AU,
            angular_diameter: ANGULAR_DIAMETER_1AU / radius,
            horizontal_parallax: PARALLAX_1AU / radius,
            mean_anomaly: wrap_deg(mean_anomaly),
            eccentricity,
        }
    }

    /// Apparent position as an equatorial coordinate, on the date of `jd`.
    pub fn apparent_equatorial(&self, jd: JulianDay) -> EquatorialCoordinate {
        let apparent = EclipticCoordinate {
            longitude: self.apparent_longitude,
            latitude: 0.0,
        };
        ecliptic_to_equatorial(&apparent, true_obliquity(jd.midnight()))
    }
}

/// Position of the Sun from the 1900-epoch theory.
///
/// Arguments
/// ---------
/// * `jd`: Julian Day (UT) of the instant.
///
/// Return
/// ------
/// * A [`SolarPosition`] whose distance, angular diameter and horizontal parallax are all
///   derived from the same perturbed radius vector.
pub fn sun_position(jd: JulianDay) -> SolarPosition {
    let t = jd.centuries_since(J1900);
    let t2 = t * t;

    let mean_longitude = 279.69668 + 0.0003025 * t2 + 360.0 * fract(100.0021359 * t);
    let mean_anomaly =
        358.47583 - (0.00015 + 0.0000033 * t) * t2 + 360.0 * fract(99.99736042 * t);
    let e = 0.01675104 - 0.0000418 * t - 0.000000126 * t2;

    let m = mean_anomaly * RADEG;
    let nu = m + equation_of_centre(m, e);

    // Venus, Jupiter and Moon perturbations
    let a = (153.23 + 360.0 * fract(62.55209472 * t)) * RADEG;
    let b = (216.57 + 360.0 * fract(125.1041894 * t)) * RADEG;
    let c = (312.69 + 360.0 * fract(91.56766028 * t)) * RADEG;
    let d = (350.74 - 0.00144 * t2 + 360.0 * fract(1236.853095 * t)) * RADEG;
    let h = (353.4 + 360.0 * fract(183.1353208 * t)) * RADEG;
    let long_term = (231.19 + 20.2 * t) * RADEG;

    let d_longitude = 0.00134 * a.cos()
        + 0.00154 * b.cos()
        + 0.002 * c.cos()
        + 0.00179 * d.sin()
        + 0.00178 * long_term.sin();
    let d_radius = 0.00000543 * a.sin()
        + 0.00001575 * b.sin()
        + 0.00001627 * c.sin()
        + 0.00003076 * d.cos()
        + 0.00000927 * h.sin();

    let longitude = nu / RADEG + mean_longitude - mean_anomaly + d_longitude;
    let radius = 1.0000002 * (1.0 - e * e) / (1.0 + e * nu.cos()) + d_radius;

    SolarPosition::from_geometric(jd, longitude, radius, mean_anomaly, e)
}

/// Position of the Sun from the 2010 January 0.0 elements.
///
/// Good to about a minute of arc over a few decades around 2010.
pub fn approximate_sun_position(jd: JulianDay) -> SolarPosition {
    let t = (EPOCH_2010 - J1900) / crate::constants::DAYS_PER_CENTURY;
    let longitude_at_epoch = wrap_deg(279.6966778 + 36000.76892 * t + 0.0003025 * t * t);
    let perigee_longitude = wrap_deg(281.2208444 + 1.719175 * t + 0.000452778 * t * t);
    let e = 0.01675104 - 0.0000418 * t - 0.000000126 * t * t;

    let n = 360.0 * (jd.value() - EPOCH_2010) / TROPICAL_YEAR;
    let mean_anomaly = wrap_deg(n + longitude_at_epoch - perigee_longitude);
    let centre = 360.0 / std::f64::consts::PI * e * (mean_anomaly * RADEG).sin();
    let nu = (mean_anomaly + centre) * RADEG;
    let radius = (1.0 - e * e) / (1.0 + e * nu.cos());

    SolarPosition::from_geometric(
        jd,
        n + centre + longitude_at_epoch,
        radius,
        mean_anomaly,
        e,
    )
}

/// Equation of time on `date`, in minutes.
///
/// Difference between mean and apparent solar time: the universal time at which the
/// apparent Sun crosses the Greenwich meridian, minus 12 h. Positive when the Sun transits
/// after noon.
pub fn equation_of_time(date: &CalendarDate) -> Result<f64, AlmagestError> {
    let jd0 = date.date_only().to_julian_day();
    let noon = jd0.add_days(0.5);
    let sun = sun_position(noon);
    let ra = sun.apparent_equatorial(noon).right_ascension;
    let transit = gst_to_ut(ra, &date.date_only())?;
    Ok((transit.ut.hours - 12.0) * 60.0)
}
