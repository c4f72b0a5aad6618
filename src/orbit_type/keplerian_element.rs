//! # Keplerian orbital elements
//!
//! This module defines the [`KeplerianElements`] struct, the classical element set used for
//! the planets (and for periodic comets once converted from their perihelion form).
//!
//! ## What are Keplerian elements?
//!
//! The six Keplerian elements are:
//!
//! 1. **a** – Semi-major axis (AU)
//! 2. **e** – Eccentricity (unitless, `0 ≤ e < 1`)
//! 3. **i** – Inclination (degrees)
//! 4. **Ω** – Longitude of ascending node (degrees)
//! 5. **ω** – Argument of perihelion (degrees)
//! 6. **M** – Mean anomaly at epoch (degrees)
//!
//! Together with the epoch of reference (a Julian Day), these parameters fully describe an
//! orbit under the two-body approximation. Elements are referred to the ecliptic and
//! equinox of their own epoch; no precession is applied.
//!
//! ## Almanac form
//!
//! Planetary tables usually quote the mean longitude at epoch `L` and the longitude of
//! perihelion `ϖ` rather than `M` and `ω`. [`KeplerianElements::from_longitudes`] performs
//! the conversion `M = L − ϖ`, `ω = ϖ − Ω`.
//!
//! ## Units
//!
//! - Lengths: **AU**
//! - Angles: **degrees**
//! - Time: **days** (epoch as a Julian Day, UT)
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::angle::wrap_deg;
use crate::constants::{AstronomicalUnit, Degree, Radian, MEAN_MOTION_1AU, RADEG};
use crate::time::JulianDay;

/// Classical Keplerian orbital elements.
///
/// See also
/// ------------
/// * [`crate::orbit_type::cometary_element::CometaryElements`] – Perihelion-based form, also
///   covering parabolic orbits.
/// * [`crate::orbit_type::OrbitalElements`] – Sum type consumed by the position pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeplerianElements {
    /// Reference epoch of the element set (Julian Day).
    pub reference_epoch: f64,

    /// Semi-major axis `a` (AU).
    pub semi_major_axis: AstronomicalUnit,

    /// Eccentricity `e`, `0 ≤ e < 1`.
    pub eccentricity: f64,

    /// Inclination `i` (degrees) to the ecliptic.
    pub inclination: Degree,

    /// Longitude of the ascending node `Ω` (degrees).
    pub ascending_node_longitude: Degree,

    /// Argument of perihelion `ω` (degrees).
    pub periapsis_argument: Degree,

    /// Mean anomaly `M` at the reference epoch (degrees).
    pub mean_anomaly: Degree,

    /// Mean daily motion (degrees/day). When `None` it follows from Kepler's third law.
    #[serde(default)]
    pub mean_daily_motion: Option<f64>,
}

impl KeplerianElements {
    /// Build elements from the almanac form.
    ///
    /// Arguments
    /// -----------------
    /// * `reference_epoch`: Julian Day of the elements.
    /// * `mean_longitude`: mean longitude at epoch `L` (degrees).
    /// * `perihelion_longitude`: longitude of perihelion `ϖ = Ω + ω` (degrees).
    /// * `eccentricity`, `semi_major_axis`, `inclination`, `ascending_node_longitude`.
    /// * `orbital_period_years`: tropical period; sets the mean daily motion when given.
    #[allow(clippy::too_many_arguments)]
    pub fn from_longitudes(
        reference_epoch: f64,
        mean_longitude: Degree,
        perihelion_longitude: Degree,
        eccentricity: f64,
        semi_major_axis: AstronomicalUnit,
        inclination: Degree,
        ascending_node_longitude: Degree,
        orbital_period_years: Option<f64>,
    ) -> Result<Self, AlmagestError> {
        let elements = KeplerianElements {
            reference_epoch,
            semi_major_axis,
            eccentricity,
            inclination,
            ascending_node_longitude,
            periapsis_argument: wrap_deg(perihelion_longitude - ascending_node_longitude),
            mean_anomaly: wrap_deg(mean_longitude - perihelion_longitude),
            mean_daily_motion: orbital_period_years
                .map(|years| 360.0 / (crate::constants::TROPICAL_YEAR * years)),
        };
        elements.validate()?;
        Ok(elements)
    }

    /// Check every field against its domain.
    ///
    /// Errors
    /// ------
    /// * `InvalidOrbit` naming the first offending element.
    pub fn validate(&self) -> Result<(), AlmagestError> {
        let fields = [
            ("reference_epoch", self.reference_epoch),
            ("semi_major_axis", self.semi_major_axis),
            ("eccentricity", self.eccentricity),
            ("inclination", self.inclination),
            ("ascending_node_longitude", self.ascending_node_longitude),
            ("periapsis_argument", self.periapsis_argument),
            ("mean_anomaly", self.mean_anomaly),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(AlmagestError::InvalidOrbit(format!(
                "{name} is not finite ({value})"
            )));
        }
        if self.semi_major_axis <= 0.0 {
            return Err(AlmagestError::InvalidOrbit(format!(
                "semi-major axis must be > 0 (got {})",
                self.semi_major_axis
            )));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(AlmagestError::InvalidOrbit(format!(
                "eccentricity must be in [0, 1) (got {})",
                self.eccentricity
            )));
        }
        if !(0.0..=180.0).contains(&self.inclination) {
            return Err(AlmagestError::InvalidOrbit(format!(
                "inclination must be in [0, 180] (got {})",
                self.inclination
            )));
        }
        if let Some(n) = self.mean_daily_motion {
            if !(n.is_finite() && n > 0.0) {
                return Err(AlmagestError::InvalidOrbit(format!(
                    "mean daily motion must be > 0 (got {n})"
                )));
            }
        }
        Ok(())
    }

    /// Mean daily motion in degrees/day: the override if present, else `k / a^{3/2}`.
    pub fn mean_motion(&self) -> f64 {
        self.mean_daily_motion
            .unwrap_or_else(|| MEAN_MOTION_1AU / self.semi_major_axis.powf(1.5))
    }

    /// Orbital period in days.
    pub fn period_days(&self) -> f64 {
        360.0 / self.mean_motion()
    }

    /// Longitude of perihelion `ϖ = Ω + ω` (degrees).
    pub fn perihelion_longitude(&self) -> Degree {
        wrap_deg(self.ascending_node_longitude + self.periapsis_argument)
    }

    /// Mean anomaly at `jd`, in radians within `[0, 2π)`.
    pub fn mean_anomaly_at(&self, jd: JulianDay) -> Radian {
        wrap_deg(self.mean_anomaly + self.mean_motion() * (jd.value() - self.reference_epoch))
            * RADEG
    }
}
