use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::angle::wrap_deg;
use crate::constants::{AstronomicalUnit, Degree};
use crate::orbit_type::keplerian_element::KeplerianElements;

/// # Cometary orbital elements
///
/// Perihelion-based elements, convenient for comets whose orbits are near-parabolic and
/// whose published elements anchor on the time of perihelion passage.
///
/// Units & conventions
/// --------------------
/// - Distances in **AU**; angles in **degrees**; epochs as **Julian Days**.
/// - `e = 1` is parabolic; `0 ≤ e < 1` elliptic. Hyperbolic orbits are not supported.
///
/// See also
/// ------------
/// * [`KeplerianElements`] – Classical elements `(a, e, i, Ω, ω, M)`.
/// * [`crate::kepler::solve_barker`] – Position on a parabolic orbit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CometaryElements {
    /// Time of perihelion passage (Julian Day).
    pub perihelion_epoch: f64,

    /// Perihelion distance `q` (AU).
    pub perihelion_distance: AstronomicalUnit,

    /// Eccentricity `e`, `0 ≤ e ≤ 1`.
    pub eccentricity: f64,

    /// Inclination `i` (degrees).
    pub inclination: Degree,

    /// Longitude of the ascending node `Ω` (degrees).
    pub ascending_node_longitude: Degree,

    /// Argument of perihelion `ω` (degrees).
    pub periapsis_argument: Degree,
}

impl CometaryElements {
    /// Tolerance under which an eccentricity is treated as exactly parabolic.
    pub const PARABOLIC_TOLERANCE: f64 = 1e-12;

    pub fn is_parabolic(&self) -> bool {
        (self.eccentricity - 1.0).abs() < Self::PARABOLIC_TOLERANCE
    }

    /// Check every field against its domain.
    ///
    /// Errors
    /// ------
    /// * `InvalidOrbit` naming the first offending element.
    pub fn validate(&self) -> Result<(), AlmagestError> {
        let fields = [
            ("perihelion_epoch", self.perihelion_epoch),
            ("perihelion_distance", self.perihelion_distance),
            ("eccentricity", self.eccentricity),
            ("inclination", self.inclination),
            ("ascending_node_longitude", self.ascending_node_longitude),
            ("periapsis_argument", self.periapsis_argument),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(AlmagestError::InvalidOrbit(format!(
                "{name} is not finite ({value})"
            )));
        }
        if self.perihelion_distance <= 0.0 {
            return Err(AlmagestError::InvalidOrbit(format!(
                "perihelion distance must be > 0 (got {})",
                self.perihelion_distance
            )));
        }
        if !(0.0..=1.0 + Self::PARABOLIC_TOLERANCE).contains(&self.eccentricity) {
            return Err(AlmagestError::InvalidOrbit(format!(
                "eccentricity must be in [0, 1] (got {})",
                self.eccentricity
            )));
        }
        if !(0.0..=180.0).contains(&self.inclination) {
            return Err(AlmagestError::InvalidOrbit(format!(
                "inclination must be in [0, 180] (got {})",
                self.inclination
            )));
        }
        Ok(())
    }
}

/// Convert **Cometary → Keplerian** (elliptic only).
///
/// `a = q / (1 − e)`, and the mean anomaly is zero at the perihelion epoch, which becomes
/// the reference epoch.
///
/// Errors
/// ----------
/// * `InvalidOrbit` – for a parabolic orbit, which has no finite semi-major axis.
impl TryFrom<&CometaryElements> for KeplerianElements {
    type Error = AlmagestError;

    fn try_from(ce: &CometaryElements) -> Result<Self, Self::Error> {
        ce.validate()?;
        if ce.is_parabolic() {
            return Err(AlmagestError::InvalidOrbit(
                "parabolic orbit cannot be represented with a finite semi-major axis".into(),
            ));
        }
        Ok(KeplerianElements {
            reference_epoch: ce.perihelion_epoch,
            semi_major_axis: ce.perihelion_distance / (1.0 - ce.eccentricity),
            eccentricity: ce.eccentricity,
            inclination: ce.inclination,
            ascending_node_longitude: ce.ascending_node_longitude,
            periapsis_argument: ce.periapsis_argument,
            mean_anomaly: 0.0,
            mean_daily_motion: None,
        })
    }
}

/// Convert **Keplerian → Cometary**.
///
/// The perihelion epoch is the last passage at or before the reference epoch.
impl From<&KeplerianElements> for CometaryElements {
    fn from(ke: &KeplerianElements) -> Self {
        let since_perihelion = wrap_deg(ke.mean_anomaly) / ke.mean_motion();
        CometaryElements {
            perihelion_epoch: ke.reference_epoch - since_perihelion,
            perihelion_distance: ke.semi_major_axis * (1.0 - ke.eccentricity),
            eccentricity: ke.eccentricity,
            inclination: ke.inclination,
            ascending_node_longitude: ke.ascending_node_longitude,
            periapsis_argument: ke.periapsis_argument,
        }
    }
}
