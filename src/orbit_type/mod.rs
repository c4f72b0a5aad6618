//! # Orbital element representations
//!
//! This module defines the element sets the caller can supply for a planet or a comet:
//!
//! - [`keplerian_element`](crate::orbit_type::keplerian_element): Classical Keplerian elements `(a, e, i, Ω, ω, M)`,
//!   for elliptic orbits.
//! - [`cometary_element`](crate::orbit_type::cometary_element): Perihelion-based representation `(T, q, e, i, Ω, ω)`,
//!   covering elliptic and parabolic orbits.
//!
//! The [`OrbitalElements`](crate::orbit_type::OrbitalElements) enum wraps either representation and
//! answers the one question the position pipeline asks: where along its orbit is the body
//! at a given instant.
//!
//! ## Typical workflow
//!
//! ```rust
//! use almagest::iteration::SolverParams;
//! use almagest::orbit_type::{cometary_element::CometaryElements, OrbitalElements};
//! use almagest::time::JulianDay;
//!
//! let comet = OrbitalElements::Cometary(CometaryElements {
//!     perihelion_epoch: 2443458.0674,
//!     perihelion_distance: 0.990662,
//!     eccentricity: 1.0,
//!     inclination: 48.7196,
//!     ascending_node_longitude: 181.8175,
//!     periapsis_argument: 163.4799,
//! });
//! let jd = JulianDay::new(2443458.0674).unwrap();
//! let at = comet.position_in_orbit(jd, &SolverParams::default()).unwrap();
//! assert!((at.radius - 0.990662).abs() < 1e-9);
//! ```
use serde::{Deserialize, Serialize};

use crate::{
    almagest_errors::AlmagestError,
    constants::Degree,
    iteration::SolverParams,
    kepler::{solve_barker, solve_elliptic, OrbitalPosition},
    orbit_type::{cometary_element::CometaryElements, keplerian_element::KeplerianElements},
    time::JulianDay,
};

/// Classical Keplerian elements structure and utilities.
pub mod keplerian_element;

/// Cometary (perihelion-based) orbital elements and related conversions.
pub mod cometary_element;

/// Orientation of an orbit plane and of its perihelion, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitOrientation {
    pub inclination: Degree,
    pub ascending_node_longitude: Degree,
    pub periapsis_argument: Degree,
}

/// Orbital elements in either supported representation.
///
/// Variants
/// --------
/// * `Keplerian`: Classical elements `(a, e, i, Ω, ω, M)`; used for the planets.
/// * `Cometary`: Perihelion form `(T, q, e, i, Ω, ω)`; used for comets, including
///   parabolic ones.
///
/// See also
/// --------
/// * [`KeplerianElements`] – Classical Keplerian elements.
/// * [`CometaryElements`] – Perihelion distance representation.
/// * [`OrbitalElements::position_in_orbit`] – True anomaly and radius at an instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrbitalElements {
    Keplerian(KeplerianElements),
    Cometary(CometaryElements),
}

impl OrbitalElements {
    /// Check the wrapped element set against its domain.
    pub fn validate(&self) -> Result<(), AlmagestError> {
        match self {
            OrbitalElements::Keplerian(ke) => ke.validate(),
            OrbitalElements::Cometary(ce) => ce.validate(),
        }
    }

    /// Convert to Keplerian elements, if possible.
    ///
    /// Errors
    /// ------
    /// Returns `AlmagestError::InvalidOrbit` for a parabolic comet.
    pub fn to_keplerian(&self) -> Result<KeplerianElements, AlmagestError> {
        match self {
            OrbitalElements::Keplerian(ke) => Ok(ke.clone()),
            OrbitalElements::Cometary(ce) => KeplerianElements::try_from(ce),
        }
    }

    /// Convert to cometary elements. Always possible.
    pub fn to_cometary(&self) -> CometaryElements {
        match self {
            OrbitalElements::Keplerian(ke) => CometaryElements::from(ke),
            OrbitalElements::Cometary(ce) => ce.clone(),
        }
    }

    pub fn orientation(&self) -> OrbitOrientation {
        match self {
            OrbitalElements::Keplerian(ke) => OrbitOrientation {
                inclination: ke.inclination,
                ascending_node_longitude: ke.ascending_node_longitude,
                periapsis_argument: ke.periapsis_argument,
            },
            OrbitalElements::Cometary(ce) => OrbitOrientation {
                inclination: ce.inclination,
                ascending_node_longitude: ce.ascending_node_longitude,
                periapsis_argument: ce.periapsis_argument,
            },
        }
    }

    /// True anomaly and heliocentric distance at `jd`.
    ///
    /// Elliptic orbits go through Kepler's equation; parabolic comets through Barker's
    /// equation.
    ///
    /// Errors
    /// ------
    /// * `InvalidOrbit` when the elements fail validation.
    /// * `NoConvergence` from the Kepler solver.
    pub fn position_in_orbit(
        &self,
        jd: JulianDay,
        params: &SolverParams,
    ) -> Result<OrbitalPosition, AlmagestError> {
        self.validate()?;
        match self {
            OrbitalElements::Cometary(ce) if ce.is_parabolic() => {
                solve_barker(ce.perihelion_distance, jd.value() - ce.perihelion_epoch)
            }
            _ => {
                let ke = self.to_keplerian()?;
                solve_elliptic(
                    ke.mean_anomaly_at(jd),
                    ke.eccentricity,
                    ke.semi_major_axis,
                    params,
                )
            }
        }
    }
}

impl From<KeplerianElements> for OrbitalElements {
    fn from(ke: KeplerianElements) -> Self {
        OrbitalElements::Keplerian(ke)
    }
}

impl From<CometaryElements> for OrbitalElements {
    fn from(ce: CometaryElements) -> Self {
        OrbitalElements::Cometary(ce)
    }
}
