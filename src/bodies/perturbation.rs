//! # First-order planetary perturbations
//!
//! The mutual attraction of Jupiter, Saturn and Uranus shifts their heliocentric positions
//! by up to a third of a degree. Each shift is modelled as a short sum of periodic terms
//!
//! ```text
//! Δ = Σ amplitude · sin|cos(j·Mj + s·Ms + u·Mu + phase)
//! ```
//!
//! where `Mj`, `Ms` and `Mu` are the mean anomalies of Jupiter, Saturn and Uranus. A
//! [`CorrectionTable`] is plain data: planets and comets carry one (possibly empty) and the
//! position pipeline applies it without knowing which body it belongs to.
use serde::{Deserialize, Serialize};

use crate::angle::wrap_deg;
use crate::constants::{Degree, RADEG};
use crate::time::JulianDay;

/// Epoch of the fundamental arguments, 1999 December 31.0
const ARGUMENT_EPOCH: f64 = 2_451_543.5;

/// Heliocentric quantity a term corrects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorrectionTarget {
    /// Orbital longitude, in degrees
    Longitude,
    /// Heliocentric ecliptic latitude, in degrees
    Latitude,
    /// Radius vector, in AU
    Radius,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Periodic {
    Sin,
    Cos,
}

/// One periodic term of a correction series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodicTerm {
    pub target: CorrectionTarget,
    pub amplitude: f64,
    pub function: Periodic,
    /// Integer multipliers of `(Mj, Ms, Mu)`
    pub multipliers: [i32; 3],
    pub phase: Degree,
}

impl PeriodicTerm {
    const fn new(
        target: CorrectionTarget,
        amplitude: f64,
        function: Periodic,
        multipliers: [i32; 3],
        phase: Degree,
    ) -> Self {
        PeriodicTerm {
            target,
            amplitude,
            function,
            multipliers,
            phase,
        }
    }

    pub fn evaluate(&self, args: &FundamentalArguments) -> f64 {
        let [j, s, u] = self.multipliers;
        let angle = (j as f64 * args.jupiter
            + s as f64 * args.saturn
            + u as f64 * args.uranus
            + self.phase)
            * RADEG;
        self.amplitude
            * match self.function {
                Periodic::Sin => angle.sin(),
                Periodic::Cos => angle.cos(),
            }
    }
}

/// Mean anomalies of Jupiter, Saturn and Uranus, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundamentalArguments {
    pub jupiter: Degree,
    pub saturn: Degree,
    pub uranus: Degree,
}

impl FundamentalArguments {
    pub fn at(jd: JulianDay) -> Self {
        let d = jd.value() - ARGUMENT_EPOCH;
        FundamentalArguments {
            jupiter: wrap_deg(19.8950 + 0.0830853001 * d),
            saturn: wrap_deg(316.9670 + 0.0334442282 * d),
            uranus: wrap_deg(142.5905 + 0.011725806 * d),
        }
    }
}

use CorrectionTarget::{Latitude, Longitude};
use Periodic::{Cos, Sin};

const JUPITER_TERMS: [PeriodicTerm; 7] = [
    PeriodicTerm::new(Longitude, -0.332, Sin, [2, -5, 0], -67.6),
    PeriodicTerm::new(Longitude, -0.056, Sin, [2, -2, 0], 21.0),
    PeriodicTerm::new(Longitude, 0.042, Sin, [3, -5, 0], 21.0),
    PeriodicTerm::new(Longitude, -0.036, Sin, [1, -2, 0], 0.0),
    PeriodicTerm::new(Longitude, 0.022, Cos, [1, -1, 0], 0.0),
    PeriodicTerm::new(Longitude, 0.023, Sin, [2, -3, 0], 52.0),
    PeriodicTerm::new(Longitude, -0.016, Sin, [1, -5, 0], -69.0),
];

const SATURN_TERMS: [PeriodicTerm; 7] = [
    PeriodicTerm::new(Longitude, 0.812, Sin, [2, -5, 0], -67.6),
    PeriodicTerm::new(Longitude, -0.229, Cos, [2, -4, 0], -2.0),
    PeriodicTerm::new(Longitude, 0.119, Sin, [1, -2, 0], -3.0),
    PeriodicTerm::new(Longitude, 0.046, Sin, [2, -6, 0], -69.0),
    PeriodicTerm::new(Longitude, 0.014, Sin, [1, -3, 0], 32.0),
    PeriodicTerm::new(Latitude, -0.020, Cos, [2, -4, 0], -2.0),
    PeriodicTerm::new(Latitude, 0.018, Sin, [2, -6, 0], -49.0),
];

const URANUS_TERMS: [PeriodicTerm; 3] = [
    PeriodicTerm::new(Longitude, 0.040, Sin, [0, 1, -2], 6.0),
    PeriodicTerm::new(Longitude, 0.035, Sin, [0, 1, -3], 33.0),
    PeriodicTerm::new(Longitude, -0.015, Sin, [1, 0, -1], 20.0),
];

/// A list of periodic correction terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectionTable {
    pub terms: Vec<PeriodicTerm>,
}

impl CorrectionTable {
    /// No correction: the unperturbed two-body orbit.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn jupiter() -> Self {
        CorrectionTable {
            terms: JUPITER_TERMS.to_vec(),
        }
    }

    pub fn saturn() -> Self {
        CorrectionTable {
            terms: SATURN_TERMS.to_vec(),
        }
    }

    pub fn uranus() -> Self {
        CorrectionTable {
            terms: URANUS_TERMS.to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Sum of the terms aimed at `target`.
    pub fn sum(&self, target: CorrectionTarget, args: &FundamentalArguments) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.target == target)
            .map(|t| t.evaluate(args))
            .sum()
    }
}
