//! # Solver configuration and bounded iteration
//!
//! Every iterative computation in the crate (Kepler's equation, refraction from true
//! altitude, rise/set/twilight searches, new and full moon refinement) runs through
//! [`bounded_loop`] and takes its tolerances from a single [`SolverParams`] object, so the
//! convergence behaviour is the same across all event predictors.
//!
//! ## Example
//!
//! ```rust
//! use almagest::iteration::SolverParams;
//!
//! let params = SolverParams::builder()
//!     .time_tolerance_hours(1e-6)
//!     .max_iterations(80)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.max_iterations, 80);
//! ```
use std::cmp::Ordering::Greater;
use std::ops::ControlFlow;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;

/// Tolerances and iteration caps shared by the numeric solvers and event predictors.
///
/// Fields
/// -----------------
/// * `angle_tolerance` – convergence threshold in radians for Kepler's equation and for
///   the true → apparent refraction loop.
/// * `time_tolerance_hours` – convergence threshold on successive UT estimates of a
///   rise/set/twilight search and of new/full moon refinement.
/// * `max_iterations` – hard cap applied to every loop. Exhausting it yields
///   `NoConvergence`, never a stale estimate.
///
/// Defaults
/// -----------------
/// * `angle_tolerance`: 1e-6 rad
/// * `time_tolerance_hours`: 1e-5 h (36 ms)
/// * `max_iterations`: 50
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    pub angle_tolerance: f64,
    pub time_tolerance_hours: f64,
    pub max_iterations: usize,
}

impl SolverParams {
    /// Construct a new [`SolverParams`] with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`SolverParamsBuilder`] starting from the defaults.
    pub fn builder() -> SolverParamsBuilder {
        SolverParamsBuilder::new()
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            angle_tolerance: 1e-6,
            time_tolerance_hours: 1e-5,
            max_iterations: 50,
        }
    }
}

/// Builder for [`SolverParams`], with validation.
#[derive(Debug, Clone)]
pub struct SolverParamsBuilder {
    params: SolverParams,
}

impl Default for SolverParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: SolverParams::default(),
        }
    }

    pub fn angle_tolerance(mut self, v: f64) -> Self {
        self.params.angle_tolerance = v;
        self
    }
    pub fn time_tolerance_hours(mut self, v: f64) -> Self {
        self.params.time_tolerance_hours = v;
        self
    }
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.params.max_iterations = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Finalize the builder and produce a [`SolverParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `angle_tolerance > 0.0` and finite.
    /// * `time_tolerance_hours > 0.0` and finite.
    /// * `max_iterations ≥ 1`.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(SolverParams)` if all values are valid.
    /// * `Err(AlmagestError::InvalidParameter)` naming the first offending field.
    pub fn build(self) -> Result<SolverParams, AlmagestError> {
        let p = &self.params;

        if !(Self::gt0(p.angle_tolerance) && p.angle_tolerance.is_finite()) {
            return Err(AlmagestError::InvalidParameter(format!(
                "angle_tolerance must be > 0 (got {})",
                p.angle_tolerance
            )));
        }
        if !(Self::gt0(p.time_tolerance_hours) && p.time_tolerance_hours.is_finite()) {
            return Err(AlmagestError::InvalidParameter(format!(
                "time_tolerance_hours must be > 0 (got {})",
                p.time_tolerance_hours
            )));
        }
        if p.max_iterations == 0 {
            return Err(AlmagestError::InvalidParameter(
                "max_iterations must be ≥ 1".into(),
            ));
        }

        Ok(self.params)
    }
}

/// Run `step` at most `max_iterations` times.
///
/// `step` receives the zero-based iteration index and returns
/// `ControlFlow::Break(value)` once its convergence predicate holds, or
/// `ControlFlow::Continue(())` to go round again. Errors raised by `step` abort the loop.
///
/// Return
/// ------
/// * `Ok(Some((value, iterations)))` on convergence, `iterations` counting the final step.
/// * `Ok(None)` when the cap is exhausted; callers map this onto their own
///   `NoConvergence` outcome.
pub(crate) fn bounded_loop<B, F>(
    label: &'static str,
    max_iterations: usize,
    mut step: F,
) -> Result<Option<(B, usize)>, AlmagestError>
where
    F: FnMut(usize) -> Result<ControlFlow<B>, AlmagestError>,
{
    for i in 0..max_iterations {
        if let ControlFlow::Break(value) = step(i)? {
            debug!("{label}: converged after {} iteration(s)", i + 1);
            return Ok(Some((value, i + 1)));
        }
    }
    warn!("{label}: no convergence after {max_iterations} iterations");
    Ok(None)
}
