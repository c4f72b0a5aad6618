//! # Solar-system bodies
//!
//! Geocentric positions of the Sun, the Moon, the planets and comets.
//!
//! - [`sun`](crate::bodies::sun) – 1900-epoch and 2010-epoch solar theories, equation of time.
//! - [`moon`](crate::bodies::moon) – Full lunar series, short theory, phase.
//! - [`planet`](crate::bodies::planet) – Staged pipeline shared by planets and comets.
//! - [`perturbation`](crate::bodies::perturbation) – First-order correction tables.

/// First-order periodic corrections for Jupiter, Saturn and Uranus.
pub mod perturbation;

/// Position of the Moon and its phase.
pub mod moon;

/// Position pipeline for planets and comets.
pub mod planet;

/// Position of the Sun.
pub mod sun;
