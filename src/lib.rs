//! Positions and event times for the Sun, the Moon, planets and comets, from the
//! closed-form and iterative methods of practical positional astronomy.
//!
//! Every function is pure. Inputs are validated at the boundary and reported through
//! [`AlmagestError`]; iterations are bounded by [`SolverParams`].
pub mod almagest_errors;
pub mod angle;
pub mod bodies;
pub mod constants;
pub mod coordinates;
pub mod cubic;
pub mod earth_orientation;
pub mod events;
pub mod iteration;
pub mod kepler;
pub mod orbit_type;
pub mod time;

pub use almagest_errors::AlmagestError;
pub use iteration::SolverParams;
