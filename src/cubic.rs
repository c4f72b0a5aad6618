//! # Real roots of monic cubic polynomials
//!
//! Solves `x³ + a·x² + b·x + c = 0` in closed form. The polynomial is first depressed with
//! `x = t − a/3` into `t³ + p·t + q = 0`; the sign of the discriminant
//! `Δ = (q/2)² + (p/3)³` selects between Cardano's formula (one real root) and the
//! trigonometric form (three real roots).
use std::f64::consts::PI;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::almagest_errors::{ensure_finite, AlmagestError};

/// Real roots of a cubic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CubicRoots {
    /// A single real root (the other two are complex conjugates).
    One(f64),
    /// Three real roots sorted ascending; repeated roots appear more than once.
    Three([f64; 3]),
}

impl CubicRoots {
    /// All real roots as a slice, ascending.
    pub fn as_slice(&self) -> &[f64] {
        match self {
            CubicRoots::One(x) => std::slice::from_ref(x),
            CubicRoots::Three(xs) => xs,
        }
    }

    /// Pick the root a caller expects inside `interval`.
    ///
    /// Among the roots lying in `interval`, the one closest to the midpoint of the
    /// interval is returned; on a tie the smaller root wins. `None` when no root lies in
    /// the interval.
    pub fn select(&self, interval: RangeInclusive<f64>) -> Option<f64> {
        let mid = 0.5 * (interval.start() + interval.end());
        self.as_slice()
            .iter()
            .copied()
            .filter(|x| interval.contains(x))
            .fold(None, |best: Option<f64>, x| match best {
                Some(b) if (b - mid).abs() <= (x - mid).abs() => Some(b),
                _ => Some(x),
            })
    }
}

/// Newton refinement of a root of `x³ + a·x² + b·x + c`.
fn polish(x: f64, a: f64, b: f64, c: f64) -> f64 {
    let mut x = x;
    for _ in 0..2 {
        let f = ((x + a) * x + b) * x + c;
        let df = (3.0 * x + 2.0 * a) * x + b;
        if df == 0.0 {
            break;
        }
        x -= f / df;
    }
    x
}

/// Solve `x³ + a·x² + b·x + c = 0`.
///
/// Arguments
/// ---------
/// * `a`, `b`, `c`: coefficients of the monic cubic.
///
/// Return
/// ------
/// * [`CubicRoots::One`] when the discriminant is positive, [`CubicRoots::Three`] otherwise.
///
/// Errors
/// ------
/// * `NonFiniteInput` when any coefficient is NaN or infinite.
///
/// # Examples
///
/// ```rust
/// use almagest::cubic::{solve_cubic, CubicRoots};
///
/// // (x - 1)(x - 2)(x - 3)
/// let roots = solve_cubic(-6.0, 11.0, -6.0).unwrap();
/// let CubicRoots::Three(xs) = roots else { panic!() };
/// assert!((xs[0] - 1.0).abs() < 1e-12 && (xs[2] - 3.0).abs() < 1e-12);
/// ```
pub fn solve_cubic(a: f64, b: f64, c: f64) -> Result<CubicRoots, AlmagestError> {
    ensure_finite(a, "cubic coefficient a")?;
    ensure_finite(b, "cubic coefficient b")?;
    ensure_finite(c, "cubic coefficient c")?;

    let shift = a / 3.0;
    let p = b - a * a / 3.0;
    let q = 2.0 * a * a * a / 27.0 - a * b / 3.0 + c;

    let half_q = q / 2.0;
    let third_p = p / 3.0;
    let disc = half_q * half_q + third_p * third_p * third_p;
    let scale = half_q * half_q + third_p.abs().powi(3);

    if disc > 4.0 * f64::EPSILON * scale {
        let sq = disc.sqrt();
        let t = (-half_q + sq).cbrt() + (-half_q - sq).cbrt();
        return Ok(CubicRoots::One(polish(t - shift, a, b, c)));
    }

    if p == 0.0 {
        // triple root
        return Ok(CubicRoots::Three([-shift; 3]));
    }

    let r = 2.0 * (-third_p).sqrt();
    let cos_arg = (3.0 * q / (p * r)).clamp(-1.0, 1.0);
    let phi = cos_arg.acos() / 3.0;
    let mut xs = [0.0, 1.0, 2.0]
        .map(|k: f64| polish(r * (phi - 2.0 * PI * k / 3.0).cos() - shift, a, b, c));
    xs.sort_by(|x, y| x.total_cmp(y));
    Ok(CubicRoots::Three(xs))
}

#[cfg(test)]
mod cubic_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_three_distinct_roots() {
        let roots = solve_cubic(-6.0, 11.0, -6.0).unwrap();
        match roots {
            CubicRoots::Three(xs) => {
                assert_abs_diff_eq!(xs[0], 1.0, epsilon = 1e-12);
                assert_abs_diff_eq!(xs[1], 2.0, epsilon = 1e-12);
                assert_abs_diff_eq!(xs[2], 3.0, epsilon = 1e-12);
            }
            other => panic!("expected three roots, got {other:?}"),
        }
    }

    #[test]
    fn test_single_root() {
        // x³ + 3x - 4 = (x - 1)(x² + x + 4)
        let roots = solve_cubic(0.0, 3.0, -4.0).unwrap();
        match roots {
            CubicRoots::One(x) => assert_abs_diff_eq!(x, 1.0, epsilon = 1e-12),
            other => panic!("expected one root, got {other:?}"),
        }
    }

    #[test]
    fn test_repeated_roots() {
        // (x - 1)²(x + 2)
        let roots = solve_cubic(0.0, -3.0, 2.0).unwrap();
        let xs = roots.as_slice();
        assert_eq!(xs.len(), 3);
        assert_abs_diff_eq!(xs[0], -2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(xs[1], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(xs[2], 1.0, epsilon = 1e-6);

        // (x - 2)³
        let roots = solve_cubic(-6.0, 12.0, -8.0).unwrap();
        assert_eq!(roots, CubicRoots::Three([2.0; 3]));
    }

    #[test]
    fn test_select() {
        let roots = solve_cubic(-6.0, 11.0, -6.0).unwrap();
        assert_abs_diff_eq!(roots.select(1.5..=3.8).unwrap(), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(roots.select(0.0..=2.5).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(roots.select(0.5..=3.5).unwrap(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(roots.select(0.5..=1.5).unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(roots.select(4.0..=5.0), None);
    }

    #[test]
    fn test_select_tie_prefers_smaller() {
        let roots = CubicRoots::Three([1.0, 3.0, 10.0]);
        assert_eq!(roots.select(0.0..=4.0), Some(1.0));
    }

    #[test]
    fn test_non_finite_coefficients() {
        assert_eq!(
            solve_cubic(f64::NAN, 0.0, 0.0),
            Err(AlmagestError::NonFiniteInput("cubic coefficient a"))
        );
        assert!(solve_cubic(0.0, f64::INFINITY, 0.0).is_err());
    }
}
