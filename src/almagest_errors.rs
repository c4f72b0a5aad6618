use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AlmagestError {
    #[error("Non-finite value supplied for {0}")]
    NonFiniteInput(&'static str),

    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),

    #[error("Invalid geographic location: {0}")]
    InvalidLocation(String),

    #[error("Invalid time zone: {0}")]
    InvalidTimeZone(String),

    #[error("Invalid orbital elements: {0}")]
    InvalidOrbit(String),

    #[error("Invalid solver parameter: {0}")]
    InvalidParameter(String),

    #[error("Value outside the domain of the formula: {0}")]
    OutOfDomain(String),

    #[error("{solver} did not converge within {iterations} iterations")]
    NoConvergence {
        solver: &'static str,
        iterations: usize,
    },
}

impl AlmagestError {
    /// True for every input-validation failure, false for `NoConvergence`.
    pub fn is_domain_error(&self) -> bool {
        !matches!(self, AlmagestError::NoConvergence { .. })
    }
}

impl PartialEq for AlmagestError {
    fn eq(&self, other: &Self) -> bool {
        use AlmagestError::*;
        match (self, other) {
            (NonFiniteInput(a), NonFiniteInput(b)) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (InvalidLocation(a), InvalidLocation(b)) => a == b,
            (InvalidTimeZone(a), InvalidTimeZone(b)) => a == b,
            (InvalidOrbit(a), InvalidOrbit(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (OutOfDomain(a), OutOfDomain(b)) => a == b,

            // Same solver is enough: the iteration cap is a configuration detail
            (NoConvergence { solver: a, .. }, NoConvergence { solver: b, .. }) => a == b,

            _ => false,
        }
    }
}

/// Reject NaN and infinities at a public boundary.
pub(crate) fn ensure_finite(value: f64, what: &'static str) -> Result<f64, AlmagestError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AlmagestError::NonFiniteInput(what))
    }
}

#[cfg(test)]
mod almagest_errors_test {
    use super::*;

    #[test]
    fn test_domain_classification() {
        assert!(AlmagestError::NonFiniteInput("x").is_domain_error());
        assert!(AlmagestError::InvalidDate("1582-10-10".into()).is_domain_error());
        let nc = AlmagestError::NoConvergence {
            solver: "kepler",
            iterations: 50,
        };
        assert!(!nc.is_domain_error());
    }

    #[test]
    fn test_no_convergence_equality_ignores_cap() {
        let a = AlmagestError::NoConvergence {
            solver: "kepler",
            iterations: 50,
        };
        let b = AlmagestError::NoConvergence {
            solver: "kepler",
            iterations: 10,
        };
        assert_eq!(a, b);
        assert_ne!(a, AlmagestError::OutOfDomain("kepler".into()));
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite(1.5, "x"), Ok(1.5));
        assert_eq!(
            ensure_finite(f64::NAN, "latitude"),
            Err(AlmagestError::NonFiniteInput("latitude"))
        );
        assert!(ensure_finite(f64::INFINITY, "x").is_err());
    }
}
