//! Unified error type for circuit model operations
//!
//! Unknown quantities are *not* errors: a solver that has not run yet leaves
//! fields as `None`, and derived reads over them return `Ok(None)`. The
//! variants below cover the cases where a read or write cannot be answered at
//! all.
//!
//! # Example
//!
//! ```
//! use acnet_core::{Circuit, CircuitError};
//!
//! let circuit = Circuit::new();
//! let err = circuit.lookup("R7").unwrap_err();
//! assert!(matches!(err, CircuitError::NotFound(_)));
//! ```

use thiserror::Error;

/// Errors raised by the circuit model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CircuitError {
    /// Registry key, node, branch or component does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// A registry key was registered twice
    #[error("duplicate registry key: {0}")]
    DuplicateKey(String),

    /// A quantity cannot be computed (unset parameter, division by zero)
    #[error("domain error: {0}")]
    Domain(String),

    /// Attempt to write a value that is derived from another element
    #[error("{0} is read-only")]
    ReadOnly(String),

    /// Operation does not apply to this kind of component
    #[error("{key} is not a {expected} (found {kind})")]
    WrongKind {
        key: String,
        kind: &'static str,
        expected: &'static str,
    },

    /// Dependent sources control each other in a loop
    #[error("control cycle through {0}")]
    ControlCycle(String),

    /// Invalid input data
    #[error("validation error: {0}")]
    Validation(String),
}

impl CircuitError {
    pub(crate) fn impedance_not_set() -> Self {
        CircuitError::Domain("impedance not set".to_string())
    }

    pub(crate) fn division_by_zero() -> Self {
        CircuitError::Domain("division by zero".to_string())
    }
}

/// Convenience type alias for Results using CircuitError.
pub type CircuitResult<T> = Result<T, CircuitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CircuitError::Domain("division by zero".into());
        assert_eq!(err.to_string(), "domain error: division by zero");

        let err = CircuitError::WrongKind {
            key: "U1".into(),
            kind: "independent voltage source",
            expected: "resistor",
        };
        assert_eq!(
            err.to_string(),
            "U1 is not a resistor (found independent voltage source)"
        );
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> CircuitResult<()> {
            Err(CircuitError::NotFound("R9".into()))
        }

        fn outer() -> CircuitResult<()> {
            inner()?;
            Ok(())
        }

        assert_eq!(outer(), Err(CircuitError::NotFound("R9".into())));
    }
}
