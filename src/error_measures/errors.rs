//! error_measures::errors — error types for Lp error reductions and sample distances.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for the plain error measures
//! (MAE, RMSE, max-error and relative variants) and for the sample-based
//! distance measures. These are simple reductions, so the taxonomy is small:
//! shape disagreements, invalid norm orders, empty inputs, and the
//! deliberate "not implemented" signal.
//!
//! Conventions
//! -----------
//! - Division by zero inside relative measures is **not** an error; it yields
//!   `±∞`/`NaN` per IEEE semantics and propagates into the returned norm.
//! - At the Python boundary, `NotImplemented` becomes `NotImplementedError`;
//!   every other variant becomes `ValueError`.

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyNotImplementedError, PyValueError},
};

pub type MeasureResult<T> = Result<T, MeasureError>;

/// MeasureError — validation failures for error and distance measures.
///
/// Variants
/// --------
/// - `ShapeMismatch { approximate, reference }`
///   Approximate and reference arrays differ in shape; no broadcasting is
///   attempted.
/// - `InvalidOrder { ord }`
///   The norm order is NaN or below 1. `f64::INFINITY` is valid.
/// - `EmptyInput { context }`
///   The reduction has no elements to act on.
/// - `DimensionMismatch { samples, reference }`
///   Sample width `d` differs from the reference length.
/// - `NotImplemented { operation }`
///   The operation is declared but deliberately unimplemented.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureError {
    ShapeMismatch { approximate: Vec<usize>, reference: Vec<usize> },
    InvalidOrder { ord: f64 },
    EmptyInput { context: &'static str },
    DimensionMismatch { samples: usize, reference: usize },
    NotImplemented { operation: &'static str },
}

impl MeasureError {
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, MeasureError::NotImplemented { .. })
    }
}

impl std::error::Error for MeasureError {}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasureError::ShapeMismatch { approximate, reference } => write!(
                f,
                "Measure Error: Shape mismatch between approximate {approximate:?} and reference {reference:?}"
            ),
            MeasureError::InvalidOrder { ord } => {
                write!(f, "Measure Error: Invalid norm order {ord}. Must satisfy 1 <= p <= inf.")
            }
            MeasureError::EmptyInput { context } => {
                write!(f, "Measure Error: {context} requires a non-empty input")
            }
            MeasureError::DimensionMismatch { samples, reference } => write!(
                f,
                "Measure Error: Samples have dimension {samples} but the reference has length {reference}"
            ),
            MeasureError::NotImplemented { operation } => {
                write!(f, "Measure Error: {operation} is not implemented")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<MeasureError> for PyErr {
    fn from(err: MeasureError) -> PyErr {
        if err.is_not_implemented() {
            PyNotImplementedError::new_err(err.to_string())
        } else {
            PyValueError::new_err(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify that `InvalidOrder` embeds the offending order.
    //
    // Given
    // -----
    // - `InvalidOrder` with ord = 0.5.
    //
    // Expect
    // ------
    // - The message contains "0.5".
    fn invalid_order_display_includes_payload() {
        // Arrange
        let err = MeasureError::InvalidOrder { ord: 0.5 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("0.5"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure shape mismatches report both shapes.
    //
    // Given
    // -----
    // - Shapes [3] and [3, 3].
    //
    // Expect
    // ------
    // - Both appear in the message and the error is not a stub.
    fn shape_mismatch_display_includes_both_shapes() {
        // Arrange
        let err = MeasureError::ShapeMismatch { approximate: vec![3], reference: vec![3, 3] };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("[3]") && msg.contains("[3, 3]"), "Got: {msg}");
        assert!(!err.is_not_implemented());
    }
}
