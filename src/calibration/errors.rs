//! calibration::errors — error taxonomy for the calibration engine.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the configuration
//! context, the discrepancy engine, and the calibration statistics. Keeping
//! configuration, factorization, and shape failures in one enum lets callers
//! propagate everything with `?` and match only on the cases they care about.
//!
//! Key behaviors
//! -------------
//! - Define [`CalibrationError`] and the alias [`CalResult`].
//! - Attach human-readable `Display` messages that embed the offending
//!   payload (strategy token, damping value, dimensions, sample count).
//! - Convert failures of external solution objects (`anyhow::Error`) and of
//!   the error-measure layer ([`MeasureError`]) into [`CalibrationError`].
//! - Map every variant into a Python exception when the `python-bindings`
//!   feature is enabled; stubs raise `NotImplementedError`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Variants are small and cloneable; none of them own array data.
//! - `NotImplemented` is reserved for operations that are part of the public
//!   surface but deliberately unimplemented. It never signals a numeric
//!   failure.
//!
//! Testing notes
//! -------------
//! - Unit tests check payload embedding in `Display` and the conversions
//!   from `anyhow::Error` and [`MeasureError`].

use crate::{config::InversionStrategy, error_measures::errors::MeasureError};

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyNotImplementedError, PyValueError},
};

pub type CalResult<T> = Result<T, CalibrationError>;

/// CalibrationError — failures of covariance inversion and calibration statistics.
///
/// Variants
/// --------
/// - `UnknownStrategy { name }`
///   A covariance-inversion token other than `inv`, `pinv`, `solve`, or
///   `cholesky` was supplied.
/// - `InvalidDamping { damping }`
///   Damping is negative or non-finite.
/// - `ContextAlreadyActive`
///   An inversion context was entered again before being exited.
/// - `NotPositiveDefinite { dim }`
///   Cholesky factorization failed after symmetrization and damping.
/// - `SingularMatrix { strategy, dim }`
///   The explicit inverse or LU solve found a singular covariance.
/// - `PseudoInverseFailed { reason }`
///   The SVD-based pseudo-inverse could not be formed.
/// - `DimensionMismatch { context, expected, found }`
///   Mean, covariance, and reference shapes disagree.
/// - `EmptyInput { context }`
///   No evaluation points were supplied.
/// - `DegenerateSampleCovariance { samples }`
///   The empirical residual covariance needs at least two points.
/// - `InvalidPercentile { percentile }` / `InvalidDegreesOfFreedom { dim }`
///   Arguments to the chi-squared interval are out of range.
/// - `Solution(String)`
///   An approximate or reference solution failed to evaluate.
/// - `Measure(MeasureError)`
///   An error-measure failure surfaced through a calibration code path.
/// - `NotImplemented { operation }`
///   The operation is declared but deliberately unimplemented.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    // ---- Configuration ----
    UnknownStrategy { name: String },
    InvalidDamping { damping: f64 },
    ContextAlreadyActive,

    // ---- Linear algebra ----
    NotPositiveDefinite { dim: usize },
    SingularMatrix { strategy: InversionStrategy, dim: usize },
    PseudoInverseFailed { reason: &'static str },

    // ---- Shapes ----
    DimensionMismatch { context: &'static str, expected: Vec<usize>, found: Vec<usize> },
    EmptyInput { context: &'static str },
    DegenerateSampleCovariance { samples: usize },

    // ---- Chi-squared intervals ----
    InvalidPercentile { percentile: f64 },
    InvalidDegreesOfFreedom { dim: usize },

    // ---- Passthrough ----
    Solution(String),
    Measure(MeasureError),

    // ---- Stubs ----
    NotImplemented { operation: &'static str },
}

impl CalibrationError {
    /// True for the deliberate-stub signal, false for every runtime failure.
    pub fn is_not_implemented(&self) -> bool {
        match self {
            CalibrationError::NotImplemented { .. } => true,
            CalibrationError::Measure(inner) => inner.is_not_implemented(),
            _ => false,
        }
    }
}

impl std::error::Error for CalibrationError {}

impl std::fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            CalibrationError::UnknownStrategy { name } => write!(
                f,
                "Calibration Error: Unknown covariance inversion strategy {name:?} \
                 (expected 'inv', 'pinv', 'solve', or 'cholesky')"
            ),
            CalibrationError::InvalidDamping { damping } => {
                write!(f, "Calibration Error: Invalid damping {damping}. Must be finite and >= 0.")
            }
            CalibrationError::ContextAlreadyActive => {
                write!(f, "Calibration Error: Inversion context is already active")
            }

            // ---- Linear algebra ----
            CalibrationError::NotPositiveDefinite { dim } => write!(
                f,
                "Calibration Error: Cholesky factorization failed; the {dim}x{dim} covariance \
                 is not positive definite"
            ),
            CalibrationError::SingularMatrix { strategy, dim } => write!(
                f,
                "Calibration Error: The {dim}x{dim} covariance is singular under strategy '{strategy}'"
            ),
            CalibrationError::PseudoInverseFailed { reason } => {
                write!(f, "Calibration Error: Pseudo-inverse failed ({reason})")
            }

            // ---- Shapes ----
            CalibrationError::DimensionMismatch { context, expected, found } => write!(
                f,
                "Calibration Error: Dimension mismatch in {context}: expected {expected:?}, found {found:?}"
            ),
            CalibrationError::EmptyInput { context } => {
                write!(f, "Calibration Error: {context} requires at least one evaluation point")
            }
            CalibrationError::DegenerateSampleCovariance { samples } => write!(
                f,
                "Calibration Error: Sample covariance of {samples} residual(s) is degenerate; \
                 at least 2 are required"
            ),

            // ---- Chi-squared intervals ----
            CalibrationError::InvalidPercentile { percentile } => write!(
                f,
                "Calibration Error: Invalid percentile {percentile}. Must lie strictly between 0 and 1."
            ),
            CalibrationError::InvalidDegreesOfFreedom { dim } => {
                write!(f, "Calibration Error: Invalid degrees of freedom {dim}. Must be >= 1.")
            }

            // ---- Passthrough ----
            CalibrationError::Solution(msg) => {
                write!(f, "Calibration Error: Solution evaluation failed: {msg}")
            }
            CalibrationError::Measure(err) => write!(f, "Calibration Error: {err}"),

            // ---- Stubs ----
            CalibrationError::NotImplemented { operation } => {
                write!(f, "Calibration Error: {operation} is not implemented")
            }
        }
    }
}

impl From<anyhow::Error> for CalibrationError {
    fn from(err: anyhow::Error) -> Self {
        CalibrationError::Solution(err.to_string())
    }
}

impl From<MeasureError> for CalibrationError {
    fn from(err: MeasureError) -> Self {
        CalibrationError::Measure(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<CalibrationError> for PyErr {
    fn from(err: CalibrationError) -> PyErr {
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

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Payload embedding in `Display` for configuration and shape variants.
    // - Conversions from `anyhow::Error` and `MeasureError`.
    // - The stub classification used by the Python bridge.
    //
    // They intentionally DO NOT cover:
    // - The `From<CalibrationError> for PyErr` conversion, which needs the
    //   Python C API and is exercised from Python.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that an unknown strategy token is echoed in the message.
    //
    // Given
    // -----
    // - `UnknownStrategy` with name "qr".
    //
    // Expect
    // ------
    // - The message contains "qr" and lists the valid tokens.
    fn unknown_strategy_display_includes_token_and_valid_options() {
        // Arrange
        let err = CalibrationError::UnknownStrategy { name: "qr".to_string() };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("\"qr\""), "Got: {msg}");
        assert!(msg.contains("cholesky"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure dimension mismatches report both shapes.
    //
    // Given
    // -----
    // - Expected [10, 2], found [10, 3].
    //
    // Expect
    // ------
    // - Both shapes appear in the message.
    fn dimension_mismatch_display_includes_both_shapes() {
        // Arrange
        let err = CalibrationError::DimensionMismatch {
            context: "reference",
            expected: vec![10, 2],
            found: vec![10, 3],
        };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("[10, 2]") && msg.contains("[10, 3]"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Check that external solution failures keep their message.
    //
    // Given
    // -----
    // - An `anyhow` error "grid out of range".
    //
    // Expect
    // ------
    // - Conversion yields `Solution` carrying the original text.
    fn anyhow_error_converts_into_solution_variant() {
        // Arrange
        let source = anyhow::anyhow!("grid out of range");

        // Act
        let err: CalibrationError = source.into();

        // Assert
        assert_eq!(err, CalibrationError::Solution("grid out of range".to_string()));
    }

    #[test]
    // Purpose
    // -------
    // Verify the stub classification, including stubs wrapped from the
    // error-measure layer.
    //
    // Given
    // -----
    // - A direct `NotImplemented`, a wrapped measure stub, and a numeric
    //   failure.
    //
    // Expect
    // ------
    // - Only the first two are classified as not implemented.
    fn is_not_implemented_distinguishes_stubs_from_numeric_failures() {
        // Arrange
        let direct = CalibrationError::NotImplemented { operation: "non_credibility_index2" };
        let wrapped: CalibrationError =
            MeasureError::NotImplemented { operation: "gaussianity_p_value" }.into();
        let numeric = CalibrationError::NotPositiveDefinite { dim: 2 };

        // Act / Assert
        assert!(direct.is_not_implemented());
        assert!(wrapped.is_not_implemented());
        assert!(!numeric.is_not_implemented());
    }
}
