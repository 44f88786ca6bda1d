//! calibration::validation — shape guards for the discrepancy engine.
//!
//! Every public calibration entry point checks shapes here before touching
//! any arithmetic, so mismatches surface as
//! [`CalibrationError::DimensionMismatch`] instead of a silent broadcast or a
//! panic inside an index.

use crate::calibration::errors::{CalResult, CalibrationError};
use ndarray::{ArrayView1, ArrayView2, ArrayView3};

/// Check that `cov` is `d×d` with `d = residual.len()`.
pub fn validate_point(residual: ArrayView1<'_, f64>, cov: ArrayView2<'_, f64>) -> CalResult<()> {
    let d = residual.len();
    if cov.dim() != (d, d) {
        return Err(CalibrationError::DimensionMismatch {
            context: "covariance of a single evaluation point",
            expected: vec![d, d],
            found: cov.shape().to_vec(),
        });
    }
    Ok(())
}

/// Check that `covs` is `N×d×d` for `residuals` of shape `N×d`.
pub fn validate_batch(residuals: ArrayView2<'_, f64>, covs: ArrayView3<'_, f64>) -> CalResult<()> {
    let (n, d) = residuals.dim();
    if covs.dim() != (n, d, d) {
        return Err(CalibrationError::DimensionMismatch {
            context: "covariance batch",
            expected: vec![n, d, d],
            found: covs.shape().to_vec(),
        });
    }
    Ok(())
}

/// Check that `reference` has the same `N×d` shape as the estimated means.
pub fn validate_reference(
    means: ArrayView2<'_, f64>, reference: ArrayView2<'_, f64>,
) -> CalResult<()> {
    if means.dim() != reference.dim() {
        return Err(CalibrationError::DimensionMismatch {
            context: "reference solution",
            expected: means.shape().to_vec(),
            found: reference.shape().to_vec(),
        });
    }
    Ok(())
}
