//! calibration::discrepancy — normalized (Mahalanobis) discrepancies.
//!
//! Purpose
//! -------
//! Turn a residual `r` and a covariance `Σ` into the scalar `rᵀ Σ⁻¹ r`,
//! applying the covariance-inversion policy of [`InversionConfig`]:
//! optional symmetrization, optional diagonal damping, and one of four
//! linear-algebra strategies.
//!
//! Key behaviors
//! -------------
//! - [`normalized_discrepancy_with`] evaluates a single point under an
//!   explicit policy; [`normalized_discrepancy`] reads the thread's active
//!   policy once and delegates.
//! - [`normalized_discrepancies_with`] / [`normalized_discrepancies`] apply
//!   the same computation independently per point, in input order.
//! - Strategy dispatch is an exhaustive `match` on [`InversionStrategy`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `Σ` is `d×d` with `d = r.len()`; shapes are checked before any copy.
//! - Inputs are never mutated. Symmetrization and damping act on a private
//!   `nalgebra::DMatrix` copy.
//! - Failures propagate unchanged. A Cholesky failure is never retried with
//!   another strategy.
//!
//! Conventions
//! -----------
//! - Preprocessing order is fixed: symmetrize, then damp, then invert.
//! - `pinv` zeroes singular values at or below `PINV_RCOND · σ_max` and
//!   rejects non-finite covariances.
//! - A `d = 0` point has discrepancy `0.0` under every strategy.
//!
//! Testing notes
//! -------------
//! - Unit tests check every strategy against closed forms on diagonal and
//!   dense SPD matrices, the effect of symmetrization and damping, the
//!   failure modes of `inv`, `solve`, and `cholesky`, and the rank-deficient
//!   behavior of `pinv`.

use crate::{
    calibration::{
        errors::{CalResult, CalibrationError},
        validation::{validate_batch, validate_point},
    },
    config::{InversionConfig, InversionStrategy, get_config},
    obs,
};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1, ArrayView2, ArrayView3};

/// Relative cut-off for singular values in the `pinv` strategy.
pub const PINV_RCOND: f64 = 1e-15;

/// Discrepancy `rᵀ Σ⁻¹ r` of one evaluation point under the active policy.
pub fn normalized_discrepancy(
    residual: ArrayView1<'_, f64>, cov: ArrayView2<'_, f64>,
) -> CalResult<f64> {
    normalized_discrepancy_with(&get_config(), residual, cov)
}

/// normalized_discrepancy_with — discrepancy of one point under `config`.
///
/// Parameters
/// ----------
/// - `config`: `&InversionConfig`
///   Strategy, symmetrization flag, and damping to apply.
/// - `residual`: `ArrayView1<f64>`
///   Mean residual `r` of length `d`.
/// - `cov`: `ArrayView2<f64>`
///   Covariance `Σ` of shape `d×d`.
///
/// Returns
/// -------
/// `CalResult<f64>`
///   The quadratic form `rᵀ Σ̃⁻¹ r`, where `Σ̃` is `Σ` after symmetrization
///   and damping. Non-negative for positive-definite `Σ̃`.
///
/// Errors
/// ------
/// - `CalibrationError::DimensionMismatch` if `cov` is not `d×d`.
/// - `CalibrationError::NotPositiveDefinite` if Cholesky fails.
/// - `CalibrationError::SingularMatrix` if `inv` or `solve` meet a singular
///   matrix.
/// - `CalibrationError::PseudoInverseFailed` if the SVD route fails or the
///   prepared covariance holds a NaN or infinite entry.
pub fn normalized_discrepancy_with(
    config: &InversionConfig, residual: ArrayView1<'_, f64>, cov: ArrayView2<'_, f64>,
) -> CalResult<f64> {
    validate_point(residual, cov)?;
    let d = residual.len();
    if d == 0 {
        return Ok(0.0);
    }

    let r = DVector::<f64>::from_iterator(d, residual.iter().copied());
    let sigma = prepare_covariance(config, cov);

    inverse_quadratic_form(config.strategy(), sigma, &r).inspect_err(|err| {
        obs::inversion_failed(config, err);
    })
}

/// Per-point discrepancies under the active policy.
pub fn normalized_discrepancies(
    residuals: ArrayView2<'_, f64>, covs: ArrayView3<'_, f64>,
) -> CalResult<Array1<f64>> {
    normalized_discrepancies_with(&get_config(), residuals, covs)
}

/// normalized_discrepancies_with — per-point discrepancies under `config`.
///
/// Parameters
/// ----------
/// - `residuals`: `ArrayView2<f64>` of shape `N×d`.
/// - `covs`: `ArrayView3<f64>` of shape `N×d×d`.
///
/// Returns
/// -------
/// `CalResult<Array1<f64>>`
///   A freshly allocated length-`N` vector; entry `i` depends only on
///   `residuals[i]` and `covs[i]`.
///
/// Errors
/// ------
/// - `CalibrationError::DimensionMismatch` for non-conformable shapes.
/// - The first per-point failure, unchanged.
pub fn normalized_discrepancies_with(
    config: &InversionConfig, residuals: ArrayView2<'_, f64>, covs: ArrayView3<'_, f64>,
) -> CalResult<Array1<f64>> {
    validate_batch(residuals, covs)?;
    let mut out = Array1::<f64>::zeros(residuals.nrows());
    for ((slot, residual), cov) in out.iter_mut().zip(residuals.outer_iter()).zip(covs.outer_iter())
    {
        *slot = normalized_discrepancy_with(config, residual, cov)?;
    }
    Ok(out)
}

// ---- Helper methods ----

/// Copy `cov` into a `DMatrix`, then symmetrize and damp per `config`.
fn prepare_covariance(config: &InversionConfig, cov: ArrayView2<'_, f64>) -> DMatrix<f64> {
    let d = cov.nrows();
    let mut sigma = DMatrix::<f64>::from_fn(d, d, |i, j| cov[[i, j]]);
    if config.symmetrize() {
        let transposed = sigma.transpose();
        sigma = (sigma + transposed) * 0.5;
    }
    if config.damping() > 0.0 {
        for i in 0..d {
            sigma[(i, i)] += config.damping();
        }
    }
    sigma
}

/// Evaluate `rᵀ Σ⁻¹ r` along the requested route.
fn inverse_quadratic_form(
    strategy: InversionStrategy, sigma: DMatrix<f64>, r: &DVector<f64>,
) -> CalResult<f64> {
    let d = r.len();
    match strategy {
        InversionStrategy::Inv => {
            let inv = sigma
                .try_inverse()
                .ok_or(CalibrationError::SingularMatrix { strategy, dim: d })?;
            Ok(r.dot(&(inv * r)))
        }
        InversionStrategy::Pinv => {
            // nalgebra's SVD cannot order NaN singular values.
            if sigma.iter().any(|x| !x.is_finite()) {
                return Err(CalibrationError::PseudoInverseFailed {
                    reason: "covariance has non-finite entries",
                });
            }
            let svd = sigma.svd(true, true);
            let cutoff = PINV_RCOND * svd.singular_values.max();
            let pinv = svd
                .pseudo_inverse(cutoff)
                .map_err(|reason| CalibrationError::PseudoInverseFailed { reason })?;
            Ok(r.dot(&(pinv * r)))
        }
        InversionStrategy::Solve => {
            let x = sigma
                .lu()
                .solve(r)
                .ok_or(CalibrationError::SingularMatrix { strategy, dim: d })?;
            Ok(r.dot(&x))
        }
        InversionStrategy::Cholesky => {
            let chol = sigma.cholesky().ok_or(CalibrationError::NotPositiveDefinite { dim: d })?;
            Ok(r.dot(&chol.solve(r)))
        }
    }
}
