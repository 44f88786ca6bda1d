//! calibration::measures — ANEES, non-credibility index, inclination index.
//!
//! Purpose
//! -------
//! Aggregate per-point normalized discrepancies into scalar calibration
//! statistics that say whether an estimator's reported covariances match the
//! spread of its actual errors.
//!
//! Key behaviors
//! -------------
//! - [`anees`]: mean of `rᵢᵀ Σᵢ⁻¹ rᵢ` over all points. ≈ `d` when calibrated,
//!   below `d` when underconfident, above `d` when overconfident.
//! - [`nci`]: `10 · mean |log10 δᵢ − log10 δ̂ᵢ|`, where `δᵢ` uses the reported
//!   covariances and `δ̂ᵢ` uses the sample covariance of the residuals,
//!   broadcast to every point. Never negative; zero means fully credible.
//! - [`inclination_index`]: `10 · (mean log10 δᵢ − mean log10 δ̂ᵢ)`. Negative
//!   when underconfident, positive when overconfident.
//! - Each statistic has a `_with` variant taking an explicit
//!   [`InversionConfig`]; both discrepancy passes of NCI and the inclination
//!   index run under that same config.
//!
//! Invariants & assumptions
//! ------------------------
//! - `reference` has the same `N×d` shape as the estimated means.
//! - NCI and the inclination index need `N ≥ 2` residuals for a sample
//!   covariance; `N = 1` is reported as
//!   [`CalibrationError::DegenerateSampleCovariance`].
//! - A residual of exactly zero yields `log10 0 = −∞`; the statistics follow
//!   IEEE semantics rather than erroring.
//!
//! Testing notes
//! -------------
//! - Unit tests run every statistic across the full strategy × symmetrize ×
//!   damping grid, check the exact ±10 inclination index for covariances
//!   scaled by 10 and 0.1 of the residual spread, and cover the `N = 1` and
//!   shape-mismatch paths.

use crate::{
    calibration::{
        discrepancy::normalized_discrepancies_with,
        errors::{CalResult, CalibrationError},
        estimates::GaussianEstimates,
    },
    config::{InversionConfig, get_config},
};
use ndarray::{Array1, Array2, Axis};

/// Average normalized estimation error squared under the active policy.
pub fn anees(estimates: &GaussianEstimates, reference: &Array2<f64>) -> CalResult<f64> {
    anees_with(&get_config(), estimates, reference)
}

/// anees_with — average normalized estimation error squared.
///
/// Parameters
/// ----------
/// - `config`: `&InversionConfig`
///   Covariance-inversion policy for every point.
/// - `estimates`: `&GaussianEstimates`
///   Means (`N×d`) and covariances (`N×d×d`). `N = 1` is allowed.
/// - `reference`: `&Array2<f64>`
///   Reference values, `N×d`.
///
/// Returns
/// -------
/// `CalResult<f64>`
///   `(1/N) Σᵢ (mᵢ − yᵢ)ᵀ Σᵢ⁻¹ (mᵢ − yᵢ)`.
///
/// Errors
/// ------
/// - `CalibrationError::DimensionMismatch` for a mis-shaped reference.
/// - Any per-point inversion failure from the discrepancy engine.
pub fn anees_with(
    config: &InversionConfig, estimates: &GaussianEstimates, reference: &Array2<f64>,
) -> CalResult<f64> {
    let residuals = estimates.residuals(reference)?;
    let discrepancies =
        normalized_discrepancies_with(config, residuals.view(), estimates.covs().view())?;
    Ok(mean(&discrepancies))
}

/// Non-credibility index under the active policy.
pub fn nci(estimates: &GaussianEstimates, reference: &Array2<f64>) -> CalResult<f64> {
    nci_with(&get_config(), estimates, reference)
}

/// nci_with — non-credibility index.
///
/// Returns
/// -------
/// `CalResult<f64>`
///   `10 · (1/N) Σᵢ |log10 δᵢ − log10 δ̂ᵢ|`, with `δ̂ᵢ` computed from the
///   sample covariance of all residuals.
///
/// Errors
/// ------
/// - `CalibrationError::DegenerateSampleCovariance` when `N < 2`.
/// - Shape and inversion failures as for [`anees_with`]. A singular sample
///   covariance fails under `cholesky`, `inv`, and `solve` like any other
///   covariance would.
pub fn nci_with(
    config: &InversionConfig, estimates: &GaussianEstimates, reference: &Array2<f64>,
) -> CalResult<f64> {
    let (reported, baseline) = paired_discrepancies(config, estimates, reference)?;
    let total: f64 = reported
        .iter()
        .zip(baseline.iter())
        .map(|(&delta, &delta_hat)| (delta.log10() - delta_hat.log10()).abs())
        .sum();
    Ok(10.0 * total / reported.len() as f64)
}

/// Inclination index under the active policy.
pub fn inclination_index(estimates: &GaussianEstimates, reference: &Array2<f64>) -> CalResult<f64> {
    inclination_index_with(&get_config(), estimates, reference)
}

/// inclination_index_with — signed variant of the non-credibility index.
///
/// Returns
/// -------
/// `CalResult<f64>`
///   `10 · (mean log10 δᵢ − mean log10 δ̂ᵢ)`. Negative values indicate
///   underconfidence (reported covariances too large), positive values
///   overconfidence.
///
/// Errors
/// ------
/// - Same as [`nci_with`].
pub fn inclination_index_with(
    config: &InversionConfig, estimates: &GaussianEstimates, reference: &Array2<f64>,
) -> CalResult<f64> {
    let (reported, baseline) = paired_discrepancies(config, estimates, reference)?;
    let log_reported = reported.mapv(f64::log10);
    let log_baseline = baseline.mapv(f64::log10);
    Ok(10.0 * (mean(&log_reported) - mean(&log_baseline)))
}

/// sample_covariance — unbiased covariance of the rows of `observations`.
///
/// Rows are observations, columns are variables, and the normalization is
/// `1/(N − 1)`.
///
/// Errors
/// ------
/// - `CalibrationError::DegenerateSampleCovariance` when `N < 2`.
pub fn sample_covariance(observations: &Array2<f64>) -> CalResult<Array2<f64>> {
    let n = observations.nrows();
    if n < 2 {
        return Err(CalibrationError::DegenerateSampleCovariance { samples: n });
    }
    let centered = match observations.mean_axis(Axis(0)) {
        Some(column_means) => observations - &column_means,
        None => return Err(CalibrationError::DegenerateSampleCovariance { samples: n }),
    };
    Ok(centered.t().dot(&centered) / (n - 1) as f64)
}

// ---- Helper methods ----

/// Discrepancies under the reported covariances and under the broadcast
/// sample covariance of the residuals, both with `config`.
fn paired_discrepancies(
    config: &InversionConfig, estimates: &GaussianEstimates, reference: &Array2<f64>,
) -> CalResult<(Array1<f64>, Array1<f64>)> {
    let residuals = estimates.residuals(reference)?;
    let (n, d) = residuals.dim();
    let sample_cov = sample_covariance(&residuals)?;
    let tiled = sample_cov.broadcast((n, d, d)).ok_or_else(|| {
        CalibrationError::DimensionMismatch {
            context: "broadcast sample covariance",
            expected: vec![n, d, d],
            found: sample_cov.shape().to_vec(),
        }
    })?;

    let reported = normalized_discrepancies_with(config, residuals.view(), estimates.covs().view())?;
    let baseline = normalized_discrepancies_with(config, residuals.view(), tiled)?;
    Ok((reported, baseline))
}

fn mean(values: &Array1<f64>) -> f64 {
    values.sum() / values.len() as f64
}
