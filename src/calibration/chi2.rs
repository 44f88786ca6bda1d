//! calibration::chi2 — central confidence intervals of a χ² distribution.
//!
//! For a calibrated Gaussian estimator in `d` dimensions the normalized
//! discrepancy is χ²(d)-distributed, so the interval returned here is the
//! acceptance band for per-point discrepancies and, scaled by the number of
//! points, for ANEES.

use crate::calibration::errors::{CalResult, CalibrationError};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Probability mass covered by [`chi2_confidence_interval`] when callers have
/// no preference.
pub const DEFAULT_PERCENTILE: f64 = 0.99;

/// chi2_confidence_interval — two-sided central interval of χ²(`dim`).
///
/// Parameters
/// ----------
/// - `dim`: `usize`
///   Degrees of freedom; must be at least 1.
/// - `percentile`: `f64`
///   Mass inside the interval, strictly between 0 and 1.
///
/// Returns
/// -------
/// `CalResult<(f64, f64)>`
///   The `(1 − percentile)/2` and `1 − (1 − percentile)/2` quantiles.
///
/// Errors
/// ------
/// - `CalibrationError::InvalidDegreesOfFreedom` when `dim == 0`.
/// - `CalibrationError::InvalidPercentile` when `percentile ∉ (0, 1)`.
///
/// Examples
/// --------
/// ```rust
/// # use rust_probeval::calibration::chi2_confidence_interval;
/// let (lower, upper) = chi2_confidence_interval(2, 0.99)?;
/// assert!((lower - 0.01).abs() < 1e-3);
/// assert!((upper - 10.6).abs() < 1e-1);
/// # Ok::<(), rust_probeval::calibration::CalibrationError>(())
/// ```
pub fn chi2_confidence_interval(dim: usize, percentile: f64) -> CalResult<(f64, f64)> {
    if !(percentile > 0.0 && percentile < 1.0) {
        return Err(CalibrationError::InvalidPercentile { percentile });
    }
    if dim == 0 {
        return Err(CalibrationError::InvalidDegreesOfFreedom { dim });
    }
    let dist =
        ChiSquared::new(dim as f64).map_err(|_| CalibrationError::InvalidDegreesOfFreedom { dim })?;
    let delta = (1.0 - percentile) / 2.0;
    Ok((dist.inverse_cdf(delta), dist.inverse_cdf(1.0 - delta)))
}
