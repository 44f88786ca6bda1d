//! sample_analysis::distances — dimension-normalized distances between samples.
//!
//! Purpose
//! -------
//! Summarize a cloud of `N` samples `x₁, …, x_N ∈ ℝᵈ` drawn from a
//! probabilistic solution at one location, either against each other or
//! against a single reference point.
//!
//! Key behaviors
//! -------------
//! - [`sample_sample_distance`]: `E_k = (1/(dN)) Σₙ ‖x_k − x_n‖_p`, the mean
//!   distance from sample `k` to every sample (itself included).
//! - [`sample_reference_distance`]: `R_k = (1/d) ‖x_k − ξ‖_p`.
//! - [`gaussianity_p_value`]: declared but not implemented; always fails with
//!   `MeasureError::NotImplemented`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Samples are rows of an `N×d` array with `N ≥ 1` and `d ≥ 1`.
//! - `1 ≤ p ≤ ∞`; [`DEFAULT_DISTANCE_ORDER`] is 2.
//! - Outputs have length `N` and follow the input row order.

use crate::error_measures::{
    errors::{MeasureError, MeasureResult},
    norms::{lp_norm, validate_order},
};
use ndarray::{Array1, Array2, ArrayView1};

/// Norm order used when callers have no preference.
pub const DEFAULT_DISTANCE_ORDER: f64 = 2.0;

/// sample_sample_distance — mean inter-sample distance per sample.
///
/// Parameters
/// ----------
/// - `samples`: `&Array2<f64>`
///   `N×d` samples, one per row.
/// - `p`: `f64`
///   Norm order in `[1, ∞]`.
///
/// Returns
/// -------
/// `MeasureResult<Array1<f64>>`
///   Length-`N` vector of `E_k`.
///
/// Errors
/// ------
/// - `MeasureError::InvalidOrder` for `p` below 1 or NaN.
/// - `MeasureError::EmptyInput` when `N == 0` or `d == 0`.
///
/// Examples
/// --------
/// ```rust
/// # use rust_probeval::sample_analysis::sample_sample_distance;
/// # use ndarray::Array2;
/// let samples = Array2::from_shape_fn((100, 3), |(i, j)| (3 * i + j) as f64);
/// let distances = sample_sample_distance(&samples, 2.0)?;
/// assert_eq!(distances.len(), 100);
/// assert!((distances.mean().unwrap() - 57.7).abs() < 0.05);
/// # Ok::<(), rust_probeval::error_measures::MeasureError>(())
/// ```
pub fn sample_sample_distance(samples: &Array2<f64>, p: f64) -> MeasureResult<Array1<f64>> {
    validate_samples(samples, p)?;
    let (n, d) = samples.dim();
    let scale = (n * d) as f64;
    let out = samples
        .outer_iter()
        .map(|x_k| samples.outer_iter().map(|x_n| distance(x_k, x_n, p)).sum::<f64>() / scale)
        .collect();
    Ok(out)
}

/// sample_reference_distance — distance of every sample to one reference point.
///
/// Parameters
/// ----------
/// - `samples`: `&Array2<f64>`
///   `N×d` samples, one per row.
/// - `reference`: `&Array1<f64>`
///   Reference point of length `d`.
/// - `p`: `f64`
///   Norm order in `[1, ∞]`.
///
/// Returns
/// -------
/// `MeasureResult<Array1<f64>>`
///   Length-`N` vector of `R_k`.
///
/// Errors
/// ------
/// - `MeasureError::DimensionMismatch` when `reference.len() != d`.
/// - Order and emptiness errors as for [`sample_sample_distance`].
pub fn sample_reference_distance(
    samples: &Array2<f64>, reference: &Array1<f64>, p: f64,
) -> MeasureResult<Array1<f64>> {
    validate_samples(samples, p)?;
    let d = samples.ncols();
    if reference.len() != d {
        return Err(MeasureError::DimensionMismatch { samples: d, reference: reference.len() });
    }
    let out = samples.outer_iter().map(|x_k| distance(x_k, reference.view(), p) / d as f64).collect();
    Ok(out)
}

/// Normality goodness-of-fit p-value of a sample cloud. Not implemented.
///
/// Errors
/// ------
/// - Always `MeasureError::NotImplemented`.
pub fn gaussianity_p_value(_samples: &Array2<f64>) -> MeasureResult<f64> {
    Err(MeasureError::NotImplemented { operation: "gaussianity_p_value" })
}

// ---- Helper methods ----

fn validate_samples(samples: &Array2<f64>, p: f64) -> MeasureResult<()> {
    validate_order(p)?;
    if samples.is_empty() {
        return Err(MeasureError::EmptyInput { context: "sample distance" });
    }
    Ok(())
}

fn distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>, p: f64) -> f64 {
    lp_norm(a.iter().zip(b.iter()).map(|(x, y)| x - y), p)
}
