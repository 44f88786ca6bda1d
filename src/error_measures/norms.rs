//! error_measures::norms — size-normalized Lp errors between two arrays.
//!
//! Purpose
//! -------
//! Measure how far an approximate array is from a reference of the same
//! shape, independently of how many elements the arrays hold. The absolute
//! family reduces `approx − ref`; the relative family reduces
//! `(approx − ref) / ref`.
//!
//! Key behaviors
//! -------------
//! - [`mean_error`] flattens the difference, takes its p-norm, and divides by
//!   `size^(1/p)`. For `p = ∞` the result is the max absolute entry and no
//!   normalization applies.
//! - [`relative_mean_error`] performs the same reduction on the elementwise
//!   relative difference. A zero reference entry yields `±∞`/`NaN`, which
//!   propagates into the result rather than raising an error.
//! - Named instances: [`rmse`] (p = 2), [`mae`] (p = 1), [`max_error`]
//!   (p = ∞), and their `relative_*` counterparts.
//!
//! Invariants & assumptions
//! ------------------------
//! - Shapes must agree exactly; there is no broadcasting.
//! - `ord` must satisfy `1 ≤ ord ≤ ∞`.
//! - Inputs of any dimensionality are accepted, including 0-d arrays.

use crate::error_measures::errors::{MeasureError, MeasureResult};
use ndarray::{ArrayBase, Data, Dimension, Zip};

/// mean_error — size-normalized p-norm of `approximate − reference`.
///
/// Parameters
/// ----------
/// - `approximate`: any `f64` array
///   Approximate solution.
/// - `reference`: any `f64` array of the same shape
///   Reference solution.
/// - `ord`: `f64`
///   Norm order in `[1, ∞]`; pass `f64::INFINITY` for the max norm.
///
/// Returns
/// -------
/// `MeasureResult<f64>`
///   `‖approximate − reference‖_p / size^(1/p)` (no division for `p = ∞`).
///
/// Errors
/// ------
/// - `MeasureError::ShapeMismatch` when shapes differ.
/// - `MeasureError::InvalidOrder` when `ord` is NaN or below 1.
/// - `MeasureError::EmptyInput` when the arrays hold no elements.
///
/// Examples
/// --------
/// ```rust
/// # use rust_probeval::error_measures::mean_error;
/// # use ndarray::array;
/// let approx = array![1.1, 1.1, 1.1];
/// let reference = array![1.0, 1.0, 1.0];
/// let err = mean_error(&approx, &reference, 1.0)?;
/// assert!((err - 0.1).abs() < 1e-12);
/// # Ok::<(), rust_probeval::error_measures::MeasureError>(())
/// ```
pub fn mean_error<S1, S2, D>(
    approximate: &ArrayBase<S1, D>, reference: &ArrayBase<S2, D>, ord: f64,
) -> MeasureResult<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    validate_pair(approximate, reference, ord)?;
    let diff = Zip::from(approximate).and(reference).map_collect(|&a, &r| a - r);
    Ok(normalized_norm(diff.iter().copied(), diff.len(), ord))
}

/// relative_mean_error — size-normalized p-norm of `(approximate − reference) / reference`.
///
/// Same parameters, errors, and normalization as [`mean_error`]. Zero
/// reference entries are not rejected; they produce `±∞` or `NaN` in the
/// result.
pub fn relative_mean_error<S1, S2, D>(
    approximate: &ArrayBase<S1, D>, reference: &ArrayBase<S2, D>, ord: f64,
) -> MeasureResult<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    validate_pair(approximate, reference, ord)?;
    let rel = Zip::from(approximate).and(reference).map_collect(|&a, &r| (a - r) / r);
    Ok(normalized_norm(rel.iter().copied(), rel.len(), ord))
}

/// Root mean-square error.
pub fn rmse<S1, S2, D>(
    approximate: &ArrayBase<S1, D>, reference: &ArrayBase<S2, D>,
) -> MeasureResult<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    mean_error(approximate, reference, 2.0)
}

pub fn relative_rmse<S1, S2, D>(
    approximate: &ArrayBase<S1, D>, reference: &ArrayBase<S2, D>,
) -> MeasureResult<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    relative_mean_error(approximate, reference, 2.0)
}

/// Mean absolute error.
pub fn mae<S1, S2, D>(
    approximate: &ArrayBase<S1, D>, reference: &ArrayBase<S2, D>,
) -> MeasureResult<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    mean_error(approximate, reference, 1.0)
}

pub fn relative_mae<S1, S2, D>(
    approximate: &ArrayBase<S1, D>, reference: &ArrayBase<S2, D>,
) -> MeasureResult<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    relative_mean_error(approximate, reference, 1.0)
}

/// Largest absolute entry of `approximate − reference`.
pub fn max_error<S1, S2, D>(
    approximate: &ArrayBase<S1, D>, reference: &ArrayBase<S2, D>,
) -> MeasureResult<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    mean_error(approximate, reference, f64::INFINITY)
}

pub fn relative_max_error<S1, S2, D>(
    approximate: &ArrayBase<S1, D>, reference: &ArrayBase<S2, D>,
) -> MeasureResult<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    relative_mean_error(approximate, reference, f64::INFINITY)
}

/// lp_norm — p-norm of a stream of values for `1 ≤ ord ≤ ∞`.
///
/// NaN entries propagate for every order, including `∞`. Callers validate
/// `ord` beforehand.
pub(crate) fn lp_norm(values: impl Iterator<Item = f64>, ord: f64) -> f64 {
    if ord == f64::INFINITY {
        values
            .map(f64::abs)
            .fold(0.0, |acc, x| if acc.is_nan() || x.is_nan() { f64::NAN } else { acc.max(x) })
    } else if ord == 1.0 {
        values.map(f64::abs).sum()
    } else if ord == 2.0 {
        values.map(|x| x * x).sum::<f64>().sqrt()
    } else {
        values.map(|x| x.abs().powf(ord)).sum::<f64>().powf(1.0 / ord)
    }
}

/// Reject NaN and orders below 1; `∞` is allowed.
pub(crate) fn validate_order(ord: f64) -> MeasureResult<()> {
    if ord.is_nan() || ord < 1.0 {
        return Err(MeasureError::InvalidOrder { ord });
    }
    Ok(())
}

// ---- Helper methods ----

fn validate_pair<S1, S2, D>(
    approximate: &ArrayBase<S1, D>, reference: &ArrayBase<S2, D>, ord: f64,
) -> MeasureResult<()>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    if approximate.shape() != reference.shape() {
        return Err(MeasureError::ShapeMismatch {
            approximate: approximate.shape().to_vec(),
            reference: reference.shape().to_vec(),
        });
    }
    validate_order(ord)?;
    if reference.is_empty() {
        return Err(MeasureError::EmptyInput { context: "mean_error" });
    }
    Ok(())
}

fn normalized_norm(values: impl Iterator<Item = f64>, size: usize, ord: f64) -> f64 {
    let norm = lp_norm(values, ord);
    if ord.is_infinite() { norm } else { norm / (size as f64).powf(1.0 / ord) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array, Array1, Array2, IxDyn, arr0, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The uniform-offset closed form across shapes and norm orders.
    // - Relative errors, including IEEE propagation for zero references.
    // - Validation of shape, order, and emptiness.
    // -------------------------------------------------------------------------

    const TOL: f64 = 1e-12;

    #[test]
    // Purpose
    // -------
    // Verify that a uniform 0.1 offset gives an error of 0.1 regardless of
    // shape, size, or norm order.
    //
    // Given
    // -----
    // - approx = 1.1·ones, ref = ones for shapes (), (1,), (1, 1), (3,), (3, 3).
    //
    // Expect
    // ------
    // - mean_error ≈ 0.1 for p ∈ {1, 2, 3, ∞}.
    fn mean_error_uniform_offset_is_shape_independent() {
        // Arrange
        let shapes: Vec<Vec<usize>> = vec![vec![], vec![1], vec![1, 1], vec![3], vec![3, 3]];

        for shape in shapes {
            let reference = Array::<f64, IxDyn>::ones(IxDyn(&shape));
            let approx = &reference * 1.1;

            for ord in [1.0, 2.0, 3.0, f64::INFINITY] {
                // Act
                let err = mean_error(&approx, &reference, ord).unwrap();

                // Assert
                assert_relative_eq!(err, 0.1, epsilon = 1e-10);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Check the named instances on a non-uniform difference.
    //
    // Given
    // -----
    // - diff = [3, −4] (reference zeros).
    //
    // Expect
    // ------
    // - mae = 3.5, rmse = 5/√2, max_error = 4.
    fn named_instances_match_hand_computed_values() {
        // Arrange
        let approx = array![3.0, -4.0];
        let reference = Array1::<f64>::zeros(2);

        // Act / Assert
        assert_relative_eq!(mae(&approx, &reference).unwrap(), 3.5, epsilon = TOL);
        assert_relative_eq!(rmse(&approx, &reference).unwrap(), 5.0 / 2f64.sqrt(), epsilon = TOL);
        assert_relative_eq!(max_error(&approx, &reference).unwrap(), 4.0, epsilon = TOL);
    }

    #[test]
    // Purpose
    // -------
    // Verify relative errors divide by the reference elementwise.
    //
    // Given
    // -----
    // - approx = [2.2, 4.4], ref = [2, 4].
    //
    // Expect
    // ------
    // - relative_mae = relative_rmse = relative_max_error = 0.1.
    fn relative_errors_scale_by_reference() {
        // Arrange
        let approx = array![[2.2, 4.4]];
        let reference = array![[2.0, 4.0]];

        // Act / Assert
        assert_relative_eq!(relative_mae(&approx, &reference).unwrap(), 0.1, epsilon = 1e-10);
        assert_relative_eq!(relative_rmse(&approx, &reference).unwrap(), 0.1, epsilon = 1e-10);
        assert_relative_eq!(relative_max_error(&approx, &reference).unwrap(), 0.1, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Ensure division by a zero reference propagates instead of erroring.
    //
    // Given
    // -----
    // - approx = [1, 0], ref = [0, 0].
    //
    // Expect
    // ------
    // - relative_mae is infinite or NaN (0/0 gives NaN), never `Err`.
    fn relative_error_with_zero_reference_is_not_an_error() {
        // Arrange
        let approx = array![1.0, 0.0];
        let reference = array![0.0, 0.0];
        let only_inf = array![1.0];
        let zero_ref = array![0.0];

        // Act
        let mixed = relative_mae(&approx, &reference).unwrap();
        let inf = relative_max_error(&only_inf, &zero_ref).unwrap();

        // Assert
        assert!(mixed.is_nan());
        assert!(inf.is_infinite());
    }

    #[test]
    // Purpose
    // -------
    // Check argument validation.
    //
    // Given
    // -----
    // - Mismatched shapes, orders 0.5 and NaN, and empty arrays.
    //
    // Expect
    // ------
    // - `ShapeMismatch`, `InvalidOrder`, and `EmptyInput` respectively.
    fn mean_error_rejects_invalid_arguments() {
        // Arrange
        let a = Array2::<f64>::zeros((2, 3));
        let b = Array2::<f64>::zeros((3, 2));
        let empty = Array1::<f64>::zeros(0);

        // Act / Assert
        assert!(matches!(mean_error(&a, &b, 2.0), Err(MeasureError::ShapeMismatch { .. })));
        assert!(matches!(mean_error(&a, &a, 0.5), Err(MeasureError::InvalidOrder { .. })));
        assert!(matches!(mean_error(&a, &a, f64::NAN), Err(MeasureError::InvalidOrder { .. })));
        assert!(matches!(mean_error(&empty, &empty, 1.0), Err(MeasureError::EmptyInput { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Ensure 0-d arrays are handled like single values.
    //
    // Given
    // -----
    // - approx = 3, ref = 1.
    //
    // Expect
    // ------
    // - Every order gives 2.
    fn mean_error_accepts_zero_dimensional_arrays() {
        // Arrange
        let approx = arr0(3.0);
        let reference = arr0(1.0);

        // Act / Assert
        for ord in [1.0, 2.0, f64::INFINITY] {
            assert_relative_eq!(mean_error(&approx, &reference, ord).unwrap(), 2.0, epsilon = TOL);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify NaN propagates through the max norm.
    //
    // Given
    // -----
    // - Values [1, NaN, 2].
    //
    // Expect
    // ------
    // - lp_norm with ord = ∞ is NaN.
    fn lp_norm_propagates_nan_for_max_norm() {
        // Act
        let norm = lp_norm([1.0, f64::NAN, 2.0].into_iter(), f64::INFINITY);

        // Assert
        assert!(norm.is_nan());
    }
}
