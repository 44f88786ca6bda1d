//! timeseries::error_measures — Lp errors of a solution over a set of locations.
//!
//! Each function evaluates the approximate and reference solutions at the
//! same locations and delegates to the matching routine in
//! `error_measures::norms`. [`final_time_error`] evaluates at the last
//! location only.
//!
//! Errors
//! ------
//! - `CalibrationError::EmptyInput` when `locations` is empty.
//! - `CalibrationError::Solution` when either solution fails to evaluate.
//! - `CalibrationError::Measure` for shape or order failures of the
//!   underlying reduction.

use crate::{
    calibration::errors::{CalResult, CalibrationError},
    error_measures::norms,
    timeseries::solution::DeterministicSolution,
};
use ndarray::Array2;

/// Size-normalized p-norm of `approximate − reference` over `locations`.
pub fn mean_error<T, A, R>(
    approximate: &A, reference: &R, locations: &[T], ord: f64,
) -> CalResult<f64>
where
    A: DeterministicSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    let (approx, refs) = evaluate_pair(approximate, reference, locations)?;
    Ok(norms::mean_error(&approx, &refs, ord)?)
}

/// Size-normalized p-norm of `(approximate − reference) / reference` over `locations`.
pub fn relative_mean_error<T, A, R>(
    approximate: &A, reference: &R, locations: &[T], ord: f64,
) -> CalResult<f64>
where
    A: DeterministicSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    let (approx, refs) = evaluate_pair(approximate, reference, locations)?;
    Ok(norms::relative_mean_error(&approx, &refs, ord)?)
}

/// Root mean-square error over `locations`.
pub fn rmse<T, A, R>(approximate: &A, reference: &R, locations: &[T]) -> CalResult<f64>
where
    A: DeterministicSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    mean_error(approximate, reference, locations, 2.0)
}

/// Alias of [`rmse`].
pub fn root_mean_square_error<T, A, R>(
    approximate: &A, reference: &R, locations: &[T],
) -> CalResult<f64>
where
    A: DeterministicSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    rmse(approximate, reference, locations)
}

pub fn relative_rmse<T, A, R>(approximate: &A, reference: &R, locations: &[T]) -> CalResult<f64>
where
    A: DeterministicSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    relative_mean_error(approximate, reference, locations, 2.0)
}

pub fn mae<T, A, R>(approximate: &A, reference: &R, locations: &[T]) -> CalResult<f64>
where
    A: DeterministicSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    mean_error(approximate, reference, locations, 1.0)
}

pub fn relative_mae<T, A, R>(approximate: &A, reference: &R, locations: &[T]) -> CalResult<f64>
where
    A: DeterministicSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    relative_mean_error(approximate, reference, locations, 1.0)
}

/// Largest absolute deviation over all locations and components.
pub fn max_error<T, A, R>(approximate: &A, reference: &R, locations: &[T]) -> CalResult<f64>
where
    A: DeterministicSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    mean_error(approximate, reference, locations, f64::INFINITY)
}

pub fn relative_max_error<T, A, R>(
    approximate: &A, reference: &R, locations: &[T],
) -> CalResult<f64>
where
    A: DeterministicSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    relative_mean_error(approximate, reference, locations, f64::INFINITY)
}

/// final_time_error — RMSE at the last location only.
///
/// Errors
/// ------
/// - `CalibrationError::EmptyInput` when `locations` is empty.
/// - Evaluation and shape failures as for [`mean_error`].
pub fn final_time_error<T, A, R>(
    approximate: &A, reference: &R, locations: &[T],
) -> CalResult<f64>
where
    A: DeterministicSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    let Some(last) = locations.last() else {
        return Err(CalibrationError::EmptyInput { context: "final_time_error" });
    };
    rmse(approximate, reference, std::slice::from_ref(last))
}

// ---- Helper methods ----

fn evaluate_pair<T, A, R>(
    approximate: &A, reference: &R, locations: &[T],
) -> CalResult<(Array2<f64>, Array2<f64>)>
where
    A: DeterministicSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    if locations.is_empty() {
        return Err(CalibrationError::EmptyInput { context: "time-series error measure" });
    }
    Ok((approximate.evaluate(locations)?, reference.evaluate(locations)?))
}
