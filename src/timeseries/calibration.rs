//! timeseries::calibration — calibration statistics of a probabilistic solution
//! over a set of locations.
//!
//! Each statistic evaluates the probabilistic solution and the reference at
//! `locations`, then delegates to `calibration::measures` under the active
//! inversion configuration, or under an explicit one for the `_with`
//! variants. [`non_credibility_index2`] and
//! [`non_credibility_index3`] are declared variants without a defined formula;
//! they always fail with `CalibrationError::NotImplemented`.

use crate::{
    calibration::{
        errors::{CalResult, CalibrationError},
        estimates::GaussianEstimates,
        measures,
    },
    config::{InversionConfig, get_config},
    timeseries::solution::{DeterministicSolution, ProbabilisticSolution},
};
use ndarray::Array2;

pub use crate::calibration::chi2::{
    DEFAULT_PERCENTILE, chi2_confidence_interval,
    chi2_confidence_interval as chi2_confidence_intervals,
};

/// ANEES of `approximate` against `reference` over `locations`.
///
/// Errors
/// ------
/// - `CalibrationError::EmptyInput` when `locations` is empty.
/// - `CalibrationError::Solution` when either solution fails to evaluate.
/// - Shape and inversion failures from `calibration::anees`.
pub fn anees<T, P, R>(approximate: &P, reference: &R, locations: &[T]) -> CalResult<f64>
where
    P: ProbabilisticSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    anees_with(&get_config(), approximate, reference, locations)
}

/// [`anees`] under an explicit `config`; the thread-local policy is ignored.
pub fn anees_with<T, P, R>(
    config: &InversionConfig, approximate: &P, reference: &R, locations: &[T],
) -> CalResult<f64>
where
    P: ProbabilisticSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    let (estimates, refs) = evaluate_pair(approximate, reference, locations)?;
    measures::anees_with(config, &estimates, &refs)
}

/// Alias of [`anees`].
pub fn average_normalised_estimation_error_squared<T, P, R>(
    approximate: &P, reference: &R, locations: &[T],
) -> CalResult<f64>
where
    P: ProbabilisticSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    anees(approximate, reference, locations)
}

/// Non-credibility index over `locations`.
///
/// Errors
/// ------
/// - As for [`anees`], plus `CalibrationError::DegenerateSampleCovariance`
///   for a single location.
pub fn non_credibility_index<T, P, R>(
    approximate: &P, reference: &R, locations: &[T],
) -> CalResult<f64>
where
    P: ProbabilisticSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    non_credibility_index_with(&get_config(), approximate, reference, locations)
}

pub fn non_credibility_index_with<T, P, R>(
    config: &InversionConfig, approximate: &P, reference: &R, locations: &[T],
) -> CalResult<f64>
where
    P: ProbabilisticSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    let (estimates, refs) = evaluate_pair(approximate, reference, locations)?;
    measures::nci_with(config, &estimates, &refs)
}

/// Inclination index over `locations`; negative when underconfident.
pub fn inclination_index<T, P, R>(
    approximate: &P, reference: &R, locations: &[T],
) -> CalResult<f64>
where
    P: ProbabilisticSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    inclination_index_with(&get_config(), approximate, reference, locations)
}

pub fn inclination_index_with<T, P, R>(
    config: &InversionConfig, approximate: &P, reference: &R, locations: &[T],
) -> CalResult<f64>
where
    P: ProbabilisticSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    let (estimates, refs) = evaluate_pair(approximate, reference, locations)?;
    measures::inclination_index_with(config, &estimates, &refs)
}

/// Variant of the non-credibility index. Not implemented.
pub fn non_credibility_index2<T, P, R>(
    _approximate: &P, _reference: &R, _locations: &[T],
) -> CalResult<f64>
where
    P: ProbabilisticSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    Err(CalibrationError::NotImplemented { operation: "non_credibility_index2" })
}

/// Variant of the non-credibility index. Not implemented.
pub fn non_credibility_index3<T, P, R>(
    _approximate: &P, _reference: &R, _locations: &[T],
) -> CalResult<f64>
where
    P: ProbabilisticSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    Err(CalibrationError::NotImplemented { operation: "non_credibility_index3" })
}

// ---- Helper methods ----

fn evaluate_pair<T, P, R>(
    approximate: &P, reference: &R, locations: &[T],
) -> CalResult<(GaussianEstimates, Array2<f64>)>
where
    P: ProbabilisticSolution<T> + ?Sized,
    R: DeterministicSolution<T> + ?Sized,
{
    if locations.is_empty() {
        return Err(CalibrationError::EmptyInput { context: "time-series calibration measure" });
    }
    Ok((approximate.evaluate(locations)?, reference.evaluate(locations)?))
}
