//! Solution interfaces consumed by the time-series adapters.
//!
//! - [`DeterministicSolution`]: maps locations to values, one row per
//!   location. Reference solutions implement this.
//! - [`ProbabilisticSolution`]: maps locations to Gaussian estimates (mean and
//!   covariance per location). Filters, smoothers, and probabilistic ODE
//!   solvers implement this.
//! - [`PosteriorMean`]: views a probabilistic solution through its mean so the
//!   plain error measures apply to it.
//!
//! Both traits have blanket impls for closures, so
//! `|ts: &[f64]| anyhow::Ok(values)` is already a deterministic solution.
//! Evaluation failures are reported as `anyhow::Error` and surface from the
//! adapters as `CalibrationError::Solution`.

use crate::calibration::estimates::GaussianEstimates;
use ndarray::Array2;

/// User-implemented location → values interface.
///
/// Required:
/// - `evaluate(&[T]) -> anyhow::Result<Array2<f64>>`: one row per location,
///   in input order.
pub trait DeterministicSolution<T> {
    fn evaluate(&self, locations: &[T]) -> anyhow::Result<Array2<f64>>;
}

/// User-implemented location → Gaussian estimates interface.
///
/// Required:
/// - `evaluate(&[T]) -> anyhow::Result<GaussianEstimates>`: one mean and one
///   covariance per location, in input order.
pub trait ProbabilisticSolution<T> {
    fn evaluate(&self, locations: &[T]) -> anyhow::Result<GaussianEstimates>;
}

impl<T, F> DeterministicSolution<T> for F
where
    F: Fn(&[T]) -> anyhow::Result<Array2<f64>>,
{
    fn evaluate(&self, locations: &[T]) -> anyhow::Result<Array2<f64>> {
        self(locations)
    }
}

impl<T, F> ProbabilisticSolution<T> for F
where
    F: Fn(&[T]) -> anyhow::Result<GaussianEstimates>,
{
    fn evaluate(&self, locations: &[T]) -> anyhow::Result<GaussianEstimates> {
        self(locations)
    }
}

/// Deterministic view of a probabilistic solution: its mean at each location.
#[derive(Debug, Clone, Copy)]
pub struct PosteriorMean<'a, P>(pub &'a P);

impl<T, P> DeterministicSolution<T> for PosteriorMean<'_, P>
where
    P: ProbabilisticSolution<T>,
{
    fn evaluate(&self, locations: &[T]) -> anyhow::Result<Array2<f64>> {
        Ok(self.0.evaluate(locations)?.means().clone())
    }
}
