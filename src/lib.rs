//! rust_probeval — error and calibration measures for probabilistic numerical solutions.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the measures to Python via the `_rust_probeval` extension module.
//! The measures compare an approximate solution, optionally carrying a
//! Gaussian uncertainty estimate, against a reference solution.
//!
//! Key behaviors
//! -------------
//! - [`config`]: per-thread covariance-inversion policy (strategy,
//!   symmetrization, damping) with RAII scoped overrides.
//! - [`calibration`]: normalized discrepancies, ANEES, NCI, inclination
//!   index, χ² confidence intervals.
//! - [`error_measures`]: size-normalized Lp errors (RMSE, MAE, max error and
//!   relative variants).
//! - [`sample_analysis`]: distances within a sample cloud and to a reference.
//! - [`timeseries`]: the same measures for solutions evaluated over a set of
//!   locations.
//! - With `python-bindings`, `#[pyfunction]` wrappers grouped into the
//!   `multivariate`, `utils`, and `config` submodules.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, array conversion, and error mapping.
//! - Inputs are never mutated; every result is freshly allocated.
//!
//! Conventions
//! -----------
//! - Rows index evaluation points, columns index state components.
//! - Errors stay typed (`CalibrationError`, `MeasureError`) inside Rust and
//!   become `ValueError` / `NotImplementedError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use ndarray::{Array3, array};
//! use rust_probeval::calibration::{GaussianEstimates, anees};
//! use rust_probeval::config::{InversionStrategy, scoped_config};
//!
//! let est = GaussianEstimates::new(
//!     array![[1.0, 0.0], [0.0, 2.0]],
//!     Array3::from_shape_fn((2, 2, 2), |(_, i, j)| if i == j { 1.0 } else { 0.0 }),
//! )?;
//! let reference = array![[0.0, 0.0], [0.0, 0.0]];
//!
//! let _scope = scoped_config(InversionStrategy::Solve, None, None)?;
//! let value = anees(&est, &reference)?;
//! assert!((value - 2.5).abs() < 1e-12);
//! # Ok::<(), rust_probeval::calibration::CalibrationError>(())
//! ```
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules, the
//!   end-to-end pipeline test in `tests/`, and property tests.

pub mod calibration;
pub mod config;
pub mod error_measures;
pub mod sample_analysis;
pub mod timeseries;
pub mod utils;

mod obs;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    calibration::{chi2, measures},
    error_measures::norms,
    sample_analysis::distances,
    utils::{
        extract_f64_array1, extract_f64_array2, extract_f64_arrayd, extract_gaussian_estimates,
        extract_reference, extract_strategy,
    },
};

// ---- multivariate: calibration ---------------------------------------------

/// Average normalized estimation error squared of `(mean, cov)` against
/// `reference` under the active inversion configuration.
///
/// `mean` is `(N, d)` with `cov` `(N, d, d)`, or a single `(d,)` / `(d, d)`
/// pair.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (mean, cov, reference))]
pub fn anees<'py>(
    py: Python<'py>, mean: &Bound<'py, PyAny>, cov: &Bound<'py, PyAny>,
    reference: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let est = extract_gaussian_estimates(py, mean, cov)?;
    let reference = extract_reference(py, reference)?;
    Ok(measures::anees(&est, &reference)?)
}

/// Non-credibility index; needs at least two evaluation points.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (mean, cov, reference))]
pub fn nci<'py>(
    py: Python<'py>, mean: &Bound<'py, PyAny>, cov: &Bound<'py, PyAny>,
    reference: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let est = extract_gaussian_estimates(py, mean, cov)?;
    let reference = extract_reference(py, reference)?;
    Ok(measures::nci(&est, &reference)?)
}

/// Inclination index; negative when underconfident, positive when
/// overconfident.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (mean, cov, reference))]
pub fn inclination_index<'py>(
    py: Python<'py>, mean: &Bound<'py, PyAny>, cov: &Bound<'py, PyAny>,
    reference: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let est = extract_gaussian_estimates(py, mean, cov)?;
    let reference = extract_reference(py, reference)?;
    Ok(measures::inclination_index(&est, &reference)?)
}

// ---- multivariate: error measures ------------------------------------------

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (approximate_solution, reference_solution, ord))]
pub fn mean_error<'py>(
    py: Python<'py>, approximate_solution: &Bound<'py, PyAny>,
    reference_solution: &Bound<'py, PyAny>, ord: f64,
) -> PyResult<f64> {
    let approx = extract_f64_arrayd(py, approximate_solution)?;
    let reference = extract_f64_arrayd(py, reference_solution)?;
    Ok(norms::mean_error(&approx, &reference, ord)?)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (approximate_solution, reference_solution, ord))]
pub fn relative_mean_error<'py>(
    py: Python<'py>, approximate_solution: &Bound<'py, PyAny>,
    reference_solution: &Bound<'py, PyAny>, ord: f64,
) -> PyResult<f64> {
    let approx = extract_f64_arrayd(py, approximate_solution)?;
    let reference = extract_f64_arrayd(py, reference_solution)?;
    Ok(norms::relative_mean_error(&approx, &reference, ord)?)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (approximate_solution, reference_solution))]
pub fn rmse<'py>(
    py: Python<'py>, approximate_solution: &Bound<'py, PyAny>,
    reference_solution: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    mean_error(py, approximate_solution, reference_solution, 2.0)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (approximate_solution, reference_solution))]
pub fn relative_rmse<'py>(
    py: Python<'py>, approximate_solution: &Bound<'py, PyAny>,
    reference_solution: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    relative_mean_error(py, approximate_solution, reference_solution, 2.0)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (approximate_solution, reference_solution))]
pub fn mae<'py>(
    py: Python<'py>, approximate_solution: &Bound<'py, PyAny>,
    reference_solution: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    mean_error(py, approximate_solution, reference_solution, 1.0)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (approximate_solution, reference_solution))]
pub fn relative_mae<'py>(
    py: Python<'py>, approximate_solution: &Bound<'py, PyAny>,
    reference_solution: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    relative_mean_error(py, approximate_solution, reference_solution, 1.0)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (approximate_solution, reference_solution))]
pub fn max_error<'py>(
    py: Python<'py>, approximate_solution: &Bound<'py, PyAny>,
    reference_solution: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    mean_error(py, approximate_solution, reference_solution, f64::INFINITY)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (approximate_solution, reference_solution))]
pub fn relative_max_error<'py>(
    py: Python<'py>, approximate_solution: &Bound<'py, PyAny>,
    reference_solution: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    relative_mean_error(py, approximate_solution, reference_solution, f64::INFINITY)
}

// ---- multivariate: sample analysis -----------------------------------------

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (samples, p = 2.0))]
pub fn sample_sample_distance<'py>(
    py: Python<'py>, samples: &Bound<'py, PyAny>, p: f64,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let samples = extract_f64_array2(py, samples)?;
    let distances = distances::sample_sample_distance(&samples, p)?;
    Ok(distances.into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (samples, reference, p = 2.0))]
pub fn sample_reference_distance<'py>(
    py: Python<'py>, samples: &Bound<'py, PyAny>, reference: &Bound<'py, PyAny>, p: f64,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let samples = extract_f64_array2(py, samples)?;
    let reference = extract_f64_array1(py, reference)?;
    let distances = distances::sample_reference_distance(&samples, &reference, p)?;
    Ok(distances.into_pyarray(py))
}

/// Always raises `NotImplementedError`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (samples))]
pub fn gaussianity_p_value<'py>(py: Python<'py>, samples: &Bound<'py, PyAny>) -> PyResult<f64> {
    let samples = extract_f64_array2(py, samples)?;
    Ok(distances::gaussianity_p_value(&samples)?)
}

// ---- utils -----------------------------------------------------------------

/// Central χ² interval with `dim` degrees of freedom holding `perc` mass.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (dim, perc = chi2::DEFAULT_PERCENTILE))]
pub fn chi2_confidence_intervals(dim: usize, perc: f64) -> PyResult<(f64, f64)> {
    Ok(chi2::chi2_confidence_interval(dim, perc)?)
}

// ---- config ----------------------------------------------------------------

/// `(strategy, symmetrize, damping)` of the calling thread.
#[cfg(feature = "python-bindings")]
#[pyfunction]
pub fn get_covariance_inversion_parameters() -> (String, bool, f64) {
    let cfg = config::get_config();
    (cfg.strategy().to_string(), cfg.symmetrize(), cfg.damping())
}

/// Replace the calling thread's inversion parameters. Omitted arguments keep
/// their current values.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (strategy = None, symmetrize = None, damping = None))]
pub fn set_covariance_inversion_parameters(
    strategy: Option<&str>, symmetrize: Option<bool>, damping: Option<f64>,
) -> PyResult<()> {
    let current = config::get_config();
    let strategy = match strategy {
        Some(token) => extract_strategy(token)?,
        None => current.strategy(),
    };
    config::set_config(
        strategy,
        symmetrize.unwrap_or(current.symmetrize()),
        damping.unwrap_or(current.damping()),
    )?;
    Ok(())
}

/// Context manager overriding the inversion parameters for a `with` block.
///
/// Omitted arguments keep the values active when the block is entered. The
/// previous parameters are restored on every exit path, including
/// exceptions; exceptions are never suppressed.
#[cfg(feature = "python-bindings")]
#[pyclass(unsendable, module = "rust_probeval.config")]
pub struct CovarianceInversionContext {
    inner: config::InversionContext,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl CovarianceInversionContext {
    #[new]
    #[pyo3(signature = (strategy = None, symmetrize = None, damping = None))]
    fn new(strategy: Option<&str>, symmetrize: Option<bool>, damping: Option<f64>) -> PyResult<Self> {
        let strategy = strategy.map(extract_strategy).transpose()?;
        Ok(CovarianceInversionContext {
            inner: config::InversionContext::new(strategy, symmetrize, damping)?,
        })
    }

    fn __enter__(mut slf: PyRefMut<'_, Self>) -> PyResult<PyRefMut<'_, Self>> {
        slf.inner.enter()?;
        Ok(slf)
    }

    #[pyo3(signature = (_exc_type = None, _exc_value = None, _traceback = None))]
    fn __exit__(
        &mut self, _exc_type: Option<&Bound<'_, PyAny>>, _exc_value: Option<&Bound<'_, PyAny>>,
        _traceback: Option<&Bound<'_, PyAny>>,
    ) -> bool {
        self.inner.exit();
        false
    }
}

/// `with covariance_inversion_context(strategy="pinv"): ...`
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (strategy = None, symmetrize = None, damping = None))]
pub fn covariance_inversion_context(
    strategy: Option<&str>, symmetrize: Option<bool>, damping: Option<f64>,
) -> PyResult<CovarianceInversionContext> {
    CovarianceInversionContext::new(strategy, symmetrize, damping)
}

/// Python module initializer for `_rust_probeval`.
///
/// Key behaviors
/// -------------
/// - Create the `multivariate`, `utils`, and `config` submodules and attach
///   them to the parent module.
/// - Register the submodules in `sys.modules` so dotted imports work.
///
/// Notes
/// -----
/// - The inversion configuration is thread-local on the Rust side; Python
///   threads each see their own parameters.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_probeval<'py>(py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let multivariate_mod = PyModule::new(py, "multivariate")?;
    let utils_mod = PyModule::new(py, "utils")?;
    let config_mod = PyModule::new(py, "config")?;
    multivariate_submodule(m, &multivariate_mod)?;
    utils_submodule(m, &utils_mod)?;
    config_submodule(m, &config_mod)?;

    let modules = py.import("sys")?.getattr("modules")?;
    modules.set_item("rust_probeval.multivariate", multivariate_mod)?;
    modules.set_item("rust_probeval.utils", utils_mod)?;
    modules.set_item("rust_probeval.config", config_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn multivariate_submodule<'py>(parent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(anees, m)?)?;
    m.add_function(wrap_pyfunction!(nci, m)?)?;
    m.add_function(wrap_pyfunction!(inclination_index, m)?)?;
    m.add_function(wrap_pyfunction!(rmse, m)?)?;
    m.add_function(wrap_pyfunction!(relative_rmse, m)?)?;
    m.add_function(wrap_pyfunction!(mae, m)?)?;
    m.add_function(wrap_pyfunction!(relative_mae, m)?)?;
    m.add_function(wrap_pyfunction!(max_error, m)?)?;
    m.add_function(wrap_pyfunction!(relative_max_error, m)?)?;
    m.add_function(wrap_pyfunction!(mean_error, m)?)?;
    m.add_function(wrap_pyfunction!(relative_mean_error, m)?)?;
    m.add_function(wrap_pyfunction!(sample_sample_distance, m)?)?;
    m.add_function(wrap_pyfunction!(sample_reference_distance, m)?)?;
    m.add_function(wrap_pyfunction!(gaussianity_p_value, m)?)?;
    parent.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn utils_submodule<'py>(parent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(chi2_confidence_intervals, m)?)?;
    parent.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn config_submodule<'py>(parent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(get_covariance_inversion_parameters, m)?)?;
    m.add_function(wrap_pyfunction!(set_covariance_inversion_parameters, m)?)?;
    m.add_function(wrap_pyfunction!(covariance_inversion_context, m)?)?;
    m.add_class::<CovarianceInversionContext>()?;
    parent.add_submodule(m)?;
    Ok(())
}
