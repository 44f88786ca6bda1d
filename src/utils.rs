//! utils — conversions between Python array-likes and owned `ndarray` values.
//!
//! Only compiled with the `python-bindings` feature. Every extractor first
//! tries a zero-conversion read of a float64 numpy array of the right rank,
//! then falls back to `numpy.asarray(obj, "float64")` so lists, tuples, and
//! pandas objects are accepted as well.

#[cfg(feature = "python-bindings")]
use ndarray::{Array, Array1, Array2, Array3, ArrayD, Dimension, Ix1, Ix2, Ix3, IxDyn};

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    calibration::{errors::CalResult, estimates::GaussianEstimates},
    config::InversionStrategy,
};

#[cfg(feature = "python-bindings")]
pub fn extract_f64_array1<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<Array1<f64>> {
    extract_owned::<Ix1>(py, raw_data, "1-D")
}

#[cfg(feature = "python-bindings")]
pub fn extract_f64_array2<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<Array2<f64>> {
    extract_owned::<Ix2>(py, raw_data, "2-D")
}

#[cfg(feature = "python-bindings")]
pub fn extract_f64_array3<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<Array3<f64>> {
    extract_owned::<Ix3>(py, raw_data, "3-D")
}

/// Any rank, including 0-d scalars.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_arrayd<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<ArrayD<f64>> {
    extract_owned::<IxDyn>(py, raw_data, "numeric")
}

/// Build [`GaussianEstimates`] from `(N, d)` means and `(N, d, d)` covariances.
///
/// A single Gaussian given as `(d,)` mean and `(d, d)` covariance is promoted
/// to a length-one sequence.
#[cfg(feature = "python-bindings")]
pub fn extract_gaussian_estimates<'py>(
    py: Python<'py>, means: &Bound<'py, PyAny>, covs: &Bound<'py, PyAny>,
) -> PyResult<GaussianEstimates> {
    let mean_any = extract_f64_arrayd(py, means)?;
    let estimates: CalResult<GaussianEstimates> = match mean_any.ndim() {
        1 => GaussianEstimates::single(into_rank(mean_any)?, extract_f64_array2(py, covs)?),
        _ => GaussianEstimates::new(into_rank(mean_any)?, extract_f64_array3(py, covs)?),
    };
    Ok(estimates?)
}

/// Reference values as `(N, d)`; a `(d,)` vector becomes a single row.
#[cfg(feature = "python-bindings")]
pub fn extract_reference<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<Array2<f64>> {
    let reference = extract_f64_arrayd(py, raw_data)?;
    if reference.ndim() == 1 {
        let d = reference.len();
        return reference
            .into_shape_with_order(IxDyn(&[1, d]))
            .map_err(|e| PyTypeError::new_err(e.to_string()))
            .and_then(into_rank);
    }
    into_rank(reference)
}

#[cfg(feature = "python-bindings")]
pub fn extract_strategy(strategy: &str) -> PyResult<InversionStrategy> {
    Ok(strategy.parse::<InversionStrategy>()?)
}

// ---- Helper methods ----

#[cfg(feature = "python-bindings")]
fn extract_owned<'py, D>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, rank: &'static str,
) -> PyResult<Array<f64, D>>
where
    D: Dimension,
{
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray<'py, f64, D>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    let converted = py.import("numpy")?.call_method1("asarray", (raw_data, "float64"))?;
    converted
        .extract::<PyReadonlyArray<'py, f64, D>>()
        .map(|arr_ro| arr_ro.as_array().to_owned())
        .map_err(|_| PyTypeError::new_err(format!("expected a {rank} array-like of float64")))
}

#[cfg(feature = "python-bindings")]
fn into_rank<D: Dimension>(array: ArrayD<f64>) -> PyResult<Array<f64, D>> {
    let ndim = array.ndim();
    array.into_dimensionality::<D>().map_err(|_| {
        PyTypeError::new_err(format!("array has {ndim} dimensions, which does not fit here"))
    })
}
