//! calibration::estimates — container for a sequence of Gaussian estimates.
//!
//! Purpose
//! -------
//! Represent the output of a probabilistic solution evaluated at `N`
//! locations: one mean vector and one covariance matrix per location. The
//! container validates the `N×d` / `N×d×d` layout once so every statistic can
//! rely on it.
//!
//! Key behaviors
//! -------------
//! - [`GaussianEstimates::new`] checks `covs.dim() == (N, d, d)` and `N ≥ 1`.
//! - [`GaussianEstimates::single`] promotes one `(mean, cov)` pair to a
//!   length-one sequence.
//! - [`GaussianEstimates::residuals`] forms `mean − reference` after checking
//!   the reference shape.
//! - [`GaussianEstimates::points`] iterates the per-location pairs as views.
//!
//! Invariants & assumptions
//! ------------------------
//! - Rows index evaluation points, columns index state components.
//! - Covariances are symmetric positive semi-definite by contract; this type
//!   does not check it.
//! - The container is read-only after construction; statistics never mutate
//!   it and always allocate their outputs.

use crate::calibration::{
    errors::{CalResult, CalibrationError},
    validation::{validate_point, validate_reference},
};
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, Axis};

/// GaussianEstimates — means (`N×d`) and covariances (`N×d×d`) at `N` points.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianEstimates {
    means: Array2<f64>,
    covs: Array3<f64>,
}

impl GaussianEstimates {
    /// Build from stacked means and covariances.
    ///
    /// Errors
    /// ------
    /// - `CalibrationError::EmptyInput` when `N == 0`.
    /// - `CalibrationError::DimensionMismatch` when `covs` is not `N×d×d`.
    pub fn new(means: Array2<f64>, covs: Array3<f64>) -> CalResult<Self> {
        let (n, d) = means.dim();
        if n == 0 {
            return Err(CalibrationError::EmptyInput { context: "GaussianEstimates" });
        }
        if covs.dim() != (n, d, d) {
            return Err(CalibrationError::DimensionMismatch {
                context: "stacked covariances",
                expected: vec![n, d, d],
                found: covs.shape().to_vec(),
            });
        }
        Ok(GaussianEstimates { means, covs })
    }

    /// Promote a single Gaussian to a length-one sequence.
    pub fn single(mean: Array1<f64>, cov: Array2<f64>) -> CalResult<Self> {
        validate_point(mean.view(), cov.view())?;
        let d = mean.len();
        let means = mean.into_shape_with_order((1, d)).map_err(|_| {
            CalibrationError::DimensionMismatch {
                context: "single mean",
                expected: vec![1, d],
                found: vec![d],
            }
        })?;
        let covs = cov.insert_axis(Axis(0));
        Ok(GaussianEstimates { means, covs })
    }

    /// Build from one `(mean, cov)` pair per location.
    pub fn from_points(points: &[(Array1<f64>, Array2<f64>)]) -> CalResult<Self> {
        let Some((first, _)) = points.first() else {
            return Err(CalibrationError::EmptyInput { context: "GaussianEstimates" });
        };
        let (n, d) = (points.len(), first.len());
        let mut means = Array2::<f64>::zeros((n, d));
        let mut covs = Array3::<f64>::zeros((n, d, d));
        for (i, (mean, cov)) in points.iter().enumerate() {
            if mean.len() != d {
                return Err(CalibrationError::DimensionMismatch {
                    context: "mean of an evaluation point",
                    expected: vec![d],
                    found: vec![mean.len()],
                });
            }
            validate_point(mean.view(), cov.view())?;
            means.row_mut(i).assign(mean);
            covs.index_axis_mut(Axis(0), i).assign(cov);
        }
        Ok(GaussianEstimates { means, covs })
    }

    pub fn means(&self) -> &Array2<f64> {
        &self.means
    }

    pub fn covs(&self) -> &Array3<f64> {
        &self.covs
    }

    /// Number of evaluation points `N`.
    pub fn len(&self) -> usize {
        self.means.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// State dimension `d`.
    pub fn dim(&self) -> usize {
        self.means.ncols()
    }

    /// Per-location `(mean, covariance)` views, in input order.
    pub fn points(&self) -> impl Iterator<Item = (ArrayView1<'_, f64>, ArrayView2<'_, f64>)> {
        self.means.outer_iter().zip(self.covs.outer_iter())
    }

    /// `mean − reference`, row by row.
    ///
    /// Errors
    /// ------
    /// - `CalibrationError::DimensionMismatch` when `reference` is not `N×d`.
    pub fn residuals(&self, reference: &Array2<f64>) -> CalResult<Array2<f64>> {
        validate_reference(self.means.view(), reference.view())?;
        Ok(&self.means - reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Verify that `new` accepts a conformable stack and reports N and d.
    //
    // Given
    // -----
    // - Means 3×2 and covariances 3×2×2.
    //
    // Expect
    // ------
    // - `len() == 3`, `dim() == 2`, and three points are iterated.
    fn new_accepts_conformable_stack() {
        // Arrange
        let means = Array2::<f64>::zeros((3, 2));
        let covs = Array3::<f64>::zeros((3, 2, 2));

        // Act
        let est = GaussianEstimates::new(means, covs).unwrap();

        // Assert
        assert_eq!(est.len(), 3);
        assert_eq!(est.dim(), 2);
        assert_eq!(est.points().count(), 3);
        assert!(!est.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Ensure empty and mismatched stacks are rejected.
    //
    // Given
    // -----
    // - An empty 0×2 stack and a 3×2 / 3×3×3 stack.
    //
    // Expect
    // ------
    // - `EmptyInput` and `DimensionMismatch` respectively.
    fn new_rejects_empty_and_mismatched_stacks() {
        // Act
        let empty = GaussianEstimates::new(Array2::zeros((0, 2)), Array3::zeros((0, 2, 2)));
        let mismatched = GaussianEstimates::new(Array2::zeros((3, 2)), Array3::zeros((3, 3, 3)));

        // Assert
        assert!(matches!(empty, Err(CalibrationError::EmptyInput { .. })));
        assert!(matches!(mismatched, Err(CalibrationError::DimensionMismatch { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Check promotion of one Gaussian and stacking of explicit points.
    //
    // Given
    // -----
    // - Mean [1, 2] with identity covariance, via `single` and `from_points`.
    //
    // Expect
    // ------
    // - Both yield N = 1, d = 2, with identical contents.
    fn single_and_from_points_agree_for_one_gaussian() {
        // Arrange
        let mean = array![1.0, 2.0];
        let cov = Array2::<f64>::eye(2);

        // Act
        let single = GaussianEstimates::single(mean.clone(), cov.clone()).unwrap();
        let stacked = GaussianEstimates::from_points(&[(mean, cov)]).unwrap();

        // Assert
        assert_eq!(single.len(), 1);
        assert_eq!(single.dim(), 2);
        assert_eq!(single, stacked);
    }

    #[test]
    // Purpose
    // -------
    // Verify residual formation and reference shape checking.
    //
    // Given
    // -----
    // - Means [[1, 2], [3, 4]] with reference [[0.5, 0.5], [1, 1]] and a
    //   reference of the wrong width.
    //
    // Expect
    // ------
    // - Residuals [[0.5, 1.5], [2, 3]]; the wrong width is rejected.
    fn residuals_subtract_reference_and_check_shape() {
        // Arrange
        let est =
            GaussianEstimates::new(array![[1.0, 2.0], [3.0, 4.0]], Array3::zeros((2, 2, 2)))
                .unwrap();
        let reference = array![[0.5, 0.5], [1.0, 1.0]];

        // Act
        let residuals = est.residuals(&reference).unwrap();

        // Assert
        assert_eq!(residuals, array![[0.5, 1.5], [2.0, 3.0]]);
        assert!(est.residuals(&Array2::zeros((2, 3))).is_err());
    }
}
