//! Integration tests for the calibration and error-measure pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path from a probabilistic solution (means and
//!   covariances over a set of locations) through the inversion
//!   configuration to ANEES, NCI, inclination index, and χ² acceptance
//!   bands.
//! - Exercise the public surface the way a caller would: closures as
//!   solutions, scoped configuration, and the time-series adapters.
//!
//! Coverage
//! --------
//! - `config`: scoped overrides, nesting, restoration after a panic.
//! - `calibration`: all statistics over the full strategy × symmetrize ×
//!   damping grid, explicit vs implicit configuration, failure propagation.
//! - `timeseries`: calibration and error adapters, `PosteriorMean`,
//!   sample-analysis re-exports.
//!
//! Exclusions
//! ----------
//! - Per-strategy numerics and validation branches; those are covered by
//!   unit tests next to each module.
//! - Python bindings.
use ndarray::{Array1, Array2, Array3, array};
use rust_probeval::{
    calibration::{
        CalibrationError, GaussianEstimates, anees, anees_with, chi2_confidence_interval,
        inclination_index, inclination_index_with, nci, nci_with,
    },
    config::{InversionConfig, InversionStrategy, get_config, scoped_config, set_config},
    timeseries::{self, PosteriorMean},
};

/// Purpose
/// -------
/// Provide a smooth 2-D reference trajectory `y(t) = [sin t, cos t]`.
///
/// Returns
/// -------
/// - One row per location, in input order.
fn reference_trajectory(ts: &[f64]) -> anyhow::Result<Array2<f64>> {
    Ok(Array2::from_shape_fn((ts.len(), 2), |(i, j)| {
        if j == 0 { ts[i].sin() } else { ts[i].cos() }
    }))
}

/// Purpose
/// -------
/// Deterministic residual pattern `[√2 cos 7t, √2 sin 7t]` with squared norm
/// exactly 2 at every location and non-collinear components.
fn residual_pattern(t: f64) -> [f64; 2] {
    let s = 2f64.sqrt();
    [s * (7.0 * t).cos(), s * (7.0 * t).sin()]
}

/// Purpose
/// -------
/// Build a probabilistic solution whose error at each location is
/// `residual_pattern(t)` and whose reported covariance is `scale · I`.
///
/// Invariants
/// ----------
/// - With `scale = 1` every normalized discrepancy equals 2, so ANEES = d.
fn filter_like_solution(scale: f64) -> impl Fn(&[f64]) -> anyhow::Result<GaussianEstimates> {
    move |ts: &[f64]| {
        let mut means = reference_trajectory(ts)?;
        for (i, &t) in ts.iter().enumerate() {
            let r = residual_pattern(t);
            means[[i, 0]] += r[0];
            means[[i, 1]] += r[1];
        }
        let covs =
            Array3::from_shape_fn((ts.len(), 2, 2), |(_, a, b)| if a == b { scale } else { 0.0 });
        Ok(GaussianEstimates::new(means, covs)?)
    }
}

fn locations(n: usize) -> Vec<f64> {
    (0..n).map(|k| 0.05 * k as f64).collect()
}

fn config_grid() -> Vec<InversionConfig> {
    let mut grid = Vec::new();
    for strategy in InversionStrategy::ALL {
        for symmetrize in [true, false] {
            for damping in [0.0, 1e-3] {
                grid.push(
                    InversionConfig::new(strategy, symmetrize, damping)
                        .expect("grid parameters are valid"),
                );
            }
        }
    }
    grid
}

#[test]
// Purpose
// -------
// Verify a calibrated solution lands inside the χ² acceptance band.
//
// Given
// -----
// - 50 locations, residual norm² = 2 everywhere, covariance I (d = 2).
//
// Expect
// ------
// - ANEES = 2 exactly (up to rounding).
// - N · ANEES lies in the 99% central interval of χ²(N · d).
fn calibrated_solution_lies_in_chi2_band() {
    // Arrange
    let ts = locations(50);
    let solution = filter_like_solution(1.0);

    // Act
    let value = timeseries::anees(&solution, &reference_trajectory, &ts)
        .expect("anees should succeed for a well-posed solution");
    let (lower, upper) = chi2_confidence_interval(100, 0.99).expect("valid χ² parameters");

    // Assert
    assert!((value - 2.0).abs() < 1e-10, "anees = {value}");
    assert!(lower < 50.0 * value && 50.0 * value < upper);
}

#[test]
// Purpose
// -------
// Check that reported covariances 10× too large or too small are detected
// with the right sign.
//
// Given
// -----
// - The same residuals with covariance 10·I and 0.1·I.
//
// Expect
// ------
// - ANEES 0.2 vs 20.
// - Inclination index negative (underconfident) vs positive (overconfident).
// - NCI positive in both cases and equal to |inclination index| because the
//   log-ratio has the same sign at every point.
fn over_and_underconfidence_are_distinguished() {
    // Arrange
    let ts = locations(40);
    let too_wide = filter_like_solution(10.0);
    let too_narrow = filter_like_solution(0.1);

    // Act
    let anees_wide = timeseries::anees(&too_wide, &reference_trajectory, &ts).unwrap();
    let anees_narrow = timeseries::anees(&too_narrow, &reference_trajectory, &ts).unwrap();
    let ii_wide = timeseries::inclination_index(&too_wide, &reference_trajectory, &ts).unwrap();
    let ii_narrow = timeseries::inclination_index(&too_narrow, &reference_trajectory, &ts).unwrap();
    let nci_wide = timeseries::non_credibility_index(&too_wide, &reference_trajectory, &ts).unwrap();
    let nci_narrow =
        timeseries::non_credibility_index(&too_narrow, &reference_trajectory, &ts).unwrap();

    // Assert
    assert!((anees_wide - 0.2).abs() < 1e-10);
    assert!((anees_narrow - 20.0).abs() < 1e-8);
    assert!(ii_wide < 0.0 && ii_narrow > 0.0, "ii_wide = {ii_wide}, ii_narrow = {ii_narrow}");
    assert!(nci_wide > 0.0 && nci_narrow > 0.0);
    assert!((nci_wide - ii_wide.abs()).abs() < 1e-9);
    assert!((nci_narrow - ii_narrow.abs()).abs() < 1e-9);
    // Scaling covariances by 100 shifts every log-discrepancy by exactly 2.
    assert!((ii_narrow - ii_wide - 20.0).abs() < 1e-9);
}

#[test]
// Purpose
// -------
// Ensure explicit-config and scoped-config entry points agree everywhere on
// the grid and that every statistic stays finite.
//
// Given
// -----
// - A 30-point solution with covariance 2·I.
//
// Expect
// ------
// - `*_with(cfg, ..)` equals the implicit variant inside `scoped_config`.
// - ANEES > 0, NCI ≥ 0, all finite.
fn explicit_and_scoped_configuration_agree_over_grid() {
    // Arrange
    let ts = locations(30);
    let est = filter_like_solution(2.0)(&ts).unwrap();
    let reference = reference_trajectory(&ts).unwrap();

    for cfg in config_grid() {
        // Act
        let explicit = (
            anees_with(&cfg, &est, &reference).unwrap(),
            nci_with(&cfg, &est, &reference).unwrap(),
            inclination_index_with(&cfg, &est, &reference).unwrap(),
        );
        let scoped = {
            let _scope =
                scoped_config(cfg.strategy(), Some(cfg.symmetrize()), Some(cfg.damping()))
                    .unwrap();
            (
                anees(&est, &reference).unwrap(),
                nci(&est, &reference).unwrap(),
                inclination_index(&est, &reference).unwrap(),
            )
        };

        // Assert
        assert_eq!(explicit, scoped, "config {cfg}");
        assert!(explicit.0.is_finite() && explicit.0 > 0.0);
        assert!(explicit.1.is_finite() && explicit.1 >= 0.0);
        assert!(explicit.2.is_finite());
    }
}

#[test]
// Purpose
// -------
// Verify scope restoration across nesting and a panic raised inside a scope.
//
// Given
// -----
// - A global baseline (solve, false, 0.5), an outer pinv scope, and an inner
//   scope that panics.
//
// Expect
// ------
// - After the panic the outer scope's values are active; after the outer
//   scope the baseline is back.
fn scopes_restore_through_nesting_and_panics() {
    // Arrange
    set_config(InversionStrategy::Solve, false, 0.5).unwrap();
    let baseline = get_config();

    // Act
    {
        let _outer = scoped_config(InversionStrategy::Pinv, None, None).unwrap();
        let outer_cfg = get_config();
        assert_eq!(outer_cfg.strategy(), InversionStrategy::Pinv);
        assert!(!outer_cfg.symmetrize());
        assert_eq!(outer_cfg.damping(), 0.5);

        let result = std::panic::catch_unwind(|| {
            let _inner = scoped_config(InversionStrategy::Inv, Some(true), Some(2.0)).unwrap();
            panic!("failure inside scope");
        });

        // Assert (inner)
        assert!(result.is_err());
        assert_eq!(get_config(), outer_cfg);
    }

    // Assert (outer)
    assert_eq!(get_config(), baseline);
    set_config(InversionStrategy::Cholesky, true, 0.0).unwrap();
}

#[test]
// Purpose
// -------
// Check that factorization failures propagate instead of falling back.
//
// Given
// -----
// - A single indefinite covariance [[1, 2], [2, 1]] and residual [1, 0].
//
// Expect
// ------
// - Cholesky fails with `NotPositiveDefinite`; `solve` returns −1/3.
fn cholesky_failure_propagates_without_fallback() {
    // Arrange
    let est = GaussianEstimates::single(array![1.0, 0.0], array![[1.0, 2.0], [2.0, 1.0]]).unwrap();
    let reference = array![[0.0, 0.0]];
    let cholesky = InversionConfig::default();
    let solve = cholesky.with_strategy(InversionStrategy::Solve);

    // Act
    let failed = anees_with(&cholesky, &est, &reference);
    let solved = anees_with(&solve, &est, &reference).unwrap();

    // Assert
    assert!(matches!(failed, Err(CalibrationError::NotPositiveDefinite { .. })));
    assert!((solved + 1.0 / 3.0).abs() < 1e-12);
}

#[test]
// Purpose
// -------
// Exercise the error-measure adapters on a probabilistic solution through
// its posterior mean, plus the sample-analysis re-exports.
//
// Given
// -----
// - The calibrated solution; its mean error at each location has norm √2.
//
// Expect
// ------
// - rmse = 1 (norm² 2 spread over 2 components), final_time_error = 1.
// - Sample distances via `timeseries` return one entry per sample, and the
//   gaussianity stub reports `NotImplemented`.
fn posterior_mean_feeds_error_measures_and_sample_analysis() {
    // Arrange
    let ts = locations(25);
    let solution = filter_like_solution(1.0);
    let mean = PosteriorMean(&solution);

    // Act
    let rmse = timeseries::rmse(&mean, &reference_trajectory, &ts).unwrap();
    let final_err = timeseries::final_time_error(&mean, &reference_trajectory, &ts).unwrap();
    let samples = solution(&ts).unwrap().means().clone();
    let last_ref: Array1<f64> =
        reference_trajectory(&ts[ts.len() - 1..]).unwrap().row(0).to_owned();
    let inter = timeseries::sample_sample_distance(&samples, 2.0).unwrap();
    let to_ref = timeseries::sample_reference_distance(&samples, &last_ref, 1.0).unwrap();

    // Assert
    assert!((rmse - 1.0).abs() < 1e-12);
    assert!((final_err - 1.0).abs() < 1e-12);
    assert_eq!(inter.len(), 25);
    assert_eq!(to_ref.len(), 25);
    assert!(timeseries::gaussianity_p_value(&samples).unwrap_err().is_not_implemented());
}
