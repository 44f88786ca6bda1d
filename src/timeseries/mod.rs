//! timeseries — evaluation measures for solutions defined over locations.
//!
//! Purpose
//! -------
//! Apply the finite-dimensional error and calibration measures to solutions
//! that are functions of a location (time points of an ODE solver, filter, or
//! smoother). The adapters only evaluate and reshape; all arithmetic lives in
//! `error_measures` and `calibration`.
//!
//! Key behaviors
//! -------------
//! - Solutions implement [`DeterministicSolution`] or
//!   [`ProbabilisticSolution`]; closures do so automatically.
//! - [`PosteriorMean`] lets plain error measures consume a probabilistic
//!   solution.
//! - Error measures: [`rmse`], [`mae`], [`max_error`], their relative
//!   variants, [`mean_error`], and [`final_time_error`].
//! - Calibration: [`anees`], [`non_credibility_index`],
//!   [`inclination_index`], each with an explicit-config `_with` form, and
//!   the declared-only
//!   [`non_credibility_index2`] / [`non_credibility_index3`].
//! - Sample analysis re-exports from `sample_analysis`.
//!
//! Conventions
//! -----------
//! - Both solutions are evaluated at the same `locations`, in order.
//! - All adapters return `CalResult`; error-measure failures arrive as
//!   `CalibrationError::Measure` and evaluation failures as
//!   `CalibrationError::Solution`.

pub mod calibration;
pub mod error_measures;
pub mod solution;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::calibration::{
    DEFAULT_PERCENTILE, anees, anees_with, average_normalised_estimation_error_squared,
    chi2_confidence_interval, chi2_confidence_intervals, inclination_index,
    inclination_index_with, non_credibility_index, non_credibility_index2,
    non_credibility_index3, non_credibility_index_with,
};
pub use self::error_measures::{
    final_time_error, mae, max_error, mean_error, relative_mae, relative_max_error,
    relative_mean_error, relative_rmse, rmse, root_mean_square_error,
};
pub use self::solution::{DeterministicSolution, PosteriorMean, ProbabilisticSolution};
pub use crate::sample_analysis::{
    gaussianity_p_value, sample_reference_distance, sample_sample_distance,
};
