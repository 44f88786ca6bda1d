//! calibration — covariance-aware calibration statistics for Gaussian estimates.
//!
//! Purpose
//! -------
//! Decide whether a probabilistic estimator's reported covariances are
//! credible given a reference solution. The subtree turns `(mean, cov)` pairs
//! and reference values into normalized discrepancies and aggregates them
//! into ANEES, the non-credibility index, and the inclination index.
//!
//! Key behaviors
//! -------------
//! - Compute `rᵀ Σ⁻¹ r` for one point or a batch via
//!   [`normalized_discrepancy`] / [`normalized_discrepancies`], honoring the
//!   active [`InversionConfig`](crate::config::InversionConfig) or an explicit
//!   one through the `_with` variants.
//! - Aggregate with [`anees`], [`nci`], and [`inclination_index`].
//! - Provide χ² acceptance bands through [`chi2_confidence_interval`].
//! - Hold stacked estimates in [`GaussianEstimates`] with shape checks done
//!   once at construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - Residual and reference arrays are `N×d`; covariance stacks `N×d×d`.
//! - Inputs are never mutated; symmetrization and damping act on private
//!   copies.
//! - All failures surface as [`CalibrationError`] through [`CalResult`].
//!
//! Conventions
//! -----------
//! - Rows index evaluation points, columns index state components.
//! - Inversion failures are logged at warn level when `obs_slog` is enabled;
//!   no other numeric routine logs.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; the config grid and the closed-form
//!   inclination cases are in [`measures`].

pub mod chi2;
pub mod discrepancy;
pub mod errors;
pub mod estimates;
pub mod measures;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::chi2::{DEFAULT_PERCENTILE, chi2_confidence_interval};
pub use self::discrepancy::{
    PINV_RCOND, normalized_discrepancies, normalized_discrepancies_with, normalized_discrepancy,
    normalized_discrepancy_with,
};
pub use self::errors::{CalResult, CalibrationError};
pub use self::estimates::GaussianEstimates;
pub use self::measures::{
    anees, anees_with, inclination_index, inclination_index_with, nci, nci_with,
    sample_covariance,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::chi2::chi2_confidence_interval;
    pub use super::errors::{CalResult, CalibrationError};
    pub use super::estimates::GaussianEstimates;
    pub use super::measures::{anees, inclination_index, nci};
}
