//! error_measures — plain (covariance-free) error reductions.
//!
//! Purpose
//! -------
//! Compare an approximate array with a reference of the same shape using
//! size-normalized Lp norms. These measures ignore any reported uncertainty;
//! see `calibration` for covariance-aware statistics.
//!
//! Key behaviors
//! -------------
//! - [`mean_error`] / [`relative_mean_error`] for any order `1 ≤ p ≤ ∞`.
//! - Named instances [`rmse`], [`mae`], [`max_error`] and their relative
//!   counterparts.
//! - A shared error type [`MeasureError`] / [`MeasureResult`], also used by
//!   `sample_analysis`.
//!
//! Conventions
//! -----------
//! - Relative measures do not guard against zero references; IEEE `±∞` and
//!   `NaN` flow into the result.

pub mod errors;
pub mod norms;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{MeasureError, MeasureResult};
pub use self::norms::{
    mae, max_error, mean_error, relative_mae, relative_max_error, relative_mean_error,
    relative_rmse, rmse,
};

pub mod prelude {
    pub use super::errors::{MeasureError, MeasureResult};
    pub use super::norms::{mae, max_error, mean_error, rmse};
}
