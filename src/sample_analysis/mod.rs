//! sample_analysis — summaries of sample clouds drawn from a probabilistic solution.
//!
//! Key behaviors
//! -------------
//! - [`sample_sample_distance`] and [`sample_reference_distance`] return one
//!   dimension-normalized distance per sample.
//! - [`gaussianity_p_value`] is part of the public surface but always fails
//!   with `MeasureError::NotImplemented`.
//!
//! Errors use the `error_measures` taxonomy ([`MeasureError`]).

pub mod distances;

pub use self::distances::{
    DEFAULT_DISTANCE_ORDER, gaussianity_p_value, sample_reference_distance,
    sample_sample_distance,
};
pub use crate::error_measures::errors::{MeasureError, MeasureResult};
