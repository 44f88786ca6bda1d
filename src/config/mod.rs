//! config — covariance-inversion configuration context.
//!
//! Purpose
//! -------
//! Own the parameters that steer covariance inversion in the calibration
//! engine and the mechanism for changing them: a per-thread active policy,
//! an explicit setter, and RAII scopes that restore the previous policy.
//!
//! Key behaviors
//! -------------
//! - Enumerate inversion routes with [`InversionStrategy`].
//! - Validate and carry `(strategy, symmetrize, damping)` as
//!   [`InversionConfig`].
//! - Read/replace the active policy via [`get_config`], [`set_config`], and
//!   [`install_config`]; override it temporarily via [`scoped_config`],
//!   [`InversionScope`], [`with_config`], or the two-call
//!   [`InversionContext`].
//!
//! Conventions
//! -----------
//! - State is thread-local. Multi-threaded callers either configure each
//!   worker thread or pass an [`InversionConfig`] explicitly to the `_with`
//!   entry points of `calibration`.

pub mod inversion;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::inversion::{
    InversionConfig, InversionContext, InversionScope, InversionStrategy, get_config,
    install_config, scoped_config, set_config, with_config,
};

pub mod prelude {
    pub use super::inversion::{
        InversionConfig, InversionStrategy, get_config, scoped_config, set_config,
    };
}
