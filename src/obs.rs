//! obs — optional structured logging hooks.
//!
//! With the `obs_slog` feature, events are written to a terminal drain behind
//! an asynchronous (non-blocking) slog pipeline, built lazily on first use.
//! Without the feature every hook compiles to nothing, so numeric code can
//! call them unconditionally.

use crate::{calibration::errors::CalibrationError, config::InversionConfig};

#[cfg(feature = "obs_slog")]
mod sink {
    use slog::{Drain, Logger, o};
    use std::sync::OnceLock;

    pub(super) fn logger() -> &'static Logger {
        static LOGGER: OnceLock<Logger> = OnceLock::new();
        LOGGER.get_or_init(|| {
            let decorator = slog_term::TermDecorator::new().stderr().build();
            let drain = slog_term::FullFormat::new(decorator).build().fuse();
            let drain = slog_async::Async::new(drain).build().fuse();
            Logger::root(drain, o!("crate" => "rust_probeval"))
        })
    }
}

#[cfg(feature = "obs_slog")]
pub(crate) fn config_installed(config: &InversionConfig, previous: &InversionConfig) {
    slog::debug!(sink::logger(), "inversion config installed";
        "config" => %config, "previous" => %previous);
}

#[cfg(feature = "obs_slog")]
pub(crate) fn scope_entered(config: &InversionConfig, snapshot: &InversionConfig) {
    slog::debug!(sink::logger(), "inversion scope entered";
        "config" => %config, "snapshot" => %snapshot);
}

#[cfg(feature = "obs_slog")]
pub(crate) fn scope_exited(restored: &InversionConfig) {
    slog::debug!(sink::logger(), "inversion scope exited"; "restored" => %restored);
}

#[cfg(feature = "obs_slog")]
pub(crate) fn inversion_failed(config: &InversionConfig, err: &CalibrationError) {
    slog::warn!(sink::logger(), "covariance inversion failed";
        "config" => %config, "error" => %err);
}

#[cfg(not(feature = "obs_slog"))]
#[inline(always)]
pub(crate) fn config_installed(_config: &InversionConfig, _previous: &InversionConfig) {}

#[cfg(not(feature = "obs_slog"))]
#[inline(always)]
pub(crate) fn scope_entered(_config: &InversionConfig, _snapshot: &InversionConfig) {}

#[cfg(not(feature = "obs_slog"))]
#[inline(always)]
pub(crate) fn scope_exited(_restored: &InversionConfig) {}

#[cfg(not(feature = "obs_slog"))]
#[inline(always)]
pub(crate) fn inversion_failed(_config: &InversionConfig, _err: &CalibrationError) {}
