//! config::inversion — covariance-inversion policy and its scoped context.
//!
//! Purpose
//! -------
//! Hold the parameters that control how the discrepancy engine inverts a
//! covariance matrix: the linear-algebra strategy, whether to symmetrize,
//! and how much diagonal damping to add. The active policy lives in
//! thread-local storage and can be replaced outright or overridden for a
//! lexical scope.
//!
//! Key behaviors
//! -------------
//! - [`InversionStrategy`] is a closed enum over `inv`, `pinv`, `solve`, and
//!   `cholesky`, parsed case-insensitively via `FromStr`.
//! - [`InversionConfig`] validates damping at construction and is `Copy`, so
//!   snapshots are plain values.
//! - [`get_config`], [`set_config`], and [`install_config`] read and replace
//!   the active policy of the calling thread.
//! - [`scoped_config`] and [`InversionScope::install`] return an RAII guard
//!   that restores the snapshot taken on entry when dropped, including during
//!   unwinding. [`with_config`] is the closure form, and
//!   [`InversionContext`] splits entry and exit into two calls.
//!
//! Invariants & assumptions
//! ------------------------
//! - `damping` is finite and `>= 0` for every constructed config.
//! - Scopes follow stack discipline: dropping a guard restores exactly the
//!   policy that was active when it was created, whatever happened inside.
//!   A guard dropped while newer guards are still open defers its restore
//!   until they close.
//! - Each thread starts from [`InversionConfig::default`]. Guards are `!Send`
//!   so a scope can never be closed on a thread other than its own.
//!
//! Conventions
//! -----------
//! - Unknown strategy tokens are rejected when parsed, not when the engine
//!   dispatches; an [`InversionStrategy`] value is always valid.
//! - Callers who prefer explicit threading pass an [`InversionConfig`] to the
//!   `_with` variants of the engine and never touch the thread-local state.
//!
//! Testing notes
//! -------------
//! - Unit tests cover defaults, setter round-trips, nested scopes, restoration
//!   after a panic inside a scope, per-thread isolation, and token parsing.

use crate::{
    calibration::errors::{CalResult, CalibrationError},
    obs,
};
use std::{
    cell::{Cell, RefCell},
    fmt,
    marker::PhantomData,
    str::FromStr,
};

/// Linear-algebra route for evaluating `rᵀ Σ⁻¹ r`.
///
/// - `Inv`: explicit inverse, then the bilinear form.
/// - `Pinv`: Moore–Penrose pseudo-inverse; tolerates rank deficiency.
/// - `Solve`: LU solve of `Σ x = r`, then `r · x`.
/// - `Cholesky`: `Σ = L Lᵀ` followed by triangular solves; fails on
///   matrices that are not positive definite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InversionStrategy {
    Inv,
    Pinv,
    Solve,
    #[default]
    Cholesky,
}

impl InversionStrategy {
    pub const ALL: [InversionStrategy; 4] = [
        InversionStrategy::Inv,
        InversionStrategy::Pinv,
        InversionStrategy::Solve,
        InversionStrategy::Cholesky,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InversionStrategy::Inv => "inv",
            InversionStrategy::Pinv => "pinv",
            InversionStrategy::Solve => "solve",
            InversionStrategy::Cholesky => "cholesky",
        }
    }
}

impl fmt::Display for InversionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InversionStrategy {
    type Err = CalibrationError;

    /// Parse a strategy token (case-insensitive, surrounding whitespace ignored).
    ///
    /// Any token other than `inv`, `pinv`, `solve`, `cholesky` returns
    /// `CalibrationError::UnknownStrategy`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inv" => Ok(InversionStrategy::Inv),
            "pinv" => Ok(InversionStrategy::Pinv),
            "solve" => Ok(InversionStrategy::Solve),
            "cholesky" => Ok(InversionStrategy::Cholesky),
            _ => Err(CalibrationError::UnknownStrategy { name: s.to_string() }),
        }
    }
}

/// InversionConfig — how a covariance is prepared and inverted.
///
/// Purpose
/// -------
/// Bundle the three knobs of the discrepancy engine into one validated,
/// copyable value that can be snapshotted and restored.
///
/// Fields
/// ------
/// - `strategy`: [`InversionStrategy`]
///   Linear-algebra route for `Σ⁻¹ r`.
/// - `symmetrize`: `bool`
///   Replace `Σ` by `½(Σ + Σᵀ)` before damping and inversion.
/// - `damping`: `f64`
///   Added to the diagonal when `> 0`. Finite and non-negative.
///
/// Invariants
/// ----------
/// - Constructed only through [`InversionConfig::new`], `Default`, or the
///   `with_*` builders, all of which uphold `damping >= 0` and finiteness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InversionConfig {
    strategy: InversionStrategy,
    symmetrize: bool,
    damping: f64,
}

impl InversionConfig {
    /// Build a validated configuration.
    ///
    /// Errors
    /// ------
    /// - `CalibrationError::InvalidDamping` when `damping` is negative, NaN,
    ///   or infinite.
    pub fn new(strategy: InversionStrategy, symmetrize: bool, damping: f64) -> CalResult<Self> {
        validate_damping(damping)?;
        Ok(InversionConfig { strategy, symmetrize, damping })
    }

    pub fn strategy(&self) -> InversionStrategy {
        self.strategy
    }

    pub fn symmetrize(&self) -> bool {
        self.symmetrize
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn with_strategy(self, strategy: InversionStrategy) -> Self {
        InversionConfig { strategy, ..self }
    }

    pub fn with_symmetrize(self, symmetrize: bool) -> Self {
        InversionConfig { symmetrize, ..self }
    }

    pub fn with_damping(self, damping: f64) -> CalResult<Self> {
        validate_damping(damping)?;
        Ok(InversionConfig { damping, ..self })
    }
}

impl Default for InversionConfig {
    /// Cholesky, symmetrized, undamped.
    fn default() -> Self {
        InversionConfig { strategy: InversionStrategy::Cholesky, symmetrize: true, damping: 0.0 }
    }
}

impl fmt::Display for InversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "strategy={}, symmetrize={}, damping={}",
            self.strategy, self.symmetrize, self.damping
        )
    }
}

thread_local! {
    static ACTIVE: Cell<InversionConfig> = Cell::new(InversionConfig::default());
    static SCOPES: RefCell<Vec<ScopeFrame>> = const { RefCell::new(Vec::new()) };
}

/// One entry of the per-thread scope stack.
#[derive(Debug, Clone, Copy)]
struct ScopeFrame {
    snapshot: InversionConfig,
    open: bool,
}

/// Current effective configuration of the calling thread.
pub fn get_config() -> InversionConfig {
    ACTIVE.with(|cell| cell.get())
}

/// Replace the calling thread's configuration.
///
/// Errors
/// ------
/// - `CalibrationError::InvalidDamping` for negative or non-finite damping;
///   the active configuration is left untouched in that case.
pub fn set_config(strategy: InversionStrategy, symmetrize: bool, damping: f64) -> CalResult<()> {
    let config = InversionConfig::new(strategy, symmetrize, damping)?;
    install_config(config);
    Ok(())
}

/// Install an already-validated configuration and return the one it replaced.
pub fn install_config(config: InversionConfig) -> InversionConfig {
    let previous = ACTIVE.with(|cell| cell.replace(config));
    obs::config_installed(&config, &previous);
    previous
}

/// Override the strategy (and optionally symmetrize/damping) until the
/// returned guard is dropped.
///
/// `None` for `symmetrize` or `damping` keeps the currently active value.
///
/// Errors
/// ------
/// - `CalibrationError::InvalidDamping` when a supplied damping is invalid;
///   nothing is installed in that case.
///
/// Examples
/// --------
/// ```rust
/// # use rust_probeval::config::{InversionStrategy, get_config, scoped_config};
/// let before = get_config();
/// {
///     let _scope = scoped_config(InversionStrategy::Pinv, Some(false), Some(10.0))?;
///     assert_eq!(get_config().strategy(), InversionStrategy::Pinv);
/// }
/// assert_eq!(get_config(), before);
/// # Ok::<(), rust_probeval::calibration::CalibrationError>(())
/// ```
pub fn scoped_config(
    strategy: InversionStrategy, symmetrize: Option<bool>, damping: Option<f64>,
) -> CalResult<InversionScope> {
    let current = get_config();
    let config = InversionConfig::new(
        strategy,
        symmetrize.unwrap_or(current.symmetrize),
        damping.unwrap_or(current.damping),
    )?;
    Ok(InversionScope::install(config))
}

/// Run `f` with `config` active and restore the previous configuration
/// afterwards, whether `f` returns or panics.
pub fn with_config<R>(config: InversionConfig, f: impl FnOnce() -> R) -> R {
    let _scope = InversionScope::install(config);
    f()
}

/// InversionScope — RAII guard for a temporary configuration override.
///
/// The snapshot taken on entry is written back on drop. Guards are tied to
/// the thread that created them.
///
/// Guards dropped out of creation order do not reinstate stale values: a
/// guard closed while a newer one is still open only marks its frame, and
/// the configuration is restored once every newer guard has closed. At
/// that point the oldest closed frame's snapshot wins, so closing all
/// scopes always returns to the policy active before the first of them.
#[must_use = "the override is reverted as soon as the scope guard is dropped"]
#[derive(Debug)]
pub struct InversionScope {
    snapshot: InversionConfig,
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl InversionScope {
    pub fn install(config: InversionConfig) -> Self {
        let snapshot = ACTIVE.with(|cell| cell.replace(config));
        let depth = SCOPES.with(|frames| {
            let mut frames = frames.borrow_mut();
            frames.push(ScopeFrame { snapshot, open: true });
            frames.len() - 1
        });
        obs::scope_entered(&config, &snapshot);
        InversionScope { snapshot, depth, _not_send: PhantomData }
    }

    /// Configuration that will be restored when this guard is dropped.
    pub fn snapshot(&self) -> InversionConfig {
        self.snapshot
    }
}

impl Drop for InversionScope {
    fn drop(&mut self) {
        let restored = SCOPES.with(|frames| {
            let mut frames = frames.borrow_mut();
            if let Some(frame) = frames.get_mut(self.depth) {
                frame.open = false;
            }
            let mut restored = None;
            while frames.last().is_some_and(|frame| !frame.open) {
                restored = frames.pop().map(|frame| frame.snapshot);
            }
            restored
        });
        if let Some(snapshot) = restored {
            ACTIVE.with(|cell| cell.set(snapshot));
            obs::scope_exited(&snapshot);
        }
    }
}

/// InversionContext — an override whose entry and exit are separate calls.
///
/// Purpose
/// -------
/// Back context managers in host languages, where `enter` and `exit` arrive
/// as two calls instead of a lexical scope. Fields left as `None` take the
/// value active at [`InversionContext::enter`] time.
///
/// Invariants
/// ----------
/// - At most one scope is held; entering twice without exiting fails with
///   `CalibrationError::ContextAlreadyActive` and leaves the state as is.
/// - Dropping an entered context restores like exiting it.
#[derive(Debug)]
pub struct InversionContext {
    strategy: Option<InversionStrategy>,
    symmetrize: Option<bool>,
    damping: Option<f64>,
    scope: Option<InversionScope>,
}

impl InversionContext {
    /// Errors
    /// ------
    /// - `CalibrationError::InvalidDamping` for a negative or non-finite
    ///   damping, reported here rather than on entry.
    pub fn new(
        strategy: Option<InversionStrategy>, symmetrize: Option<bool>, damping: Option<f64>,
    ) -> CalResult<Self> {
        if let Some(damping) = damping {
            validate_damping(damping)?;
        }
        Ok(InversionContext { strategy, symmetrize, damping, scope: None })
    }

    /// Install the override and return the configuration now active.
    pub fn enter(&mut self) -> CalResult<InversionConfig> {
        if self.scope.is_some() {
            return Err(CalibrationError::ContextAlreadyActive);
        }
        let current = get_config();
        let config = InversionConfig::new(
            self.strategy.unwrap_or(current.strategy),
            self.symmetrize.unwrap_or(current.symmetrize),
            self.damping.unwrap_or(current.damping),
        )?;
        self.scope = Some(InversionScope::install(config));
        Ok(config)
    }

    /// Restore the configuration captured by [`enter`](Self::enter).
    ///
    /// Returns `false` when the context was not active.
    pub fn exit(&mut self) -> bool {
        self.scope.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.scope.is_some()
    }
}

fn validate_damping(damping: f64) -> CalResult<()> {
    if !damping.is_finite() || damping < 0.0 {
        return Err(CalibrationError::InvalidDamping { damping });
    }
    Ok(())
}
