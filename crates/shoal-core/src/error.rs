//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `ShoalError` via `From` impls, or keep them separate and wrap `ShoalError`
//! as one variant.  Both patterns are acceptable; prefer whichever keeps
//! error sites clean.
//!
//! Note the deliberate asymmetry with the per-step pipeline: errors exist
//! only at construction time.  Once a simulation is built, every per-step
//! computation is total — degenerate geometry clamps to safe minimums and
//! sampling caps truncate deterministically instead of failing.

use thiserror::Error;

/// The top-level error type for `shoal-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum ShoalError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match expected {expected}")]
    CountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("behaviour type count {0} exceeds bitmask capacity {1}")]
    TooManyTypes(usize, usize),
}

/// Shorthand result type for all `shoal-*` crates.
pub type ShoalResult<T> = Result<T, ShoalError>;
