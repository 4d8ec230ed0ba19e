//! Error types for the solver core.
//!
//! The core never propagates errors through the recursive search itself (the
//! driver communicates "stop searching" with a plain `bool`, see
//! [`crate::driver`]); `SolverError` only covers the two fatal classes from
//! the design: illegal configuration, discovered before a solve starts, and
//! protocol invariant violations, which are bugs rather than recoverable
//! conditions.

use thiserror::Error;

/// Errors that can prevent a solve from starting or indicate a broken
/// protocol invariant.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SolverError {
    /// A `SolverConfig` combination is statically illegal (see
    /// [`crate::config::SolverConfig::validate`]).
    #[error("invalid solver configuration: {0}")]
    ConfigInvalid(String),

    /// A protocol invariant (mark/edit discipline, symmetry, ...) was
    /// violated. This indicates a bug in the caller or in this crate; it is
    /// not a recoverable runtime condition.
    #[error("solver invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;
