//! Errors reported by polynomial operations.

use thiserror::Error;

use crate::context::PolyContext;

/// Errors from polynomial construction, multiplication and division.
///
/// Inexact division is not an error: it is reported as `Ok(None)` or
/// `Ok(false)` by the division entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolyError {
    /// The divisor has no terms.
    #[error("division by the zero polynomial")]
    DivisionByZero,

    /// The operands were built over different contexts.
    #[error("context mismatch: {left} vs {right}")]
    ContextMismatch {
        /// Context of the left operand.
        left: PolyContext,
        /// Context of the right operand.
        right: PolyContext,
    },

    /// An exponent tuple has the wrong number of entries.
    #[error("expected {expected} exponents, found {found}")]
    ArityMismatch {
        /// Number of variables in the context.
        expected: usize,
        /// Number of exponents supplied.
        found: usize,
    },

    /// An exponent or a degree needs more than the widest packed field.
    #[error("exponent needs {bits} bits, more than a packed field can hold")]
    ExponentOverflow {
        /// Field width the value would need, guard bit included.
        bits: u32,
    },

    /// A field width outside the supported range was requested.
    #[error("unsupported exponent field width of {0} bits")]
    InvalidBits(u32),
}

/// Errors from building a [`WorkerPool`](crate::pool::WorkerPool).
#[derive(Error, Debug)]
pub enum PoolError {
    /// rayon could not start the worker threads.
    #[error("failed to build worker pool: {0}")]
    Build(#[from] rayon::ThreadPoolBuildError),
}
