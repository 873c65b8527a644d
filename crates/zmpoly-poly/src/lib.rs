//! # zmpoly-poly
//!
//! Sparse multivariate polynomial multiplication and exact division over ℤ.
//!
//! This crate provides:
//! - Bit-packed monomials under lex, grlex and grevlex orderings
//! - A canonical sparse [`Polynomial`] type
//! - Heap-based multiplication and exact division with a word-sized
//!   coefficient fast path
//! - Dense, array and multi-threaded heap multiplication
//!
//! ## Algorithm Selection
//!
//! [`Engine`] chooses the multiplication method per call:
//! - Single-term operand: monomial scaling
//! - Univariate, compact degree span: dense Karatsuba
//! - Compact exponent box, word-sized coefficients: chunked arrays
//! - Otherwise: heap, split across a [`WorkerPool`] when one is attached

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod algorithms;
pub mod bits;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod monomial;
pub mod ordering;
pub mod polynomial;
pub mod pool;
pub mod terms;

#[cfg(test)]
mod proptests;

pub use config::EngineConfig;
pub use context::PolyContext;
pub use engine::{Engine, MulStrategy};
pub use error::{PolyError, PoolError};
pub use monomial::MonomialLayout;
pub use ordering::MonomialOrder;
pub use polynomial::Polynomial;
pub use pool::{ThreadGrant, WorkerPool};
pub use terms::TermVec;
