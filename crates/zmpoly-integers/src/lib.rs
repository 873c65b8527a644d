//! # zmpoly-integers
//!
//! Integer coefficient arithmetic for the zmpoly polynomial engine.
//!
//! This crate wraps `dashu` to provide:
//! - Arbitrary precision integers (`Integer`)
//! - Coefficients with an inline small-integer fast path (`Coeff`)
//! - Three-word product-sum accumulators (`WideAccumulator`, `BigAccumulator`)
//!
//! ## Performance Notes
//!
//! - Coefficients in the `i64` range never touch the heap
//! - Sums of `i64` products are accumulated in 192 bits without allocating

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod accumulator;
pub mod coeff;
pub mod integer;

#[cfg(test)]
mod proptests;

pub use accumulator::{Accumulator, BigAccumulator, WideAccumulator};
pub use coeff::Coeff;
pub use integer::Integer;
