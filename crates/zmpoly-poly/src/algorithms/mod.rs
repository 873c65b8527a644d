//! Polynomial algorithms.
//!
//! This module contains the multiplication and division kernels behind
//! [`Engine`](crate::engine::Engine):
//! - Chained monomial heap
//! - Johnson heap multiplication, single- and multi-threaded
//! - Monagan–Pearce exact division
//! - Chunked array multiplication
//! - Karatsuba multiplication for dense univariate products
//! - Linear-time term merging and monomial scaling

pub(crate) mod div_heap;
pub(crate) mod div_threaded;
pub(crate) mod heap;
pub mod karatsuba;
pub(crate) mod mul_array;
pub(crate) mod mul_dense;
pub(crate) mod mul_heap;
pub(crate) mod mul_threaded;
pub(crate) mod term_ops;
