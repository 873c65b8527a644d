//! # zmpoly
//!
//! Sparse multivariate polynomial arithmetic over the integers.
//!
//! zmpoly multiplies and exactly divides polynomials in ℤ[x0, …, x{n-1}]
//! stored as sorted arrays of bit-packed monomials.
//!
//! ## Features
//!
//! - **Packed Monomials**: lex, grlex and grevlex with overflow guard bits
//! - **Word Fast Path**: `i64` coefficients summed in 192-bit accumulators
//! - **Heap Algorithms**: Johnson multiplication and Monagan–Pearce division
//! - **Dense and Array Methods**: chosen automatically for compact operands
//! - **Parallel Multiplication**: heap divisions spread over a worker pool
//!
//! ## Quick Start
//!
//! ```rust
//! use zmpoly::prelude::*;
//!
//! let ctx = PolyContext::new(2, MonomialOrder::Grevlex);
//! let x = Polynomial::var(ctx, 0);
//! let y = Polynomial::var(ctx, 1);
//! let p = x.add(&y).unwrap();
//!
//! let engine = Engine::new();
//! let square = engine.mul(&p, &p).unwrap();
//! assert_eq!(square.to_string(), "x^2 + 2*x*y + y^2");
//! assert_eq!(engine.divides(&square, &p).unwrap(), Some(p));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use zmpoly_integers as integers;
pub use zmpoly_poly as poly;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use zmpoly_integers::{Coeff, Integer};
    pub use zmpoly_poly::{
        Engine, EngineConfig, MonomialOrder, MulStrategy, PolyContext, PolyError, Polynomial,
        WorkerPool,
    };
}
