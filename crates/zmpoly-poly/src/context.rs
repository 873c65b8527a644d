//! Polynomial ring contexts.

use std::fmt;

use crate::ordering::MonomialOrder;

/// The ring ℤ[x0, …, x{n-1}] under a fixed monomial ordering.
///
/// Every polynomial carries its context; operations on polynomials from
/// different contexts are rejected.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PolyContext {
    nvars: usize,
    order: MonomialOrder,
}

impl PolyContext {
    /// Creates a context with `nvars` variables.
    #[must_use]
    pub const fn new(nvars: usize, order: MonomialOrder) -> Self {
        Self { nvars, order }
    }

    /// Returns the number of variables.
    #[must_use]
    pub const fn nvars(&self) -> usize {
        self.nvars
    }

    /// Returns the monomial ordering.
    #[must_use]
    pub const fn order(&self) -> MonomialOrder {
        self.order
    }

    /// Returns the number of packed fields: one per variable, plus the
    /// degree field for graded orderings.
    #[must_use]
    pub const fn nfields(&self) -> usize {
        if self.order.is_graded() {
            self.nvars + 1
        } else {
            self.nvars
        }
    }
}

impl fmt::Display for PolyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vars, {}", self.nvars, self.order)
    }
}
