//! Monomial orderings for polynomial operations.
//!
//! The ordering decides both the canonical term order of a polynomial and
//! the packed layout of its exponent vectors (see [`crate::monomial`]).

use std::fmt;

/// A monomial ordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum MonomialOrder {
    /// Lexicographic order.
    ///
    /// x > y > z means x^a y^b z^c > x^d y^e z^f iff
    /// the first nonzero difference (a-d, b-e, c-f) is positive.
    #[default]
    Lex,

    /// Graded lexicographic order.
    ///
    /// First compares total degree, then uses lex as tiebreaker.
    Grlex,

    /// Graded reverse lexicographic order.
    ///
    /// First compares total degree, then the last variable with the
    /// comparison reversed, then the one before it, and so on.
    Grevlex,
}

impl MonomialOrder {
    /// Returns true if the ordering compares total degree first.
    ///
    /// Graded orderings carry an extra leading degree field in the packed
    /// exponent vector.
    #[must_use]
    pub const fn is_graded(&self) -> bool {
        matches!(self, MonomialOrder::Grlex | MonomialOrder::Grevlex)
    }

    /// Returns true if variable fields compare in reverse.
    #[must_use]
    pub const fn is_reversed(&self) -> bool {
        matches!(self, MonomialOrder::Grevlex)
    }

    /// Returns a short name for the ordering.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            MonomialOrder::Lex => "lex",
            MonomialOrder::Grlex => "grlex",
            MonomialOrder::Grevlex => "grevlex",
        }
    }
}

impl fmt::Display for MonomialOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graded_flags() {
        assert!(!MonomialOrder::Lex.is_graded());
        assert!(MonomialOrder::Grlex.is_graded());
        assert!(MonomialOrder::Grevlex.is_graded());
        assert!(MonomialOrder::Grevlex.is_reversed());
        assert!(!MonomialOrder::Grlex.is_reversed());
    }

    #[test]
    fn test_names() {
        assert_eq!(MonomialOrder::Lex.to_string(), "lex");
        assert_eq!(MonomialOrder::Grevlex.to_string(), "grevlex");
    }
}
