//! Term-vector storage.
//!
//! A [`TermVec`] holds the terms of a polynomial as two parallel arrays: the
//! coefficients and the packed exponent words (`words` per term). Algorithms
//! append terms in canonical order; the vector itself does not sort.

use zmpoly_integers::Coeff;

/// Growable parallel arrays of coefficients and packed exponents.
///
/// Invariant: `exps.len() == coeffs.len() * words`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TermVec {
    coeffs: Vec<Coeff>,
    exps: Vec<u64>,
    words: usize,
}

impl TermVec {
    /// Creates an empty vector for monomials of `words` words.
    #[must_use]
    pub fn new(words: usize) -> Self {
        Self {
            coeffs: Vec::new(),
            exps: Vec::new(),
            words,
        }
    }

    /// Creates an empty vector with room for `len` terms.
    #[must_use]
    pub fn with_capacity(words: usize, len: usize) -> Self {
        Self {
            coeffs: Vec::with_capacity(len),
            exps: Vec::with_capacity(len * words),
            words,
        }
    }

    /// Assembles a vector from parallel arrays.
    ///
    /// # Panics
    ///
    /// Panics if the arrays disagree in length.
    #[must_use]
    pub fn from_parts(coeffs: Vec<Coeff>, exps: Vec<u64>, words: usize) -> Self {
        assert_eq!(exps.len(), coeffs.len() * words, "term arrays disagree");
        Self { coeffs, exps, words }
    }

    /// Splits into parallel arrays.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Coeff>, Vec<u64>) {
        (self.coeffs, self.exps)
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Returns the number of words per monomial.
    #[must_use]
    pub fn words(&self) -> usize {
        self.words
    }

    /// Returns the number of terms the vector can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.coeffs.capacity()
    }

    /// Ensures room for at least `len` terms. Never shrinks.
    ///
    /// Growth is amortized: the capacity at least doubles.
    pub fn fit_length(&mut self, len: usize) {
        let cap = self.coeffs.capacity();
        if len > cap {
            let target = len.max(2 * cap);
            self.coeffs.reserve(target - self.coeffs.len());
            self.exps.reserve(target * self.words - self.exps.len());
        }
    }

    /// Truncates to `len` terms, releasing the dropped coefficients.
    ///
    /// Lengths beyond the current length are ignored.
    pub fn set_length(&mut self, len: usize) {
        if len < self.coeffs.len() {
            self.coeffs.truncate(len);
            self.exps.truncate(len * self.words);
        }
    }

    /// Exchanges the contents of two vectors in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Appends a term.
    #[inline]
    pub fn push(&mut self, coeff: Coeff, exp: &[u64]) {
        debug_assert_eq!(exp.len(), self.words);
        if self.coeffs.len() == self.coeffs.capacity() {
            self.fit_length(self.coeffs.len() + 1);
        }
        self.coeffs.push(coeff);
        self.exps.extend_from_slice(exp);
    }

    /// Appends every term of `other`, consuming it.
    pub fn append(&mut self, other: Self) {
        debug_assert_eq!(other.words, self.words);
        self.fit_length(self.len() + other.len());
        self.coeffs.extend(other.coeffs);
        self.exps.extend(other.exps);
    }

    /// Returns the coefficient of term `i`.
    #[inline]
    #[must_use]
    pub fn coeff(&self, i: usize) -> &Coeff {
        &self.coeffs[i]
    }

    /// Returns the packed monomial of term `i`.
    #[inline]
    #[must_use]
    pub fn exp(&self, i: usize) -> &[u64] {
        &self.exps[i * self.words..(i + 1) * self.words]
    }

    /// Returns all coefficients.
    #[must_use]
    pub fn coeffs(&self) -> &[Coeff] {
        &self.coeffs
    }

    /// Returns all coefficients mutably.
    pub fn coeffs_mut(&mut self) -> &mut [Coeff] {
        &mut self.coeffs
    }

    /// Returns the flat exponent array.
    #[must_use]
    pub fn exps(&self) -> &[u64] {
        &self.exps
    }

    /// Iterates over `(coefficient, packed monomial)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Coeff, &[u64])> + '_ {
        self.coeffs.iter().zip(self.exps.chunks_exact(self.words.max(1)))
    }
}
