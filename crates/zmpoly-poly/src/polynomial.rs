//! Sparse multivariate polynomials over the integers.
//!
//! A [`Polynomial`] stores its terms in a [`TermVec`], packed under a
//! [`MonomialLayout`] and kept in canonical form: strictly decreasing
//! monomials, no zero coefficients. The field width is chosen from the
//! exponents on construction and widened by operations that need it.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use num_traits::{One, Zero};
use zmpoly_integers::Coeff;

use crate::algorithms::term_ops::{merge_sorted, mul_by_term};
use crate::bits::{self, bits_for, bits_for_maxima, fix_bits, product_bits};
use crate::context::PolyContext;
use crate::engine::Engine;
use crate::error::PolyError;
use crate::monomial::{monomial_overflows, MonomialLayout, WordMask};
use crate::ordering::MonomialOrder;
use crate::terms::TermVec;

/// A sparse polynomial in ℤ[x0, …, x{n-1}].
#[derive(Clone, Debug)]
pub struct Polynomial {
    layout: MonomialLayout,
    terms: TermVec,
}

impl Polynomial {
    /// Creates the zero polynomial.
    #[must_use]
    pub fn zero(ctx: PolyContext) -> Self {
        let layout = MonomialLayout::minimal(ctx);
        let terms = TermVec::new(layout.words());
        Self { layout, terms }
    }

    /// Creates the constant polynomial 1.
    #[must_use]
    pub fn one(ctx: PolyContext) -> Self {
        Self::constant(ctx, 1)
    }

    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(ctx: PolyContext, c: impl Into<Coeff>) -> Self {
        let c = c.into();
        let mut poly = Self::zero(ctx);
        if !c.is_zero() {
            let unit = vec![0u64; poly.layout.words()];
            poly.terms.push(c, &unit);
        }
        poly
    }

    /// Creates the variable `x{k}`.
    ///
    /// # Panics
    ///
    /// Panics if `k` is not a variable of `ctx`.
    #[must_use]
    pub fn var(ctx: PolyContext, k: usize) -> Self {
        assert!(k < ctx.nvars(), "variable index {k} out of range");
        let order = ctx.order();
        let offset = usize::from(order.is_graded());
        let slot = if order.is_reversed() { ctx.nvars() - 1 - k } else { k };
        let mut fields: WordMask = smallvec::smallvec![0; ctx.nfields()];
        fields[offset + slot] = 1;
        if order.is_graded() {
            fields[0] = 1;
        }

        let layout = MonomialLayout::minimal(ctx);
        let mut packed = vec![0u64; layout.words()];
        layout.pack_fields(&fields, &mut packed);
        let mut terms = TermVec::new(layout.words());
        terms.push(Coeff::one(), &packed);
        Self { layout, terms }
    }

    /// Creates the single term `c * x^exps`.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::ArityMismatch`] for a tuple of the wrong length
    /// and [`PolyError::ExponentOverflow`] for unrepresentable exponents.
    pub fn term(ctx: PolyContext, c: impl Into<Coeff>, exps: &[u64]) -> Result<Self, PolyError> {
        Self::from_terms(ctx, [(c.into(), exps)])
    }

    /// Builds a polynomial from `(coefficient, exponents)` pairs in any
    /// order, combining like terms and dropping zeros.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::ArityMismatch`] if an exponent tuple has the
    /// wrong length and [`PolyError::ExponentOverflow`] if an exponent (or a
    /// total degree, for graded orderings) needs more than 63 bits.
    pub fn from_terms<I, C, E>(ctx: PolyContext, terms: I) -> Result<Self, PolyError>
    where
        I: IntoIterator<Item = (C, E)>,
        C: Into<Coeff>,
        E: AsRef<[u64]>,
    {
        let minimal = MonomialLayout::minimal(ctx);
        let mut rows: Vec<(WordMask, Coeff)> = Vec::new();
        let mut max = 0u64;
        for (c, exps) in terms {
            let c = c.into();
            let fields = minimal.exponents_to_fields(exps.as_ref())?;
            if c.is_zero() {
                continue;
            }
            max = fields.iter().copied().fold(max, u64::max);
            rows.push((fields, c));
        }

        let layout = MonomialLayout::new(ctx, fix_bits(bits_for(max))?)?;
        let words = layout.words();
        let mut packed: Vec<(WordMask, Coeff)> = rows
            .into_iter()
            .map(|(fields, c)| {
                let mut word: WordMask = smallvec::smallvec![0; words];
                layout.pack_fields(&fields, &mut word);
                (word, c)
            })
            .collect();
        packed.sort_by(|(x, _), (y, _)| layout.compare(y, x));

        let mut out = TermVec::with_capacity(words, packed.len());
        let mut iter = packed.into_iter().peekable();
        while let Some((exp, mut sum)) = iter.next() {
            while let Some((_, c)) = iter.next_if(|(next, _)| *next == exp) {
                sum = &sum + &c;
            }
            if !sum.is_zero() {
                out.push(sum, &exp);
            }
        }

        Ok(Self { layout, terms: out })
    }

    /// Wraps canonical terms packed under `layout`.
    pub(crate) fn from_raw(layout: MonomialLayout, terms: TermVec) -> Self {
        debug_assert_eq!(layout.words(), terms.words());
        let poly = Self { layout, terms };
        debug_assert!(poly.is_canonical());
        poly
    }

    /// Exchanges two polynomials in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Returns the packing layout.
    #[must_use]
    pub fn layout(&self) -> &MonomialLayout {
        &self.layout
    }

    /// Returns the packed terms.
    #[must_use]
    pub fn term_vec(&self) -> &TermVec {
        &self.terms
    }

    /// Returns the context.
    #[must_use]
    pub fn context(&self) -> PolyContext {
        self.layout.context()
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn nvars(&self) -> usize {
        self.context().nvars()
    }

    /// Returns the monomial ordering.
    #[must_use]
    pub fn order(&self) -> MonomialOrder {
        self.context().order()
    }

    /// Returns the exponent field width.
    #[must_use]
    pub fn bits(&self) -> u32 {
        self.layout.bits()
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the coefficient of term `i`.
    #[must_use]
    pub fn coeff(&self, i: usize) -> &Coeff {
        self.terms.coeff(i)
    }

    /// Returns the exponent tuple of term `i`.
    #[must_use]
    pub fn exponents(&self, i: usize) -> Vec<u64> {
        self.layout.unpack(self.terms.exp(i))
    }

    /// Iterates over `(coefficient, exponents)` in decreasing monomial order.
    pub fn terms(&self) -> impl Iterator<Item = (&Coeff, Vec<u64>)> + '_ {
        self.terms
            .iter()
            .map(|(c, packed)| (c, self.layout.unpack(packed)))
    }

    /// Returns the leading coefficient.
    #[must_use]
    pub fn leading_coeff(&self) -> Option<&Coeff> {
        self.terms.coeffs().first()
    }

    /// Returns the exponents of the leading monomial.
    #[must_use]
    pub fn leading_exponents(&self) -> Option<Vec<u64>> {
        (!self.is_zero()).then(|| self.exponents(0))
    }

    /// Computes the total degree; 0 for the zero polynomial.
    #[must_use]
    pub fn total_degree(&self) -> u64 {
        if self.is_zero() {
            return 0;
        }
        if self.order().is_graded() {
            return self.layout.field(self.terms.exp(0), 0);
        }
        self.terms
            .iter()
            .map(|(_, packed)| self.layout.total_degree(packed))
            .max()
            .unwrap_or(0)
    }

    /// Returns the largest exponent of every variable.
    #[must_use]
    pub fn degrees(&self) -> Vec<u64> {
        let maxima = self.field_maxima();
        let offset = usize::from(self.order().is_graded());
        let mut degrees = maxima[offset..].to_vec();
        if self.order().is_reversed() {
            degrees.reverse();
        }
        degrees
    }

    /// Returns the per-field maxima of the packed exponents.
    #[must_use]
    pub fn field_maxima(&self) -> WordMask {
        bits::field_maxima(&self.layout, self.terms.exps())
    }

    /// Checks the canonical-form invariant: strictly decreasing monomials,
    /// nonzero coefficients and clear guard bits.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        let mask = self.layout.overflow_mask();
        let sorted = (1..self.len()).all(|i| {
            self.layout.compare(self.terms.exp(i - 1), self.terms.exp(i)) == Ordering::Greater
        });
        sorted
            && self.terms.coeffs().iter().all(|c| !c.is_zero())
            && self.terms.iter().all(|(_, e)| !monomial_overflows(e, mask))
    }

    /// Re-encodes the exponents with `bits` bits per field.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::InvalidBits`] for an unsupported width and
    /// [`PolyError::ExponentOverflow`] if some exponent does not fit.
    pub fn repack(&self, bits: u32) -> Result<Self, PolyError> {
        let layout = MonomialLayout::new(self.context(), bits)?;
        let needed = bits_for_maxima(&self.field_maxima());
        if needed > bits {
            return Err(PolyError::ExponentOverflow { bits: needed });
        }
        Ok(Self {
            terms: self.terms_at(&layout).into_owned(),
            layout,
        })
    }

    /// Returns the terms packed under `layout`, which must be wide enough
    /// for every exponent.
    pub(crate) fn terms_at(&self, layout: &MonomialLayout) -> Cow<'_, TermVec> {
        if layout.bits() == self.layout.bits() {
            return Cow::Borrowed(&self.terms);
        }
        let exps = bits::repack(self.terms.exps(), &self.layout, layout);
        Cow::Owned(TermVec::from_parts(
            self.terms.coeffs().to_vec(),
            exps,
            layout.words(),
        ))
    }

    /// Returns an error unless both operands share a context.
    pub(crate) fn check_context(&self, other: &Self) -> Result<(), PolyError> {
        if self.context() == other.context() {
            Ok(())
        } else {
            Err(PolyError::ContextMismatch {
                left: self.context(),
                right: other.context(),
            })
        }
    }

    fn common_layout(&self, other: &Self) -> MonomialLayout {
        if self.bits() >= other.bits() {
            self.layout.clone()
        } else {
            other.layout.clone()
        }
    }

    fn combine(&self, other: &Self, negate: bool) -> Result<Self, PolyError> {
        self.check_context(other)?;
        let layout = self.common_layout(other);
        let a = self.terms_at(&layout);
        let b = other.terms_at(&layout);
        let terms = merge_sorted(&a, &b, &layout, negate);
        Ok(Self { layout, terms })
    }

    /// Adds two polynomials.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::ContextMismatch`] for operands of different
    /// contexts.
    pub fn add(&self, other: &Self) -> Result<Self, PolyError> {
        self.combine(other, false)
    }

    /// Subtracts two polynomials.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::ContextMismatch`] for operands of different
    /// contexts.
    pub fn sub(&self, other: &Self) -> Result<Self, PolyError> {
        self.combine(other, true)
    }

    /// Negates a polynomial.
    #[must_use]
    pub fn neg(&self) -> Self {
        let mut out = self.clone();
        for c in out.terms.coeffs_mut() {
            *c = -&*c;
        }
        out
    }

    /// Multiplies by a scalar.
    #[must_use]
    pub fn scale(&self, c: &Coeff) -> Self {
        if c.is_zero() {
            return Self::zero(self.context());
        }
        let mut out = self.clone();
        for x in out.terms.coeffs_mut() {
            *x = &*x * c;
        }
        out
    }

    /// Multiplies by the term `c * x^exps`.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::ArityMismatch`] for a tuple of the wrong length
    /// and [`PolyError::ExponentOverflow`] if the shifted exponents cannot be
    /// packed.
    pub fn mul_term(&self, c: &Coeff, exps: &[u64]) -> Result<Self, PolyError> {
        let monomial = Self::term(self.context(), c.clone(), exps)?;
        if self.is_zero() || monomial.is_zero() {
            return Ok(Self::zero(self.context()));
        }
        let bits = product_bits(&self.field_maxima(), &monomial.field_maxima())?;
        let layout = MonomialLayout::new(self.context(), bits.max(self.bits()))?;
        let shift = monomial.terms_at(&layout);
        let terms = mul_by_term(&self.terms_at(&layout), c, shift.exp(0), &layout);
        Ok(Self { layout, terms })
    }

    /// Multiplies two polynomials with a single-threaded [`Engine`].
    ///
    /// # Errors
    ///
    /// See [`Engine::mul`].
    pub fn mul(&self, other: &Self) -> Result<Self, PolyError> {
        Engine::new().mul(self, other)
    }

    /// Divides exactly, returning `None` if `other` does not divide `self`.
    ///
    /// # Errors
    ///
    /// See [`Engine::divides`].
    pub fn divides(&self, other: &Self) -> Result<Option<Self>, PolyError> {
        Engine::new().divides(self, other)
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        if self.context() != other.context() || self.len() != other.len() {
            return false;
        }
        if self.bits() == other.bits() {
            return self.terms == other.terms;
        }
        let nfields = self.layout.nfields();
        self.terms.coeffs() == other.terms.coeffs()
            && (0..self.len()).all(|i| {
                let (a, b) = (self.terms.exp(i), other.terms.exp(i));
                (0..nfields).all(|f| self.layout.field(a, f) == other.layout.field(b, f))
            })
    }
}

impl Eq for Polynomial {}

fn var_name(i: usize) -> String {
    const VARS: [char; 6] = ['x', 'y', 'z', 'w', 'u', 'v'];
    VARS.get(i).map_or_else(|| format!("x{i}"), char::to_string)
}

fn monomial_string(exps: &[u64]) -> String {
    let parts: Vec<String> = exps
        .iter()
        .enumerate()
        .filter(|&(_, &e)| e > 0)
        .map(|(i, &e)| {
            if e == 1 {
                var_name(i)
            } else {
                format!("{}^{e}", var_name(i))
            }
        })
        .collect();
    parts.join("*")
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        for (k, (c, exps)) in self.terms().enumerate() {
            let negative = c.signum() < 0;
            match (k, negative) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }

            let magnitude = if negative { -c } else { c.clone() };
            let mon = monomial_string(&exps);
            if mon.is_empty() {
                write!(f, "{magnitude}")?;
            } else if magnitude.is_one() {
                write!(f, "{mon}")?;
            } else {
                write!(f, "{magnitude}*{mon}")?;
            }
        }
        Ok(())
    }
}
