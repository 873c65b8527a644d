//! Bit-packed monomials for multivariate polynomial arithmetic.
//!
//! An exponent vector is stored as a sequence of *fields* of `bits` bits
//! each, packed into `N` machine words with word 0 most significant. Fields
//! never straddle a word. The field sequence depends on the ordering:
//!
//! - lex: `x0, x1, …, x{n-1}`
//! - grlex: `deg, x0, …, x{n-1}`
//! - grevlex: `deg, x{n-1}, …, x0`, with the variable fields inverted by the
//!   comparison mask
//!
//! so that comparing `word ^ cmpmask` word by word gives the monomial order.
//!
//! The top bit of every field is a guard bit. Valid monomials keep it clear,
//! which makes exponent addition a plain word addition: any field that
//! overflows sets its own guard bit instead of carrying into its neighbour.

use smallvec::SmallVec;
use std::cmp::Ordering;

use crate::context::PolyContext;
use crate::error::PolyError;

/// Smallest supported field width.
pub const MIN_BITS: u32 = 8;

/// Widest supported field width.
pub const MAX_BITS: u32 = u64::BITS;

/// Per-word masks; most contexts need at most a few words.
pub type WordMask = SmallVec<[u64; 4]>;

/// Packing layout of the exponent vectors of one context at one field width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonomialLayout {
    ctx: PolyContext,
    bits: u32,
    fields_per_word: usize,
    words: usize,
    cmpmask: WordMask,
    overflow: WordMask,
}

impl MonomialLayout {
    /// Creates the layout for `ctx` with `bits` bits per field.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::InvalidBits`] if `bits` is outside
    /// `MIN_BITS..=MAX_BITS`.
    pub fn new(ctx: PolyContext, bits: u32) -> Result<Self, PolyError> {
        if !(MIN_BITS..=MAX_BITS).contains(&bits) {
            return Err(PolyError::InvalidBits(bits));
        }
        Ok(Self::build(ctx, bits))
    }

    /// Creates the narrowest layout for `ctx`.
    #[must_use]
    pub fn minimal(ctx: PolyContext) -> Self {
        Self::build(ctx, MIN_BITS)
    }

    fn build(ctx: PolyContext, bits: u32) -> Self {
        let fields_per_word = (u64::BITS / bits) as usize;
        let words = ctx.nfields().div_ceil(fields_per_word).max(1);

        let mut layout = Self {
            ctx,
            bits,
            fields_per_word,
            words,
            cmpmask: smallvec::smallvec![0; words],
            overflow: smallvec::smallvec![0; words],
        };

        let field_mask = layout.field_mask();
        let first_var_field = usize::from(ctx.order().is_graded());
        for f in 0..ctx.nfields() {
            let (w, shift) = layout.position(f);
            layout.overflow[w] |= 1u64 << (shift + bits - 1);
            if ctx.order().is_reversed() && f >= first_var_field {
                layout.cmpmask[w] |= field_mask << shift;
            }
        }

        layout
    }

    /// Returns the context.
    #[must_use]
    pub fn context(&self) -> PolyContext {
        self.ctx
    }

    /// Returns the field width.
    #[must_use]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns the number of words per packed monomial.
    #[must_use]
    pub fn words(&self) -> usize {
        self.words
    }

    /// Returns the number of fields per packed monomial.
    #[must_use]
    pub fn nfields(&self) -> usize {
        self.ctx.nfields()
    }

    /// Returns the comparison mask.
    #[must_use]
    pub fn cmpmask(&self) -> &[u64] {
        &self.cmpmask
    }

    /// Returns the guard-bit mask.
    #[must_use]
    pub fn overflow_mask(&self) -> &[u64] {
        &self.overflow
    }

    /// Returns a mask of `bits` low ones.
    #[must_use]
    pub fn field_mask(&self) -> u64 {
        u64::MAX >> (u64::BITS - self.bits)
    }

    /// Returns the largest value a field may hold with its guard bit clear.
    #[must_use]
    pub fn max_field_value(&self) -> u64 {
        self.field_mask() >> 1
    }

    /// Word index and bit shift of field `f`.
    #[inline]
    fn position(&self, f: usize) -> (usize, u32) {
        let w = f / self.fields_per_word;
        let slot = self.fields_per_word - 1 - f % self.fields_per_word;
        (w, slot as u32 * self.bits)
    }

    /// Reads field `f` of a packed monomial.
    #[inline]
    #[must_use]
    pub fn field(&self, packed: &[u64], f: usize) -> u64 {
        let (w, shift) = self.position(f);
        (packed[w] >> shift) & self.field_mask()
    }

    /// Packs field values; every value must fit below the guard bit.
    pub fn pack_fields(&self, fields: &[u64], out: &mut [u64]) {
        debug_assert_eq!(fields.len(), self.nfields());
        out[..self.words].fill(0);
        for (f, &value) in fields.iter().enumerate() {
            debug_assert!(value <= self.max_field_value());
            let (w, shift) = self.position(f);
            out[w] |= value << shift;
        }
    }

    /// Unpacks all field values.
    pub fn unpack_fields(&self, packed: &[u64], out: &mut [u64]) {
        for (f, slot) in out.iter_mut().enumerate().take(self.nfields()) {
            *slot = self.field(packed, f);
        }
    }

    /// Computes the field values of an exponent tuple.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::ArityMismatch`] for a tuple of the wrong length
    /// and [`PolyError::ExponentOverflow`] if the total degree overflows.
    pub fn exponents_to_fields(&self, exps: &[u64]) -> Result<WordMask, PolyError> {
        let nvars = self.ctx.nvars();
        if exps.len() != nvars {
            return Err(PolyError::ArityMismatch {
                expected: nvars,
                found: exps.len(),
            });
        }

        let mut fields = WordMask::with_capacity(self.nfields());
        if self.ctx.order().is_graded() {
            let degree = exps
                .iter()
                .try_fold(0u64, |acc, &e| acc.checked_add(e))
                .ok_or(PolyError::ExponentOverflow { bits: MAX_BITS + 1 })?;
            fields.push(degree);
        }
        if self.ctx.order().is_reversed() {
            fields.extend(exps.iter().rev().copied());
        } else {
            fields.extend(exps.iter().copied());
        }
        Ok(fields)
    }

    /// Packs an exponent tuple.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::ArityMismatch`] for a tuple of the wrong length and
    /// [`PolyError::ExponentOverflow`] if a field does not fit this width.
    pub fn pack(&self, exps: &[u64], out: &mut [u64]) -> Result<(), PolyError> {
        let fields = self.exponents_to_fields(exps)?;
        if let Some(&too_big) = fields.iter().find(|&&v| v > self.max_field_value()) {
            return Err(PolyError::ExponentOverflow {
                bits: crate::bits::bits_for(too_big),
            });
        }
        self.pack_fields(&fields, out);
        Ok(())
    }

    /// Unpacks the exponent tuple of a packed monomial.
    #[must_use]
    pub fn unpack(&self, packed: &[u64]) -> Vec<u64> {
        let nvars = self.ctx.nvars();
        let offset = usize::from(self.ctx.order().is_graded());
        let mut exps: Vec<u64> = (0..nvars).map(|k| self.field(packed, offset + k)).collect();
        if self.ctx.order().is_reversed() {
            exps.reverse();
        }
        exps
    }

    /// Returns the total degree of a packed monomial.
    #[must_use]
    pub fn total_degree(&self, packed: &[u64]) -> u64 {
        if self.ctx.order().is_graded() {
            self.field(packed, 0)
        } else {
            (0..self.nfields()).map(|f| self.field(packed, f)).sum()
        }
    }

    /// Compares two packed monomials under this layout's ordering.
    #[inline]
    #[must_use]
    pub fn compare(&self, a: &[u64], b: &[u64]) -> Ordering {
        monomial_cmp(a, b, &self.cmpmask)
    }
}

/// Compares packed monomials, most significant word first.
#[inline]
#[must_use]
pub fn monomial_cmp(a: &[u64], b: &[u64], cmpmask: &[u64]) -> Ordering {
    for ((x, y), m) in a.iter().zip(b).zip(cmpmask) {
        match (x ^ m).cmp(&(y ^ m)) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// Writes `a + b` into `out`.
///
/// Check the result with [`monomial_overflows`] unless the field width was
/// sized for the sum.
#[inline]
pub fn monomial_add(out: &mut [u64], a: &[u64], b: &[u64]) {
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = x.wrapping_add(*y);
    }
}

/// Returns true if any field of `a` has its guard bit set.
#[inline]
#[must_use]
pub fn monomial_overflows(a: &[u64], overflow_mask: &[u64]) -> bool {
    a.iter().zip(overflow_mask).any(|(x, m)| x & m != 0)
}

/// Writes `a - b` into `out` and reports whether `b` divides `a`.
///
/// A field where `b` exceeds `a` borrows from its own guard bit, so the
/// quotient is valid exactly when no guard bit is set afterwards.
#[inline]
pub fn monomial_divides(out: &mut [u64], a: &[u64], b: &[u64], overflow_mask: &[u64]) -> bool {
    let mut ok = true;
    for (((o, x), y), m) in out.iter_mut().zip(a).zip(b).zip(overflow_mask) {
        *o = x.wrapping_sub(*y);
        ok &= *o & m == 0;
    }
    ok
}
