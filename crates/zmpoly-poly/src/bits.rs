//! Field-width sizing and exponent repacking.
//!
//! Before two polynomials are combined, the result's field width is chosen
//! from the per-field exponent maxima of the operands, and operands packed
//! narrower than that are copy-expanded to the common width.

use crate::error::PolyError;
use crate::monomial::{MonomialLayout, WordMask, MAX_BITS, MIN_BITS};

/// Number of bits needed to store `value` below a guard bit.
#[inline]
#[must_use]
pub fn bits_for(value: u64) -> u32 {
    u64::BITS - value.leading_zeros() + 1
}

/// Rounds a required width up to a supported one.
///
/// The width is at least [`MIN_BITS`] and is widened to use every bit of a
/// word: `64 / ⌊64 / bits⌋` keeps the same number of fields per word.
///
/// # Errors
///
/// Returns [`PolyError::ExponentOverflow`] when `bits` exceeds [`MAX_BITS`].
pub fn fix_bits(bits: u32) -> Result<u32, PolyError> {
    if bits > MAX_BITS {
        return Err(PolyError::ExponentOverflow { bits });
    }
    let bits = bits.max(MIN_BITS);
    Ok(u64::BITS / (u64::BITS / bits))
}

/// Returns the maximum of every field over a flat exponent array.
#[must_use]
pub fn field_maxima(layout: &MonomialLayout, exps: &[u64]) -> WordMask {
    let mut maxima: WordMask = smallvec::smallvec![0; layout.nfields()];
    for packed in exps.chunks_exact(layout.words()) {
        for (f, max) in maxima.iter_mut().enumerate() {
            *max = (*max).max(layout.field(packed, f));
        }
    }
    maxima
}

/// Returns the width needed to hold every value in `maxima`.
#[must_use]
pub fn bits_for_maxima(maxima: &[u64]) -> u32 {
    maxima.iter().map(|&m| bits_for(m)).max().unwrap_or(1)
}

/// Returns the field-wise sums of two maxima vectors.
///
/// # Errors
///
/// Returns [`PolyError::ExponentOverflow`] if a sum leaves `u64`.
pub fn sum_maxima(a: &[u64], b: &[u64]) -> Result<WordMask, PolyError> {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            x.checked_add(*y)
                .ok_or(PolyError::ExponentOverflow { bits: MAX_BITS + 1 })
        })
        .collect()
}

/// Chooses the field width of a product from the operands' field maxima.
///
/// # Errors
///
/// Returns [`PolyError::ExponentOverflow`] if the product's exponents cannot
/// be packed at all.
pub fn product_bits(a_maxima: &[u64], b_maxima: &[u64]) -> Result<u32, PolyError> {
    let sums = sum_maxima(a_maxima, b_maxima)?;
    fix_bits(bits_for_maxima(&sums))
}

/// Re-encodes a flat exponent array from one layout to another.
///
/// Both layouts must belong to the same context and every field must fit
/// the target width.
#[must_use]
pub fn repack(exps: &[u64], from: &MonomialLayout, to: &MonomialLayout) -> Vec<u64> {
    debug_assert_eq!(from.context(), to.context());
    if from.bits() == to.bits() {
        return exps.to_vec();
    }

    let nterms = exps.len() / from.words();
    let mut out = vec![0u64; nterms * to.words()];
    let mut fields: WordMask = smallvec::smallvec![0; from.nfields()];
    for (src, dst) in exps
        .chunks_exact(from.words())
        .zip(out.chunks_exact_mut(to.words()))
    {
        from.unpack_fields(src, &mut fields);
        to.pack_fields(&fields, dst);
    }
    out
}
