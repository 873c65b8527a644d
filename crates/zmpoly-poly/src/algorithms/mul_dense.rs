//! Dense multiplication of univariate polynomials.
//!
//! Operands are unpacked into ascending coefficient vectors, multiplied with
//! [`karatsuba_mul`], and the nonzero coefficients are packed back in
//! decreasing degree.

use num_traits::Zero;
use zmpoly_integers::Coeff;

use crate::algorithms::karatsuba::karatsuba_mul;
use crate::monomial::MonomialLayout;
use crate::terms::TermVec;

fn degree(layout: &MonomialLayout, terms: &TermVec) -> Option<u64> {
    (!terms.is_empty()).then(|| layout.total_degree(terms.exp(0)))
}

fn to_dense(layout: &MonomialLayout, terms: &TermVec, len: usize) -> Vec<Coeff> {
    let mut dense = vec![Coeff::zero(); len];
    for (coeff, packed) in terms.iter() {
        dense[layout.total_degree(packed) as usize] = coeff.clone();
    }
    dense
}

/// Multiplies univariate operands through dense vectors.
///
/// Returns `None` if the context is not univariate or the product's degree
/// span exceeds `max_len` coefficients.
pub(crate) fn mul_dense(
    b: &TermVec,
    c: &TermVec,
    layout: &MonomialLayout,
    max_len: usize,
) -> Option<TermVec> {
    if layout.context().nvars() != 1 {
        return None;
    }
    let (db, dc) = (degree(layout, b)?, degree(layout, c)?);
    let len = usize::try_from(db.checked_add(dc)?.checked_add(1)?).ok()?;
    if len > max_len {
        return None;
    }

    let b_dense = to_dense(layout, b, usize::try_from(db).ok()? + 1);
    let c_dense = to_dense(layout, c, usize::try_from(dc).ok()? + 1);
    let product = karatsuba_mul(&b_dense, &c_dense);

    let mut out = TermVec::with_capacity(layout.words(), b.len() + c.len());
    let mut packed = vec![0u64; layout.words()];
    for (e, coeff) in product.into_iter().enumerate().rev() {
        if coeff.is_zero() {
            continue;
        }
        layout.pack(&[e as u64], &mut packed).ok()?;
        out.push(coeff, &packed);
    }
    Some(out)
}
