//! Linear-time term operations: merging and monomial scaling.

use std::cmp::Ordering;

use num_traits::Zero;
use zmpoly_integers::Coeff;

use crate::monomial::{monomial_add, monomial_divides, MonomialLayout};
use crate::terms::TermVec;

/// Merges two canonical term vectors into `a + sign * b`, combining like
/// terms and dropping zero sums.
pub(crate) fn merge_sorted(a: &TermVec, b: &TermVec, layout: &MonomialLayout, negate_b: bool) -> TermVec {
    let b_coeff = |j: usize| -> Coeff {
        if negate_b {
            -b.coeff(j)
        } else {
            b.coeff(j).clone()
        }
    };

    let mut result = TermVec::with_capacity(layout.words(), a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match layout.compare(a.exp(i), b.exp(j)) {
            Ordering::Greater => {
                result.push(a.coeff(i).clone(), a.exp(i));
                i += 1;
            }
            Ordering::Less => {
                result.push(b_coeff(j), b.exp(j));
                j += 1;
            }
            Ordering::Equal => {
                let sum = a.coeff(i) + &b_coeff(j);
                if !sum.is_zero() {
                    result.push(sum, a.exp(i));
                }
                i += 1;
                j += 1;
            }
        }
    }

    for k in i..a.len() {
        result.push(a.coeff(k).clone(), a.exp(k));
    }
    for k in j..b.len() {
        result.push(b_coeff(k), b.exp(k));
    }
    result
}

/// Multiplies every term by `coeff * x^exp`.
///
/// `coeff` must be nonzero and `layout` wide enough for the shifted
/// monomials; the order of the terms is preserved.
pub(crate) fn mul_by_term(p: &TermVec, coeff: &Coeff, exp: &[u64], layout: &MonomialLayout) -> TermVec {
    let mut out = TermVec::with_capacity(layout.words(), p.len());
    let mut packed = vec![0u64; layout.words()];
    for (c, e) in p.iter() {
        monomial_add(&mut packed, e, exp);
        out.push(c * coeff, &packed);
    }
    out
}

/// Divides every term by `coeff * x^exp`, or returns `None` if some term is
/// not divisible.
pub(crate) fn div_by_term(
    p: &TermVec,
    coeff: &Coeff,
    exp: &[u64],
    layout: &MonomialLayout,
) -> Option<TermVec> {
    let mut out = TermVec::with_capacity(layout.words(), p.len());
    let mut packed = vec![0u64; layout.words()];
    for (c, e) in p.iter() {
        if !monomial_divides(&mut packed, e, exp, layout.overflow_mask()) {
            return None;
        }
        out.push(c.div_exact(coeff)?, &packed);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PolyContext;
    use crate::ordering::MonomialOrder;

    fn layout() -> MonomialLayout {
        MonomialLayout::new(PolyContext::new(2, MonomialOrder::Grlex), 16).unwrap()
    }

    fn terms(layout: &MonomialLayout, items: &[(i64, [u64; 2])]) -> TermVec {
        let mut out = TermVec::new(layout.words());
        let mut packed = vec![0u64; layout.words()];
        for (c, e) in items {
            layout.pack(e, &mut packed).unwrap();
            out.push(Coeff::from(*c), &packed);
        }
        out
    }

    #[test]
    fn test_merge_combines_and_cancels() {
        let l = layout();
        let a = terms(&l, &[(1, [2, 0]), (3, [1, 0]), (1, [0, 0])]);
        let b = terms(&l, &[(2, [1, 1]), (3, [1, 0]), (-4, [0, 1])]);

        let sum = merge_sorted(&a, &b, &l, false);
        let expected = terms(&l, &[(1, [2, 0]), (2, [1, 1]), (6, [1, 0]), (-4, [0, 1]), (1, [0, 0])]);
        assert_eq!(sum, expected);

        let diff = merge_sorted(&a, &b, &l, true);
        let expected = terms(&l, &[(1, [2, 0]), (-2, [1, 1]), (4, [0, 1]), (1, [0, 0])]);
        assert_eq!(diff, expected);
    }

    #[test]
    fn test_scale_by_term_and_back() {
        let l = layout();
        let p = terms(&l, &[(2, [3, 1]), (-6, [0, 2])]);
        let mut shift = vec![0u64; l.words()];
        l.pack(&[1, 2], &mut shift).unwrap();

        let scaled = mul_by_term(&p, &Coeff::from(-3), &shift, &l);
        assert_eq!(scaled, terms(&l, &[(-6, [4, 3]), (18, [1, 4])]));

        assert_eq!(div_by_term(&scaled, &Coeff::from(-3), &shift, &l), Some(p.clone()));
        assert_eq!(div_by_term(&p, &Coeff::from(4), &shift, &l), None);
        assert_eq!(div_by_term(&p, &Coeff::from(1), &shift, &l), None);
    }
}
