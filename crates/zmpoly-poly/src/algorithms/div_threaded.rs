//! Exact division split between two threads.
//!
//! A pivot monomial `p` splits the quotient in two. One run walks the
//! dividend down from its leading term and finds the quotient terms above
//! `p`; the other walks up from the trailing term, under the complemented
//! order, and finds the terms at or below `p`. A run stops once its heap
//! passes the image of `p` under `B`'s extreme term, so the two runs share
//! the work of one division.
//!
//! Neither run sees every remainder term, so the joined quotient is only a
//! candidate that the caller confirms by multiplying back. Both runs reject
//! quotient monomials outside the field-wise box `max(A) - max(B)`, which
//! every exact quotient respects; this ends the upward run on inexact input
//! and keeps the confirming product inside the layout.

use tracing::trace;
use zmpoly_integers::{Accumulator, Coeff};

use crate::algorithms::div_heap::{divides_heap, divides_heap_run, DivOutcome, DivRun};
use crate::algorithms::mul_heap::Operand;
use crate::bits::field_maxima;
use crate::monomial::{monomial_add, MonomialLayout};
use crate::pool::ThreadGrant;

/// Field-wise upper bound on the monomials of `a / b`.
fn quotient_bound<C>(a: &Operand<'_, C>, b: &Operand<'_, C>, layout: &MonomialLayout) -> Vec<u64> {
    let a_max = field_maxima(layout, a.exps);
    let b_max = field_maxima(layout, b.exps);
    let fields: Vec<u64> = a_max.iter().zip(&b_max).map(|(x, y)| x.saturating_sub(*y)).collect();
    let mut packed = vec![0u64; layout.words()];
    layout.pack_fields(&fields, &mut packed);
    packed
}

/// Guesses the middle of the quotient from the middle terms of `a` and `b`,
/// clamped into `bound`.
fn pivot<C>(a: &Operand<'_, C>, b: &Operand<'_, C>, layout: &MonomialLayout, bound: &[u64]) -> Vec<u64> {
    let (a_mid, b_mid) = (a.exp(a.len() / 2), b.exp(b.len() / 2));
    let fields: Vec<u64> = (0..layout.nfields())
        .map(|f| {
            let guess = layout.field(a_mid, f).saturating_sub(layout.field(b_mid, f));
            guess.min(layout.field(bound, f))
        })
        .collect();
    let mut packed = vec![0u64; layout.words()];
    layout.pack_fields(&fields, &mut packed);
    packed
}

fn reversed<C: Clone>(x: &Operand<'_, C>) -> (Vec<C>, Vec<u64>) {
    let coeffs = x.coeffs.iter().rev().cloned().collect();
    let exps = x.exps.chunks_exact(x.words).rev().flatten().copied().collect();
    (coeffs, exps)
}

/// Divides `a` by `b` with a downward and an upward run on two threads of
/// `grant`.
///
/// Operands are canonical under `layout`, `b` has at least two terms, and
/// `lead` / `trail` are the first and last coefficients of `b`. A
/// [`DivOutcome::Complete`] result is a candidate quotient in canonical
/// order; it is exact if and only if `b` times it equals `a`. With fewer
/// than two participants the whole division runs on the caller and the
/// result is exact.
pub(crate) fn divides_heap_split<A: Accumulator>(
    a: &Operand<'_, A::Coeff>,
    b: &Operand<'_, A::Coeff>,
    lead: &Coeff,
    trail: &Coeff,
    layout: &MonomialLayout,
    grant: &ThreadGrant<'_>,
) -> DivOutcome {
    if grant.participants() < 2 {
        return divides_heap::<A>(a, b, lead, layout);
    }

    let words = layout.words();
    let bound = quotient_bound(a, b, layout);
    let pivot = pivot(a, b, layout, &bound);
    let mut top_cutoff = vec![0u64; words];
    monomial_add(&mut top_cutoff, b.exp(0), &pivot);
    let mut bottom_cutoff = vec![0u64; words];
    monomial_add(&mut bottom_cutoff, b.exp(b.len() - 1), &pivot);

    let upward: Vec<u64> = layout.cmpmask().iter().map(|m| !m).collect();
    let (ra_coeffs, ra_exps) = reversed(a);
    let (rb_coeffs, rb_exps) = reversed(b);
    let ra = Operand::new(&ra_coeffs, &ra_exps, words);
    let rb = Operand::new(&rb_coeffs, &rb_exps, words);

    let down = DivRun {
        cmpmask: layout.cmpmask(),
        cutoff: Some((top_cutoff.as_slice(), true)),
        bound: Some(bound.as_slice()),
    };
    let up = DivRun {
        cmpmask: &upward,
        cutoff: Some((bottom_cutoff.as_slice(), false)),
        bound: Some(bound.as_slice()),
    };

    let mut runs = grant
        .run(|index| match index {
            0 => Some(divides_heap_run::<A>(a, b, lead, layout, down)),
            1 => Some(divides_heap_run::<A>(&ra, &rb, trail, layout, up)),
            _ => None,
        })
        .into_iter()
        .flatten();
    let (Some(upper), Some(lower)) = (runs.next(), runs.next()) else {
        return divides_heap::<A>(a, b, lead, layout);
    };

    match (upper, lower) {
        (DivOutcome::Inexact, _) | (_, DivOutcome::Inexact) => DivOutcome::Inexact,
        (DivOutcome::NeedsBig, _) | (_, DivOutcome::NeedsBig) => DivOutcome::NeedsBig,
        (DivOutcome::Complete(mut quotient), DivOutcome::Complete(lower)) => {
            trace!(upper = quotient.len(), lower = lower.len(), "split division joined");
            quotient.fit_length(quotient.len() + lower.len());
            for k in (0..lower.len()).rev() {
                quotient.push(lower.coeff(k).clone(), lower.exp(k));
            }
            DivOutcome::Complete(quotient)
        }
    }
}
