//! Monagan–Pearce exact division.
//!
//! Computes `Q = A / B` when `B` divides `A` exactly, discovering the
//! quotient terms in decreasing order. The heap merges the dividend stream
//! with the products `B[i] * Q[j]` for `i >= 1` (the leading term of `B` is
//! what produced `Q[j]` and never enters the heap). Every heap round yields
//! the next term of `A - B * Q`; a nonzero term must be divisible by the
//! leading term of `B`, otherwise the division is inexact and stops early.
//!
//! Because the quotient grows while the heap runs, a product row can reach
//! the end of the known quotient. Such rows are parked by counting them in
//! `parked`; the next quotient term revives them all through row 1.
//!
//! The algorithm only needs a total order compatible with multiplication, so
//! a [`DivRun`] may walk the complement of the layout's order, from the
//! trailing terms upward, and may stop at a cutoff monomial.

use std::cmp::Ordering;

use zmpoly_integers::{Accumulator, Coeff};

use crate::algorithms::heap::{ChainArena, MonomialHeap, DIVIDEND};
use crate::algorithms::mul_heap::Operand;
use crate::monomial::{monomial_add, monomial_cmp, monomial_divides, monomial_overflows, MonomialLayout};
use crate::terms::TermVec;

/// Result of a heap division attempt.
#[derive(Debug)]
pub(crate) enum DivOutcome {
    /// No remainder term was found. Carries the quotient, or for a run with a
    /// cutoff the quotient terms before it.
    Complete(TermVec),
    /// Some term of the remainder is nonzero.
    Inexact,
    /// A quotient coefficient does not fit the accumulator's operand type.
    NeedsBig,
}

fn push_dividend<C>(heap: &mut MonomialHeap, arena: &mut ChainArena, a: &Operand<'_, C>, j: usize) {
    let id = arena.alloc(DIVIDEND, j);
    arena.exp_mut(id).copy_from_slice(a.exp(j));
    heap.insert(arena, id);
}

fn push_product(
    heap: &mut MonomialHeap,
    arena: &mut ChainArena,
    b_exp: &[u64],
    quotient: &TermVec,
    i: usize,
    j: usize,
) {
    let id = arena.alloc(i, j);
    monomial_add(arena.exp_mut(id), b_exp, quotient.exp(j));
    heap.insert(arena, id);
}

/// Order, extent and bounds of one division run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DivRun<'a> {
    /// Comparison mask of the order the run walks down.
    pub(crate) cmpmask: &'a [u64],
    /// The run ends once the heap top falls below this monomial, or reaches
    /// it when the flag is set.
    pub(crate) cutoff: Option<(&'a [u64], bool)>,
    /// Field-wise upper bound on quotient monomials; exceeding it proves the
    /// division inexact.
    pub(crate) bound: Option<&'a [u64]>,
}

impl<'a> DivRun<'a> {
    /// The whole division in the layout's order.
    pub(crate) fn full(layout: &'a MonomialLayout) -> Self {
        Self {
            cmpmask: layout.cmpmask(),
            cutoff: None,
            bound: None,
        }
    }

    fn past_cutoff(&self, exp: &[u64]) -> bool {
        self.cutoff.is_some_and(|(cutoff, inclusive)| {
            match monomial_cmp(exp, cutoff, self.cmpmask) {
                Ordering::Less => true,
                Ordering::Equal => inclusive,
                Ordering::Greater => false,
            }
        })
    }
}

/// Divides `a` by `b` exactly.
///
/// Both operands must be canonical, nonempty and packed under `layout`.
/// `lead` is the leading coefficient of `b` as a general coefficient.
pub(crate) fn divides_heap<A: Accumulator>(
    a: &Operand<'_, A::Coeff>,
    b: &Operand<'_, A::Coeff>,
    lead: &Coeff,
    layout: &MonomialLayout,
) -> DivOutcome {
    divides_heap_run::<A>(a, b, lead, layout, DivRun::full(layout))
}

/// Runs the division as `run` describes.
///
/// The operands must be sorted decreasingly under `run.cmpmask`; `lead` is
/// the coefficient of `b`'s first term.
pub(crate) fn divides_heap_run<A: Accumulator>(
    a: &Operand<'_, A::Coeff>,
    b: &Operand<'_, A::Coeff>,
    lead: &Coeff,
    layout: &MonomialLayout,
    run: DivRun<'_>,
) -> DivOutcome {
    let words = layout.words();
    let rows = b.len();
    let mask = layout.overflow_mask();

    let mut hind = vec![1usize; rows];
    let mut parked = rows;
    let mut arena = ChainArena::with_capacity(words, rows + 1);
    let mut heap = MonomialHeap::with_capacity(run.cmpmask, rows + 1);
    let mut store: Vec<(usize, usize)> = Vec::with_capacity(2 * rows);
    let mut quotient = TermVec::with_capacity(words, a.len().max(1));
    let mut q_coeffs: Vec<A::Coeff> = Vec::with_capacity(a.len().max(1));
    let mut acc = A::default();
    let mut exp = vec![0u64; words];
    let mut q_exp = vec![0u64; words];
    let mut slack = vec![0u64; words];

    push_dividend(&mut heap, &mut arena, a, 0);

    while let Some(top) = heap.peek() {
        exp.copy_from_slice(arena.exp(top));
        if run.past_cutoff(&exp) {
            break;
        }
        if monomial_overflows(&exp, mask) {
            return DivOutcome::Inexact;
        }
        let divisible = monomial_divides(&mut q_exp, &exp, b.exp(0), mask);

        while heap.top_equals(&arena, &exp) {
            let Some(head) = heap.pop(&arena) else { break };
            let mut node = Some(head);
            while let Some(id) = node {
                let (i, j) = arena.pair(id);
                store.push((i, j));
                if i == DIVIDEND {
                    acc.add(&a.coeffs[j]);
                } else {
                    hind[i] |= 1;
                    acc.sub_product(&b.coeffs[i], &q_coeffs[j]);
                }
                node = arena.next(id);
                arena.release(id);
            }
        }

        while let Some((i, j)) = store.pop() {
            if i == DIVIDEND {
                if j + 1 < a.len() {
                    push_dividend(&mut heap, &mut arena, a, j + 1);
                }
                continue;
            }
            if i + 1 < rows && hind[i + 1] == 2 * j + 1 {
                push_product(&mut heap, &mut arena, b.exp(i + 1), &quotient, i + 1, j);
                hind[i + 1] = 2 * (j + 1);
            }
            if j + 1 == quotient.len() {
                parked += 1;
            } else if hind[i] & 1 == 1 && (i == 1 || hind[i - 1] >= 2 * (j + 2) + 1) {
                push_product(&mut heap, &mut arena, b.exp(i), &quotient, i, j + 1);
                hind[i] = 2 * (j + 2);
            }
        }

        let value = acc.take();
        if num_traits::Zero::is_zero(&value) {
            continue;
        }
        if !divisible {
            return DivOutcome::Inexact;
        }
        if run
            .bound
            .is_some_and(|bound| !monomial_divides(&mut slack, bound, &q_exp, mask))
        {
            return DivOutcome::Inexact;
        }
        let Some(q) = value.div_exact(lead) else {
            return DivOutcome::Inexact;
        };
        let Some(lifted) = A::lift(&q) else {
            return DivOutcome::NeedsBig;
        };

        quotient.push(q, &q_exp);
        q_coeffs.push(lifted);

        // every parked row resumes at the new quotient term through row 1
        if parked > 1 {
            let j = quotient.len() - 1;
            push_product(&mut heap, &mut arena, b.exp(1), &quotient, 1, j);
            hind[1] = 2 * (j + 1);
        }
        parked = 1;
    }

    DivOutcome::Complete(quotient)
}
