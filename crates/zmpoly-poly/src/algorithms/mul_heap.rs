//! Johnson's heap-based sparse multiplication.
//!
//! The product `B * C` is produced in decreasing monomial order, one output
//! term per heap round. The heap holds at most one candidate `(i, j)` per row
//! `i` of `B`; the `hind` array records, per row, the column that was last
//! pushed (`2 * (j + 1)`) and whether it has been popped since (low bit).
//! A popped `(i, j)` enables its right neighbour `(i + 1, j)` and its upper
//! neighbour `(i, j + 1)`, each of which is pushed by exactly one
//! predecessor.
//!
//! [`mul_heap_part`] restricts every row to a column window, which lets the
//! threaded multiplier compute one monomial interval of the product at a
//! time. [`mul_johnson`] is the full-window case.

use zmpoly_integers::Accumulator;

use crate::algorithms::heap::{ChainArena, MonomialHeap};
use crate::monomial::{monomial_add, monomial_overflows, MonomialLayout};
use crate::terms::TermVec;

/// Borrowed coefficients and packed monomials of one operand.
#[derive(Clone, Copy)]
pub(crate) struct Operand<'a, C> {
    pub(crate) coeffs: &'a [C],
    pub(crate) exps: &'a [u64],
    pub(crate) words: usize,
}

impl<'a, C> Operand<'a, C> {
    pub(crate) fn new(coeffs: &'a [C], exps: &'a [u64], words: usize) -> Self {
        debug_assert_eq!(coeffs.len() * words, exps.len());
        Self { coeffs, exps, words }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.coeffs.len()
    }

    #[inline]
    pub(crate) fn exp(&self, i: usize) -> &'a [u64] {
        &self.exps[i * self.words..(i + 1) * self.words]
    }
}

/// Pushes the candidate `(i, j)` with monomial `B[i] + C[j]`.
#[inline]
fn push_pair<C>(
    heap: &mut MonomialHeap,
    arena: &mut ChainArena,
    b: &Operand<'_, C>,
    c: &Operand<'_, C>,
    i: usize,
    j: usize,
) {
    let id = arena.alloc(i, j);
    monomial_add(arena.exp_mut(id), b.exp(i), c.exp(j));
    heap.insert(arena, id);
}

/// Multiplies the window `start[i]..end[i]` of every row `i`.
///
/// Both operands must be in canonical order under `layout`, and `layout` must
/// be wide enough for every product monomial. `start` and `end` must be
/// non-increasing, as they are when derived from monomial bounds.
pub(crate) fn mul_heap_part<A: Accumulator>(
    b: &Operand<'_, A::Coeff>,
    c: &Operand<'_, A::Coeff>,
    layout: &MonomialLayout,
    start: &[usize],
    end: &[usize],
) -> TermVec {
    let rows = b.len();
    let words = layout.words();
    debug_assert_eq!(start.len(), rows);
    debug_assert_eq!(end.len(), rows);

    let mut hind: Vec<usize> = start.iter().map(|&s| 2 * s + 1).collect();
    let mut arena = ChainArena::with_capacity(words, rows + 1);
    let mut heap = MonomialHeap::with_capacity(layout.cmpmask(), rows + 1);
    let mut store: Vec<(usize, usize)> = Vec::with_capacity(2 * rows);
    let mut out = TermVec::with_capacity(words, rows + c.len());
    let mut acc = A::default();
    let mut exp = vec![0u64; words];

    // a row whose window starts where the previous row's does is reached by
    // moving right from that row
    for i in 0..rows {
        if start[i] < end[i] && (i == 0 || start[i] < start[i - 1]) {
            push_pair(&mut heap, &mut arena, b, c, i, start[i]);
            hind[i] = 2 * (start[i] + 1);
        }
    }

    while let Some(top) = heap.peek() {
        exp.copy_from_slice(arena.exp(top));
        debug_assert!(!monomial_overflows(&exp, layout.overflow_mask()));

        while heap.top_equals(&arena, &exp) {
            let Some(head) = heap.pop(&arena) else { break };
            let mut node = Some(head);
            while let Some(id) = node {
                let (i, j) = arena.pair(id);
                hind[i] |= 1;
                store.push((i, j));
                acc.add_product(&b.coeffs[i], &c.coeffs[j]);
                node = arena.next(id);
                arena.release(id);
            }
        }

        while let Some((i, j)) = store.pop() {
            // right: the next row at the same column
            if i + 1 < rows && j < end[i + 1] && hind[i + 1] == 2 * j + 1 {
                push_pair(&mut heap, &mut arena, b, c, i + 1, j);
                hind[i + 1] = 2 * (j + 1);
            }
            // up: the next column of this row, once the row above has passed it
            if j + 1 < end[i] && hind[i] & 1 == 1 && (i == 0 || hind[i - 1] >= 2 * (j + 2) + 1) {
                push_pair(&mut heap, &mut arena, b, c, i, j + 1);
                hind[i] = 2 * (j + 2);
            }
        }

        let coeff = acc.take();
        if !num_traits::Zero::is_zero(&coeff) {
            out.push(coeff, &exp);
        }
    }

    out
}

/// Multiplies two canonical operands with Johnson's algorithm.
///
/// `b` supplies the rows; passing the shorter operand as `b` bounds the heap
/// by its length.
pub(crate) fn mul_johnson<A: Accumulator>(
    b: &Operand<'_, A::Coeff>,
    c: &Operand<'_, A::Coeff>,
    layout: &MonomialLayout,
) -> TermVec {
    let start = vec![0; b.len()];
    let end = vec![c.len(); b.len()];
    mul_heap_part::<A>(b, c, layout, &start, &end)
}
