//! Multi-threaded heap multiplication.
//!
//! The product's monomials are cut into *divisions*: contiguous intervals
//! `(lower, upper]` of the monomial order. Boundaries are chosen by rank so
//! that division `k` covers about `skew^k` times as many cross-product pairs
//! as the first one; the small divisions at the end let early finishers pick
//! up the tail instead of one worker straggling with a large block.
//!
//! Every division runs [`mul_heap_part`] on per-row column windows and owns
//! its output buffer. Workers claim divisions through an atomic counter, and
//! the outputs are concatenated in division order, which is the canonical
//! order of the product.

use std::cmp::Ordering;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use tracing::trace;
use zmpoly_integers::Accumulator;

use crate::algorithms::mul_heap::{mul_heap_part, Operand};
use crate::monomial::{monomial_add, MonomialLayout};
use crate::pool::ThreadGrant;
use crate::terms::TermVec;

/// Number of columns `j` of row `row` whose product monomial is above
/// `bound` (or at or above it, with `inclusive`).
///
/// The count is searched for in `cols`; columns before it must be above the
/// bound and columns after it must not.
#[allow(clippy::too_many_arguments)]
fn count_above<C>(
    b: &Operand<'_, C>,
    c: &Operand<'_, C>,
    layout: &MonomialLayout,
    row: usize,
    cols: Range<usize>,
    bound: &[u64],
    inclusive: bool,
    scratch: &mut [u64],
) -> usize {
    let (mut lo, mut hi) = (cols.start, cols.end);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        monomial_add(scratch, b.exp(row), c.exp(mid));
        let above = match layout.compare(scratch, bound) {
            Ordering::Greater => true,
            Ordering::Equal => inclusive,
            Ordering::Less => false,
        };
        if above {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Finds the `rank`-th largest monomial of the sorted matrix `B[i] + C[j]`
/// (1-based).
///
/// Every row is a decreasing sequence, so the elements above a pivot form a
/// prefix of each row. Each row keeps a window `lo[i]..hi[i]` that still
/// contains candidates; the pivot is the weighted median of the window
/// midpoints, so every round discards at least a quarter of the candidates.
fn select_by_rank<C>(
    b: &Operand<'_, C>,
    c: &Operand<'_, C>,
    layout: &MonomialLayout,
    rank: usize,
) -> Option<Vec<u64>> {
    let rows = b.len();
    let words = layout.words();
    let mut lo = vec![0usize; rows];
    let mut hi = vec![c.len(); rows];
    let mut gt = vec![0usize; rows];
    let mut ge = vec![0usize; rows];
    let mut mids: Vec<(Vec<u64>, usize)> = Vec::with_capacity(rows);
    let mut scratch = vec![0u64; words];

    loop {
        mids.clear();
        for i in 0..rows {
            let width = hi[i].saturating_sub(lo[i]);
            if width > 0 {
                let mut mid = vec![0u64; words];
                monomial_add(&mut mid, b.exp(i), c.exp(lo[i] + width / 2));
                mids.push((mid, width));
            }
        }
        if mids.is_empty() {
            return None;
        }
        mids.sort_by(|(x, _), (y, _)| layout.compare(y, x));
        let half = mids.iter().map(|&(_, width)| width).sum::<usize>().div_ceil(2);
        let mut seen = 0;
        let pivot_at = mids
            .iter()
            .position(|&(_, width)| {
                seen += width;
                seen >= half
            })
            .unwrap_or(mids.len() - 1);
        let pivot = std::mem::take(&mut mids[pivot_at].0);

        let (mut above, mut at_or_above) = (0, 0);
        for i in 0..rows {
            let window = lo[i]..hi[i].max(lo[i]);
            gt[i] = count_above(b, c, layout, i, window.clone(), &pivot, false, &mut scratch);
            ge[i] = count_above(b, c, layout, i, gt[i]..window.end, &pivot, true, &mut scratch);
            above += gt[i];
            at_or_above += ge[i];
        }

        if above >= rank {
            hi.copy_from_slice(&gt);
        } else if at_or_above >= rank {
            return Some(pivot);
        } else {
            lo.copy_from_slice(&ge);
        }
    }
}

/// Cumulative pair counts at which the divisions end, excluding the last.
fn division_ranks(total: usize, divisions: usize, skew: f64) -> Vec<usize> {
    let skew = skew.clamp(f64::EPSILON, 1.0);
    let weights: Vec<f64> = (0..divisions).map(|k| skew.powi(k as i32)).collect();
    let sum: f64 = weights.iter().sum();

    let mut ranks = Vec::with_capacity(divisions.saturating_sub(1));
    let mut acc = 0.0;
    for w in &weights[..divisions.saturating_sub(1)] {
        acc += w;
        let rank = ((acc / sum) * total as f64).round() as usize;
        let rank = rank.clamp(1, total);
        if ranks.last().map_or(true, |&last| rank > last) && rank < total {
            ranks.push(rank);
        }
    }
    ranks
}

/// Chooses division boundaries: monomials in decreasing order.
fn division_bounds<C>(
    b: &Operand<'_, C>,
    c: &Operand<'_, C>,
    layout: &MonomialLayout,
    divisions: usize,
    skew: f64,
) -> Vec<Vec<u64>> {
    let total = b.len() * c.len();
    let mut bounds: Vec<Vec<u64>> = Vec::new();
    for rank in division_ranks(total, divisions, skew) {
        let Some(bound) = select_by_rank(b, c, layout, rank) else {
            continue;
        };
        if bounds
            .last()
            .map_or(true, |last| layout.compare(last, &bound) == Ordering::Greater)
        {
            bounds.push(bound);
        }
    }
    bounds
}

/// Per-row windows of the division `(lower, upper]`.
fn division_windows<C>(
    b: &Operand<'_, C>,
    c: &Operand<'_, C>,
    layout: &MonomialLayout,
    upper: Option<&[u64]>,
    lower: Option<&[u64]>,
) -> (Vec<usize>, Vec<usize>) {
    let mut scratch = vec![0u64; layout.words()];
    let mut window = |bound: Option<&[u64]>, empty: usize| -> Vec<usize> {
        (0..b.len())
            .map(|i| match bound {
                Some(bound) => count_above(b, c, layout, i, 0..c.len(), bound, false, &mut scratch),
                None => empty,
            })
            .collect()
    };
    let start = window(upper, 0);
    let end = window(lower, c.len());
    (start, end)
}

/// Multiplies with the heap method across the threads of `grant`.
///
/// `b` supplies the rows. The result equals [`mul_johnson`] on the same
/// operands.
///
/// [`mul_johnson`]: crate::algorithms::mul_heap::mul_johnson
pub(crate) fn mul_heap_threaded<A: Accumulator>(
    b: &Operand<'_, A::Coeff>,
    c: &Operand<'_, A::Coeff>,
    layout: &MonomialLayout,
    grant: &ThreadGrant<'_>,
    divisions_per_thread: usize,
    skew: f64,
) -> TermVec {
    let wanted = grant.participants() * divisions_per_thread.max(1);
    let bounds = division_bounds(b, c, layout, wanted, skew);
    let divisions = bounds.len() + 1;

    let next = AtomicUsize::new(0);
    let per_worker = grant.run(|worker| {
        let mut done: Vec<(usize, TermVec)> = Vec::new();
        loop {
            let k = next.fetch_add(1, AtomicOrdering::Relaxed);
            if k >= divisions {
                break done;
            }
            let upper = k.checked_sub(1).map(|u| bounds[u].as_slice());
            let lower = bounds.get(k).map(Vec::as_slice);
            let (start, end) = division_windows(b, c, layout, upper, lower);
            let out = mul_heap_part::<A>(b, c, layout, &start, &end);
            trace!(worker, division = k, terms = out.len(), "heap division done");
            done.push((k, out));
        }
    });

    let mut parts: Vec<(usize, TermVec)> = per_worker.into_iter().flatten().collect();
    parts.sort_unstable_by_key(|&(k, _)| k);

    let mut product = TermVec::new(layout.words());
    product.fit_length(parts.iter().map(|(_, part)| part.len()).sum());
    for (_, part) in parts {
        product.append(part);
    }
    product
}
