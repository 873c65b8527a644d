//! Array multiplication for compact single-word products.
//!
//! The most significant field of the product selects a *chunk*; within a
//! chunk every remaining field becomes a digit of a mixed-radix index with
//! radix `maxB_k + maxC_k + 1`, so that adding two operand indices gives the
//! product's index with no carries between digits. Fields that compare
//! reversed (grevlex variables) store `max - e` instead of `e`, which keeps
//! the index order equal to the monomial order. Products are accumulated
//! into a dense array of [`WideAccumulator`]s, and scanning the array from
//! the top index down emits the chunk's terms in canonical order.
//!
//! Only word-sized coefficients are handled; the method declines (returns
//! `None`) when the array would be too large or too sparse.

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;
use zmpoly_integers::WideAccumulator;

use crate::algorithms::mul_heap::Operand;
use crate::bits::field_maxima;
use crate::monomial::{MonomialLayout, WordMask};
use crate::pool::ThreadGrant;
use crate::terms::TermVec;

/// Size limits for the array method.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ArrayLimits {
    /// Largest number of cells in one chunk.
    pub(crate) max_array_size: usize,
    /// Largest ratio of total cells to `len(B) * len(C)`.
    pub(crate) array_ratio: usize,
}

/// Mixed-radix geometry shared by all chunks of one product.
struct ArrayShape {
    /// Radix of every non-chunk field, most significant first.
    radix: WordMask,
    /// Index weight of every non-chunk field.
    stride: SmallVec<[usize; 4]>,
    /// Cells per chunk.
    size: usize,
    /// True if the non-chunk fields compare reversed.
    reversed: bool,
}

impl ArrayShape {
    fn new(layout: &MonomialLayout, b_max: &[u64], c_max: &[u64]) -> Option<Self> {
        let nfields = layout.nfields();
        let mut radix = WordMask::with_capacity(nfields.saturating_sub(1));
        for k in 1..nfields {
            radix.push(b_max[k].checked_add(c_max[k])?.checked_add(1)?);
        }

        let mut stride: SmallVec<[usize; 4]> = smallvec::smallvec![0; radix.len()];
        let mut size = 1usize;
        for k in (0..radix.len()).rev() {
            stride[k] = size;
            size = size.checked_mul(usize::try_from(radix[k]).ok()?)?;
        }

        Some(Self {
            radix,
            stride,
            size,
            reversed: layout.context().order().is_reversed(),
        })
    }

    /// Index of an operand monomial whose field maxima are `max`.
    fn index(&self, layout: &MonomialLayout, packed: &[u64], max: &[u64]) -> usize {
        let mut index = 0;
        for (k, &stride) in self.stride.iter().enumerate() {
            let e = layout.field(packed, k + 1);
            let digit = if self.reversed { max[k + 1] - e } else { e };
            index += digit as usize * stride;
        }
        index
    }

    /// Writes the non-chunk fields of the product at `index`.
    fn decode(&self, mut index: usize, fields: &mut [u64]) {
        for k in (0..self.radix.len()).rev() {
            let radix = self.radix[k] as usize;
            let digit = (index % radix) as u64;
            index /= radix;
            fields[k + 1] = if self.reversed {
                self.radix[k] - 1 - digit
            } else {
                digit
            };
        }
    }
}

/// Contiguous runs of terms sharing the top field value, in decreasing order.
fn top_groups(layout: &MonomialLayout, op: &Operand<'_, i64>) -> Vec<(u64, Range<usize>)> {
    let mut groups: Vec<(u64, Range<usize>)> = Vec::new();
    for i in 0..op.len() {
        let top = layout.field(op.exp(i), 0);
        match groups.last_mut() {
            Some((value, range)) if *value == top => range.end = i + 1,
            _ => groups.push((top, i..i + 1)),
        }
    }
    groups
}

/// Operands prepared for chunked accumulation.
struct ArrayPlan<'a> {
    b: Operand<'a, i64>,
    c: Operand<'a, i64>,
    shape: ArrayShape,
    b_index: Vec<usize>,
    c_index: Vec<usize>,
    b_groups: Vec<(u64, Range<usize>)>,
    c_groups: FxHashMap<u64, Range<usize>>,
    chunks: Vec<u64>,
}

impl ArrayPlan<'_> {
    /// Accumulates and emits the chunk whose top field is `top`.
    fn chunk(&self, layout: &MonomialLayout, top: u64) -> TermVec {
        let mut cells = vec![WideAccumulator::new(); self.shape.size];
        for (vb, b_range) in &self.b_groups {
            let Some(vc) = top.checked_sub(*vb) else {
                continue;
            };
            let Some(c_range) = self.c_groups.get(&vc) else {
                continue;
            };
            for i in b_range.clone() {
                let (bi, bc) = (self.b_index[i], self.b.coeffs[i]);
                for j in c_range.clone() {
                    cells[bi + self.c_index[j]].add_mul(bc, self.c.coeffs[j]);
                }
            }
        }

        let mut out = TermVec::new(layout.words());
        let mut fields: WordMask = smallvec::smallvec![0; layout.nfields()];
        let mut packed = vec![0u64; layout.words()];
        fields[0] = top;
        for (index, cell) in cells.iter().enumerate().rev() {
            if *cell == WideAccumulator::new() {
                continue;
            }
            self.shape.decode(index, &mut fields);
            layout.pack_fields(&fields, &mut packed);
            out.push(cell.to_coeff(), &packed);
        }
        out
    }
}

/// Multiplies single-word operands with word-sized coefficients through
/// dense chunk arrays.
///
/// Returns `None` when the operands are unsuitable or the arrays would
/// exceed `limits`. With a grant, chunks are spread over its threads.
pub(crate) fn mul_array(
    b: &Operand<'_, i64>,
    c: &Operand<'_, i64>,
    layout: &MonomialLayout,
    limits: ArrayLimits,
    grant: Option<&ThreadGrant<'_>>,
) -> Option<TermVec> {
    if layout.words() != 1 || layout.nfields() == 0 || b.len() == 0 || c.len() == 0 {
        return None;
    }

    let b_max = field_maxima(layout, b.exps);
    let c_max = field_maxima(layout, c.exps);
    let shape = ArrayShape::new(layout, &b_max, &c_max)?;
    if shape.size > limits.max_array_size {
        return None;
    }

    let b_groups = top_groups(layout, b);
    let c_group_list = top_groups(layout, c);
    let mut chunks: Vec<u64> = b_groups
        .iter()
        .flat_map(|(vb, _)| c_group_list.iter().map(move |(vc, _)| vb + vc))
        .collect();
    chunks.sort_unstable_by(|x, y| y.cmp(x));
    chunks.dedup();

    let cells = shape.size.checked_mul(chunks.len())?;
    let budget = limits
        .array_ratio
        .saturating_mul(b.len())
        .saturating_mul(c.len());
    if cells > budget {
        return None;
    }

    let plan = ArrayPlan {
        b: *b,
        c: *c,
        b_index: (0..b.len())
            .map(|i| shape.index(layout, b.exp(i), &b_max))
            .collect(),
        c_index: (0..c.len())
            .map(|j| shape.index(layout, c.exp(j), &c_max))
            .collect(),
        shape,
        b_groups,
        c_groups: c_group_list.into_iter().collect(),
        chunks,
    };

    let mut product = TermVec::new(layout.words());
    match grant {
        Some(grant) if grant.count() > 0 => {
            let next = AtomicUsize::new(0);
            let per_worker = grant.run(|worker| {
                let mut done = Vec::new();
                loop {
                    let k = next.fetch_add(1, Ordering::Relaxed);
                    let Some(&top) = plan.chunks.get(k) else {
                        break done;
                    };
                    let out = plan.chunk(layout, top);
                    trace!(worker, chunk = k, terms = out.len(), "array chunk done");
                    done.push((k, out));
                }
            });
            let mut parts: Vec<(usize, TermVec)> = per_worker.into_iter().flatten().collect();
            parts.sort_unstable_by_key(|&(k, _)| k);
            for (_, part) in parts {
                product.append(part);
            }
        }
        _ => {
            for &top in &plan.chunks {
                product.append(plan.chunk(layout, top));
            }
        }
    }
    Some(product)
}
