//! Chained binary heap for heap-based multiplication and division.
//!
//! Each heap entry is the head of a chain of `(i, j)` index pairs that all
//! map to the same monomial. Chain nodes live in a [`ChainArena`] and are
//! addressed by `u32` handles; a free list recycles nodes released after a
//! pop, so no node outlives its use within one operation.
//!
//! The heap is keyed by packed monomial with the *greatest* monomial on top,
//! which is the next output term of a canonical (decreasing) polynomial.
//! An insertion whose monomial equals one already on its sift-up path is
//! linked into that entry's chain instead of growing the heap.

use std::cmp::Ordering;

use crate::monomial::monomial_cmp;

/// Handle of a chain node.
pub(crate) type NodeId = u32;

const NIL: NodeId = NodeId::MAX;

/// Row index marking a node of the dividend stream in exact division.
pub(crate) const DIVIDEND: usize = usize::MAX;


#[derive(Clone, Copy, Debug)]
struct ChainNode {
    i: usize,
    j: usize,
    next: NodeId,
}

/// Arena of chain nodes with one packed monomial slot per node.
pub(crate) struct ChainArena {
    nodes: Vec<ChainNode>,
    exps: Vec<u64>,
    words: usize,
    free: Vec<NodeId>,
}

impl ChainArena {
    /// Creates an arena for monomials of `words` words.
    pub(crate) fn with_capacity(words: usize, capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            exps: Vec::with_capacity(capacity * words),
            words,
            free: Vec::new(),
        }
    }

    /// Allocates a node for `(i, j)`; its monomial slot must be written next.
    pub(crate) fn alloc(&mut self, i: usize, j: usize) -> NodeId {
        #[cfg(test)]
        activity::record_pair(i, j);
        let node = ChainNode { i, j, next: NIL };
        if let Some(id) = self.free.pop() {
            self.nodes[id as usize] = node;
            id
        } else {
            let index = self.nodes.len();
            assert!(index < NIL as usize, "Chain arena capacity exceeded");
            let id = index as NodeId;
            self.nodes.push(node);
            self.exps.resize(self.exps.len() + self.words, 0);
            id
        }
    }

    /// Returns a node to the free list.
    pub(crate) fn release(&mut self, id: NodeId) {
        self.free.push(id);
    }

    /// Returns the `(i, j)` pair of a node.
    #[inline]
    pub(crate) fn pair(&self, id: NodeId) -> (usize, usize) {
        let node = &self.nodes[id as usize];
        (node.i, node.j)
    }

    /// Returns the next node of a chain.
    #[inline]
    pub(crate) fn next(&self, id: NodeId) -> Option<NodeId> {
        let next = self.nodes[id as usize].next;
        (next != NIL).then_some(next)
    }

    /// Returns the monomial of a node.
    #[inline]
    pub(crate) fn exp(&self, id: NodeId) -> &[u64] {
        let start = id as usize * self.words;
        &self.exps[start..start + self.words]
    }

    /// Returns the monomial slot of a node for writing.
    #[inline]
    pub(crate) fn exp_mut(&mut self, id: NodeId) -> &mut [u64] {
        let start = id as usize * self.words;
        &mut self.exps[start..start + self.words]
    }

    /// Links `node` into the chain headed by `head`, right after the head.
    #[inline]
    fn link(&mut self, head: NodeId, node: NodeId) {
        self.nodes[node as usize].next = self.nodes[head as usize].next;
        self.nodes[head as usize].next = node;
    }
}

/// Binary max-heap of chain heads keyed by packed monomial.
pub(crate) struct MonomialHeap {
    entries: Vec<NodeId>,
    cmpmask: Vec<u64>,
}

impl MonomialHeap {
    /// Creates a heap for monomials compared under `cmpmask`.
    pub(crate) fn with_capacity(cmpmask: &[u64], capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            cmpmask: cmpmask.to_vec(),
        }
    }

    /// Returns the chain head on top, if any.
    #[inline]
    pub(crate) fn peek(&self) -> Option<NodeId> {
        self.entries.first().copied()
    }

    #[inline]
    fn cmp(&self, arena: &ChainArena, a: NodeId, b: NodeId) -> Ordering {
        monomial_cmp(arena.exp(a), arena.exp(b), &self.cmpmask)
    }

    /// Returns true if the top entry's monomial equals `exp`.
    #[inline]
    pub(crate) fn top_equals(&self, arena: &ChainArena, exp: &[u64]) -> bool {
        self.peek()
            .is_some_and(|top| arena.exp(top) == exp)
    }

    /// Inserts a node whose monomial slot is already written.
    ///
    /// If a node with an equal monomial lies on the sift-up path the new
    /// node joins its chain. Returns true if the heap grew.
    pub(crate) fn insert(&mut self, arena: &mut ChainArena, node: NodeId) -> bool {
        let mut pos = self.entries.len();
        while pos > 0 {
            let parent = (pos - 1) / 2;
            match self.cmp(arena, node, self.entries[parent]) {
                Ordering::Equal => {
                    arena.link(self.entries[parent], node);
                    return false;
                }
                Ordering::Greater => pos = parent,
                Ordering::Less => break,
            }
        }

        // shift the path between the new leaf and `pos` down one level
        let mut hole = self.entries.len();
        self.entries.push(node);
        #[cfg(test)]
        activity::record_entries(self.entries.len());
        while hole > pos {
            let parent = (hole - 1) / 2;
            self.entries[hole] = self.entries[parent];
            hole = parent;
        }
        self.entries[pos] = node;
        true
    }

    /// Removes and returns the chain head on top.
    pub(crate) fn pop(&mut self, arena: &ChainArena) -> Option<NodeId> {
        let top = *self.entries.first()?;
        let Some(last) = self.entries.pop() else {
            return Some(top);
        };
        if self.entries.is_empty() {
            return Some(top);
        }

        let len = self.entries.len();
        let mut hole = 0;
        loop {
            let left = 2 * hole + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len
                && self.cmp(arena, self.entries[right], self.entries[left]) == Ordering::Greater
            {
                right
            } else {
                left
            };
            if self.cmp(arena, self.entries[child], last) != Ordering::Greater {
                break;
            }
            self.entries[hole] = self.entries[child];
            hole = child;
        }
        self.entries[hole] = last;
        Some(top)
    }
}
