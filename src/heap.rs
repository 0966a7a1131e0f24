use std::iter::{Fuse, FusedIterator};
use std::mem;

use tracing::debug;

use crate::collate::Collate;
use crate::error::{MergeError, Result};
use crate::order::{Comparator, NaturalOrder};
use crate::source::{self, Entry, Head, remaining_hint};

/// K-way merge over an array-backed binary min-heap of source heads.
///
/// Entries are ordered by `(value, source index)`, so equal values leave in
/// source order. `std::collections::BinaryHeap` needs `Ord` on the element
/// and has no replace-top, so the heap is kept by hand: an extraction
/// overwrites the root with the refill from the same source and sifts it
/// down once, about `2·log k` comparisons.
pub struct HeapMerge<I: Iterator, C = NaturalOrder> {
    sources: Vec<Fuse<I>>,
    /// Live heads only. A source leaves the heap when it runs dry.
    heap: Vec<Entry<I::Item>>,
    order: C,
}

impl<I> HeapMerge<I>
where
    I: Iterator,
    I::Item: Ord,
{
    pub fn new<S>(sources: S) -> Result<Self>
    where
        S: IntoIterator,
        S::Item: IntoIterator<IntoIter = I>,
    {
        Self::with_order(sources, NaturalOrder)
    }
}

impl<I, C> HeapMerge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
    pub fn with_order<S>(sources: S, order: C) -> Result<Self>
    where
        S: IntoIterator,
        S::Item: IntoIterator<IntoIter = I>,
    {
        Self::from_slots(sources.into_iter().map(Some), order)
    }

    /// Builds from slots that may be absent; an absent slot is rejected.
    pub fn from_slots<S, J>(slots: S, order: C) -> Result<Self>
    where
        S: IntoIterator<Item = Option<J>>,
        J: IntoIterator<IntoIter = I>,
    {
        Ok(Self::from_sources(source::open(slots)?, order))
    }

    pub(crate) fn from_sources(mut sources: Vec<Fuse<I>>, order: C) -> Self {
        let mut heap = Vec::with_capacity(sources.len());
        for (index, source) in sources.iter_mut().enumerate() {
            if let Some(value) = source.next() {
                heap.push(Entry::new(Head::Value(value), index));
            }
        }

        let mut merge = Self {
            sources,
            heap,
            order,
        };
        for pos in (0..merge.heap.len() / 2).rev() {
            merge.sift_down(pos);
        }
        debug!(
            sources = merge.sources.len(),
            live = merge.heap.len(),
            "built heap merge"
        );
        merge
    }

    pub fn order(&self) -> &C {
        &self.order
    }

    /// Restores heap order below `pos`, comparing against both children on
    /// each level.
    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.heap[right].precedes(&self.heap[left], &self.order)
            {
                right
            } else {
                left
            };
            if !self.heap[child].precedes(&self.heap[pos], &self.order) {
                break;
            }
            self.heap.swap(pos, child);
            pos = child;
        }
    }
}

impl<I, C> Collate for HeapMerge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
    type Item = I::Item;

    fn has_next(&self) -> bool {
        !self.heap.is_empty()
    }

    fn take_next(&mut self) -> Result<I::Item> {
        let Some(top) = self.heap.first() else {
            return Err(MergeError::Exhausted);
        };
        let source = top.source;

        let winner = match self.sources[source].next() {
            Some(value) => {
                let fresh = Entry::new(Head::Value(value), source);
                let winner = mem::replace(&mut self.heap[0], fresh);
                self.sift_down(0);
                winner
            }
            None => {
                let winner = self.heap.swap_remove(0);
                if self.heap.is_empty() {
                    debug!("heap merge exhausted");
                } else {
                    self.sift_down(0);
                }
                winner
            }
        };

        match winner.head {
            Head::Value(value) => Ok(value),
            Head::LateFence => Err(MergeError::Exhausted),
        }
    }

    fn source_count(&self) -> usize {
        self.sources.len()
    }
}

impl<I, C> Iterator for HeapMerge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.take_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        remaining_hint(self.heap.len(), self.sources.iter())
    }
}

impl<I, C> FusedIterator for HeapMerge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
}
