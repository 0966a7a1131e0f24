use std::cmp::Ordering;
use std::iter::{Fuse, FusedIterator};
use std::mem;

use tracing::debug;

use crate::collate::Collate;
use crate::error::{MergeError, Result};
use crate::order::{Comparator, NaturalOrder};
use crate::source::{self, remaining_hint};

/// K-way merge by scanning every cached head on each extraction.
///
/// O(N·k) comparisons, but the scan is a flat walk over a small array with
/// no pointer chasing, which wins for small k. Ties go to the lowest source
/// index.
pub struct LinearScanMerge<I: Iterator, C = NaturalOrder> {
    sources: Vec<Fuse<I>>,
    /// One cached head per source, `None` once that source is exhausted.
    heads: Vec<Option<I::Item>>,
    /// Number of `Some` entries in `heads`.
    live: usize,
    order: C,
}

impl<I> LinearScanMerge<I>
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

impl<I, C> LinearScanMerge<I, C>
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
        let heads: Vec<Option<I::Item>> = sources.iter_mut().map(Iterator::next).collect();
        let live = heads.iter().filter(|head| head.is_some()).count();
        debug!(sources = sources.len(), live, "built linear scan merge");

        Self {
            sources,
            heads,
            live,
            order,
        }
    }

    pub fn order(&self) -> &C {
        &self.order
    }

    /// Index of the smallest cached head. Strict `Less` keeps the first of
    /// equal heads, which is the lowest source index.
    fn min_index(&self) -> Option<usize> {
        let mut best: Option<(usize, &I::Item)> = None;
        for (index, head) in self.heads.iter().enumerate() {
            let Some(value) = head else {
                continue;
            };
            match best {
                Some((_, current)) if self.order.compare(value, current) != Ordering::Less => {}
                _ => best = Some((index, value)),
            }
        }
        best.map(|(index, _)| index)
    }
}

impl<I, C> Collate for LinearScanMerge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
    type Item = I::Item;

    fn has_next(&self) -> bool {
        self.live > 0
    }

    fn take_next(&mut self) -> Result<I::Item> {
        let Some(index) = self.min_index() else {
            return Err(MergeError::Exhausted);
        };

        let refill = self.sources[index].next();
        if refill.is_none() {
            self.live -= 1;
            if self.live == 0 {
                debug!("linear scan merge exhausted");
            }
        }
        mem::replace(&mut self.heads[index], refill).ok_or(MergeError::Exhausted)
    }

    fn source_count(&self) -> usize {
        self.sources.len()
    }
}

impl<I, C> Iterator for LinearScanMerge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.take_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        remaining_hint(self.live, self.sources.iter())
    }
}

impl<I, C> FusedIterator for LinearScanMerge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
}
