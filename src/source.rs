//! Source intake and the head entries shared by the engines.

use std::cmp::Ordering;
use std::iter::Fuse;

use crate::error::{MergeError, Result};
use crate::order::Comparator;

/// Validates the source collection and fuses every source, so an engine
/// never polls a source again once it has reported end-of-sequence.
pub(crate) fn open<S, J>(slots: S) -> Result<Vec<Fuse<J::IntoIter>>>
where
    S: IntoIterator<Item = Option<J>>,
    J: IntoIterator,
{
    let slots = slots.into_iter();
    let mut sources = Vec::with_capacity(slots.size_hint().0);
    for (index, slot) in slots.enumerate() {
        let Some(source) = slot else {
            return Err(MergeError::InvalidArgument(format!(
                "source {index} is absent"
            )));
        };
        sources.push(source.into_iter().fuse());
    }

    if sources.is_empty() {
        return Err(MergeError::InvalidArgument(
            "at least one source is required".to_string(),
        ));
    }
    Ok(sources)
}

/// Remaining-length bounds: `live` buffered heads plus whatever the
/// sources themselves promise.
pub(crate) fn remaining_hint<'a, I: Iterator + 'a>(
    live: usize,
    sources: impl Iterator<Item = &'a Fuse<I>>,
) -> (usize, Option<usize>) {
    let mut lower = live;
    let mut upper = Some(live);
    for source in sources {
        let (lo, hi) = source.size_hint();
        lower = lower.saturating_add(lo);
        upper = match (upper, hi) {
            (Some(a), Some(b)) => a.checked_add(b),
            _ => None,
        };
    }
    (lower, upper)
}

/// Next unconsumed value of a source, or the late fence once it is
/// exhausted. The late fence sorts after every value, so an exhausted
/// source loses every match without being removed from the structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Head<T> {
    Value(T),
    LateFence,
}

impl<T> Head<T> {
    #[inline(always)]
    pub(crate) fn pull<I: Iterator<Item = T>>(source: &mut I) -> Self {
        match source.next() {
            Some(value) => Head::Value(value),
            None => Head::LateFence,
        }
    }

    pub(crate) fn is_late_fence(&self) -> bool {
        matches!(self, Head::LateFence)
    }
}

/// A head tagged with the index of the source it came from.
#[derive(Debug)]
pub(crate) struct Entry<T> {
    pub(crate) head: Head<T>,
    pub(crate) source: usize,
}

impl<T> Entry<T> {
    pub(crate) fn new(head: Head<T>, source: usize) -> Self {
        Entry { head, source }
    }

    /// Filler for slots that are overwritten before they are read.
    pub(crate) fn vacant() -> Self {
        Entry {
            head: Head::LateFence,
            source: usize::MAX,
        }
    }

    /// Orders by value, then by source index. Only two live values consult
    /// the comparator.
    #[inline(always)]
    pub(crate) fn cmp_by<C: Comparator<T>>(&self, other: &Self, order: &C) -> Ordering {
        match (&self.head, &other.head) {
            (Head::Value(a), Head::Value(b)) => order
                .compare(a, b)
                .then_with(|| self.source.cmp(&other.source)),
            (Head::Value(_), Head::LateFence) => Ordering::Less,
            (Head::LateFence, Head::Value(_)) => Ordering::Greater,
            (Head::LateFence, Head::LateFence) => self.source.cmp(&other.source),
        }
    }

    #[inline(always)]
    pub(crate) fn precedes<C: Comparator<T>>(&self, other: &Self, order: &C) -> bool {
        self.cmp_by(other, order) == Ordering::Less
    }
}
