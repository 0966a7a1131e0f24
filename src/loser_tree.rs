use std::fmt::Display;
use std::iter::{Fuse, FusedIterator};
use std::mem;

use tracing::debug;

use crate::collate::Collate;
use crate::error::{MergeError, Result};
use crate::order::{Comparator, NaturalOrder};
use crate::source::{self, Entry, Head, remaining_hint};

/// K-way merge over a tree of losers.
///
/// Each internal node keeps the entry that lost the match played there; the
/// overall winner is kept apart. Replacing the winner only replays the path
/// from its leaf to the root, one comparison per level, so an extraction
/// costs at most `⌈log₂ k⌉` comparisons, about half of a heap sift.
///
/// Layout over `nodes` (length k):
/// - `nodes[0]`: the overall winner.
/// - `nodes[1..k]`: the k-1 losers. Node `p` plays children `2p` and `2p+1`.
/// - Leaves are not stored: source `s` sits at position `k + s`.
///
/// An exhausted source is a late fence at its leaf. It loses every match, so
/// the structure never shrinks; the merge is over once the winner is a fence.
/// With k = 1 there are no internal nodes and the path to the root is empty.
pub struct LoserTreeMerge<I: Iterator, C = NaturalOrder> {
    sources: Vec<Fuse<I>>,
    nodes: Vec<Entry<I::Item>>,
    order: C,
}

impl<I> LoserTreeMerge<I>
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

impl<I, C> LoserTreeMerge<I, C>
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

    /// Plays the initial tournament bottom-up. Internal nodes are visited
    /// from `k-1` down to 1, so both children of a node have been decided
    /// before its own match.
    pub(crate) fn from_sources(mut sources: Vec<Fuse<I>>, order: C) -> Self {
        let k = sources.len();
        let mut leaves: Vec<Entry<I::Item>> = sources
            .iter_mut()
            .enumerate()
            .map(|(index, source)| Entry::new(Head::pull(source), index))
            .collect();
        let live = leaves.iter().filter(|leaf| !leaf.head.is_late_fence()).count();

        let mut nodes: Vec<Entry<I::Item>> = (0..k).map(|_| Entry::vacant()).collect();
        let mut winners: Vec<Entry<I::Item>> = (0..k).map(|_| Entry::vacant()).collect();

        for node in (1..k).rev() {
            let left = take_contender(&mut leaves, &mut winners, 2 * node);
            let right = take_contender(&mut leaves, &mut winners, 2 * node + 1);
            let (winner, loser) = if right.precedes(&left, &order) {
                (right, left)
            } else {
                (left, right)
            };
            nodes[node] = loser;
            winners[node] = winner;
        }
        nodes[0] = take_contender(&mut leaves, &mut winners, 1);

        debug!(sources = k, live, "built loser tree merge");
        Self {
            sources,
            nodes,
            order,
        }
    }

    pub fn order(&self) -> &C {
        &self.order
    }

    /// Walks the ancestors of `candidate`'s leaf. At each node the smaller
    /// entry moves up and the larger stays as the loser. Returns the previous
    /// overall winner.
    fn replay(&mut self, mut candidate: Entry<I::Item>) -> Entry<I::Item> {
        let mut slot = (self.nodes.len() + candidate.source) / 2;
        while slot > 0 {
            if self.nodes[slot].precedes(&candidate, &self.order) {
                mem::swap(&mut self.nodes[slot], &mut candidate);
            }
            slot /= 2;
        }
        mem::replace(&mut self.nodes[0], candidate)
    }

    /// One-line dump of the tree: the winner, then every loser slot.
    /// Format: `[W:<value>(s<source>)] [1:<value>(s<source>)] [2:-] ...`
    pub fn compact_view(&self) -> String
    where
        I::Item: Display,
    {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| {
                let label = if idx == 0 {
                    "W".to_string()
                } else {
                    idx.to_string()
                };
                match &node.head {
                    Head::Value(value) => format!("[{}:{}(s{})]", label, value, node.source),
                    Head::LateFence => format!("[{}:-]", label),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Removes the entry that arrives at position `pos`: a leaf when
/// `pos >= k`, otherwise the winner of internal node `pos`.
fn take_contender<T>(leaves: &mut [Entry<T>], winners: &mut [Entry<T>], pos: usize) -> Entry<T> {
    let k = leaves.len();
    if pos >= k {
        mem::replace(&mut leaves[pos - k], Entry::vacant())
    } else {
        mem::replace(&mut winners[pos], Entry::vacant())
    }
}

impl<I, C> Collate for LoserTreeMerge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
    type Item = I::Item;

    fn has_next(&self) -> bool {
        !self.nodes[0].head.is_late_fence()
    }

    fn take_next(&mut self) -> Result<I::Item> {
        if !self.has_next() {
            return Err(MergeError::Exhausted);
        }

        let source = self.nodes[0].source;
        let contender = Entry::new(Head::pull(&mut self.sources[source]), source);
        let winner = self.replay(contender);
        if !self.has_next() {
            debug!("loser tree merge exhausted");
        }

        match winner.head {
            Head::Value(value) => Ok(value),
            Head::LateFence => Err(MergeError::Exhausted),
        }
    }

    fn source_count(&self) -> usize {
        self.sources.len()
    }
}

impl<I, C> Iterator for LoserTreeMerge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.take_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let live = self
            .nodes
            .iter()
            .filter(|node| !node.head.is_late_fence())
            .count();
        remaining_hint(live, self.sources.iter())
    }
}

impl<I, C> FusedIterator for LoserTreeMerge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
}
