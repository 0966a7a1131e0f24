//! Engine selection behind one pull interface.

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use tracing::debug;

use crate::collate::Collate;
use crate::error::{MergeError, Result};
use crate::heap::HeapMerge;
use crate::linear_scan::LinearScanMerge;
use crate::loser_tree::LoserTreeMerge;
use crate::order::{Comparator, NaturalOrder};
use crate::source;

/// Largest source count for which automatic selection picks the linear scan.
pub const DEFAULT_LINEAR_SCAN_MAX_SOURCES: usize = 8;

/// The merge engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    LinearScan,
    Heap,
    LoserTree,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::LinearScan, Strategy::Heap, Strategy::LoserTree];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::LinearScan => "linear",
            Strategy::Heap => "heap",
            Strategy::LoserTree => "loser-tree",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" | "linear-scan" => Ok(Strategy::LinearScan),
            "heap" => Ok(Strategy::Heap),
            "loser-tree" | "loser" => Ok(Strategy::LoserTree),
            other => Err(MergeError::InvalidArgument(format!(
                "unknown merge strategy: {other}"
            ))),
        }
    }
}

/// How a [`Merge`] picks its engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeOptions {
    /// Fixed engine, or `None` to choose from the source count.
    pub strategy: Option<Strategy>,
    /// Crossover for automatic selection: linear scan up to this many
    /// sources, tree of losers above it.
    pub linear_scan_max_sources: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            strategy: None,
            linear_scan_max_sources: DEFAULT_LINEAR_SCAN_MAX_SOURCES,
        }
    }
}

impl MergeOptions {
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy: Some(strategy),
            ..Self::default()
        }
    }

    /// The engine used for `k` sources.
    pub fn resolve(&self, k: usize) -> Strategy {
        match self.strategy {
            Some(strategy) => strategy,
            None if k <= self.linear_scan_max_sources => Strategy::LinearScan,
            None => Strategy::LoserTree,
        }
    }
}

/// One of the three engines behind the [`Collate`] contract. All variants
/// produce the same output for the same input.
pub enum Merge<I: Iterator, C = NaturalOrder> {
    LinearScan(LinearScanMerge<I, C>),
    Heap(HeapMerge<I, C>),
    LoserTree(LoserTreeMerge<I, C>),
}

impl<I> Merge<I>
where
    I: Iterator,
    I::Item: Ord,
{
    /// Natural-order merge with the engine chosen from the source count.
    pub fn new<S>(sources: S) -> Result<Self>
    where
        S: IntoIterator,
        S::Item: IntoIterator<IntoIter = I>,
    {
        Self::with_options(MergeOptions::default(), sources, NaturalOrder)
    }

    pub fn with_strategy<S>(strategy: Strategy, sources: S) -> Result<Self>
    where
        S: IntoIterator,
        S::Item: IntoIterator<IntoIter = I>,
    {
        Self::with_options(MergeOptions::with_strategy(strategy), sources, NaturalOrder)
    }
}

impl<I, C> Merge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
    pub fn with_options<S>(options: MergeOptions, sources: S, order: C) -> Result<Self>
    where
        S: IntoIterator,
        S::Item: IntoIterator<IntoIter = I>,
    {
        Self::from_slots(options, sources.into_iter().map(Some), order)
    }

    /// Builds from slots that may be absent; an absent slot is rejected.
    pub fn from_slots<S, J>(options: MergeOptions, slots: S, order: C) -> Result<Self>
    where
        S: IntoIterator<Item = Option<J>>,
        J: IntoIterator<IntoIter = I>,
    {
        let sources = source::open(slots)?;
        let strategy = options.resolve(sources.len());
        debug!(sources = sources.len(), %strategy, "selected merge engine");

        Ok(match strategy {
            Strategy::LinearScan => Merge::LinearScan(LinearScanMerge::from_sources(sources, order)),
            Strategy::Heap => Merge::Heap(HeapMerge::from_sources(sources, order)),
            Strategy::LoserTree => Merge::LoserTree(LoserTreeMerge::from_sources(sources, order)),
        })
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Merge::LinearScan(_) => Strategy::LinearScan,
            Merge::Heap(_) => Strategy::Heap,
            Merge::LoserTree(_) => Strategy::LoserTree,
        }
    }

    pub fn order(&self) -> &C {
        match self {
            Merge::LinearScan(m) => m.order(),
            Merge::Heap(m) => m.order(),
            Merge::LoserTree(m) => m.order(),
        }
    }
}

impl<I, C> Collate for Merge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
    type Item = I::Item;

    fn has_next(&self) -> bool {
        match self {
            Merge::LinearScan(m) => m.has_next(),
            Merge::Heap(m) => m.has_next(),
            Merge::LoserTree(m) => m.has_next(),
        }
    }

    fn take_next(&mut self) -> Result<I::Item> {
        match self {
            Merge::LinearScan(m) => m.take_next(),
            Merge::Heap(m) => m.take_next(),
            Merge::LoserTree(m) => m.take_next(),
        }
    }

    fn source_count(&self) -> usize {
        match self {
            Merge::LinearScan(m) => m.source_count(),
            Merge::Heap(m) => m.source_count(),
            Merge::LoserTree(m) => m.source_count(),
        }
    }
}

impl<I, C> Iterator for Merge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.take_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Merge::LinearScan(m) => m.size_hint(),
            Merge::Heap(m) => m.size_hint(),
            Merge::LoserTree(m) => m.size_hint(),
        }
    }
}

impl<I, C> FusedIterator for Merge<I, C>
where
    I: Iterator,
    C: Comparator<I::Item>,
{
}

/// Merges `sources` in natural order with an automatically chosen engine.
///
/// ```
/// let merged: Vec<i32> = kway::merge(vec![vec![1, 4], vec![2, 3]]).unwrap().collect();
/// assert_eq!(merged, vec![1, 2, 3, 4]);
/// ```
pub fn merge<S, I>(sources: S) -> Result<Merge<I>>
where
    S: IntoIterator,
    S::Item: IntoIterator<IntoIter = I>,
    I: Iterator,
    I::Item: Ord,
{
    Merge::new(sources)
}
