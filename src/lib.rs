// Lazy k-way merge of sorted sources

//! Three interchangeable engines pull from k sorted sources and yield one
//! non-decreasing sequence, without materializing the inputs:
//!
//! - [`LinearScanMerge`]: scans every head per extraction, O(N·k).
//! - [`HeapMerge`]: binary min-heap, about `2·log k` comparisons each.
//! - [`LoserTreeMerge`]: tree of losers, at most `⌈log₂ k⌉` comparisons each.
//!
//! All engines break ties by source index, so for the same input they emit
//! the same sequence. [`Merge`] picks one of them behind the [`Collate`]
//! contract.

pub mod collate;
pub mod error;
pub mod heap;
pub mod linear_scan;
pub mod loser_tree;
pub mod merge;
pub mod order;
mod source;
pub mod workload;

pub use collate::Collate;
pub use error::{MergeError, Result};
pub use heap::HeapMerge;
pub use linear_scan::LinearScanMerge;
pub use loser_tree::LoserTreeMerge;
pub use merge::{DEFAULT_LINEAR_SCAN_MAX_SOURCES, Merge, MergeOptions, Strategy, merge};
pub use order::{Comparator, CountingOrder, NaturalOrder, OrderBy};
