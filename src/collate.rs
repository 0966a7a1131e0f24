use crate::error::{MergeError, Result};

/// The pull contract shared by every merge engine.
///
/// An engine is either Active (`has_next` is true) or Exhausted. Exhausted is
/// terminal. Every engine also implements `Iterator`, which maps
/// [`MergeError::Exhausted`] to `None`.
pub trait Collate {
    type Item;

    /// Whether another value remains. Pure and repeatable.
    fn has_next(&self) -> bool;

    /// Returns the smallest remaining value and advances its source by one.
    ///
    /// Fails with [`MergeError::Exhausted`] when `has_next` is false.
    fn take_next(&mut self) -> Result<Self::Item>;

    /// Number of sources the engine was built over, exhausted ones included.
    fn source_count(&self) -> usize;

    /// Removal during a merge is not supported.
    fn remove(&mut self) -> Result<()> {
        Err(MergeError::UnsupportedOperation("remove"))
    }
}
