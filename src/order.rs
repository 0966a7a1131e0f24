//! Total orders used by the engines.
//!
//! Engines never rely on `Ord` directly. They carry a [`Comparator`] so the
//! same merge code works for natural order, custom collations, and the
//! instrumented [`CountingOrder`] used to measure comparison cost.

use std::cell::Cell;
use std::cmp::Ordering;

/// Three-way comparison over `T`. Must be a total order consistent with how
/// every source is sorted.
pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The `Ord` order of `T`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Order given by a closure, e.g. `OrderBy(|a: &u32, b: &u32| b.cmp(a))`
/// for sources sorted descending.
#[derive(Clone, Copy)]
pub struct OrderBy<F>(pub F);

impl<T, F> Comparator<T> for OrderBy<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

/// Wraps another comparator and counts how many times it is consulted.
#[derive(Debug, Default)]
pub struct CountingOrder<C = NaturalOrder> {
    inner: C,
    count: Cell<u64>,
}

impl<C> CountingOrder<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            count: Cell::new(0),
        }
    }

    /// Comparisons performed since construction or the last [`reset`](Self::reset).
    pub fn comparisons(&self) -> u64 {
        self.count.get()
    }

    /// Returns the current count and zeroes it.
    pub fn reset(&self) -> u64 {
        self.count.replace(0)
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<T, C: Comparator<T>> Comparator<T> for CountingOrder<C> {
    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.count.set(self.count.get() + 1);
        self.inner.compare(a, b)
    }
}
