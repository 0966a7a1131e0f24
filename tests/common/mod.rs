#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use kway::Collate;

pub mod merge_behavior;

/// Drains through the explicit pull contract rather than `Iterator`.
pub fn collect_all<M: Collate>(merge: &mut M) -> Vec<M::Item> {
    let mut result = Vec::new();
    while merge.has_next() {
        result.push(merge.take_next().expect("has_next was true"));
    }
    result
}

/// A source that counts how often it is polled and panics if polled again
/// after it reported its end.
pub struct TrackedSource<T> {
    values: std::vec::IntoIter<T>,
    pulls: Rc<Cell<usize>>,
    finished: bool,
}

impl<T> Iterator for TrackedSource<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        assert!(!self.finished, "source polled after it reported exhaustion");
        self.pulls.set(self.pulls.get() + 1);
        let value = self.values.next();
        if value.is_none() {
            self.finished = true;
        }
        value
    }
}

pub fn tracked<T>(runs: Vec<Vec<T>>) -> (Vec<TrackedSource<T>>, Vec<Rc<Cell<usize>>>) {
    let counters: Vec<Rc<Cell<usize>>> = runs.iter().map(|_| Rc::new(Cell::new(0))).collect();
    let sources = runs
        .into_iter()
        .zip(&counters)
        .map(|(run, pulls)| TrackedSource {
            values: run.into_iter(),
            pulls: Rc::clone(pulls),
            finished: false,
        })
        .collect();
    (sources, counters)
}

pub fn total_pulls(counters: &[Rc<Cell<usize>>]) -> usize {
    counters.iter().map(|c| c.get()).sum()
}

/// `k` sorted runs of random length drawn from `rng`.
pub fn random_runs(rng: &mut impl rand::Rng, k: usize, max_len: usize, max_value: i32) -> Vec<Vec<i32>> {
    (0..k)
        .map(|_| {
            let len = rng.random_range(0..=max_len);
            let mut run: Vec<i32> = (0..len).map(|_| rng.random_range(0..max_value)).collect();
            run.sort();
            run
        })
        .collect()
}
