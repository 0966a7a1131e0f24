use kway::{Collate, Merge, MergeError, MergeOptions, NaturalOrder, OrderBy, Strategy};
use rand::{SeedableRng, rngs::StdRng};

use super::{collect_all, random_runs, total_pulls, tracked};

type Tagged = (i32, &'static str);

fn merged<T: Ord>(strategy: Strategy, sources: Vec<Vec<T>>) -> Vec<T> {
    let mut merge = Merge::with_strategy(strategy, sources).unwrap();
    assert_eq!(merge.strategy(), strategy);
    collect_all(&mut merge)
}

pub fn interleaved_sources(strategy: Strategy) {
    let result = merged(
        strategy,
        vec![vec![1, 4, 7, 10], vec![2, 5, 8, 11], vec![3, 6, 9, 12]],
    );
    assert_eq!(result, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
}

pub fn duplicates_preserved(strategy: Strategy) {
    let result = merged(strategy, vec![vec![1, 3, 5, 5], vec![2, 3, 5, 6]]);
    assert_eq!(result, vec![1, 2, 3, 3, 5, 5, 5, 6]);

    let result = merged(strategy, vec![vec![1, 2, 2, 3], vec![2, 2, 4], vec![1, 3, 3]]);
    assert_eq!(result, vec![1, 1, 2, 2, 2, 2, 3, 3, 3, 4]);
}

/// Equal keys leave in source order: the first-listed source goes first.
pub fn ties_follow_source_order(strategy: Strategy) {
    let sources: Vec<Vec<Tagged>> = vec![
        vec![(1, "a0"), (3, "a1"), (5, "a2"), (5, "a3")],
        vec![(2, "b0"), (3, "b1"), (5, "b2"), (6, "b3")],
    ];
    let by_key = OrderBy(|a: &Tagged, b: &Tagged| a.0.cmp(&b.0));
    let mut merge =
        Merge::with_options(MergeOptions::with_strategy(strategy), sources, by_key).unwrap();
    let tags: Vec<&str> = collect_all(&mut merge).into_iter().map(|(_, tag)| tag).collect();
    assert_eq!(tags, vec!["a0", "b0", "a1", "b1", "a2", "a3", "b2", "b3"]);
}

pub fn uneven_lengths(strategy: Strategy) {
    let result = merged(strategy, vec![vec![1], vec![2, 4, 6, 8, 10], vec![3, 5, 7]]);
    assert_eq!(result, vec![1, 2, 3, 4, 5, 6, 7, 8, 10]);
}

pub fn all_sources_empty(strategy: Strategy) {
    let mut merge =
        Merge::with_strategy(strategy, vec![Vec::<i32>::new(), vec![], vec![]]).unwrap();
    assert!(!merge.has_next());
    assert_eq!(merge.take_next(), Err(MergeError::Exhausted));
    assert!(!merge.has_next());
    assert_eq!(merge.next(), None);
}

pub fn hundred_sources(strategy: Strategy) {
    let sources: Vec<Vec<u32>> = (0..100).map(|i| (i..1000).step_by(100).collect()).collect();
    let result = merged(strategy, sources);
    assert_eq!(result.len(), 1000);
    assert_eq!(result, (0..1000).collect::<Vec<u32>>());
}

pub fn single_source_passthrough(strategy: Strategy) {
    let result = merged(strategy, vec![vec![1, 2, 3, 4, 5]]);
    assert_eq!(result, vec![1, 2, 3, 4, 5]);
}

pub fn some_sources_empty(strategy: Strategy) {
    let result = merged(strategy, vec![vec![1, 3, 5], vec![], vec![2, 4, 6], vec![]]);
    assert_eq!(result, vec![1, 2, 3, 4, 5, 6]);
}

pub fn single_element_sources(strategy: Strategy) {
    let result = merged(strategy, vec![vec![3], vec![1], vec![2]]);
    assert_eq!(result, vec![1, 2, 3]);
}

pub fn strings(strategy: Strategy) {
    let result = merged(
        strategy,
        vec![
            vec!["apple".to_string(), "cherry".to_string(), "grape".to_string()],
            vec!["banana".to_string(), "date".to_string(), "fig".to_string()],
        ],
    );
    assert_eq!(
        result,
        vec!["apple", "banana", "cherry", "date", "fig", "grape"]
    );
}

pub fn custom_descending_order(strategy: Strategy) {
    let descending = OrderBy(|a: &i64, b: &i64| b.cmp(a));
    let sources: Vec<Vec<i64>> = vec![vec![9, 4, 1], vec![8, 7, 2], vec![6, 5, 3]];
    let merge =
        Merge::with_options(MergeOptions::with_strategy(strategy), sources, descending).unwrap();
    assert_eq!(merge.collect::<Vec<_>>(), vec![9, 8, 7, 6, 5, 4, 3, 2, 1]);
}

pub fn has_next_is_idempotent(strategy: Strategy) {
    let mut merge = Merge::with_strategy(strategy, vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    assert!(merge.has_next());
    assert!(merge.has_next());
    assert!(merge.has_next());
    assert_eq!(merge.take_next(), Ok(1));
    assert!(merge.has_next());
    assert_eq!(merge.take_next(), Ok(2));
}

pub fn take_next_without_has_next(strategy: Strategy) {
    let mut merge = Merge::with_strategy(strategy, vec![vec![1, 2]]).unwrap();
    assert_eq!(merge.take_next(), Ok(1));
    assert_eq!(merge.take_next(), Ok(2));
    assert_eq!(merge.take_next(), Err(MergeError::Exhausted));
}

/// Exhausted is terminal, and repeating the failed call changes nothing.
pub fn exhaustion_is_terminal(strategy: Strategy) {
    let mut merge = Merge::with_strategy(strategy, vec![vec![1], vec![]]).unwrap();
    assert_eq!(merge.take_next(), Ok(1));
    assert!(!merge.has_next());
    for _ in 0..3 {
        assert_eq!(merge.take_next(), Err(MergeError::Exhausted));
        assert!(!merge.has_next());
    }
}

pub fn remove_is_unsupported(strategy: Strategy) {
    let mut merge = Merge::with_strategy(strategy, vec![vec![1, 2, 3]]).unwrap();
    assert_eq!(
        merge.remove(),
        Err(MergeError::UnsupportedOperation("remove"))
    );
    // The failed call left the merge untouched.
    assert_eq!(collect_all(&mut merge), vec![1, 2, 3]);
}

pub fn empty_collection_rejected(strategy: Strategy) {
    let sources: Vec<Vec<i32>> = Vec::new();
    let result = Merge::with_strategy(strategy, sources);
    assert!(matches!(result, Err(MergeError::InvalidArgument(_))));
}

pub fn absent_source_rejected(strategy: Strategy) {
    let options = MergeOptions::with_strategy(strategy);
    let slots = vec![Some(vec![1, 2]), None];
    match Merge::from_slots(options, slots, NaturalOrder) {
        Err(MergeError::InvalidArgument(message)) => assert!(message.contains("source 1")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("absent source was accepted"),
    }

    let slots = vec![Some(vec![1, 2]), Some(vec![0])];
    let merge = Merge::from_slots(options, slots, NaturalOrder).unwrap();
    assert_eq!(merge.collect::<Vec<_>>(), vec![0, 1, 2]);
}

/// Construction pulls one value per source, each extraction advances
/// exactly one source by one position, and no source is polled again once
/// it has reported its end.
pub fn pulls_lazily(strategy: Strategy) {
    let (sources, counters) = tracked(vec![vec![1, 5, 9], vec![2, 6], vec![], vec![3, 4]]);
    let mut merge = Merge::with_strategy(strategy, sources).unwrap();
    assert_eq!(total_pulls(&counters), 4);

    let mut taken = 0;
    while merge.has_next() {
        merge.take_next().unwrap();
        taken += 1;
        assert_eq!(total_pulls(&counters), 4 + taken);
    }
    assert_eq!(taken, 7);
    // Every source was polled exactly once past its last value.
    let pulls: Vec<usize> = counters.iter().map(|c| c.get()).collect();
    assert_eq!(pulls, vec![4, 3, 1, 3]);
}

pub fn size_hint_is_exact_for_exact_sources(strategy: Strategy) {
    let mut merge =
        Merge::with_strategy(strategy, vec![vec![1, 4], vec![2], vec![3, 5, 6]]).unwrap();
    for remaining in (0..=6).rev() {
        assert_eq!(merge.size_hint(), (remaining, Some(remaining)));
        merge.next();
    }
}

/// Order, cardinality and multiset equivalence on random sorted runs.
pub fn random_runs_match_sorted_concatenation(strategy: Strategy) {
    let mut rng = StdRng::seed_from_u64(42);
    for k in (1..64).step_by(3) {
        let sources = random_runs(&mut rng, k, 25, 100);
        let mut expected: Vec<i32> = sources.iter().flatten().copied().collect();
        expected.sort();

        let result = merged(strategy, sources);
        assert!(result.is_sorted());
        assert_eq!(result.len(), expected.len());
        assert_eq!(result, expected);
    }
}
