//! Assertion functions for comparing pipeline outputs with expected results.

use crate::ordered_map::OrderedMap;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Assert that two collections are equal in order and content.
///
/// # Panics
///
/// Panics if the collections differ in length or content.
///
/// ```
/// use seqflow::testing::assert_collections_equal;
/// assert_collections_equal(&[1, 2, 3], &[1, 2, 3]);
/// ```
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(
            a, e,
            "Collection mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

/// Assert that two collections hold the same elements with the same
/// multiplicities, ignoring order.
///
/// Parallel runs that materialize lists may interleave chunks differently;
/// this is the comparison to use for them.
///
/// # Panics
///
/// Panics if any element occurs a different number of times.
///
/// ```
/// use seqflow::testing::assert_collections_unordered_equal;
/// assert_collections_unordered_equal(&[3, 1, 2, 1], &[1, 1, 2, 3]);
/// ```
pub fn assert_collections_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    fn counts<T: Eq + Hash>(items: &[T]) -> HashMap<&T, usize> {
        let mut m = HashMap::new();
        for item in items {
            *m.entry(item).or_insert(0) += 1;
        }
        m
    }

    let (got, want) = (counts(actual), counts(expected));
    if got != want {
        let missing: Vec<_> = want
            .iter()
            .filter(|(k, n)| got.get(*k).copied().unwrap_or(0) < **n)
            .map(|(k, _)| k)
            .collect();
        let extra: Vec<_> = got
            .iter()
            .filter(|(k, n)| want.get(*k).copied().unwrap_or(0) < **n)
            .map(|(k, _)| k)
            .collect();
        panic!(
            "Collection content mismatch:\n  Missing elements: {missing:?}\n  Extra elements: {extra:?}\n  Expected: {expected:?}\n  Actual: {actual:?}"
        );
    }
}

/// Assert that two grouping results have the same keys in the same
/// first-seen order and equal groups.
///
/// # Panics
///
/// Panics on the first key or group that differs.
pub fn assert_groups_equal<K, V>(actual: &OrderedMap<K, V>, expected: &[(K, V)])
where
    K: Debug + Eq + Hash + Clone,
    V: Debug + PartialEq,
{
    let keys: Vec<&K> = actual.keys().collect();
    let want: Vec<&K> = expected.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, want, "Group keys differ (order matters)");

    for (k, v) in expected {
        assert_eq!(actual.get(k), Some(v), "Group mismatch for key {k:?}");
    }
}

/// Assert that all elements in a collection satisfy a predicate.
///
/// # Panics
///
/// Panics if any element does not satisfy the predicate.
///
/// ```
/// use seqflow::testing::assert_all;
/// assert_all(&[2, 4, 6, 8], |x| x % 2 == 0);
/// ```
pub fn assert_all<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    for (i, item) in collection.iter().enumerate() {
        assert!(
            predicate(item),
            "Predicate failed for element at index {i}:\n  Element: {item:?}\n  Collection: {collection:?}"
        );
    }
}

/// Assert that at least one element in a collection satisfies a predicate.
///
/// # Panics
///
/// Panics if no elements satisfy the predicate.
pub fn assert_any<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    assert!(
        collection.iter().any(&predicate),
        "No elements satisfied the predicate:\n  Collection: {collection:?}"
    );
}

/// Assert that no elements in a collection satisfy a predicate.
///
/// # Panics
///
/// Panics if any element satisfies the predicate.
pub fn assert_none<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    for (i, item) in collection.iter().enumerate() {
        assert!(
            !predicate(item),
            "Predicate unexpectedly succeeded for element at index {i}:\n  Element: {item:?}\n  Collection: {collection:?}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "Collection content mismatch")]
    fn unordered_comparison_counts_duplicates() {
        assert_collections_unordered_equal(&[1, 1, 2], &[1, 2, 2]);
    }

    #[test]
    fn groups_compare_in_first_seen_order() {
        let groups: OrderedMap<&str, Vec<i32>> =
            [("b", vec![1]), ("a", vec![2, 3])].into_iter().collect();
        assert_groups_equal(&groups, &[("b", vec![1]), ("a", vec![2, 3])]);
    }
}
