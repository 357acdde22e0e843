//! Grouping combiners and downstream adapters.
//!
//! `GroupingBy` and `PartitioningBy` route each element to a per-key
//! accumulator of a downstream combiner. Any [`CombineFn`] can be a downstream,
//! including another `GroupingBy` (nested grouping), a [`Mapping`] that
//! transforms elements first, or a [`CollectingAndThen`] that post-processes
//! the downstream result.

use crate::Element;
use crate::collection::CombineFn;
use crate::ordered_map::OrderedMap;
use serde::Serialize;
use std::hash::Hash;
use std::marker::PhantomData;

/* ===================== GroupingBy ===================== */

/// Key -> downstream result, keys in first-seen order.
pub struct GroupingBy<F, C> {
    key: F,
    downstream: C,
}

impl<F, C> GroupingBy<F, C> {
    pub fn new(key: F, downstream: C) -> Self {
        Self { key, downstream }
    }
}

impl<T, K, F, C, A, O> CombineFn<T, OrderedMap<K, A>, OrderedMap<K, O>> for GroupingBy<F, C>
where
    T: Element,
    K: Element + Eq + Hash,
    F: Fn(&T) -> K + Send + Sync + 'static,
    C: CombineFn<T, A, O>,
{
    fn create(&self) -> OrderedMap<K, A> {
        OrderedMap::new()
    }

    fn add_input(&self, acc: &mut OrderedMap<K, A>, v: T) {
        let slot = acc.get_or_insert_with((self.key)(&v), || self.downstream.create());
        self.downstream.add_input(slot, v);
    }

    // `other` holds a later chunk, so its new keys go after ours.
    fn merge(&self, acc: &mut OrderedMap<K, A>, other: OrderedMap<K, A>) {
        for (k, a) in other {
            match acc.get_mut(&k) {
                Some(existing) => self.downstream.merge(existing, a),
                None => {
                    acc.insert(k, a);
                }
            }
        }
    }

    fn finish(&self, acc: OrderedMap<K, A>) -> OrderedMap<K, O> {
        acc.map_values(|a| self.downstream.finish(a))
    }
}

/* ===================== PartitioningBy ===================== */

/// The two sides of a partition. Both are always present.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Partitioned<O> {
    #[serde(rename = "true")]
    pub accepted: O,
    #[serde(rename = "false")]
    pub rejected: O,
}

impl<O> Partitioned<O> {
    /// The side for predicate result `side`.
    pub fn get(&self, side: bool) -> &O {
        if side { &self.accepted } else { &self.rejected }
    }

    pub fn map<P>(self, mut f: impl FnMut(O) -> P) -> Partitioned<P> {
        Partitioned {
            accepted: f(self.accepted),
            rejected: f(self.rejected),
        }
    }
}

pub struct PartitioningBy<F, C> {
    pred: F,
    downstream: C,
}

impl<F, C> PartitioningBy<F, C> {
    pub fn new(pred: F, downstream: C) -> Self {
        Self { pred, downstream }
    }
}

impl<T, F, C, A, O> CombineFn<T, Partitioned<A>, Partitioned<O>> for PartitioningBy<F, C>
where
    T: Element,
    F: Fn(&T) -> bool + Send + Sync + 'static,
    C: CombineFn<T, A, O>,
{
    fn create(&self) -> Partitioned<A> {
        Partitioned {
            accepted: self.downstream.create(),
            rejected: self.downstream.create(),
        }
    }

    fn add_input(&self, acc: &mut Partitioned<A>, v: T) {
        if (self.pred)(&v) {
            self.downstream.add_input(&mut acc.accepted, v);
        } else {
            self.downstream.add_input(&mut acc.rejected, v);
        }
    }

    fn merge(&self, acc: &mut Partitioned<A>, other: Partitioned<A>) {
        self.downstream.merge(&mut acc.accepted, other.accepted);
        self.downstream.merge(&mut acc.rejected, other.rejected);
    }

    fn finish(&self, acc: Partitioned<A>) -> Partitioned<O> {
        acc.map(|a| self.downstream.finish(a))
    }
}

/* ===================== Mapping ===================== */

/// Transform each element before handing it to `downstream`.
pub struct Mapping<F, C, U> {
    f: F,
    downstream: C,
    _u: PhantomData<fn() -> U>,
}

impl<F, C, U> Mapping<F, C, U> {
    pub fn new(f: F, downstream: C) -> Self {
        Self {
            f,
            downstream,
            _u: PhantomData,
        }
    }
}

impl<T, U, F, C, A, O> CombineFn<T, A, O> for Mapping<F, C, U>
where
    T: 'static,
    U: 'static,
    F: Fn(&T) -> U + Send + Sync + 'static,
    C: CombineFn<U, A, O>,
{
    fn create(&self) -> A {
        self.downstream.create()
    }

    fn add_input(&self, acc: &mut A, v: T) {
        self.downstream.add_input(acc, (self.f)(&v));
    }

    fn merge(&self, acc: &mut A, other: A) {
        self.downstream.merge(acc, other);
    }

    fn finish(&self, acc: A) -> O {
        self.downstream.finish(acc)
    }
}

/* ===================== CollectingAndThen ===================== */

/// Apply `then` to the result of `downstream`.
pub struct CollectingAndThen<C, F, O> {
    downstream: C,
    then: F,
    _o: PhantomData<fn() -> O>,
}

impl<C, F, O> CollectingAndThen<C, F, O> {
    pub fn new(downstream: C, then: F) -> Self {
        Self {
            downstream,
            then,
            _o: PhantomData,
        }
    }
}

impl<T, A, O, R, C, F> CombineFn<T, A, R> for CollectingAndThen<C, F, O>
where
    O: 'static,
    C: CombineFn<T, A, O>,
    F: Fn(O) -> R + Send + Sync + 'static,
{
    fn create(&self) -> A {
        self.downstream.create()
    }

    fn add_input(&self, acc: &mut A, v: T) {
        self.downstream.add_input(acc, v);
    }

    fn merge(&self, acc: &mut A, other: A) {
        self.downstream.merge(acc, other);
    }

    fn finish(&self, acc: A) -> R {
        (self.then)(self.downstream.finish(acc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combiners::{Count, ToList};

    fn run<T, A, O>(c: &impl CombineFn<T, A, O>, chunks: Vec<Vec<T>>) -> O {
        let mut accs = chunks.into_iter().map(|chunk| {
            let mut acc = c.create();
            for v in chunk {
                c.add_input(&mut acc, v);
            }
            acc
        });
        let mut acc = accs.next().unwrap_or_else(|| c.create());
        for other in accs {
            c.merge(&mut acc, other);
        }
        c.finish(acc)
    }

    #[test]
    fn grouping_keeps_first_seen_keys_across_chunks() {
        let g = GroupingBy::new(|n: &i32| n % 3, ToList);
        let out = run(&g, vec![vec![3, 4], vec![5, 6, 7]]);
        let entries: Vec<_> = out.into_iter().collect();
        assert_eq!(
            entries,
            vec![(0, vec![3, 6]), (1, vec![4, 7]), (2, vec![5])]
        );
    }

    #[test]
    fn nested_grouping_with_counting() {
        let inner = GroupingBy::new(|w: &&str| w.len(), Count);
        let outer = GroupingBy::new(|w: &&str| w.chars().next().unwrap_or(' '), inner);
        let out = run(&outer, vec![vec!["casa", "coche", "sol", "cama"]]);
        let c = out.get(&'c').unwrap();
        assert_eq!(c.get(&4), Some(&2));
        assert_eq!(c.get(&5), Some(&1));
        assert_eq!(out.get(&'s').and_then(|m| m.get(&3)), Some(&1));
    }

    #[test]
    fn partition_keeps_both_sides_when_one_is_empty() {
        let p = PartitioningBy::new(|n: &i32| *n > 100, ToList);
        let out = run(&p, vec![vec![1, 2, 3]]);
        assert!(out.get(true).is_empty());
        assert_eq!(out.get(false), &vec![1, 2, 3]);
    }

    #[test]
    fn mapping_then_post_processing() {
        let lengths = Mapping::new(|w: &String| w.len(), ToList);
        let total = CollectingAndThen::new(lengths, |v: Vec<usize>| v.iter().sum::<usize>());
        let out = run(&total, vec![vec!["ab".to_string()], vec!["cde".to_string()]]);
        assert_eq!(out, 5);
    }
}
