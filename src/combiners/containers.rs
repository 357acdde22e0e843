//! Container combiners: `ToList`, `ToSet`, `ToMap`

use crate::Element;
use crate::collection::CombineFn;
use crate::ordered_map::OrderedMap;
use std::collections::HashSet;
use std::hash::Hash;

/// All elements in encounter order (chunk order under parallel runs).
#[derive(Clone, Copy, Debug, Default)]
pub struct ToList;

impl<T: Element> CombineFn<T, Vec<T>, Vec<T>> for ToList {
    fn create(&self) -> Vec<T> {
        Vec::new()
    }

    fn add_input(&self, acc: &mut Vec<T>, v: T) {
        acc.push(v);
    }

    fn merge(&self, acc: &mut Vec<T>, mut other: Vec<T>) {
        acc.append(&mut other);
    }

    fn finish(&self, acc: Vec<T>) -> Vec<T> {
        acc
    }
}

/// Distinct elements, unordered.
#[derive(Clone, Copy, Debug, Default)]
pub struct ToSet;

impl<T: Element + Eq + Hash> CombineFn<T, HashSet<T>, HashSet<T>> for ToSet {
    fn create(&self) -> HashSet<T> {
        HashSet::new()
    }

    fn add_input(&self, acc: &mut HashSet<T>, v: T) {
        acc.insert(v);
    }

    fn merge(&self, acc: &mut HashSet<T>, other: HashSet<T>) {
        acc.extend(other);
    }

    fn finish(&self, acc: HashSet<T>) -> HashSet<T> {
        acc
    }
}

/// Key/value pairs into an [`OrderedMap`]; `merge` resolves a repeated key
/// as `merge(existing, incoming)`.
pub struct ToMap<F>(F);

impl<F> ToMap<F> {
    pub fn new(merge: F) -> Self {
        Self(merge)
    }
}

fn put<K, V, F>(merge: &F, acc: &mut OrderedMap<K, V>, k: K, v: V)
where
    K: Element + Eq + Hash,
    V: Element,
    F: Fn(V, V) -> V,
{
    match acc.get_mut(&k) {
        Some(existing) => *existing = merge(existing.clone(), v),
        None => {
            acc.insert(k, v);
        }
    }
}

impl<K, V, F> CombineFn<(K, V), OrderedMap<K, V>, OrderedMap<K, V>> for ToMap<F>
where
    K: Element + Eq + Hash,
    V: Element,
    F: Fn(V, V) -> V + Send + Sync + 'static,
{
    fn create(&self) -> OrderedMap<K, V> {
        OrderedMap::new()
    }

    fn add_input(&self, acc: &mut OrderedMap<K, V>, (k, v): (K, V)) {
        put(&self.0, acc, k, v);
    }

    fn merge(&self, acc: &mut OrderedMap<K, V>, other: OrderedMap<K, V>) {
        for (k, v) in other {
            put(&self.0, acc, k, v);
        }
    }

    fn finish(&self, acc: OrderedMap<K, V>) -> OrderedMap<K, V> {
        acc
    }
}
