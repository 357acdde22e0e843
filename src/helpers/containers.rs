//! Container terminals: sets, maps, joined text, and `for_each`.

use crate::combiners::{Joining, ToMap, ToSet};
use crate::ordered_map::OrderedMap;
use crate::{Element, PCollection};
use anyhow::Result;
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

impl<T: Element> PCollection<T> {
    /// Run `f` on every element; in parallel mode calls happen on workers.
    pub fn for_each<F>(self, f: F) -> Result<()>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.peek(f).count().map(|_| ())
    }
}

impl<T: Element + Eq + Hash> PCollection<T> {
    pub fn to_set(self) -> Result<HashSet<T>> {
        self.combine_globally(ToSet).single()
    }
}

impl<T: Element + Display> PCollection<T> {
    /// `prefix + e1 + separator + ... + eN + suffix`.
    ///
    /// ```
    /// use seqflow::*;
    /// let p = Pipeline::default();
    /// let s = from_vec(&p, vec!["a", "b", "c"]).join(", ", "[", "]")?;
    /// assert_eq!(s, "[a, b, c]");
    /// let empty = from_vec(&p, Vec::<i32>::new()).join(", ", "<", ">")?;
    /// assert_eq!(empty, "<>");
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    pub fn join(self, separator: &str, prefix: &str, suffix: &str) -> Result<String> {
        self.combine_globally(Joining::with_affixes(separator, prefix, suffix))
            .single()
    }
}

impl<K, V> PCollection<(K, V)>
where
    K: Element + Eq + Hash,
    V: Element,
{
    /// Collect pairs into a map; a repeated key keeps its position and takes
    /// the later value.
    pub fn to_map(self) -> Result<OrderedMap<K, V>> {
        self.to_map_with(|_, incoming| incoming)
    }

    /// Collect pairs into a map, resolving a repeated key with
    /// `merge(existing, incoming)`.
    pub fn to_map_with<F>(self, merge: F) -> Result<OrderedMap<K, V>>
    where
        F: Fn(V, V) -> V + Send + Sync + 'static,
    {
        self.combine_globally(ToMap::new(merge)).single()
    }
}
