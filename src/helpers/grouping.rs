//! Grouping terminals.
//!
//! `group_by` collects each group into a list; `group_by_with` reduces each
//! group with any downstream [`CombineFn`]. Keys appear in first-seen order,
//! or ascending with the `group_by_sorted` variants.
//! `partition_by` is the two-key case and always reports both sides.

use crate::collection::CombineFn;
use crate::combiners::{GroupingBy, Partitioned, PartitioningBy, ToList};
use crate::ordered_map::OrderedMap;
use crate::{Element, PCollection};
use anyhow::Result;
use std::hash::Hash;

impl<T: Element> PCollection<T> {
    /// Group elements by `key`, each group in encounter order.
    ///
    /// ```
    /// use seqflow::*;
    /// let p = Pipeline::default();
    /// let by_len = from_vec(&p, vec!["sol", "casa", "mar", "coche"])
    ///     .group_by(|w: &&str| w.len())?;
    /// let keys: Vec<usize> = by_len.keys().copied().collect();
    /// assert_eq!(keys, vec![3, 4, 5]);
    /// assert_eq!(by_len.get(&3), Some(&vec!["sol", "mar"]));
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    pub fn group_by<K, F>(self, key: F) -> Result<OrderedMap<K, Vec<T>>>
    where
        K: Element + Eq + Hash,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.group_by_with(key, ToList)
    }

    /// Group elements by `key` and reduce each group with `downstream`.
    pub fn group_by_with<K, F, C, A, O>(self, key: F, downstream: C) -> Result<OrderedMap<K, O>>
    where
        K: Element + Eq + Hash,
        F: Fn(&T) -> K + Send + Sync + 'static,
        C: CombineFn<T, A, O>,
        A: Send + 'static,
        O: Element,
    {
        self.combine_globally(GroupingBy::new(key, downstream))
            .single()
    }

    /// Like [`group_by`](Self::group_by), with keys in ascending order.
    ///
    /// ```
    /// use seqflow::*;
    /// let p = Pipeline::default();
    /// let by_len = from_vec(&p, vec!["coche", "sol", "casa", "mar"])
    ///     .group_by_sorted(|w: &&str| w.len())?;
    /// assert_eq!(by_len.keys().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    pub fn group_by_sorted<K, F>(self, key: F) -> Result<OrderedMap<K, Vec<T>>>
    where
        K: Element + Eq + Hash + Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.group_by_sorted_with(key, ToList)
    }

    /// Like [`group_by_with`](Self::group_by_with), with keys in ascending order.
    pub fn group_by_sorted_with<K, F, C, A, O>(
        self,
        key: F,
        downstream: C,
    ) -> Result<OrderedMap<K, O>>
    where
        K: Element + Eq + Hash + Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
        C: CombineFn<T, A, O>,
        A: Send + 'static,
        O: Element,
    {
        let mut groups = self.group_by_with(key, downstream)?;
        groups.sort_keys();
        Ok(groups)
    }

    /// Split elements by `pred`; both sides are present even when empty.
    pub fn partition_by<F>(self, pred: F) -> Result<Partitioned<Vec<T>>>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.partition_by_with(pred, ToList)
    }

    /// Split elements by `pred` and reduce each side with `downstream`.
    pub fn partition_by_with<F, C, A, O>(self, pred: F, downstream: C) -> Result<Partitioned<O>>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
        C: CombineFn<T, A, O>,
        A: Send + 'static,
        O: Element,
    {
        self.combine_globally(PartitioningBy::new(pred, downstream))
            .single()
    }
}
