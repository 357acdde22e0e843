//! Sorting stages.
//!
//! Sorting is a barrier: the stage buffers everything upstream, then replays it
//! in order. Buffering happens when the stream is first pulled, so building a
//! sorted chain stays free. Every sort here is stable.

use crate::node::{DynOp, Node, Stage};
use crate::type_token::{Partition, deferred, partition_stream, stream_partition};
use crate::{Element, PCollection};
use anyhow::Result;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

struct SortOp<T, F>(Arc<F>, PhantomData<fn() -> T>);

impl<T, F> DynOp for SortOp<T, F>
where
    T: Element,
    F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let upstream = partition_stream::<T>(input, "sort")?;
        let cmp = Arc::clone(&self.0);
        Ok(stream_partition::<T>(deferred(move || {
            let mut buf: Vec<T> = upstream.collect();
            buf.sort_by(|a, b| cmp(a, b));
            buf
        })))
    }
}

impl<T: Element> PCollection<T> {
    /// Stable sort by `cmp`.
    ///
    /// For descending order, flip the comparator or use
    /// [`sorted_by_key`](Self::sorted_by_key) with [`std::cmp::Reverse`].
    pub fn sorted_by<F>(self, cmp: F) -> PCollection<T>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        let op: Arc<dyn DynOp> = Arc::new(SortOp::<T, F>(Arc::new(cmp), PhantomData));
        self.attach(Node::Stage(Stage::Sort(op)))
    }

    /// Stable sort by a derived key.
    ///
    /// ```
    /// use seqflow::*;
    /// use std::cmp::Reverse;
    ///
    /// let p = Pipeline::default();
    /// let words = from_vec(&p, vec!["sol", "casa", "coche", "mar"])
    ///     .sorted_by_key(|w: &&str| Reverse(w.len()))
    ///     .collect()?;
    /// assert_eq!(words, vec!["coche", "casa", "sol", "mar"]);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    pub fn sorted_by_key<K, F>(self, key: F) -> PCollection<T>
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.sorted_by(move |a, b| key(a).cmp(&key(b)))
    }
}

impl<T: Element + Ord> PCollection<T> {
    /// Stable sort by natural ordering.
    pub fn sorted(self) -> PCollection<T> {
        self.sorted_by(T::cmp)
    }
}
