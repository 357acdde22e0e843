//! Order-preserving deduplication.
//!
//! The seen-set lives inside the stream built for one run (one per chunk in
//! parallel mode). It is never shared between runs or threads.

use crate::node::{DynOp, Node, Stage};
use crate::type_token::{Partition, partition_stream, stream_partition};
use crate::{Element, PCollection};
use anyhow::Result;
use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

struct DistinctOp<T>(PhantomData<fn() -> T>);

impl<T: Element + Eq + Hash> DynOp for DistinctOp<T> {
    fn apply(&self, input: Partition) -> Result<Partition> {
        let s = partition_stream::<T>(input, "distinct")?;
        let mut seen: HashSet<T> = HashSet::new();
        Ok(stream_partition::<T>(Box::new(
            s.filter(move |t| seen.insert(t.clone())),
        )))
    }
}

impl<T: Element + Eq + Hash> PCollection<T> {
    /// Drop repeated elements; the first occurrence wins and order is preserved.
    ///
    /// ```
    /// use seqflow::*;
    /// let p = Pipeline::default();
    /// let out = from_vec(&p, vec!["casa", "coche", "casa", "árbol"])
    ///     .distinct()
    ///     .collect()?;
    /// assert_eq!(out, vec!["casa", "coche", "árbol"]);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    #[must_use]
    pub fn distinct(self) -> Self {
        let op: Arc<dyn DynOp> = Arc::new(DistinctOp::<T>(PhantomData));
        self.attach(Node::Stage(Stage::Distinct(op)))
    }
}
