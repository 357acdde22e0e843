//! `limit` and `skip`.
//!
//! `limit(n)` stops pulling upstream after `n` elements, so it bounds the work
//! done by everything before it (and terminates unbounded generators).
//! In parallel mode both stages apply per chunk.

use crate::node::{DynOp, Node, Stage};
use crate::type_token::{Partition, partition_stream, stream_partition};
use crate::{Element, PCollection};
use anyhow::Result;
use std::marker::PhantomData;
use std::sync::Arc;

struct LimitOp<T>(usize, PhantomData<fn() -> T>);

impl<T: Element> DynOp for LimitOp<T> {
    fn apply(&self, input: Partition) -> Result<Partition> {
        let s = partition_stream::<T>(input, "limit")?;
        Ok(stream_partition::<T>(Box::new(s.take(self.0))))
    }
}

struct SkipOp<T>(usize, PhantomData<fn() -> T>);

impl<T: Element> DynOp for SkipOp<T> {
    fn apply(&self, input: Partition) -> Result<Partition> {
        let s = partition_stream::<T>(input, "skip")?;
        Ok(stream_partition::<T>(Box::new(s.skip(self.0))))
    }
}

impl<T: Element> PCollection<T> {
    /// Pass at most `n` elements.
    pub fn limit(self, n: usize) -> PCollection<T> {
        let op: Arc<dyn DynOp> = Arc::new(LimitOp::<T>(n, PhantomData));
        self.attach(Node::Stage(Stage::Limit(n, op)))
    }

    /// Drop the first `n` elements.
    ///
    /// ```
    /// use seqflow::*;
    /// let p = Pipeline::default();
    /// let page = from_iter(&p, 1..=10).skip(3).limit(4).collect()?;
    /// assert_eq!(page, vec![4, 5, 6, 7]);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    pub fn skip(self, n: usize) -> PCollection<T> {
        let op: Arc<dyn DynOp> = Arc::new(SkipOp::<T>(n, PhantomData));
        self.attach(Node::Stage(Stage::Skip(n, op)))
    }
}
