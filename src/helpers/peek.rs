//! Observation stages: `peek` runs a callback on each element as it is pulled,
//! `inspect` logs each element at `DEBUG`.

use crate::node::{DynOp, Node, Stage};
use crate::type_token::{Partition, partition_stream, stream_partition};
use crate::{Element, PCollection};
use anyhow::Result;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

struct PeekOp<T, F>(Arc<F>, PhantomData<fn() -> T>);

impl<T, F> DynOp for PeekOp<T, F>
where
    T: Element,
    F: Fn(&T) + Send + Sync + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let s = partition_stream::<T>(input, "peek")?;
        let f = Arc::clone(&self.0);
        Ok(stream_partition::<T>(Box::new(s.inspect(move |t| f(t)))))
    }
}

impl<T: Element> PCollection<T> {
    /// Call `f` on every element that flows past this point, without changing it.
    ///
    /// Elements dropped upstream or never pulled (because of a downstream
    /// `limit`) are not observed.
    pub fn peek<F>(self, f: F) -> PCollection<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let op: Arc<dyn DynOp> = Arc::new(PeekOp::<T, F>(Arc::new(f), PhantomData));
        self.attach(Node::Stage(Stage::Inspect(op)))
    }

    /// Log every element flowing past this point under `label`.
    pub fn inspect(self, label: &str) -> PCollection<T>
    where
        T: Debug,
    {
        let label = label.to_string();
        self.peek(move |t| debug!(label = %label, element = ?t, "inspect"))
    }
}
