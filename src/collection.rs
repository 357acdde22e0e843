use crate::node::{DynOp, Node, Stage};
use crate::node_id::NodeId;
use crate::pipeline::Pipeline;
use crate::planner::build_plan;
use crate::runner::Runner;
use crate::type_token::{Partition, partition_stream, stream_partition};
use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::sync::Arc;

/// Bound shared by every element type flowing through a pipeline.
pub trait Element: 'static + Send + Sync + Clone {}
impl<T> Element for T where T: 'static + Send + Sync + Clone {}

/// A typed handle to one node of a [`Pipeline`].
///
/// Stage methods consume the handle and attach a new node; nothing runs until a
/// terminal (`collect`, `count`, `group_by`, ...) drains the chain.
#[derive(Clone)]
pub struct PCollection<T> {
    pub(crate) pipeline: Pipeline,
    pub(crate) id: NodeId,
    pub(crate) _t: PhantomData<T>,
}

/// An associative aggregation: `create` an accumulator per chunk, `add_input`
/// each element, `merge` accumulators in chunk order, then `finish`.
pub trait CombineFn<V, A, O>: Send + Sync + 'static {
    fn create(&self) -> A;
    fn add_input(&self, acc: &mut A, v: V);
    fn merge(&self, acc: &mut A, other: A);
    fn finish(&self, acc: A) -> O;
}

/// ---- Stateless DynOps ----
struct MapOp<I, O, F>(Arc<F>, PhantomData<fn(I) -> O>);
impl<I, O, F> DynOp for MapOp<I, O, F>
where
    I: Element,
    O: Element,
    F: Send + Sync + Fn(&I) -> O + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let s = partition_stream::<I>(input, "map")?;
        let f = Arc::clone(&self.0);
        Ok(stream_partition::<O>(Box::new(s.map(move |i| f(&i)))))
    }
}

struct FilterOp<T, P>(Arc<P>, PhantomData<fn() -> T>);
impl<T, P> DynOp for FilterOp<T, P>
where
    T: Element,
    P: Send + Sync + Fn(&T) -> bool + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let s = partition_stream::<T>(input, "filter")?;
        let pred = Arc::clone(&self.0);
        Ok(stream_partition::<T>(Box::new(s.filter(move |t| pred(t)))))
    }
}

struct FlatMapOp<I, O, F>(Arc<F>, PhantomData<fn(I) -> O>);
impl<I, O, F, It> DynOp for FlatMapOp<I, O, F>
where
    I: Element,
    O: Element,
    F: Send + Sync + Fn(&I) -> It + 'static,
    It: IntoIterator<Item = O> + 'static,
    It::IntoIter: Send + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let s = partition_stream::<I>(input, "flat_map")?;
        let f = Arc::clone(&self.0);
        Ok(stream_partition::<O>(Box::new(s.flat_map(move |i| f(&i)))))
    }
}

impl<T: Element> PCollection<T> {
    /// Attach `node` downstream of this collection.
    pub(crate) fn attach<O>(self, node: Node) -> PCollection<O> {
        let id = self.pipeline.insert_node(node);
        self.pipeline.connect(self.id, id);
        PCollection {
            pipeline: self.pipeline,
            id,
            _t: PhantomData,
        }
    }

    /// Replace every element with `f(element)`.
    pub fn map<O, F>(self, f: F) -> PCollection<O>
    where
        O: Element,
        F: 'static + Send + Sync + Fn(&T) -> O,
    {
        let op: Arc<dyn DynOp> = Arc::new(MapOp::<T, O, F>(Arc::new(f), PhantomData));
        self.attach(Node::Stage(Stage::Transform(op)))
    }

    /// Keep elements for which `pred` holds.
    pub fn filter<F>(self, pred: F) -> PCollection<T>
    where
        F: 'static + Send + Sync + Fn(&T) -> bool,
    {
        let op: Arc<dyn DynOp> = Arc::new(FilterOp::<T, F>(Arc::new(pred), PhantomData));
        self.attach(Node::Stage(Stage::Filter(op)))
    }

    /// Replace every element with the elements of `f(element)`, concatenated in
    /// upstream order.
    ///
    /// ```
    /// use seqflow::*;
    /// let p = Pipeline::default();
    /// let flat = from_vec(&p, vec![vec![1, 2], vec![], vec![3]])
    ///     .flat_map(|v: &Vec<i32>| v.clone())
    ///     .collect()?;
    /// assert_eq!(flat, vec![1, 2, 3]);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    pub fn flat_map<O, I, F>(self, f: F) -> PCollection<O>
    where
        O: Element,
        I: IntoIterator<Item = O> + 'static,
        I::IntoIter: Send + 'static,
        F: 'static + Send + Sync + Fn(&T) -> I,
    {
        let op: Arc<dyn DynOp> = Arc::new(FlatMapOp::<T, O, F>(Arc::new(f), PhantomData));
        self.attach(Node::Stage(Stage::FlattenMap(op)))
    }

    /// Run with the pipeline's runner and materialize every element.
    pub fn collect(self) -> Result<Vec<T>> {
        let runner = *self.pipeline.runner();
        runner.run_collect::<T>(&self.pipeline, self.id)
    }

    pub fn collect_seq(self) -> Result<Vec<T>> {
        Runner::sequential().run_collect::<T>(&self.pipeline, self.id)
    }

    /// Run in parallel; chunk outputs are concatenated in chunk order.
    pub fn collect_par(self, threads: Option<usize>, partitions: Option<usize>) -> Result<Vec<T>> {
        Runner::parallel(threads, partitions).run_collect::<T>(&self.pipeline, self.id)
    }

    /// Alias for [`collect`](Self::collect).
    pub fn to_list(self) -> Result<Vec<T>> {
        self.collect()
    }

    /// Run a combine output, which always holds exactly one element.
    pub(crate) fn single(self) -> Result<T> {
        self.collect()?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("combine produced no output"))
    }

    /// Describe the chain that a terminal on this collection would execute.
    pub fn explain(&self) -> Result<String> {
        Ok(build_plan(&self.pipeline, self.id)?.to_string())
    }
}
