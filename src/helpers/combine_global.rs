//! Global (non-keyed) combines.
//!
//! `combine_globally` folds every element into a single output with a
//! [`CombineFn`]. Under parallel execution each chunk builds its own
//! accumulator; accumulators are merged in chunk order, so a combiner that is
//! associative gives the same result for any chunking.

use std::sync::Arc;

use crate::collection::CombineFn;
use crate::node::{FinishFn, LocalFn, MergeFn, Node};
use crate::type_token::{Partition, partition_stream, stream_partition};
use crate::{Element, PCollection};
use anyhow::{Result, anyhow};

fn downcast_acc<A: Send + 'static>(p: Partition, site: &str) -> Result<A> {
    p.downcast::<A>()
        .map(|b| *b)
        .map_err(|_| anyhow!("{site}: bad accumulator type"))
}

impl<T: Element> PCollection<T> {
    /// Combine all elements into one output using `comb`.
    ///
    /// Produces exactly one element even for empty inputs (`finish(create())`).
    ///
    /// ```
    /// use seqflow::*;
    /// use seqflow::combiners::Sum;
    ///
    /// let p = Pipeline::default();
    /// let out = from_vec(&p, vec![1u64, 2, 3, 4])
    ///     .combine_globally(Sum::<u64>::default())
    ///     .collect()?;
    /// assert_eq!(out, vec![10u64]);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    pub fn combine_globally<C, A, O>(self, comb: C) -> PCollection<O>
    where
        C: CombineFn<T, A, O> + 'static,
        A: Send + 'static,
        O: Element,
    {
        let comb = Arc::new(comb);

        // local: Stream<T> -> A
        let local: LocalFn = {
            let comb = Arc::clone(&comb);
            Arc::new(move |p: Partition| -> Result<Partition> {
                let rows = partition_stream::<T>(p, "combine local")?;
                let mut acc = comb.create();
                for v in rows {
                    comb.add_input(&mut acc, v);
                }
                Ok(Box::new(acc) as Partition)
            })
        };

        // merge: Vec<A> -> A
        let merge: MergeFn = {
            let comb = Arc::clone(&comb);
            Arc::new(move |parts: Vec<Partition>| -> Result<Partition> {
                let mut it = parts.into_iter();
                let mut acc = match it.next() {
                    Some(first) => downcast_acc::<A>(first, "combine merge")?,
                    None => comb.create(),
                };
                for p in it {
                    comb.merge(&mut acc, downcast_acc::<A>(p, "combine merge")?);
                }
                Ok(Box::new(acc) as Partition)
            })
        };

        // finish: A -> Stream<O> (singleton)
        let finish: FinishFn = {
            let comb = Arc::clone(&comb);
            Arc::new(move |p: Partition| -> Result<Partition> {
                let acc = downcast_acc::<A>(p, "combine finish")?;
                let out = comb.finish(acc);
                Ok(stream_partition::<O>(Box::new(std::iter::once(out))))
            })
        };

        self.attach(Node::CombineGlobal {
            local,
            merge,
            finish,
        })
    }
}
