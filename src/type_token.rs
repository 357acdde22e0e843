//! Type tags, lazy streams, and type-erased source helpers.
//!
//! This module provides:
//! - [`Stream`]: the lazy, pull-based element stream every stage consumes and
//!   produces. Streams are finite or unbounded, and not restartable.
//! - [`Partition`]: a type-erased box carrying a `Stream<T>` (or a combiner
//!   accumulator) between nodes at runtime.
//! - [`TypeTag`]: a lightweight runtime type identifier attached to sources.
//! - [`VecOps`]: a type-erased interface the runner uses to measure a source,
//!   split it into contiguous chunks, and open a single stream over it.
//!
//! Two implementations ship with the crate: [`VecOpsImpl`] for in-memory
//! `Vec<T>` sources and [`GeneratorOps`] for restartable generator sources,
//! which may be unbounded and therefore never split.

use anyhow::{Result, anyhow};
use std::any::{Any, TypeId, type_name};
use std::marker::PhantomData;
use std::sync::Arc;

/// A lazy, single-pass stream of elements.
pub type Stream<T> = Box<dyn Iterator<Item = T> + Send>;

/// A partition buffer carried between nodes at runtime.
///
/// Stages downcast it to the `Stream<T>` they expect; combiner nodes downcast
/// it to their accumulator type.
pub type Partition = Box<dyn Any + Send>;

/// Box a typed stream into a [`Partition`].
pub(crate) fn stream_partition<T: Send + 'static>(stream: Stream<T>) -> Partition {
    Box::new(stream)
}

/// Recover a typed stream from a [`Partition`], naming the call site on mismatch.
pub(crate) fn partition_stream<T: Send + 'static>(part: Partition, site: &str) -> Result<Stream<T>> {
    part.downcast::<Stream<T>>()
        .map(|b| *b)
        .map_err(|_| anyhow!("{site}: expected a stream of {}", type_name::<T>()))
}

/// Build a stream whose contents are computed on first pull.
///
/// Barrier stages (sorting) use this so that upstream work still happens when
/// the stream is drained, not when the chain is assembled.
pub(crate) fn deferred<T, F>(produce: F) -> Stream<T>
where
    T: Send + 'static,
    F: FnOnce() -> Vec<T> + Send + 'static,
{
    let mut pending = Some(produce);
    let mut ready: Option<std::vec::IntoIter<T>> = None;
    Box::new(std::iter::from_fn(move || {
        if let Some(produce) = pending.take() {
            ready = Some(produce().into_iter());
        }
        ready.as_mut()?.next()
    }))
}

/// A lightweight runtime type tag for debugging and assertions.
///
/// ```
/// use seqflow::type_token::TypeTag;
/// let tag = TypeTag::of::<u32>();
/// assert_eq!(tag.name, "u32");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag {
    /// Stable Rust type identifier.
    pub id: TypeId,
    /// Human-readable type name (best-effort).
    pub name: &'static str,
}

impl TypeTag {
    /// Construct a tag for `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// Type-erased helpers for source payloads.
///
/// Implementations must return `None` when `data` is not the payload type they
/// expect.
pub trait VecOps: Send + Sync {
    /// Number of elements, or `None` when unknown (e.g. an unbounded generator).
    fn len(&self, data: &dyn Any) -> Option<usize>;

    /// Split the payload into up to `n` contiguous streams, preserving order
    /// within and across the returned chunks.
    fn split(&self, data: &dyn Any, n: usize) -> Option<Vec<Partition>>;

    /// Open one stream over the whole payload.
    fn stream(&self, data: &dyn Any) -> Option<Partition>;
}

/// `VecOps` for an in-memory `Vec<T>`.
pub struct VecOpsImpl<T: Clone + Send + Sync + 'static>(PhantomData<T>);

impl<T: Clone + Send + Sync + 'static> VecOps for VecOpsImpl<T> {
    fn len(&self, data: &dyn Any) -> Option<usize> {
        data.downcast_ref::<Vec<T>>().map(Vec::len)
    }

    fn split(&self, data: &dyn Any, n: usize) -> Option<Vec<Partition>> {
        let v = data.downcast_ref::<Vec<T>>()?;
        let len = v.len();

        if n <= 1 || len <= 1 {
            return self.stream(data).map(|s| vec![s]);
        }

        // Contiguous chunks of ceil(len / n); the last chunk may be shorter.
        let chunk = len.div_ceil(n);
        let parts = v
            .chunks(chunk)
            .map(|c| stream_partition::<T>(Box::new(c.to_vec().into_iter())))
            .collect();
        Some(parts)
    }

    fn stream(&self, data: &dyn Any) -> Option<Partition> {
        data.downcast_ref::<Vec<T>>()
            .map(|v| stream_partition::<T>(Box::new(v.clone().into_iter())))
    }
}

/// Create a type-erased `VecOps` for `Vec<T>`.
///
/// ```
/// use seqflow::type_token::{vec_ops_for, VecOps};
///
/// let ops = vec_ops_for::<i64>();
/// let data = vec![1i64, 2, 3];
/// assert_eq!(ops.len(&data), Some(3));
/// assert_eq!(ops.split(&data, 2).map(|p| p.len()), Some(2));
/// ```
pub fn vec_ops_for<T: Clone + Send + Sync + 'static>() -> Arc<dyn VecOps> {
    Arc::new(VecOpsImpl::<T>(PhantomData))
}

/// Payload of a generator source: a factory that opens a fresh stream per run.
pub struct Generator<T> {
    open: Box<dyn Fn() -> Stream<T> + Send + Sync>,
}

impl<T> Generator<T> {
    pub fn new<F>(open: F) -> Self
    where
        F: Fn() -> Stream<T> + Send + Sync + 'static,
    {
        Self {
            open: Box::new(open),
        }
    }
}

/// `VecOps` for [`Generator`] payloads. Generators have no known length and
/// always run as a single chunk.
pub struct GeneratorOps<T>(PhantomData<fn() -> T>);

impl<T: Send + 'static> VecOps for GeneratorOps<T> {
    fn len(&self, _data: &dyn Any) -> Option<usize> {
        None
    }

    fn split(&self, data: &dyn Any, _n: usize) -> Option<Vec<Partition>> {
        self.stream(data).map(|s| vec![s])
    }

    fn stream(&self, data: &dyn Any) -> Option<Partition> {
        data.downcast_ref::<Generator<T>>()
            .map(|g| stream_partition::<T>((g.open)()))
    }
}

pub(crate) fn generator_ops_for<T: Send + 'static>() -> Arc<dyn VecOps> {
    Arc::new(GeneratorOps::<T>(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T: Send + 'static>(part: Partition) -> Vec<T> {
        partition_stream::<T>(part, "test").unwrap().collect()
    }

    #[test]
    fn split_keeps_chunks_contiguous() {
        let ops = vec_ops_for::<u32>();
        let data: Vec<u32> = (1..=10).collect();
        let parts = ops.split(&data, 3).unwrap();
        let chunks: Vec<Vec<u32>> = parts.into_iter().map(drain::<u32>).collect();
        assert_eq!(
            chunks,
            vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10]]
        );
    }

    #[test]
    fn split_of_empty_source_yields_one_empty_chunk() {
        let ops = vec_ops_for::<u32>();
        let data: Vec<u32> = Vec::new();
        let parts = ops.split(&data, 8).unwrap();
        assert_eq!(parts.len(), 1);
        assert!(drain::<u32>(parts.into_iter().next().unwrap()).is_empty());
    }

    #[test]
    fn wrong_payload_type_is_rejected() {
        let ops = vec_ops_for::<u32>();
        let data = vec!["a".to_string()];
        assert!(ops.len(&data).is_none());
        assert!(ops.stream(&data).is_none());
    }

    #[test]
    fn deferred_runs_producer_on_first_pull() {
        use std::sync::atomic::{AtomicBool, Ordering};
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let mut s = deferred(move || {
            flag.store(true, Ordering::SeqCst);
            vec![1, 2]
        });
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(s.next(), Some(1));
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn generator_never_splits() {
        let ops = generator_ops_for::<u64>();
        let g = Generator::new(|| Box::new(0u64..) as Stream<u64>);
        assert_eq!(ops.len(&g), None);
        let parts = ops.split(&g, 16).unwrap();
        assert_eq!(parts.len(), 1);
        let first: Vec<u64> = partition_stream::<u64>(parts.into_iter().next().unwrap(), "t")
            .unwrap()
            .take(3)
            .collect();
        assert_eq!(first, vec![0, 1, 2]);
    }
}
