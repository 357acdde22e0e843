//! Standard library helpers for constructing `PCollection`s.
//!
//! ### Overview
//! - [`from_vec`] -- Converts a `Vec<T>` into a `PCollection<T>` source node.
//! - [`from_iter`] -- Builds a `PCollection<T>` from any finite `IntoIterator<Item = T>`.
//! - [`from_generator`] -- A restartable, possibly unbounded source; it never
//!   splits, so it runs as a single chunk even in parallel mode.
//!
//! ### Example
//! ```
//! use seqflow::*;
//!
//! let p = Pipeline::default();
//! let squares = from_iter(&p, 1..=5).map(|n: &i32| n * n);
//! assert_eq!(squares.collect()?, vec![1, 4, 9, 16, 25]);
//!
//! // `limit` stops pulling, so an unbounded generator terminates.
//! let evens = from_generator(&p, || (0u64..).step_by(2)).limit(3);
//! assert_eq!(evens.collect()?, vec![0, 2, 4]);
//! # anyhow::Result::<()>::Ok(())
//! ```

use crate::node::Node;
use crate::type_token::{Generator, Stream, TypeTag, generator_ops_for, vec_ops_for};
use crate::{Element, PCollection, Pipeline};
use std::marker::PhantomData;
use std::sync::Arc;

/// Create a [`PCollection<T>`] from a pre-existing [`Vec<T>`].
///
/// The vector is shared, never mutated; every run opens a fresh stream over it.
pub fn from_vec<T>(p: &Pipeline, data: Vec<T>) -> PCollection<T>
where
    T: Element,
{
    let id = p.insert_node(Node::Source {
        payload: Arc::new(data),
        vec_ops: vec_ops_for::<T>(),
        elem_tag: TypeTag::of::<T>(),
    });
    PCollection {
        pipeline: p.clone(),
        id,
        _t: PhantomData,
    }
}

/// Create a [`PCollection<T>`] from any finite iterator by collecting it first.
pub fn from_iter<T, I>(p: &Pipeline, iter: I) -> PCollection<T>
where
    T: Element,
    I: IntoIterator<Item = T>,
{
    from_vec(p, iter.into_iter().collect::<Vec<T>>())
}

/// Create a [`PCollection<T>`] from a generator.
///
/// `open` is called once per run and must return a fresh iterator each time.
/// The iterator may be unbounded; pair it with [`limit`](PCollection::limit)
/// or a short-circuiting terminal such as [`any_match`](PCollection::any_match).
pub fn from_generator<T, I, F>(p: &Pipeline, open: F) -> PCollection<T>
where
    T: Element,
    I: IntoIterator<Item = T>,
    I::IntoIter: Send + 'static,
    F: Fn() -> I + Send + Sync + 'static,
{
    let generator = Generator::new(move || Box::new(open().into_iter()) as Stream<T>);
    let id = p.insert_node(Node::Source {
        payload: Arc::new(generator),
        vec_ops: generator_ops_for::<T>(),
        elem_tag: TypeTag::of::<T>(),
    });
    PCollection {
        pipeline: p.clone(),
        id,
        _t: PhantomData,
    }
}
