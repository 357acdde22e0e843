//! # Seqflow
//!
//! A **lazy sequence pipeline** library: declare a source, chain stages onto
//! it, and end with a terminal that reduces or materializes the result.
//! Nothing runs until the terminal; stages pull elements one at a time, so a
//! `limit` downstream of an unbounded generator terminates.
//!
//! ## Key Features
//!
//! - **Fluent typed API** - `from_vec(&p, data).filter(..).map(..).sorted().limit(3).collect()`
//! - **Lazy, short-circuiting stages** - filter, map, flat_map, sorted, limit, skip, distinct, peek
//! - **Built-in combiners** - count, sum, min/max, average, summary statistics, reduce
//! - **Grouping** - group_by and partition_by with composable downstream combiners
//! - **Containers** - lists, sets, maps with merge policies, joined text
//! - **Sequential and parallel execution** - parallel runs split the source into chunks on rayon
//! - **Dynamic evaluation** - [`evaluate`] runs a pipeline described as data over [`Value`]s
//!
//! ## Quick Start
//!
//! ```
//! use seqflow::*;
//!
//! let p = Pipeline::default();
//! let words = from_vec(&p, vec!["casa", "coche", "árbol", "libro", "sol"]);
//!
//! let long = words
//!     .filter(|w: &&str| w.chars().count() > 3)
//!     .map(|w: &&str| w.to_uppercase())
//!     .collect()?;
//! assert_eq!(long, vec!["CASA", "COCHE", "ÁRBOL", "LIBRO"]);
//! # anyhow::Result::<()>::Ok(())
//! ```
//!
//! ## Core Concepts
//!
//! ### Pipeline
//!
//! A [`Pipeline`] owns the graph of stages and the [`Runner`] its terminals
//! execute with. `Pipeline::default()` runs sequentially on the caller's
//! thread; [`Pipeline::parallel`] splits sources into contiguous chunks.
//!
//! ### PCollection
//!
//! A [`PCollection<T>`] is a handle to one node of the graph. Stages consume
//! the handle and return a new one; clone it to branch. Each terminal builds a
//! fresh stream from the source, so a collection can be evaluated repeatedly.
//!
//! ### Combiners
//!
//! Aggregating terminals are [`CombineFn`]s: `create` an accumulator,
//! `add_input` each element, `merge` accumulators from different chunks, then
//! `finish`. The [`combiners`] module has the built-in ones, and grouping
//! terminals accept any of them as a downstream.
//!
//! ```
//! use seqflow::*;
//! use seqflow::combiners::Count;
//!
//! let p = Pipeline::default();
//! let lengths = from_vec(&p, vec!["uno", "dos", "tres", "cuatro", "cinco"])
//!     .group_by_with(|w: &&str| w.len(), Count)?;
//! assert_eq!(lengths.get(&3), Some(&2));
//! # anyhow::Result::<()>::Ok(())
//! ```
//!
//! ### Parallel execution
//!
//! Count, sum, min, max, average, statistics and reduce with an associative
//! operator give the same result in both modes. `sorted`, `limit`, `skip`
//! and `distinct` apply per chunk under parallel execution; request a
//! sequential run when their global semantics matter.
//!
//! ### Dynamic evaluation
//!
//! The [`evaluator`] module describes a pipeline as data: a `Vec<Value>`
//! source, a list of [`Stage`]s and one [`Terminal`]. Type requirements are
//! checked at run time and reported as [`ConfigError`]s.
//!
//! ## Module Overview
//!
//! - [`collection`] - `PCollection` and the core element-wise stages
//! - [`combiners`] - built-in [`CombineFn`]s
//! - [`evaluator`] - dynamic pipelines over [`Value`]
//! - [`pipeline`] - graph construction
//! - [`planner`] - chain recovery and `explain` output
//! - [`runner`] - sequential and parallel execution
//! - [`testing`] - assertions and builders for pipeline tests

pub mod collection;
pub mod combiners;
pub mod error;
pub mod evaluator;
pub mod helpers;
pub mod node;
pub mod node_id;
pub mod ordered_map;
pub mod pipeline;
pub mod planner;
pub mod runner;
pub mod testing;
pub mod type_token;
pub mod value;

// General re-exports
pub use collection::{CombineFn, Element, PCollection};
pub use combiners::{AverageF64, Count, Max, Min, Sum};
pub use error::{ConfigError, FaultSlot};
pub use evaluator::{ContainerKind, EvalOptions, MergePolicy, Outcome, Stage, Terminal, evaluate};
pub use helpers::*;
pub use node_id::NodeId;
pub use ordered_map::OrderedMap;
pub use pipeline::Pipeline;
pub use runner::{ExecMode, Runner};
pub use value::{Value, ValueKind, values};
