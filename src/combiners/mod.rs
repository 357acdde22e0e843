//! Built-in combiners for `combine_globally` and as grouping downstreams.
//!
//! These are reusable implementations of [`CombineFn`](crate::CombineFn):
//!
//! - [`Count`], [`Sum<T>`], [`Min<T>`], [`Max<T>`], [`MinBy`], [`MaxBy`]
//! - [`AverageF64`] and [`Summarizing<T>`] (count, sum, min, max, mean)
//! - [`Reduce`] (fold from an identity) and [`ReduceOptional`]
//! - [`ToList`], [`ToSet`], [`ToMap`], [`Joining`]
//! - [`GroupingBy`] and [`PartitioningBy`], whose downstream is any combiner,
//!   plus the [`Mapping`] and [`CollectingAndThen`] adapters
//!
//! # Examples
//! ```
//! use seqflow::*;
//! use seqflow::combiners::{Count, GroupingBy, Mapping, ToList};
//!
//! let p = Pipeline::default();
//! let words = vec!["casa", "coche", "sol", "cama"];
//!
//! // Count words per first letter.
//! let counts = from_vec(&p, words.clone())
//!     .group_by_with(|w: &&str| w.chars().next(), Count)?;
//! assert_eq!(counts.get(&Some('c')), Some(&3));
//!
//! // Word lengths per first letter, nested inside a mapping downstream.
//! let lens = from_vec(&p, words)
//!     .combine_globally(GroupingBy::new(
//!         |w: &&str| w.chars().next(),
//!         Mapping::new(|w: &&str| w.len(), ToList),
//!     ))
//!     .collect()?;
//! assert_eq!(lens[0].get(&Some('s')), Some(&vec![3]));
//! # anyhow::Result::<()>::Ok(())
//! ```

mod basic;
mod containers;
mod grouping;
mod reduce;
mod statistical;
mod text;

// Re-export all public combiners
pub use basic::{Count, Max, MaxBy, Min, MinBy, Sum};
pub use containers::{ToList, ToMap, ToSet};
pub use grouping::{CollectingAndThen, GroupingBy, Mapping, Partitioned, PartitioningBy};
pub use reduce::{Reduce, ReduceOptional};
pub use statistical::{AverageF64, SummaryAcc, SummaryStatistics, Summarizing};
pub use text::Joining;
