//! Testing utilities for seqflow pipelines.
//!
//! - **Assertions**: compare pipeline outputs with expected results
//! - **Test data builders**: generate sources fluently
//! - [`TestPipeline`]: a pipeline wrapper that exposes graph shape
//! - [`assert_approx_eq!`](crate::assert_approx_eq): float comparison with a tolerance
//!
//! # Quick Start
//!
//! ```
//! use seqflow::*;
//! use seqflow::testing::*;
//!
//! let p = TestPipeline::new();
//! let result = from_vec(&p, vec![1, 2, 3]).map(|x: &i32| x * 2).collect_seq()?;
//! assert_collections_equal(&result, &[2, 4, 6]);
//! # anyhow::Result::<()>::Ok(())
//! ```
//!
//! Parallel-vs-sequential checks run the same builder twice:
//!
//! ```
//! use seqflow::*;
//! use seqflow::testing::*;
//!
//! assert_same_in_parallel(|p| from_vec(p, (1..=100).collect::<Vec<i64>>()).sum(), 7)?;
//! # anyhow::Result::<()>::Ok(())
//! ```

pub mod assertions;
pub mod builders;

pub use assertions::*;
pub use builders::*;

use crate::{Pipeline, Runner};
use anyhow::Result;
use std::fmt::Debug;

/// Check that a floating-point value is within a tolerance (default `1e-10`).
///
/// ```
/// use seqflow::assert_approx_eq;
/// assert_approx_eq!(0.1 + 0.2, 0.3);
/// assert_approx_eq!(2.0f64.sqrt(), 1.414, 1e-3);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr) => {
        $crate::assert_approx_eq!($actual, $expected, 1e-10)
    };
    ($actual:expr, $expected:expr, $epsilon:expr) => {
        let actual: f64 = $actual;
        let expected: f64 = $expected;
        let epsilon: f64 = $epsilon;
        let diff = (actual - expected).abs();
        assert!(
            diff <= epsilon,
            "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n   eps: `{:?}`",
            actual,
            expected,
            diff,
            epsilon
        );
    };
}

/// A test-focused wrapper around [`Pipeline`].
///
/// Runs sequentially unless built with [`TestPipeline::parallel`].
///
/// ```
/// use seqflow::testing::TestPipeline;
/// use seqflow::from_vec;
///
/// let p = TestPipeline::new();
/// let _evens = from_vec(&p, vec![1, 2, 3]).filter(|x: &i32| x % 2 == 0);
/// assert_eq!(p.node_count(), 2);
/// assert_eq!(p.edge_count(), 1);
/// ```
#[derive(Clone)]
pub struct TestPipeline {
    pipeline: Pipeline,
}

impl TestPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::default(),
        }
    }

    /// A pipeline that splits its source into exactly `partitions` chunks
    /// (fewer when the source is shorter).
    #[must_use]
    pub fn parallel(partitions: usize) -> Self {
        Self {
            pipeline: Pipeline::with_runner(Runner::parallel(None, Some(partitions))),
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        let (nodes, _) = self.pipeline.snapshot();
        nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        let (_, edges) = self.pipeline.snapshot();
        edges.len()
    }
}

impl Default for TestPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestPipeline {
    type Target = Pipeline;

    fn deref(&self) -> &Self::Target {
        &self.pipeline
    }
}

impl AsRef<Pipeline> for TestPipeline {
    fn as_ref(&self) -> &Pipeline {
        &self.pipeline
    }
}

/// Build the same pipeline on a sequential and a `partitions`-chunk parallel
/// pipeline and assert that both runs produce equal results.
///
/// # Errors
///
/// Returns the first error either run produced.
///
/// # Panics
///
/// Panics if the two results differ.
pub fn assert_same_in_parallel<R, F>(build: F, partitions: usize) -> Result<R>
where
    R: Debug + PartialEq,
    F: Fn(&Pipeline) -> Result<R>,
{
    let sequential = build(&TestPipeline::new())?;
    let parallel = build(&TestPipeline::parallel(partitions))?;
    assert_eq!(
        sequential, parallel,
        "parallel run ({partitions} chunks) diverged from the sequential run"
    );
    Ok(sequential)
}
