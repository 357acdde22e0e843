//! Aggregate terminals: counting, sums, means, extremes and folds.
//!
//! Every terminal here runs the chain immediately with the pipeline's runner
//! and returns the single aggregate. Results that do not exist for an empty
//! input come back as `None`.

use crate::combiners::{
    AverageF64, Count, Max, MaxBy, Min, MinBy, Reduce, ReduceOptional, Sum, SummaryStatistics,
    Summarizing,
};
use crate::{Element, PCollection};
use anyhow::Result;
use std::cmp::Ordering;
use std::ops::Add;

impl<T: Element> PCollection<T> {
    /// Number of elements reaching this point.
    pub fn count(self) -> Result<u64> {
        self.combine_globally(Count).single()
    }

    /// Smallest element under `cmp`; the first one wins on ties.
    pub fn min_by<F>(self, cmp: F) -> Result<Option<T>>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.combine_globally(MinBy::new(cmp)).single()
    }

    /// Largest element under `cmp`; the first one wins on ties.
    pub fn max_by<F>(self, cmp: F) -> Result<Option<T>>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.combine_globally(MaxBy::new(cmp)).single()
    }

    /// Left fold from `identity`.
    ///
    /// ```
    /// use seqflow::*;
    /// let p = Pipeline::default();
    /// let product = from_iter(&p, 1..=10i64).reduce(1, |a, b| a * b)?;
    /// assert_eq!(product, 3_628_800);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    pub fn reduce<F>(self, identity: T, op: F) -> Result<T>
    where
        F: Fn(T, T) -> T + Send + Sync + 'static,
    {
        self.combine_globally(Reduce::new(identity, op)).single()
    }

    /// Left fold seeded by the first element; `None` when empty.
    pub fn reduce_optional<F>(self, op: F) -> Result<Option<T>>
    where
        F: Fn(T, T) -> T + Send + Sync + 'static,
    {
        self.combine_globally(ReduceOptional::new(op)).single()
    }
}

impl<T: Element + Add<Output = T> + Default> PCollection<T> {
    /// Sum of all elements; `T::default()` when empty.
    pub fn sum(self) -> Result<T> {
        self.combine_globally(Sum::<T>::new()).single()
    }
}

impl<T: Element + Into<f64>> PCollection<T> {
    pub fn average(self) -> Result<Option<f64>> {
        self.combine_globally(AverageF64).single()
    }
}

impl<T> PCollection<T>
where
    T: Element + Add<Output = T> + Default + PartialOrd + Into<f64>,
{
    /// Count, sum, min, max and mean in one pass.
    pub fn summarize(self) -> Result<SummaryStatistics<T>> {
        self.combine_globally(Summarizing::<T>::new()).single()
    }
}

impl<T: Element + Ord> PCollection<T> {
    pub fn min(self) -> Result<Option<T>> {
        self.combine_globally(Min::<T>::new()).single()
    }

    pub fn max(self) -> Result<Option<T>> {
        self.combine_globally(Max::<T>::new()).single()
    }
}
