//! Statistical combiners: `AverageF64`, `Summarizing`

use crate::Element;
use crate::collection::CombineFn;
use serde::Serialize;
use std::marker::PhantomData;
use std::mem::take;
use std::ops::Add;

/* ===================== AverageF64 ===================== */

/// Arithmetic mean as `f64`; `None` for an empty input.
///
/// Values must be convertible into `f64` via `Into<f64>`.
///
/// - Accumulator: `(sum_f64, count_u64)`
/// - Output: `Option<f64>`
#[derive(Clone, Copy, Debug, Default)]
pub struct AverageF64;

impl<V> CombineFn<V, (f64, u64), Option<f64>> for AverageF64
where
    V: Element + Into<f64>,
{
    fn create(&self) -> (f64, u64) {
        (0.0, 0)
    }

    fn add_input(&self, acc: &mut (f64, u64), v: V) {
        acc.0 += v.into();
        acc.1 += 1;
    }

    fn merge(&self, acc: &mut (f64, u64), other: (f64, u64)) {
        acc.0 += other.0;
        acc.1 += other.1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(&self, acc: (f64, u64)) -> Option<f64> {
        (acc.1 > 0).then(|| acc.0 / acc.1 as f64)
    }
}

/* ===================== Summarizing<T> ===================== */

/// Count, sum, extremes and mean of a numeric sequence, gathered in one pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryStatistics<T> {
    pub count: u64,
    pub sum: T,
    pub min: Option<T>,
    pub max: Option<T>,
    /// `None` when `count == 0`.
    pub average: Option<f64>,
}

/// Running state of [`Summarizing`].
#[derive(Clone, Debug, Default)]
pub struct SummaryAcc<T> {
    count: u64,
    sum: T,
    min: Option<T>,
    max: Option<T>,
}

/// Builds [`SummaryStatistics`]; the mean is computed from the sum.
#[derive(Clone, Copy, Debug, Default)]
pub struct Summarizing<T>(pub PhantomData<T>);
impl<T> Summarizing<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, SummaryAcc<T>, SummaryStatistics<T>> for Summarizing<T>
where
    T: Element + Add<Output = T> + Default + PartialOrd + Into<f64>,
{
    fn create(&self) -> SummaryAcc<T> {
        SummaryAcc::default()
    }

    fn add_input(&self, acc: &mut SummaryAcc<T>, v: T) {
        acc.count += 1;
        acc.sum = take(&mut acc.sum) + v.clone();
        if acc.min.as_ref().is_none_or(|m| v < *m) {
            acc.min = Some(v.clone());
        }
        if acc.max.as_ref().is_none_or(|m| v > *m) {
            acc.max = Some(v);
        }
    }

    fn merge(&self, acc: &mut SummaryAcc<T>, other: SummaryAcc<T>) {
        acc.count += other.count;
        acc.sum = take(&mut acc.sum) + other.sum;
        if let Some(m) = other.min {
            if acc.min.as_ref().is_none_or(|cur| m < *cur) {
                acc.min = Some(m);
            }
        }
        if let Some(m) = other.max {
            if acc.max.as_ref().is_none_or(|cur| m > *cur) {
                acc.max = Some(m);
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(&self, acc: SummaryAcc<T>) -> SummaryStatistics<T> {
        let average = (acc.count > 0).then(|| Into::<f64>::into(acc.sum.clone()) / acc.count as f64);
        SummaryStatistics {
            count: acc.count,
            sum: acc.sum,
            min: acc.min,
            max: acc.max,
            average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_split_input_matches_single_pass() {
        let s = Summarizing::<i32>::new();
        let mut left = s.create();
        let mut right = s.create();
        for v in [4, 9, 1] {
            s.add_input(&mut left, v);
        }
        for v in [7, 3] {
            s.add_input(&mut right, v);
        }
        s.merge(&mut left, right);
        let stats = s.finish(left);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.sum, 24);
        assert_eq!(stats.min, Some(1));
        assert_eq!(stats.max, Some(9));
        assert_eq!(stats.average, Some(4.8));
    }

    #[test]
    fn empty_summary_has_no_extremes_or_mean() {
        let s = Summarizing::<f64>::new();
        let stats = s.finish(s.create());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.min, None);
        assert_eq!(stats.average, None);
    }
}
