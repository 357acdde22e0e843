//! Test data builders for creating sources fluently.

use crate::value::Value;
use std::ops::RangeInclusive;

/// A fluent builder for test sources.
///
/// ```
/// use seqflow::testing::TestDataBuilder;
///
/// let data = TestDataBuilder::new()
///     .add_range(1..=10)
///     .add_value(100)
///     .add_repeated(42, 5)
///     .build();
///
/// assert_eq!(data.len(), 16);
/// ```
#[derive(Default)]
pub struct TestDataBuilder<T> {
    data: Vec<T>,
}

impl<T> TestDataBuilder<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    #[must_use]
    pub fn add_value(mut self, value: T) -> Self {
        self.data.push(value);
        self
    }

    #[must_use]
    pub fn add_values(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.data.extend(values);
        self
    }

    #[must_use]
    pub fn add_repeated(mut self, value: T, count: usize) -> Self
    where
        T: Clone,
    {
        self.data.extend(std::iter::repeat_n(value, count));
        self
    }

    /// Add a range of integers, converted into `T`.
    #[must_use]
    pub fn add_range(mut self, range: RangeInclusive<i32>) -> Self
    where
        T: From<i32>,
    {
        self.data.extend(range.map(T::from));
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<T> {
        self.data
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Builder for key/value [`Value::Pair`] sources, the input of map containers.
///
/// ```
/// use seqflow::testing::PairDataBuilder;
///
/// let pairs = PairDataBuilder::new()
///     .add_pair("a", 1)
///     .add_key_with_values("b", [2, 3])
///     .build();
/// assert_eq!(pairs.len(), 3);
/// ```
#[derive(Default)]
pub struct PairDataBuilder {
    data: Vec<Value>,
}

impl PairDataBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    #[must_use]
    pub fn add_pair(mut self, key: impl Into<Value>, value: impl Into<Value>) -> Self {
        self.data.push(Value::pair(key, value));
        self
    }

    /// One pair per value, all sharing `key`.
    #[must_use]
    pub fn add_key_with_values<V: Into<Value>>(
        mut self,
        key: impl Into<Value>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let key = key.into();
        self.data
            .extend(values.into_iter().map(|v| Value::pair(key.clone(), v)));
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<Value> {
        self.data
    }
}

/// Deterministic pseudo-random integers in `[min, max]` from a simple LCG.
///
/// ```
/// use seqflow::testing::pseudo_random_data;
///
/// let a = pseudo_random_data(50, 0, 9);
/// assert_eq!(a, pseudo_random_data(50, 0, 9));
/// assert!(a.iter().all(|x| (0..=9).contains(x)));
/// ```
#[must_use]
pub fn pseudo_random_data(count: usize, min: i64, max: i64) -> Vec<i64> {
    let span = u64::try_from(max - min + 1).unwrap_or(1).max(1);
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            min + i64::try_from((state >> 33) % span).unwrap_or(0)
        })
        .collect()
}
