//! Basic combiners: Count, Sum, Min, Max, MinBy, MaxBy

use crate::Element;
use crate::collection::CombineFn;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::mem::take;
use std::ops::Add;

/* ===================== Count ===================== */

/// Number of elements.
#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl<V> CombineFn<V, u64, u64> for Count {
    fn create(&self) -> u64 {
        0
    }

    fn add_input(&self, acc: &mut u64, _v: V) {
        *acc += 1;
    }

    fn merge(&self, acc: &mut u64, other: u64) {
        *acc += other;
    }

    fn finish(&self, acc: u64) -> u64 {
        acc
    }
}

/* ===================== Sum<T> ===================== */

/// Sum of values; `T::default()` for an empty input.
///
/// Requires `T: Add<Output=T> + Default`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sum<T>(pub PhantomData<T>);
impl<T> Sum<T> {
    /// Convenience constructor (same as `Default`).
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, T, T> for Sum<T>
where
    T: Element + Add<Output = T> + Default,
{
    fn create(&self) -> T {
        T::default()
    }

    fn add_input(&self, acc: &mut T, v: T) {
        *acc = take(acc) + v;
    }

    fn merge(&self, acc: &mut T, other: T) {
        *acc = take(acc) + other;
    }

    fn finish(&self, acc: T) -> T {
        acc
    }
}

/* ===================== MinBy / MaxBy ===================== */

/// Smallest element under a comparator; `None` when empty.
///
/// On ties the element encountered first is kept.
pub struct MinBy<T, F> {
    cmp: F,
    _t: PhantomData<fn() -> T>,
}

impl<T, F> MinBy<T, F> {
    pub fn new(cmp: F) -> Self {
        Self {
            cmp,
            _t: PhantomData,
        }
    }
}

impl<T, F> CombineFn<T, Option<T>, Option<T>> for MinBy<T, F>
where
    T: Element,
    F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    fn create(&self) -> Option<T> {
        None
    }

    fn add_input(&self, acc: &mut Option<T>, v: T) {
        self.merge(acc, Some(v));
    }

    fn merge(&self, acc: &mut Option<T>, other: Option<T>) {
        if let Some(b) = other {
            match acc {
                Some(a) => {
                    if (self.cmp)(&b, a) == Ordering::Less {
                        *a = b
                    }
                }
                None => *acc = Some(b),
            }
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

/// Largest element under a comparator; `None` when empty.
///
/// On ties the element encountered first is kept.
pub struct MaxBy<T, F> {
    cmp: F,
    _t: PhantomData<fn() -> T>,
}

impl<T, F> MaxBy<T, F> {
    pub fn new(cmp: F) -> Self {
        Self {
            cmp,
            _t: PhantomData,
        }
    }
}

impl<T, F> CombineFn<T, Option<T>, Option<T>> for MaxBy<T, F>
where
    T: Element,
    F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    fn create(&self) -> Option<T> {
        None
    }

    fn add_input(&self, acc: &mut Option<T>, v: T) {
        self.merge(acc, Some(v));
    }

    fn merge(&self, acc: &mut Option<T>, other: Option<T>) {
        if let Some(b) = other {
            match acc {
                Some(a) => {
                    if (self.cmp)(&b, a) == Ordering::Greater {
                        *a = b
                    }
                }
                None => *acc = Some(b),
            }
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

/* ===================== Min<T> / Max<T> ===================== */

/// Minimum value by natural ordering; `None` when empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct Min<T>(pub PhantomData<T>);
impl<T> Min<T> {
    /// Convenience constructor (same as `Default`).
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, Option<T>, Option<T>> for Min<T>
where
    T: Element + Ord,
{
    fn create(&self) -> Option<T> {
        None
    }

    fn add_input(&self, acc: &mut Option<T>, v: T) {
        self.merge(acc, Some(v));
    }

    fn merge(&self, acc: &mut Option<T>, other: Option<T>) {
        if let Some(b) = other {
            match acc {
                Some(a) => {
                    if b < *a {
                        *a = b
                    }
                }
                None => *acc = Some(b),
            }
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

/// Maximum value by natural ordering; `None` when empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct Max<T>(pub PhantomData<T>);
impl<T> Max<T> {
    /// Convenience constructor (same as `Default`).
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, Option<T>, Option<T>> for Max<T>
where
    T: Element + Ord,
{
    fn create(&self) -> Option<T> {
        None
    }

    fn add_input(&self, acc: &mut Option<T>, v: T) {
        self.merge(acc, Some(v));
    }

    fn merge(&self, acc: &mut Option<T>, other: Option<T>) {
        if let Some(b) = other {
            match acc {
                Some(a) => {
                    if b > *a {
                        *a = b
                    }
                }
                None => *acc = Some(b),
            }
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_keep_the_first_element() {
        let by_len = |a: &(usize, &str), b: &(usize, &str)| a.0.cmp(&b.0);
        let min = MinBy::<(usize, &str), _>::new(by_len);
        let max = MaxBy::<(usize, &str), _>::new(by_len);

        let mut lo = min.create();
        let mut hi = max.create();
        for v in [(4, "casa"), (3, "sol"), (3, "mar"), (5, "coche"), (5, "libro")] {
            min.add_input(&mut lo, v);
            max.add_input(&mut hi, v);
        }
        assert_eq!(min.finish(lo), Some((3, "sol")));
        assert_eq!(max.finish(hi), Some((5, "coche")));
    }

    #[test]
    fn merge_with_empty_accumulator_is_identity() {
        let m = Max::<i32>::new();
        let mut acc = Some(7);
        m.merge(&mut acc, None);
        assert_eq!(acc, Some(7));
        let mut empty = m.create();
        m.merge(&mut empty, Some(2));
        assert_eq!(m.finish(empty), Some(2));
    }
}
