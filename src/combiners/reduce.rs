//! Folds with a user-supplied binary operator.
//!
//! Parallel runs fold each chunk separately and combine the chunk results with
//! the same operator, so `op` must be associative (and `identity` a true
//! identity of `op`) for the result to match a sequential run.

use crate::Element;
use crate::collection::CombineFn;

/// Left fold from `identity`.
pub struct Reduce<T, F> {
    identity: T,
    op: F,
}

impl<T, F> Reduce<T, F> {
    pub fn new(identity: T, op: F) -> Self {
        Self { identity, op }
    }
}

impl<T, F> CombineFn<T, T, T> for Reduce<T, F>
where
    T: Element,
    F: Fn(T, T) -> T + Send + Sync + 'static,
{
    fn create(&self) -> T {
        self.identity.clone()
    }

    fn add_input(&self, acc: &mut T, v: T) {
        *acc = (self.op)(acc.clone(), v);
    }

    fn merge(&self, acc: &mut T, other: T) {
        *acc = (self.op)(acc.clone(), other);
    }

    fn finish(&self, acc: T) -> T {
        acc
    }
}

/// Left fold seeded by the first element; `None` when empty.
pub struct ReduceOptional<F>(F);

impl<F> ReduceOptional<F> {
    pub fn new(op: F) -> Self {
        Self(op)
    }
}

impl<T, F> CombineFn<T, Option<T>, Option<T>> for ReduceOptional<F>
where
    T: Element,
    F: Fn(T, T) -> T + Send + Sync + 'static,
{
    fn create(&self) -> Option<T> {
        None
    }

    fn add_input(&self, acc: &mut Option<T>, v: T) {
        self.merge(acc, Some(v));
    }

    fn merge(&self, acc: &mut Option<T>, other: Option<T>) {
        *acc = match (acc.take(), other) {
            (Some(a), Some(b)) => Some((self.0)(a, b)),
            (a, b) => a.or(b),
        };
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}
