//! Stage descriptors for the dynamic evaluator.
//!
//! Each variant carries the closure it needs and is lowered onto the typed
//! `PCollection<Value>` API by [`Stage::attach`]. Structural problems (negative
//! counts) are rejected while attaching, before anything runs; element-level
//! problems (unorderable kinds in a natural sort) are reported through the
//! run's [`FaultSlot`].

use crate::PCollection;
use crate::error::{ConfigError, FaultSlot};
use crate::value::Value;
use anyhow::Result;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
pub type Mapper = Arc<dyn Fn(&Value) -> Value + Send + Sync>;
pub type Expander = Arc<dyn Fn(&Value) -> Vec<Value> + Send + Sync>;
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;
/// A binary operator that may reject its operands.
pub type BinaryOp = Arc<dyn Fn(&Value, &Value) -> Result<Value, ConfigError> + Send + Sync>;

#[derive(Clone)]
pub enum Stage {
    Filter(Predicate),
    Transform(Mapper),
    FlattenMap(Expander),
    /// `None` sorts by [`Value::natural_cmp`].
    Sort(Option<Comparator>),
    Limit(i64),
    Skip(i64),
    Distinct,
}

impl Stage {
    pub fn filter(p: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Stage::Filter(Arc::new(p))
    }

    pub fn transform(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Stage::Transform(Arc::new(f))
    }

    pub fn flatten_map(f: impl Fn(&Value) -> Vec<Value> + Send + Sync + 'static) -> Self {
        Stage::FlattenMap(Arc::new(f))
    }

    /// Natural-order sort.
    pub fn sort() -> Self {
        Stage::Sort(None)
    }

    pub fn sort_by(cmp: impl Fn(&Value, &Value) -> Ordering + Send + Sync + 'static) -> Self {
        Stage::Sort(Some(Arc::new(cmp)))
    }

    pub fn limit(n: i64) -> Self {
        Stage::Limit(n)
    }

    pub fn skip(n: i64) -> Self {
        Stage::Skip(n)
    }

    pub fn distinct() -> Self {
        Stage::Distinct
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Filter(_) => "filter",
            Stage::Transform(_) => "transform",
            Stage::FlattenMap(_) => "flatten_map",
            Stage::Sort(_) => "sort",
            Stage::Limit(_) => "limit",
            Stage::Skip(_) => "skip",
            Stage::Distinct => "distinct",
        }
    }

    /// Append this stage to `coll`.
    pub(crate) fn attach(
        self,
        coll: PCollection<Value>,
        faults: &FaultSlot,
    ) -> Result<PCollection<Value>, ConfigError> {
        Ok(match self {
            Stage::Filter(p) => coll.filter(move |v| p(v)),
            Stage::Transform(f) => coll.map(move |v| f(v)),
            Stage::FlattenMap(f) => coll.flat_map(move |v| f(v)),
            Stage::Sort(Some(cmp)) => coll.sorted_by(move |a, b| cmp(a, b)),
            Stage::Sort(None) => {
                let faults = faults.clone();
                coll.sorted_by(move |a, b| {
                    a.natural_cmp(b).unwrap_or_else(|| {
                        faults.record(ConfigError::NotComparable {
                            op: "sort",
                            left: a.kind(),
                            right: b.kind(),
                        });
                        Ordering::Equal
                    })
                })
            }
            Stage::Limit(n) => coll.limit(count("limit", n)?),
            Stage::Skip(n) => coll.skip(count("skip", n)?),
            Stage::Distinct => coll.distinct(),
        })
    }
}

fn count(stage: &'static str, n: i64) -> Result<usize, ConfigError> {
    usize::try_from(n).map_err(|_| ConfigError::NegativeCount { stage, count: n })
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Limit(n) | Stage::Skip(n) => write!(f, "{}({n})", self.name()),
            Stage::Sort(None) => f.write_str("sort(natural)"),
            other => f.write_str(other.name()),
        }
    }
}
