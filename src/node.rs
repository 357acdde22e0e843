//! Graph nodes: sources, stages, and global combines.
//!
//! A [`Stage`] is a tagged intermediate operation carrying the type-erased
//! operator that executes it. The runner dispatches on the tag only for
//! planning and logging; the operator itself knows its element types.

use crate::type_token::{Partition, TypeTag, VecOps};
use anyhow::Result;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A type-erased operator turning one stream partition into another.
///
/// Operators only assemble the lazy chain; elements are pulled when the
/// terminal drains the final stream.
pub trait DynOp: Send + Sync {
    fn apply(&self, input: Partition) -> Result<Partition>;
}

/// An intermediate pipeline operation.
#[derive(Clone)]
pub enum Stage {
    Filter(Arc<dyn DynOp>),
    Transform(Arc<dyn DynOp>),
    FlattenMap(Arc<dyn DynOp>),
    /// Stable sort of everything upstream.
    Sort(Arc<dyn DynOp>),
    Limit(usize, Arc<dyn DynOp>),
    Skip(usize, Arc<dyn DynOp>),
    /// First occurrence wins, order preserved.
    Distinct(Arc<dyn DynOp>),
    /// Observes elements without changing them.
    Inspect(Arc<dyn DynOp>),
}

impl Stage {
    pub fn op(&self) -> &Arc<dyn DynOp> {
        match self {
            Stage::Filter(op)
            | Stage::Transform(op)
            | Stage::FlattenMap(op)
            | Stage::Sort(op)
            | Stage::Limit(_, op)
            | Stage::Skip(_, op)
            | Stage::Distinct(op)
            | Stage::Inspect(op) => op,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Filter(_) => "filter",
            Stage::Transform(_) => "transform",
            Stage::FlattenMap(_) => "flatten_map",
            Stage::Sort(_) => "sort",
            Stage::Limit(..) => "limit",
            Stage::Skip(..) => "skip",
            Stage::Distinct(_) => "distinct",
            Stage::Inspect(_) => "inspect",
        }
    }

    /// Stages whose result depends on seeing the whole upstream sequence.
    ///
    /// In parallel mode these run once per chunk, so their global semantics
    /// are not preserved.
    pub fn is_order_sensitive(&self) -> bool {
        matches!(
            self,
            Stage::Sort(_) | Stage::Limit(..) | Stage::Skip(..) | Stage::Distinct(_)
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Limit(n, _) => write!(f, "limit({n})"),
            Stage::Skip(n, _) => write!(f, "skip({n})"),
            other => f.write_str(other.name()),
        }
    }
}

pub(crate) type LocalFn = Arc<dyn Fn(Partition) -> Result<Partition> + Send + Sync>;
pub(crate) type MergeFn = Arc<dyn Fn(Vec<Partition>) -> Result<Partition> + Send + Sync>;
pub(crate) type FinishFn = Arc<dyn Fn(Partition) -> Result<Partition> + Send + Sync>;

#[derive(Clone)]
pub enum Node {
    Source {
        payload: Arc<dyn Any + Send + Sync>,
        vec_ops: Arc<dyn VecOps>,
        elem_tag: TypeTag,
    },
    Stage(Stage),

    /// Global combine:
    /// - `local`: drains one `Stream<T>` into an accumulator `A`
    /// - `merge`: folds accumulators from every chunk, in chunk order
    /// - `finish`: turns the merged `A` into a single-element `Stream<O>`
    CombineGlobal {
        local: LocalFn,
        merge: MergeFn,
        finish: FinishFn,
    },
}

impl Node {
    pub fn label(&self) -> String {
        match self {
            Node::Source { elem_tag, .. } => format!("source<{}>", elem_tag.name),
            Node::Stage(stage) => stage.to_string(),
            Node::CombineGlobal { .. } => "combine".to_string(),
        }
    }
}
