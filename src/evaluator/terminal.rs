//! Terminal descriptors and evaluation outcomes for the dynamic evaluator.

use crate::combiners::{Partitioned, SummaryStatistics};
use crate::evaluator::stage::{BinaryOp, Mapper, Predicate};
use crate::ordered_map::OrderedMap;
use crate::value::Value;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// How a map container resolves a repeated key.
#[derive(Clone, Default)]
pub enum MergePolicy {
    /// The later value replaces the earlier one; the key keeps its position.
    #[default]
    LastWriteWins,
    KeepFirst,
    /// A repeated key is a configuration error.
    Reject,
    /// `op(existing, incoming)`.
    Merge(BinaryOp),
}

#[derive(Clone)]
pub enum ContainerKind {
    List,
    Set,
    /// Elements must be [`Value::Pair`]s.
    Map(MergePolicy),
}

#[derive(Clone)]
pub enum Terminal {
    Count,
    Sum,
    Average,
    Min,
    Max,
    /// With an identity: fold from it. Without: `Absent` when empty, else fold
    /// from the first element.
    Reduce {
        identity: Option<Value>,
        op: BinaryOp,
    },
    /// Group by `key`; each group becomes a list unless `downstream` is given.
    /// Keys come out in first-seen order, or in natural order when `sorted`.
    GroupBy {
        key: Mapper,
        downstream: Option<Box<Terminal>>,
        sorted: bool,
    },
    PartitionBy {
        predicate: Predicate,
        downstream: Option<Box<Terminal>>,
    },
    Join {
        separator: String,
        prefix: String,
        suffix: String,
    },
    ToContainer(ContainerKind),
    Statistics,
    AnyMatch(Predicate),
    AllMatch(Predicate),
    NoneMatch(Predicate),
}

/// Downstream of a grouping when none is given.
pub(crate) static LIST_DOWNSTREAM: Terminal = Terminal::ToContainer(ContainerKind::List);

impl Terminal {
    pub fn reduce(
        identity: impl Into<Value>,
        op: impl Fn(&Value, &Value) -> Result<Value, crate::ConfigError> + Send + Sync + 'static,
    ) -> Self {
        Terminal::Reduce {
            identity: Some(identity.into()),
            op: Arc::new(op),
        }
    }

    pub fn reduce_optional(
        op: impl Fn(&Value, &Value) -> Result<Value, crate::ConfigError> + Send + Sync + 'static,
    ) -> Self {
        Terminal::Reduce {
            identity: None,
            op: Arc::new(op),
        }
    }

    pub fn group_by(key: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Terminal::GroupBy {
            key: Arc::new(key),
            downstream: None,
            sorted: false,
        }
    }

    pub fn group_by_with(
        key: impl Fn(&Value) -> Value + Send + Sync + 'static,
        downstream: Terminal,
    ) -> Self {
        Terminal::GroupBy {
            key: Arc::new(key),
            downstream: Some(Box::new(downstream)),
            sorted: false,
        }
    }

    /// Group into lists keyed in ascending natural order; keys of kinds that
    /// cannot be ordered against each other are a configuration error.
    pub fn group_by_sorted(key: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Terminal::GroupBy {
            key: Arc::new(key),
            downstream: None,
            sorted: true,
        }
    }

    pub fn group_by_sorted_with(
        key: impl Fn(&Value) -> Value + Send + Sync + 'static,
        downstream: Terminal,
    ) -> Self {
        Terminal::GroupBy {
            key: Arc::new(key),
            downstream: Some(Box::new(downstream)),
            sorted: true,
        }
    }

    pub fn partition_by(pred: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Terminal::PartitionBy {
            predicate: Arc::new(pred),
            downstream: None,
        }
    }

    pub fn partition_by_with(
        pred: impl Fn(&Value) -> bool + Send + Sync + 'static,
        downstream: Terminal,
    ) -> Self {
        Terminal::PartitionBy {
            predicate: Arc::new(pred),
            downstream: Some(Box::new(downstream)),
        }
    }

    pub fn join(separator: &str) -> Self {
        Self::join_with(separator, "", "")
    }

    pub fn join_with(separator: &str, prefix: &str, suffix: &str) -> Self {
        Terminal::Join {
            separator: separator.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    pub fn to_list() -> Self {
        Terminal::ToContainer(ContainerKind::List)
    }

    pub fn to_set() -> Self {
        Terminal::ToContainer(ContainerKind::Set)
    }

    /// Map container with [`MergePolicy::LastWriteWins`].
    pub fn to_map() -> Self {
        Terminal::ToContainer(ContainerKind::Map(MergePolicy::default()))
    }

    pub fn to_map_with(policy: MergePolicy) -> Self {
        Terminal::ToContainer(ContainerKind::Map(policy))
    }

    pub fn any_match(pred: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Terminal::AnyMatch(Arc::new(pred))
    }

    pub fn all_match(pred: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Terminal::AllMatch(Arc::new(pred))
    }

    pub fn none_match(pred: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Terminal::NoneMatch(Arc::new(pred))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Terminal::Count => "count",
            Terminal::Sum => "sum",
            Terminal::Average => "average",
            Terminal::Min => "min",
            Terminal::Max => "max",
            Terminal::Reduce { .. } => "reduce",
            Terminal::GroupBy { sorted: true, .. } => "group_by_sorted",
            Terminal::GroupBy { .. } => "group_by",
            Terminal::PartitionBy { .. } => "partition_by",
            Terminal::Join { .. } => "join",
            Terminal::ToContainer(ContainerKind::List) => "to_list",
            Terminal::ToContainer(ContainerKind::Set) => "to_set",
            Terminal::ToContainer(ContainerKind::Map(_)) => "to_map",
            Terminal::Statistics => "statistics",
            Terminal::AnyMatch(_) => "any_match",
            Terminal::AllMatch(_) => "all_match",
            Terminal::NoneMatch(_) => "none_match",
        }
    }

    /// Whether chunked evaluation reproduces the sequential result.
    ///
    /// Joined text, lists and maps depend on encounter order. Groupings are
    /// as safe as their downstream (a list by default).
    pub fn parallel_safe(&self) -> bool {
        self.first_order_dependent().is_none()
    }

    /// The first terminal, this one or nested, that depends on encounter order.
    pub(crate) fn first_order_dependent(&self) -> Option<&'static str> {
        match self {
            Terminal::Join { .. }
            | Terminal::ToContainer(ContainerKind::List | ContainerKind::Map(_)) => {
                Some(self.name())
            }
            Terminal::GroupBy { downstream, .. } | Terminal::PartitionBy { downstream, .. } => {
                downstream
                    .as_deref()
                    .unwrap_or(&LIST_DOWNSTREAM)
                    .first_order_dependent()
            }
            _ => None,
        }
    }
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::GroupBy {
                downstream: Some(d),
                ..
            }
            | Terminal::PartitionBy {
                downstream: Some(d),
                ..
            } => write!(f, "{}({d:?})", self.name()),
            other => f.write_str(other.name()),
        }
    }
}

/// The result of an evaluation.
///
/// Serializes without tags: `Absent` as `null`, containers as JSON arrays or
/// objects, partitions as `{"true": .., "false": ..}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// No value: an empty input to `average`, `min`, `max` or `reduce`
    /// without identity.
    Absent,
    Count(u64),
    Bool(bool),
    Value(Value),
    Text(String),
    List(Vec<Value>),
    Set(HashSet<Value>),
    Map(OrderedMap<Value, Value>),
    Groups(OrderedMap<Value, Outcome>),
    Partitioned(Box<Partitioned<Outcome>>),
    Statistics(SummaryStatistics<Value>),
}

impl Outcome {
    pub fn is_absent(&self) -> bool {
        matches!(self, Outcome::Absent)
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            Outcome::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Outcome::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Outcome::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Outcome::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Outcome::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&HashSet<Value>> {
        match self {
            Outcome::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&OrderedMap<Value, Value>> {
        match self {
            Outcome::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_groups(&self) -> Option<&OrderedMap<Value, Outcome>> {
        match self {
            Outcome::Groups(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_partitioned(&self) -> Option<&Partitioned<Outcome>> {
        match self {
            Outcome::Partitioned(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_statistics(&self) -> Option<&SummaryStatistics<Value>> {
        match self {
            Outcome::Statistics(s) => Some(s),
            _ => None,
        }
    }
}
