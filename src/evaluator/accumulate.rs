//! One [`CombineFn`] covering every [`Terminal`].
//!
//! Element-level configuration errors (summing text, joining a list, a map
//! container over non-pairs, a rejected duplicate key) are recorded in the
//! run's [`FaultSlot`] and the offending element is skipped; the evaluator
//! discards the outcome when the slot is set.

use crate::collection::CombineFn;
use crate::combiners::{Joining, Partitioned, SummaryStatistics};
use crate::error::{ConfigError, FaultSlot};
use crate::evaluator::stage::BinaryOp;
use crate::evaluator::terminal::{ContainerKind, LIST_DOWNSTREAM, MergePolicy, Outcome, Terminal};
use crate::ordered_map::OrderedMap;
use crate::value::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Running numeric total.
///
/// Integer and float elements are kept apart and only combined in
/// [`value`](Total::value), so merging per-chunk totals gives the same result
/// for every chunking. Integers wrap on overflow.
#[derive(Clone, Copy, Debug, Default)]
pub struct Total {
    ints: i64,
    floats: f64,
    saw_float: bool,
}

impl Total {
    /// Add one element; `false` when it is not numeric.
    fn push(&mut self, v: &Value) -> bool {
        match v {
            Value::Int(n) => self.ints = self.ints.wrapping_add(*n),
            Value::Float(x) => {
                self.floats += x.0;
                self.saw_float = true;
            }
            _ => return false,
        }
        true
    }

    fn merge(&mut self, other: Total) {
        self.ints = self.ints.wrapping_add(other.ints);
        self.floats += other.floats;
        self.saw_float |= other.saw_float;
    }

    #[allow(clippy::cast_precision_loss)]
    fn value(self) -> Value {
        if self.saw_float {
            Value::float(self.ints as f64 + self.floats)
        } else {
            Value::Int(self.ints)
        }
    }
}

/// Accumulator for [`TerminalFn`]; the variant mirrors the terminal.
pub enum Acc {
    Count(u64),
    Sum(Total),
    Average { sum: f64, count: u64 },
    Extreme(Option<Value>),
    Fold(Option<Value>),
    Groups(OrderedMap<Value, Acc>),
    Partitioned(Box<Partitioned<Acc>>),
    Joined(Vec<String>),
    List(Vec<Value>),
    Set(HashSet<Value>),
    Map(OrderedMap<Value, Value>),
    Stats {
        count: u64,
        sum: Total,
        min: Option<Value>,
        max: Option<Value>,
    },
    /// Match terminals used as a grouping downstream. At the top level
    /// `evaluate` runs them through the short-circuiting typed path instead.
    Matched(bool),
}

pub struct TerminalFn {
    terminal: Terminal,
    /// Combiner for each group of a `GroupBy`/`PartitionBy`.
    nested: Option<Box<TerminalFn>>,
    faults: FaultSlot,
}

impl TerminalFn {
    pub fn new(terminal: &Terminal, faults: &FaultSlot) -> Self {
        let nested = match terminal {
            Terminal::GroupBy { downstream, .. } | Terminal::PartitionBy { downstream, .. } => {
                let d = downstream.as_deref().unwrap_or(&LIST_DOWNSTREAM);
                Some(Box::new(TerminalFn::new(d, faults)))
            }
            _ => None,
        };
        Self {
            terminal: terminal.clone(),
            nested,
            faults: faults.clone(),
        }
    }

    fn nested(&self) -> &TerminalFn {
        // Only grouping terminals reach here, and `new` always builds their nested fn.
        self.nested.as_deref().unwrap_or(self)
    }

    /// Keep the better of `acc` and `v`; ties keep `acc`.
    fn keep_extreme(&self, acc: &mut Option<Value>, v: Value, want: Ordering, op: &'static str) {
        match acc {
            None => *acc = Some(v),
            Some(cur) => match v.natural_cmp(cur) {
                Some(ord) if ord == want => *cur = v,
                Some(_) => {}
                None => self.faults.record(ConfigError::NotComparable {
                    op,
                    left: cur.kind(),
                    right: v.kind(),
                }),
            },
        }
    }

    fn add_into(&self, sum: &mut Total, v: &Value, op: &'static str) {
        if !sum.push(v) {
            self.faults.record(ConfigError::NotNumeric {
                op,
                found: v.kind(),
            });
        }
    }

    fn fold(&self, op: &BinaryOp, acc: &mut Option<Value>, v: Value) {
        *acc = match acc.take() {
            None => Some(v),
            Some(a) => match op(&a, &v) {
                Ok(r) => Some(r),
                Err(e) => {
                    self.faults.record(e);
                    Some(a)
                }
            },
        };
    }

    fn sort_groups(&self, groups: &mut OrderedMap<Value, Acc>) {
        let mut clash = None;
        groups.sort_keys_by(|a, b| {
            a.natural_cmp(b).unwrap_or_else(|| {
                clash.get_or_insert((a.kind(), b.kind()));
                Ordering::Equal
            })
        });
        if let Some((left, right)) = clash {
            self.faults.record(ConfigError::NotComparable {
                op: "group_by_sorted",
                left,
                right,
            });
        }
    }

    fn put(&self, policy: &MergePolicy, map: &mut OrderedMap<Value, Value>, k: Value, v: Value) {
        let Some(existing) = map.get_mut(&k) else {
            map.insert(k, v);
            return;
        };
        match policy {
            MergePolicy::LastWriteWins => *existing = v,
            MergePolicy::KeepFirst => {}
            MergePolicy::Reject => self.faults.record(ConfigError::DuplicateKey {
                key: k.to_string(),
            }),
            MergePolicy::Merge(op) => match op(existing, &v) {
                Ok(merged) => *existing = merged,
                Err(e) => self.faults.record(e),
            },
        }
    }
}

impl CombineFn<Value, Acc, Outcome> for TerminalFn {
    fn create(&self) -> Acc {
        match &self.terminal {
            Terminal::Count => Acc::Count(0),
            Terminal::Sum => Acc::Sum(Total::default()),
            Terminal::Average => Acc::Average { sum: 0.0, count: 0 },
            Terminal::Min | Terminal::Max => Acc::Extreme(None),
            Terminal::Reduce { identity, .. } => Acc::Fold(identity.clone()),
            Terminal::GroupBy { .. } => Acc::Groups(OrderedMap::new()),
            Terminal::PartitionBy { .. } => {
                let nested = self.nested();
                Acc::Partitioned(Box::new(Partitioned {
                    accepted: nested.create(),
                    rejected: nested.create(),
                }))
            }
            Terminal::Join { .. } => Acc::Joined(Vec::new()),
            Terminal::ToContainer(ContainerKind::List) => Acc::List(Vec::new()),
            Terminal::ToContainer(ContainerKind::Set) => Acc::Set(HashSet::new()),
            Terminal::ToContainer(ContainerKind::Map(_)) => Acc::Map(OrderedMap::new()),
            Terminal::Statistics => Acc::Stats {
                count: 0,
                sum: Total::default(),
                min: None,
                max: None,
            },
            Terminal::AnyMatch(_) => Acc::Matched(false),
            Terminal::AllMatch(_) | Terminal::NoneMatch(_) => Acc::Matched(true),
        }
    }

    fn add_input(&self, acc: &mut Acc, v: Value) {
        match (&self.terminal, acc) {
            (Terminal::Count, Acc::Count(n)) => *n += 1,
            (Terminal::Sum, Acc::Sum(sum)) => self.add_into(sum, &v, "sum"),
            (Terminal::Average, Acc::Average { sum, count }) => match v.as_f64() {
                Some(x) => {
                    *sum += x;
                    *count += 1;
                }
                None => self.faults.record(ConfigError::NotNumeric {
                    op: "average",
                    found: v.kind(),
                }),
            },
            (Terminal::Min, Acc::Extreme(cur)) => self.keep_extreme(cur, v, Ordering::Less, "min"),
            (Terminal::Max, Acc::Extreme(cur)) => {
                self.keep_extreme(cur, v, Ordering::Greater, "max")
            }
            (Terminal::Reduce { op, .. }, Acc::Fold(cur)) => self.fold(op, cur, v),
            (Terminal::GroupBy { key, .. }, Acc::Groups(groups)) => {
                let nested = self.nested();
                let slot = groups.get_or_insert_with(key(&v), || nested.create());
                nested.add_input(slot, v);
            }
            (Terminal::PartitionBy { predicate, .. }, Acc::Partitioned(sides)) => {
                let side = if predicate(&v) {
                    &mut sides.accepted
                } else {
                    &mut sides.rejected
                };
                self.nested().add_input(side, v);
            }
            (Terminal::Join { .. }, Acc::Joined(parts)) => {
                if v.is_scalar() {
                    parts.push(v.to_string());
                } else {
                    self.faults.record(ConfigError::NotText { found: v.kind() });
                }
            }
            (Terminal::ToContainer(ContainerKind::List), Acc::List(items)) => items.push(v),
            (Terminal::ToContainer(ContainerKind::Set), Acc::Set(items)) => {
                items.insert(v);
            }
            (Terminal::ToContainer(ContainerKind::Map(policy)), Acc::Map(map)) => match v {
                Value::Pair(k, val) => self.put(policy, map, *k, *val),
                other => self
                    .faults
                    .record(ConfigError::NotKeyValue { found: other.kind() }),
            },
            (
                Terminal::Statistics,
                Acc::Stats {
                    count,
                    sum,
                    min,
                    max,
                },
            ) => {
                if v.as_f64().is_none() {
                    self.faults.record(ConfigError::NotNumeric {
                        op: "statistics",
                        found: v.kind(),
                    });
                    return;
                }
                *count += 1;
                self.add_into(sum, &v, "statistics");
                self.keep_extreme(min, v.clone(), Ordering::Less, "statistics");
                self.keep_extreme(max, v, Ordering::Greater, "statistics");
            }
            (Terminal::AnyMatch(p), Acc::Matched(hit)) => *hit = *hit || p(&v),
            (Terminal::AllMatch(p), Acc::Matched(all)) => *all = *all && p(&v),
            (Terminal::NoneMatch(p), Acc::Matched(none)) => *none = *none && !p(&v),
            // `create` only builds the accumulator matching the terminal.
            _ => {}
        }
    }

    fn merge(&self, acc: &mut Acc, other: Acc) {
        match (&self.terminal, acc, other) {
            (_, Acc::Count(a), Acc::Count(b)) => *a += b,
            (_, Acc::Sum(a), Acc::Sum(b)) => a.merge(b),
            (
                _,
                Acc::Average { sum, count },
                Acc::Average {
                    sum: s2,
                    count: c2,
                },
            ) => {
                *sum += s2;
                *count += c2;
            }
            (Terminal::Min, Acc::Extreme(a), Acc::Extreme(Some(b))) => {
                self.keep_extreme(a, b, Ordering::Less, "min")
            }
            (Terminal::Max, Acc::Extreme(a), Acc::Extreme(Some(b))) => {
                self.keep_extreme(a, b, Ordering::Greater, "max")
            }
            (Terminal::Reduce { op, .. }, Acc::Fold(a), Acc::Fold(Some(b))) => self.fold(op, a, b),
            (_, Acc::Groups(a), Acc::Groups(b)) => {
                let nested = self.nested();
                for (k, group) in b {
                    match a.get_mut(&k) {
                        Some(existing) => nested.merge(existing, group),
                        None => {
                            a.insert(k, group);
                        }
                    }
                }
            }
            (_, Acc::Partitioned(a), Acc::Partitioned(b)) => {
                let nested = self.nested();
                let b = *b;
                nested.merge(&mut a.accepted, b.accepted);
                nested.merge(&mut a.rejected, b.rejected);
            }
            (_, Acc::Joined(a), Acc::Joined(mut b)) => a.append(&mut b),
            (_, Acc::List(a), Acc::List(mut b)) => a.append(&mut b),
            (_, Acc::Set(a), Acc::Set(b)) => a.extend(b),
            (Terminal::ToContainer(ContainerKind::Map(policy)), Acc::Map(a), Acc::Map(b)) => {
                for (k, v) in b {
                    self.put(policy, a, k, v);
                }
            }
            (
                _,
                Acc::Stats {
                    count,
                    sum,
                    min,
                    max,
                },
                Acc::Stats {
                    count: c2,
                    sum: s2,
                    min: min2,
                    max: max2,
                },
            ) => {
                *count += c2;
                sum.merge(s2);
                if let Some(m) = min2 {
                    self.keep_extreme(min, m, Ordering::Less, "statistics");
                }
                if let Some(m) = max2 {
                    self.keep_extreme(max, m, Ordering::Greater, "statistics");
                }
            }
            (Terminal::AnyMatch(_), Acc::Matched(a), Acc::Matched(b)) => *a = *a || b,
            (_, Acc::Matched(a), Acc::Matched(b)) => *a = *a && b,
            // Empty right-hand extremes/folds and mismatched shapes leave `acc` as is.
            _ => {}
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(&self, acc: Acc) -> Outcome {
        match acc {
            Acc::Count(n) => Outcome::Count(n),
            Acc::Sum(total) => Outcome::Value(total.value()),
            Acc::Average { count: 0, .. } | Acc::Extreme(None) | Acc::Fold(None) => Outcome::Absent,
            Acc::Average { sum, count } => Outcome::Value(Value::float(sum / count as f64)),
            Acc::Extreme(Some(v)) | Acc::Fold(Some(v)) => Outcome::Value(v),
            Acc::Groups(mut groups) => {
                if matches!(self.terminal, Terminal::GroupBy { sorted: true, .. }) {
                    self.sort_groups(&mut groups);
                }
                let nested = self.nested();
                Outcome::Groups(groups.map_values(|a| nested.finish(a)))
            }
            Acc::Partitioned(sides) => {
                let nested = self.nested();
                Outcome::Partitioned(Box::new((*sides).map(|a| nested.finish(a))))
            }
            Acc::Joined(parts) => match &self.terminal {
                Terminal::Join {
                    separator,
                    prefix,
                    suffix,
                } => Outcome::Text(Joining::with_affixes(separator, prefix, suffix).render(&parts)),
                _ => Outcome::Text(parts.concat()),
            },
            Acc::List(items) => Outcome::List(items),
            Acc::Set(items) => Outcome::Set(items),
            Acc::Map(map) => Outcome::Map(map),
            Acc::Stats {
                count,
                sum,
                min,
                max,
            } => {
                let sum = sum.value();
                let average = sum.as_f64().filter(|_| count > 0).map(|s| s / count as f64);
                Outcome::Statistics(SummaryStatistics {
                    count,
                    sum,
                    min,
                    max,
                    average,
                })
            }
            Acc::Matched(b) => Outcome::Bool(b),
        }
    }
}
