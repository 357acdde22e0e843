//! Dynamic element type for the [`evaluate`](crate::evaluate) entry point.
//!
//! `Value` covers the element shapes the evaluator needs: scalars, key/value
//! pairs (for map containers) and nested lists (for flattening). Requirements
//! a typed pipeline states as trait bounds (numeric, ordered, textual) are
//! checked on `Value`s at run time.

use crate::error::ConfigError;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Text(String),
    Pair(Box<Value>, Box<Value>),
    List(Vec<Value>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Pair,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::Pair => "pair",
            ValueKind::List => "list",
        })
    }
}

impl Value {
    pub fn float(v: f64) -> Self {
        Value::Float(OrderedFloat(v))
    }

    pub fn pair(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Value::Pair(Box::new(key.into()), Box::new(value.into()))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Pair(..) => ValueKind::Pair,
            Value::List(_) => ValueKind::List,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Pair(..) | Value::List(_))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(x.0),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&Value, &Value)> {
        match self {
            Value::Pair(k, v) => Some((k, v)),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Natural ordering, or `None` when the kinds cannot be ordered.
    ///
    /// Integers and floats compare numerically with each other; pairs and
    /// lists compare lexicographically. Any other mix of kinds is unordered.
    pub fn natural_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                let (a, b) = (self.as_f64()?, other.as_f64()?);
                Some(OrderedFloat(a).cmp(&OrderedFloat(b)))
            }
            (Value::Pair(ak, av), Value::Pair(bk, bv)) => match ak.natural_cmp(bk)? {
                Ordering::Equal => av.natural_cmp(bv),
                ord => Some(ord),
            },
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.natural_cmp(y)? {
                        Ordering::Equal => {}
                        ord => return Some(ord),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }

    /// Numeric addition. Integers wrap on overflow; a float operand makes
    /// the result a float.
    pub fn add(&self, other: &Value) -> Result<Value, ConfigError> {
        self.arith(other, "add", i64::wrapping_add, |a, b| a + b)
    }

    /// Numeric multiplication, same promotion rules as [`add`](Self::add).
    pub fn multiply(&self, other: &Value) -> Result<Value, ConfigError> {
        self.arith(other, "multiply", i64::wrapping_mul, |a, b| a * b)
    }

    fn arith(
        &self,
        other: &Value,
        op: &'static str,
        int_op: fn(i64, i64) -> i64,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<Value, ConfigError> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(int_op(*a, *b))),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => Ok(Value::float(float_op(a, b))),
                (None, _) => Err(ConfigError::NotNumeric {
                    op,
                    found: self.kind(),
                }),
                (_, None) => Err(ConfigError::NotNumeric {
                    op,
                    found: other.kind(),
                }),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) if x.0.is_finite() && x.0.fract() == 0.0 => write!(f, "{:.1}", x.0),
            Value::Float(x) => write!(f, "{}", x.0),
            Value::Text(s) => f.write_str(s),
            Value::Pair(k, v) => write!(f, "{k}={v}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<Value>, V: Into<Value>> From<(K, V)> for Value {
    fn from((k, v): (K, V)) -> Self {
        Value::pair(k, v)
    }
}

/// Convert a list of anything `Into<Value>` into `Vec<Value>`.
///
/// ```
/// use seqflow::{Value, values};
/// assert_eq!(values(["a", "b"]), vec![Value::from("a"), Value::from("b")]);
/// ```
pub fn values<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Vec<Value> {
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_numbers_compare_numerically() {
        assert_eq!(
            Value::Int(2).natural_cmp(&Value::float(1.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::from("a").natural_cmp(&Value::Int(1)), None);
    }

    #[test]
    fn integer_sum_wraps_and_floats_promote() {
        assert_eq!(
            Value::Int(i64::MAX).add(&Value::Int(1)),
            Ok(Value::Int(i64::MIN))
        );
        assert_eq!(Value::Int(1).add(&Value::float(0.5)), Ok(Value::float(1.5)));
        assert_eq!(
            Value::Int(1).multiply(&Value::from("x")),
            Err(ConfigError::NotNumeric {
                op: "multiply",
                found: ValueKind::Text
            })
        );
    }

    #[test]
    fn display_renders_pairs_and_whole_floats() {
        assert_eq!(Value::pair("a", 1).to_string(), "a=1");
        assert_eq!(Value::float(2.0).to_string(), "2.0");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
    }
}
