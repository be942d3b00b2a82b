//! Scalar cell values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of a [`Dataset`](super::Dataset).
///
/// Values serialize untagged, so a report renders them as plain JSON
/// (`null`, numbers, strings, `"2024-03-01"` for dates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value
    Null,
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float; `NaN` is treated as null
    Float(f64),
    /// Calendar date
    Date(NaiveDate),
    /// UTF-8 text
    Text(String),
}

/// Hashable identity of a non-null value.
///
/// Integral floats collapse onto integers so that `2` and `2.0` are the same
/// key, which is what set membership and foreign keys compare on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey {
    Int(i64),
    Float(u64),
    Date(NaiveDate),
    Text(String),
}

impl Value {
    /// Returns true for `Null` and for a `NaN` float.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value, if it is a non-null number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Integer view: integers, and integral floats that fit in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v)
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 =>
            {
                Some(*v as i64)
            }
            _ => None,
        }
    }

    /// Text view of the value, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Name of the value's type as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Date(_) => "date",
            Value::Text(_) => "text",
        }
    }

    pub(crate) fn key(&self) -> Option<ValueKey> {
        match self {
            Value::Null => None,
            Value::Int(v) => Some(ValueKey::Int(*v)),
            Value::Float(v) if v.is_nan() => None,
            Value::Float(v) => Some(match self.as_i64() {
                Some(i) => ValueKey::Int(i),
                None => ValueKey::Float(v.to_bits()),
            }),
            Value::Date(v) => Some(ValueKey::Date(*v)),
            Value::Text(v) => Some(ValueKey::Text(v.clone())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
