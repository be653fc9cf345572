//! Scalar cell values and column types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar type assigned to a whole column by inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Integer,
    Float,
    String,
}

impl ScalarType {
    /// Parse a raw field as this type, or `None` if it does not fit.
    pub fn parse(self, raw: &str) -> Option<Value> {
        match self {
            ScalarType::Integer => raw.parse::<i64>().ok().map(Value::Int),
            ScalarType::Float => raw.parse::<f64>().ok().map(Value::Float),
            ScalarType::String => Some(Value::Str(raw.to_string())),
        }
    }

    /// Check whether `raw` parses as this type without building a value.
    pub fn accepts(self, raw: &str) -> bool {
        match self {
            ScalarType::Integer => raw.parse::<i64>().is_ok(),
            ScalarType::Float => raw.parse::<f64>().is_ok(),
            ScalarType::String => true,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Integer => "integer",
            ScalarType::Float => "float",
            ScalarType::String => "string",
        };
        f.write_str(name)
    }
}

/// A single typed cell.
///
/// `Null` marks a field the source row did not carry (see the short-row
/// fill policy in `pglib-io`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the cell; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Text form of a cell.
///
/// Floats use the shortest round-tripping representation that still reads
/// back as a float (`1.0`, not `1`), so re-inferring the text keeps the type.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}
