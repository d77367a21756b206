//! Cell values and their kinds.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// The kind of a cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Real,
    /// Text values.
    Text,
    /// An empty cell.
    Missing,
    /// An ordered collection of values.
    List,
    /// Named fields, each holding a value.
    Record,
}

impl ValueKind {
    /// Returns true if values of this kind are atomic scalars.
    pub fn is_atomic(&self) -> bool {
        !self.is_composite()
    }

    /// Returns true if values of this kind are structured.
    pub fn is_composite(&self) -> bool {
        matches!(self, ValueKind::List | ValueKind::Record)
    }

    /// Scalar kind shared by a column's non-missing raw cells.
    ///
    /// `Integer` when every cell parses as `i64`, else `Real` when every cell
    /// parses as a finite `f64`, else `Text`. A column without cells is
    /// `Missing`.
    pub fn infer_column<'a>(cells: impl IntoIterator<Item = &'a str>) -> ValueKind {
        let mut kind = ValueKind::Missing;
        for cell in cells {
            let cell = cell.trim();
            kind = match kind {
                ValueKind::Missing | ValueKind::Integer if cell.parse::<i64>().is_ok() => {
                    ValueKind::Integer
                }
                ValueKind::Missing | ValueKind::Integer | ValueKind::Real
                    if parse_finite(cell).is_some() =>
                {
                    ValueKind::Real
                }
                _ => return ValueKind::Text,
            };
        }
        kind
    }
}

fn parse_finite(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// A single cell of a [`Dataset`](super::Dataset).
///
/// Equality and hashing are defined so that any value can serve as a
/// partition key: an integral real equals the matching integer, `-0.0`
/// equals `0.0`, and all NaNs are equal to each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Integer(i64),
    Real(f64),
    Text(String),
    Missing,
    List(Vec<Value>),
    Record(Vec<(String, Value)>),
}

impl Value {
    /// Read a raw scalar cell as a value of its column's `kind`.
    ///
    /// A cell that does not parse as the requested number keeps its text.
    pub fn parse_as(raw: &str, kind: ValueKind) -> Self {
        let trimmed = raw.trim();
        match kind {
            ValueKind::Integer => match trimmed.parse::<i64>() {
                Ok(i) => Value::Integer(i),
                Err(_) => Value::Text(raw.to_string()),
            },
            ValueKind::Real => match parse_finite(trimmed) {
                Some(f) => Value::Real(f),
                None => Value::Text(raw.to_string()),
            },
            _ => Value::Text(raw.to_string()),
        }
    }

    /// Convert a JSON value, keeping arrays and objects as composites.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or_else(|| Value::Text(n.to_string()), Value::Real),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => Value::Record(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, Value::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Get the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::Text(_) => ValueKind::Text,
            Value::Missing => ValueKind::Missing,
            Value::List(_) => ValueKind::List,
            Value::Record(_) => ValueKind::Record,
        }
    }

    /// Returns true if this value is an atomic scalar.
    pub fn is_atomic(&self) -> bool {
        self.kind().is_atomic()
    }

    /// Returns true if this is a missing value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

/// The integer an integral real is equal to, if it fits.
fn real_as_integer(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn canonical_bits(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else if f == 0.0 {
        0
    } else {
        f.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Integer(i), Value::Real(f)) | (Value::Real(f), Value::Integer(i)) => {
                real_as_integer(*f) == Some(*i)
            }
            (Value::Real(a), Value::Real(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Missing, Value::Missing) => true,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Integer(i) => {
                state.write_u8(0);
                i.hash(state);
            }
            Value::Real(f) => match real_as_integer(*f) {
                Some(i) => {
                    state.write_u8(0);
                    i.hash(state);
                }
                None => {
                    state.write_u8(1);
                    canonical_bits(*f).hash(state);
                }
            },
            Value::Text(s) => {
                state.write_u8(2);
                s.hash(state);
            }
            Value::Missing => state.write_u8(3),
            Value::List(items) => {
                state.write_u8(4);
                items.hash(state);
            }
            Value::Record(fields) => {
                state.write_u8(5);
                fields.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "{}", s),
            Value::Missing => Ok(()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_infer_column_kind() {
        assert_eq!(ValueKind::infer_column(["1", " 2", "-3"]), ValueKind::Integer);
        assert_eq!(ValueKind::infer_column(["1", "2.5"]), ValueKind::Real);
        assert_eq!(ValueKind::infer_column(["2.5", "1"]), ValueKind::Real);
        assert_eq!(ValueKind::infer_column(["01", "1", "abc"]), ValueKind::Text);
        assert_eq!(ValueKind::infer_column(["1.5", "inf"]), ValueKind::Text);
        assert_eq!(ValueKind::infer_column(std::iter::empty()), ValueKind::Missing);
    }

    #[test]
    fn test_parse_as_column_kind() {
        assert_eq!(Value::parse_as("42", ValueKind::Integer), Value::Integer(42));
        assert_eq!(Value::parse_as("3", ValueKind::Real), Value::Real(3.0));
        assert_eq!(Value::parse_as("01", ValueKind::Text), Value::from("01"));
        assert_ne!(
            Value::parse_as("01", ValueKind::Text),
            Value::parse_as("1", ValueKind::Text)
        );
    }

    #[test]
    fn test_integral_real_equals_integer() {
        assert_eq!(Value::Real(1.0), Value::Integer(1));
        assert_ne!(Value::Real(1.5), Value::Integer(1));

        let mut keys = HashSet::new();
        keys.insert(Value::Integer(7));
        assert!(!keys.insert(Value::Real(7.0)));
    }

    #[test]
    fn test_zero_and_nan_normalised() {
        assert_eq!(Value::Real(-0.0), Value::Real(0.0));
        assert_eq!(Value::Real(f64::NAN), Value::Real(f64::NAN));

        let mut keys = HashSet::new();
        keys.insert(Value::Real(f64::NAN));
        assert!(!keys.insert(Value::Real(-f64::NAN)));
    }

    #[test]
    fn test_text_never_equals_number() {
        assert_ne!(Value::Text("1".to_string()), Value::Integer(1));
    }

    #[test]
    fn test_from_json_composites() {
        let json: serde_json::Value = serde_json::from_str(r#"{"a": [1, 2.5, "x"]}"#).unwrap();
        let value = Value::from_json(json);
        assert_eq!(value.kind(), ValueKind::Record);
        assert!(!value.is_atomic());
        assert_eq!(value.to_string(), "{a: [1, 2.5, x]}");
    }

    #[test]
    fn test_kind_atomicity() {
        assert!(ValueKind::Missing.is_atomic());
        assert!(ValueKind::Text.is_atomic());
        assert!(ValueKind::List.is_composite());
        assert!(ValueKind::Record.is_composite());
    }
}
