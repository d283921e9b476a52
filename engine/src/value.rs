//! FILENAME: engine/src/value.rs
//! PURPOSE: Defines the value stored in every dataframe cell.
//! CONTEXT: `Value::Empty` is the absent marker. It is never confused with a
//! zero, an empty string or `false`, and it sorts after every data value.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A single cell of a dataframe.
/// Serializes untagged: absent as `null`, the rest as plain JSON scalars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl Value {
    /// True for the absent marker.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the display form of the value.
    /// Absent values display as an empty string; renderers substitute their
    /// own placeholder.
    pub fn display_value(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
        }
    }

    /// Cross-type sort rank: numbers, then text, then booleans, absent last.
    fn rank(&self) -> u8 {
        match self {
            Value::Number(_) => 0,
            Value::Text(_) => 1,
            Value::Boolean(_) => 2,
            Value::Empty => 3,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}

// ============================================================================
// EQUALITY & ORDERING
// ============================================================================

// NaN values are treated as equal to each other so that they group together.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Empty, Value::Empty) => true,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Empty => {}
            Value::Number(n) => {
                if n.is_nan() {
                    u64::MAX.hash(state);
                } else if *n == 0.0 {
                    // 0.0 and -0.0 compare equal
                    0u64.hash(state);
                } else {
                    n.to_bits().hash(state);
                }
            }
            Value::Text(s) => s.hash(state),
            Value::Boolean(b) => b.hash(state),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => match a.partial_cmp(b) {
                Some(ordering) => ordering,
                // NaN sorts after every other number
                None => a.is_nan().cmp(&b.is_nan()),
            },
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

macro_rules! number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
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

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Empty, Into::into)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Empty,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Empty, Value::Number),
            serde_json::Value::String(s) => Value::Text(s.clone()),
            // Nested structures are kept as their JSON text
            other => Value::Text(other.to_string()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_drops_integral_fraction() {
        assert_eq!(Value::from(42).display_value(), "42");
        assert_eq!(Value::from(-10.0).display_value(), "-10");
        assert_eq!(Value::from(4.0 / 3.0).display_value(), "1.3333333333333333");
        assert_eq!(Value::from(true).display_value(), "true");
        assert_eq!(Value::Empty.display_value(), "");
    }

    #[test]
    fn test_ordering_puts_absent_last() {
        let mut values = vec![
            Value::Empty,
            Value::from("b"),
            Value::from(true),
            Value::from(3),
            Value::from(f64::NAN),
            Value::from(-1),
            Value::from("a"),
        ];
        values.sort();
        assert_eq!(values[0], Value::from(-1));
        assert_eq!(values[1], Value::from(3));
        assert!(values[2].as_f64().unwrap().is_nan());
        assert_eq!(values[3], Value::from("a"));
        assert_eq!(values[4], Value::from("b"));
        assert_eq!(values[5], Value::from(true));
        assert_eq!(values[6], Value::Empty);
    }

    #[test]
    fn test_equality_is_strict_across_types() {
        assert_ne!(Value::from(1), Value::from("1"));
        assert_ne!(Value::from(0), Value::Empty);
        assert_ne!(Value::from(""), Value::Empty);
        assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
        assert_eq!(Value::from(0.0), Value::from(-0.0));
    }

    #[test]
    fn test_option_and_json_conversions() {
        assert_eq!(Value::from(None::<i32>), Value::Empty);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
        assert_eq!(Value::from(json!(null)), Value::Empty);
        assert_eq!(Value::from(json!(2.5)), Value::from(2.5));
        assert_eq!(Value::from(json!([1, 2])), Value::from("[1,2]"));
    }
}
