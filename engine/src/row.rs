//! FILENAME: engine/src/row.rs
//! PURPOSE: Row views and row sources.
//! CONTEXT: A `Row` is materialized on demand from one index across all
//! columns and is never stored. A `RowSource` is one input row for
//! dataframe construction, either positional or keyed.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::Value;

static ABSENT: Value = Value::Empty;

// ============================================================================
// ROW
// ============================================================================

/// An ordered name -> value mapping for a single row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Row { fields: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Row {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Returns the value for `name`, or `None` if the row has no such field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns the value for `name`, treating unknown fields as absent.
    pub fn value(&self, name: &str) -> &Value {
        self.get(name).unwrap_or(&ABSENT)
    }

    /// Sets a field, replacing an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn into_fields(self) -> Vec<(String, Value)> {
        self.fields
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ============================================================================
// ROW SOURCE
// ============================================================================

/// One input row for dataframe construction.
#[derive(Debug, Clone, PartialEq)]
pub enum RowSource {
    /// Positional values; position `i` feeds the `i`-th column.
    Values(Vec<Value>),
    /// Keyed values; unknown keys introduce new columns unless the column
    /// names are fixed.
    Record(Vec<(String, Value)>),
}

impl From<Vec<Value>> for RowSource {
    fn from(values: Vec<Value>) -> Self {
        RowSource::Values(values)
    }
}

impl From<Row> for RowSource {
    fn from(row: Row) -> Self {
        RowSource::Record(row.into_fields())
    }
}

/// Builds a positional `RowSource`: `values![4, 5, "bar"]`.
#[macro_export]
macro_rules! values {
    ($($value:expr),* $(,)?) => {
        $crate::RowSource::Values(vec![$($crate::Value::from($value)),*])
    };
}

/// Builds a keyed `RowSource`: `record! { "a" => 1, "c" => "spam" }`.
#[macro_export]
macro_rules! record {
    ($($name:expr => $value:expr),* $(,)?) => {
        $crate::RowSource::Record(vec![$((String::from($name), $crate::Value::from($value))),*])
    };
}
