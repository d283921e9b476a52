//! FILENAME: engine/src/group.rs
//! PURPOSE: Grouping a dataframe into a partition and aggregating it back.
//! CONTEXT: Rows are keyed by a structural `GroupKey` (one value per key
//! column), sorted by that key through the sorter crate and split into runs
//! of equal keys. Each run becomes one group dataframe. Aggregation runs a
//! caller-supplied reducer per group, re-expands the key into its original
//! columns at the front of each result and stacks the results in key order.

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use sorter::{compute_move_permutation, MoveMap, SortOrder};

use crate::config::DEFAULT_KEY_COLUMN;
use crate::error::Result;
use crate::frame::DataFrame;
use crate::row::RowSource;
use crate::series::Series;
use crate::sort::ColumnRef;
use crate::value::Value;

// ============================================================================
// GROUP KEY
// ============================================================================

/// Composite key of a group: the row's values in the key columns, in key
/// column order. Ordered lexicographically, so multi-column groups sort by
/// the first key column, then the second, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey(SmallVec<[Value; 2]>);

impl GroupKey {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        GroupKey(values.into_iter().collect())
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Value> for GroupKey {
    fn from(value: Value) -> Self {
        GroupKey::new([value])
    }
}

impl From<Vec<Value>> for GroupKey {
    fn from(values: Vec<Value>) -> Self {
        GroupKey(SmallVec::from_vec(values))
    }
}

// ============================================================================
// GROUPING COLUMNS
// ============================================================================

/// What to group by: one column (by name or as a free series) or several
/// columns by name.
#[derive(Debug, Clone)]
pub enum GroupColumns<'a> {
    Column(ColumnRef<'a>),
    Names(Vec<&'a str>),
}

impl<'a> From<ColumnRef<'a>> for GroupColumns<'a> {
    fn from(column: ColumnRef<'a>) -> Self {
        GroupColumns::Column(column)
    }
}

impl<'a> From<&'a str> for GroupColumns<'a> {
    fn from(name: &'a str) -> Self {
        GroupColumns::Column(ColumnRef::Name(name))
    }
}

impl<'a> From<&'a String> for GroupColumns<'a> {
    fn from(name: &'a String) -> Self {
        GroupColumns::Column(ColumnRef::Name(name))
    }
}

impl<'a> From<&'a Series<Value>> for GroupColumns<'a> {
    fn from(series: &'a Series<Value>) -> Self {
        GroupColumns::Column(ColumnRef::Series(series))
    }
}

impl<'a> From<Vec<&'a str>> for GroupColumns<'a> {
    fn from(names: Vec<&'a str>) -> Self {
        GroupColumns::Names(names)
    }
}

impl<'a> From<&'a [&'a str]> for GroupColumns<'a> {
    fn from(names: &'a [&'a str]) -> Self {
        GroupColumns::Names(names.to_vec())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for GroupColumns<'a> {
    fn from(names: [&'a str; N]) -> Self {
        GroupColumns::Names(names.to_vec())
    }
}

impl<'a, const N: usize> From<&'a [&'a str; N]> for GroupColumns<'a> {
    fn from(names: &'a [&'a str; N]) -> Self {
        GroupColumns::Names(names.to_vec())
    }
}

// ============================================================================
// PARTITION
// ============================================================================

/// One group: its key and the rows that share it.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: GroupKey,
    pub frame: DataFrame,
}

/// Groups of a dataframe in ascending key order.
#[derive(Debug, Clone)]
pub struct Partition {
    key_names: Vec<String>,
    source_columns: Vec<String>,
    groups: Vec<Group>,
    index: FxHashMap<GroupKey, usize>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Names given to the key columns of aggregated results.
    pub fn key_names(&self) -> &[String] {
        &self.key_names
    }

    /// Column names of the dataframe that was grouped.
    pub fn source_columns(&self) -> &[String] {
        &self.source_columns
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.groups.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.iter().map(|group| &group.key)
    }

    pub fn get(&self, key: &GroupKey) -> Option<&DataFrame> {
        self.index.get(key).map(|&position| &self.groups[position].frame)
    }

    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }

    /// Reduces every group with `reducer` and stacks the results in group
    /// order. Each result gets the group key re-expanded into its key
    /// columns, placed in front.
    ///
    /// Without groups the reducer is probed once with a single all-absent
    /// row carrying the source column names; only the names it produces are
    /// kept, and the result has zero rows.
    pub fn aggregate<F>(&self, mut reducer: F) -> Result<DataFrame>
    where
        F: FnMut(&DataFrame) -> Result<Aggregated>,
    {
        if self.groups.is_empty() {
            return self.empty_result(&mut reducer);
        }

        let mut results = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let mut result = reducer(&group.frame)?.into_frame()?;
            // a result without columns still yields one key row
            let rows = if result.column_count() == 0 { 1 } else { result.size() };
            for (name, value) in self.key_names.iter().zip(group.key.values()).rev() {
                result.set_column(name.as_str(), Series::new(vec![value.clone(); rows]), true)?;
            }
            results.push(result);
        }

        debug!("aggregated {} groups", results.len());
        Ok(DataFrame::concat(&results))
    }

    fn empty_result<F>(&self, reducer: &mut F) -> Result<DataFrame>
    where
        F: FnMut(&DataFrame) -> Result<Aggregated>,
    {
        let probe = DataFrame::from_rows_with_names(
            vec![RowSource::Values(vec![Value::Empty; self.source_columns.len()])],
            &self.source_columns,
        )?;
        let shape = reducer(&probe)?.into_frame()?;

        let mut names = self.key_names.clone();
        for name in shape.column_names() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        debug!("aggregated empty partition into columns {:?}", names);
        DataFrame::with_column_names(&names)
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

// ============================================================================
// AGGREGATION RESULTS
// ============================================================================

/// One named output of a reducer: a scalar (one row) or a whole column.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Scalar(Value),
    Column(Series<Value>),
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        Field::Scalar(value)
    }
}

impl From<Series<Value>> for Field {
    fn from(series: Series<Value>) -> Self {
        Field::Column(series)
    }
}

impl From<Series<f64>> for Field {
    fn from(series: Series<f64>) -> Self {
        Field::Column(series.into_values())
    }
}

macro_rules! scalar_field_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Field {
                fn from(value: $t) -> Self {
                    Field::Scalar(Value::from(value))
                }
            }
        )*
    };
}

scalar_field_from!(f64, i32, i64, u32, u64, usize, bool, &str, String, &Value);

/// What a reducer returns for one group.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregated {
    Frame(DataFrame),
    Fields(Vec<(String, Field)>),
}

impl Aggregated {
    /// Starts an empty field list, to be filled with `with`.
    pub fn fields() -> Self {
        Aggregated::Fields(Vec::new())
    }

    /// Adds a named field. A frame result is first turned into fields, one
    /// per column.
    pub fn with(self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        let mut fields = match self {
            Aggregated::Fields(fields) => fields,
            Aggregated::Frame(frame) => frame
                .columns()
                .map(|series| {
                    let name = series.name().unwrap_or_default().to_string();
                    (name, Field::Column(series.copy()))
                })
                .collect(),
        };
        fields.push((name.into(), field.into()));
        Aggregated::Fields(fields)
    }

    /// Scalars become single-row columns; all fields must end up the same
    /// length.
    pub(crate) fn into_frame(self) -> Result<DataFrame> {
        match self {
            Aggregated::Frame(frame) => Ok(frame),
            Aggregated::Fields(fields) => DataFrame::from_columns(fields.into_iter().map(
                |(name, field)| {
                    let series = match field {
                        Field::Scalar(value) => Series::new(vec![value]),
                        // a clone of an attached column is released here
                        Field::Column(series) => Series::new(series.into_data()),
                    };
                    (name, series)
                },
            )),
        }
    }
}

impl From<DataFrame> for Aggregated {
    fn from(frame: DataFrame) -> Self {
        Aggregated::Frame(frame)
    }
}

impl From<Vec<(String, Field)>> for Aggregated {
    fn from(fields: Vec<(String, Field)>) -> Self {
        Aggregated::Fields(fields)
    }
}

// ============================================================================
// GROUPING
// ============================================================================

impl DataFrame {
    /// Groups a copy of this dataframe.
    pub fn group_by<'a>(&self, columns: impl Into<GroupColumns<'a>>) -> Result<Partition> {
        let (key_names, keys) = self.group_keys(&columns.into())?;
        let mut sorted = self.copy();
        sorted.split_into_groups(key_names, keys)
    }

    /// Groups this dataframe, leaving its rows sorted by the group key.
    pub fn group_by_in_place<'a>(&mut self, columns: impl Into<GroupColumns<'a>>) -> Result<Partition> {
        let (key_names, keys) = self.group_keys(&columns.into())?;
        self.split_into_groups(key_names, keys)
    }

    fn group_keys(&self, columns: &GroupColumns<'_>) -> Result<(Vec<String>, Vec<GroupKey>)> {
        match columns {
            GroupColumns::Column(column) => {
                let series = column.resolve(self)?;
                let name = column.label().unwrap_or(DEFAULT_KEY_COLUMN).to_string();
                let keys = series.iter().map(|value| GroupKey::from(value.clone())).collect();
                Ok((vec![name], keys))
            }
            GroupColumns::Names(names) => {
                let series = names
                    .iter()
                    .map(|name| self.column(name))
                    .collect::<Result<Vec<_>>>()?;
                let keys = (0..self.size())
                    .map(|row| GroupKey::new(series.iter().map(|s| s.as_slice()[row].clone())))
                    .collect();
                Ok((names.iter().map(|n| n.to_string()).collect(), keys))
            }
        }
    }

    fn split_into_groups(&mut self, key_names: Vec<String>, keys: Vec<GroupKey>) -> Result<Partition> {
        let MoveMap { permutation, sorted } = compute_move_permutation(&keys, SortOrder::Ascending);
        self.reorder(&permutation)?;

        let mut groups = Vec::new();
        let mut index = FxHashMap::default();
        let mut start = 0;
        for end in 1..=sorted.len() {
            if end == sorted.len() || sorted[end] != sorted[start] {
                index.insert(sorted[start].clone(), groups.len());
                groups.push(Group {
                    key: sorted[start].clone(),
                    frame: self.slice(start, end),
                });
                start = end;
            }
        }

        debug!(
            "grouped {} rows into {} groups by {:?}",
            self.size(),
            groups.len(),
            key_names
        );
        Ok(Partition {
            key_names,
            source_columns: self.column_names().into_iter().map(String::from).collect(),
            groups,
            index,
        })
    }
}
