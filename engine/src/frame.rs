//! FILENAME: engine/src/frame.rs
//! DataFrame - an ordered collection of equal-length, uniquely named columns.
//!
//! Construction normalizes every input shape into one representation before
//! any column is built:
//! - positional rows feed columns by position
//! - keyed records feed columns by name, discovering new names as they appear
//! - ready-made series are taken over after their lengths are checked
//!
//! Every derived dataframe (copy, slice, union, filter, sort, group) owns
//! freshly built columns; no series is ever shared between two dataframes.

use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::error::{FrameError, Result};
use crate::row::{Row, RowSource};
use crate::series::{resolve_index, FrameId, Series};
use crate::value::Value;

/// Column-oriented table of `Value`s.
#[derive(Debug)]
pub struct DataFrame {
    id: FrameId,
    columns: Vec<Series<Value>>,
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl DataFrame {
    /// Creates a dataframe without columns.
    pub fn new() -> Self {
        DataFrame {
            id: FrameId::next(),
            columns: Vec::new(),
        }
    }

    /// Builds a dataframe from trusted parts: unique names, equal lengths.
    pub(crate) fn assemble(names: Vec<String>, data: Vec<Vec<Value>>) -> Self {
        let id = FrameId::next();
        let columns = names
            .into_iter()
            .zip(data)
            .map(|(name, values)| {
                let mut series = Series::new(values);
                series.attach(id, name);
                series
            })
            .collect();
        DataFrame { id, columns }
    }

    /// Creates a dataframe with the given columns and no rows.
    pub fn with_column_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Self::from_rows_with_names(Vec::<RowSource>::new(), names)
    }

    /// Builds a dataframe from positional rows and/or keyed records.
    ///
    /// Record keys become columns in first-seen order. Positions that never
    /// receive a name are called `_1`, `_2`, ... after their position.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<RowSource>,
    {
        Self::ingest(rows, None)
    }

    /// Builds a dataframe whose column names are fixed up front.
    /// Record keys outside `names` are ignored.
    pub fn from_rows_with_names<I, S>(rows: I, names: &[S]) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<RowSource>,
        S: AsRef<str>,
    {
        let names = names.iter().map(|n| n.as_ref().to_string()).collect();
        Self::ingest(rows, Some(names))
    }

    fn ingest<I>(rows: I, fixed_names: Option<Vec<String>>) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<RowSource>,
    {
        let fixed = fixed_names.is_some();
        let mut names = fixed_names.unwrap_or_default();
        let mut positions: FxHashMap<String, usize> = FxHashMap::default();
        for (position, name) in names.iter().enumerate() {
            if positions.insert(name.clone(), position).is_some() {
                return Err(FrameError::DuplicateColumn(name.clone()));
            }
        }

        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
        let mut row_count = 0;

        for source in rows {
            let values = match source.into() {
                RowSource::Values(values) => values,
                RowSource::Record(fields) => {
                    let mut aligned = vec![Value::Empty; names.len()];
                    for (key, value) in fields {
                        let position = match positions.get(&key) {
                            Some(&position) => position,
                            None if fixed => continue,
                            None => {
                                let position = names.len();
                                positions.insert(key.clone(), position);
                                names.push(key);
                                position
                            }
                        };
                        if position >= aligned.len() {
                            aligned.resize(position + 1, Value::Empty);
                        }
                        aligned[position] = value;
                    }
                    aligned
                }
            };

            // Columns first seen in this row are backfilled for all earlier rows
            while columns.len() < values.len() {
                columns.push(vec![Value::Empty; row_count]);
            }
            let width = values.len();
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
            for column in columns.iter_mut().skip(width) {
                column.push(Value::Empty);
            }
            row_count += 1;
        }

        let mut final_names = Vec::with_capacity(columns.len());
        for position in 0..columns.len() {
            let name = match names.get(position) {
                Some(name) => name.clone(),
                None => {
                    let synthesized = format!("_{}", position + 1);
                    if positions.contains_key(&synthesized) {
                        return Err(FrameError::DuplicateColumn(synthesized));
                    }
                    synthesized
                }
            };
            final_names.push(name);
        }

        trace!("ingested {} rows into {} columns", row_count, final_names.len());
        Ok(Self::assemble(final_names, columns))
    }

    /// Takes over ready-made series. All must have the same length and none
    /// may already belong to a dataframe.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Series<Value>)>,
        S: Into<String>,
    {
        let id = FrameId::next();
        let mut owned: Vec<Series<Value>> = Vec::new();

        for (name, mut series) in columns {
            let name = name.into();
            if series.is_owned() {
                return Err(FrameError::Owned {
                    operation: "DataFrame::from_columns",
                });
            }
            if let Some(first) = owned.first() {
                if first.len() != series.len() {
                    return Err(FrameError::SizeMismatch {
                        expected: first.len(),
                        actual: series.len(),
                    });
                }
            }
            if owned.iter().any(|s| s.name() == Some(name.as_str())) {
                return Err(FrameError::DuplicateColumn(name));
            }
            series.attach(id, name);
            owned.push(series);
        }

        Ok(DataFrame { id, columns: owned })
    }

    /// Builds a dataframe from a JSON array whose elements are arrays
    /// (positional rows) or objects (records).
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let rows = json.as_array().ok_or_else(|| {
            FrameError::InvalidRowSource(format!("expected an array of rows, found {}", json))
        })?;

        let sources = rows
            .iter()
            .map(|row| match row {
                serde_json::Value::Array(values) => {
                    Ok(RowSource::Values(values.iter().map(Value::from).collect()))
                }
                serde_json::Value::Object(fields) => Ok(RowSource::Record(
                    fields
                        .iter()
                        .map(|(name, value)| (name.clone(), Value::from(value)))
                        .collect(),
                )),
                other => Err(FrameError::InvalidRowSource(format!(
                    "expected an array or object, found {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_rows(sources)
    }
}

// ============================================================================
// COLUMNS
// ============================================================================

impl DataFrame {
    /// Number of rows.
    pub fn size(&self) -> usize {
        self.columns.first().map_or(0, Series::len)
    }

    /// True when there are no rows (with or without columns).
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(column_name).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position_of(name).is_some()
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|s| column_name(s) == name)
    }

    pub fn column(&self, name: &str) -> Result<&Series<Value>> {
        self.position_of(name)
            .map(|position| &self.columns[position])
            .ok_or_else(|| FrameError::MissingColumn(name.to_string()))
    }

    /// Overwrites one cell. Negative indices count from the last row.
    /// Columns are never handed out mutably, so row counts stay aligned.
    pub fn set_value(&mut self, name: &str, index: isize, value: impl Into<Value>) -> Result<()> {
        let position = self
            .position_of(name)
            .ok_or_else(|| FrameError::MissingColumn(name.to_string()))?;
        self.columns[position].set(index, value.into())
    }

    pub fn columns(&self) -> impl Iterator<Item = &Series<Value>> {
        self.columns.iter()
    }

    /// Replaces or inserts a column. A dataframe without columns accepts any
    /// length; otherwise the series must match the row count.
    pub fn set_column(
        &mut self,
        name: impl Into<String>,
        mut series: Series<Value>,
        to_front: bool,
    ) -> Result<()> {
        if series.is_owned() {
            return Err(FrameError::Owned {
                operation: "DataFrame::set_column",
            });
        }
        if !self.columns.is_empty() && series.len() != self.size() {
            return Err(FrameError::SizeMismatch {
                expected: self.size(),
                actual: series.len(),
            });
        }

        let name = name.into();
        let existing = self.position_of(&name);
        series.attach(self.id, name);

        match (existing, to_front) {
            (Some(position), false) => self.columns[position] = series,
            (Some(position), true) => {
                self.columns.remove(position);
                self.columns.insert(0, series);
            }
            (None, false) => self.columns.push(series),
            (None, true) => self.columns.insert(0, series),
        }
        Ok(())
    }

    /// Removes columns by name. Fails without removing anything if a name
    /// is unknown.
    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if let Some(missing) = names.iter().find(|n| !self.has_column(n.as_ref())) {
            return Err(FrameError::MissingColumn(missing.as_ref().to_string()));
        }
        self.columns
            .retain(|s| !names.iter().any(|n| n.as_ref() == column_name(s)));
        Ok(())
    }

    /// Copy of the dataframe without the named columns.
    pub fn without_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<DataFrame> {
        let mut copy = self.copy();
        copy.drop_columns(names)?;
        Ok(copy)
    }
}

fn column_name(series: &Series<Value>) -> &str {
    series.name().unwrap_or_default()
}

// ============================================================================
// ROWS
// ============================================================================

impl DataFrame {
    /// Materializes the row at a resolved, in-range index.
    pub(crate) fn row_at(&self, index: usize) -> Row {
        let mut row = Row::with_capacity(self.columns.len());
        for series in &self.columns {
            row.insert(column_name(series), series.as_slice()[index].clone());
        }
        row
    }

    /// Gets a row by index. Negative values access the rows from behind.
    pub fn row(&self, index: isize) -> Result<Row> {
        let index = resolve_index(index, self.size())?;
        Ok(self.row_at(index))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.size()).map(move |index| self.row_at(index))
    }

    /// Overwrites a row. Columns the row does not mention become absent.
    pub fn set_row(&mut self, index: isize, row: &Row) -> Result<()> {
        let index = resolve_index(index, self.size())?;
        for series in &mut self.columns {
            let value = row.value(column_name(series)).clone();
            series.data_mut()[index] = value;
        }
        Ok(())
    }

    /// Removes a row from every column and returns it.
    pub fn remove_row(&mut self, index: isize) -> Result<Row> {
        let index = resolve_index(index, self.size())?;
        let row = self.row_at(index);
        self.remove_row_at(index);
        Ok(row)
    }

    fn remove_row_at(&mut self, index: usize) {
        for series in &mut self.columns {
            series.data_mut().remove(index);
        }
    }
}

// ============================================================================
// DERIVED DATAFRAMES
// ============================================================================

impl DataFrame {
    pub fn copy(&self) -> DataFrame {
        self.slice(0, self.size())
    }

    /// Rows `[start, stop)`, clamped to the row count.
    pub fn slice(&self, start: usize, stop: usize) -> DataFrame {
        let stop = stop.min(self.size());
        let start = start.min(stop);
        let names = self.column_names().into_iter().map(String::from).collect();
        let data = self
            .columns
            .iter()
            .map(|series| series.as_slice()[start..stop].to_vec())
            .collect();
        Self::assemble(names, data)
    }

    /// Rows of `self` followed by rows of `other`. Columns missing on either
    /// side are filled with absent values, so the result may be wider.
    pub fn union(&self, other: &DataFrame) -> DataFrame {
        Self::concat([self, other])
    }

    /// Stacks dataframes in order, widening to the union of their column
    /// names (first-seen order).
    pub fn concat<'a, I>(frames: I) -> DataFrame
    where
        I: IntoIterator<Item = &'a DataFrame>,
    {
        let frames: Vec<&DataFrame> = frames.into_iter().collect();
        let mut names: Vec<String> = Vec::new();
        for frame in &frames {
            for name in frame.column_names() {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }

        let data = names
            .iter()
            .map(|name| {
                let mut values = Vec::new();
                for frame in &frames {
                    match frame.column(name) {
                        Ok(series) => values.extend_from_slice(series.as_slice()),
                        Err(_) => values.resize(values.len() + frame.size(), Value::Empty),
                    }
                }
                values
            })
            .collect();
        Self::assemble(names, data)
    }

    /// Replays a move-map on every column. Columns are only replaced once
    /// all of them were reordered successfully.
    pub(crate) fn reorder(&mut self, permutation: &[usize]) -> Result<()> {
        let reordered = self
            .columns
            .iter()
            .map(|series| sorter::apply_permutation(series.to_vec(), permutation))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for (series, data) in self.columns.iter_mut().zip(reordered) {
            *series.data_mut() = data;
        }
        Ok(())
    }
}

// ============================================================================
// TRAVERSAL
// ============================================================================

impl DataFrame {
    pub fn map<R, F>(&self, mut f: F) -> Vec<R>
    where
        F: FnMut(&Row, usize) -> R,
    {
        self.rows().enumerate().map(|(i, row)| f(&row, i)).collect()
    }

    pub fn flat_map<R, I, F>(&self, mut f: F) -> Vec<R>
    where
        I: IntoIterator<Item = R>,
        F: FnMut(&Row, usize) -> I,
    {
        self.rows().enumerate().flat_map(|(i, row)| f(&row, i)).collect()
    }

    pub fn map_indices<R, F>(&self, f: F) -> Vec<R>
    where
        F: FnMut(usize) -> R,
    {
        (0..self.size()).map(f).collect()
    }

    pub fn for_each_index<F>(&self, f: F)
    where
        F: FnMut(usize),
    {
        (0..self.size()).for_each(f)
    }

    /// Copy holding only the rows for which `predicate` holds.
    pub fn filter<F>(&self, predicate: F) -> DataFrame
    where
        F: FnMut(&Row, usize) -> bool,
    {
        let mut copy = self.copy();
        copy.filter_in_place(predicate);
        copy
    }

    /// Removes the rows for which `predicate` fails. The predicate always
    /// sees the original row index, however many rows were removed before.
    pub fn filter_in_place<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&Row, usize) -> bool,
    {
        let original_size = self.size();
        let mut removed = 0;
        for index in 0..original_size {
            let current = index - removed;
            let row = self.row_at(current);
            if !predicate(&row, index) {
                self.remove_row_at(current);
                removed += 1;
            }
        }
        debug!("filter kept {} of {} rows", original_size - removed, original_size);
    }
}

// ============================================================================
// TRAIT IMPLS
// ============================================================================

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

// A clone is a deep copy with its own identity.
impl Clone for DataFrame {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl PartialEq for DataFrame {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}
