//! FILENAME: engine/src/sort.rs
//! Row sorting. The key column is sorted once by the sorter crate and the
//! resulting move-map is replayed on every column, so rows never tear.

use log::debug;
use sorter::{compute_move_permutation, Permutation, SortOrder};

use crate::error::{FrameError, Result};
use crate::frame::DataFrame;
use crate::series::Series;
use crate::value::Value;

/// Identifies the column that drives a sort or a grouping: either a column
/// of the dataframe by name, or a free series aligned with its rows.
#[derive(Debug, Clone, Copy)]
pub enum ColumnRef<'a> {
    Name(&'a str),
    Series(&'a Series<Value>),
}

impl<'a> ColumnRef<'a> {
    /// Resolves to the key series, checking that a free series matches the
    /// row count.
    pub(crate) fn resolve<'f>(&self, frame: &'f DataFrame) -> Result<&'f Series<Value>>
    where
        'a: 'f,
    {
        match *self {
            ColumnRef::Name(name) => frame.column(name),
            ColumnRef::Series(series) => {
                if series.len() != frame.size() {
                    return Err(FrameError::SizeMismatch {
                        expected: frame.size(),
                        actual: series.len(),
                    });
                }
                Ok(series)
            }
        }
    }

    pub(crate) fn label(&self) -> Option<&'a str> {
        match *self {
            ColumnRef::Name(name) => Some(name),
            ColumnRef::Series(series) => series.name(),
        }
    }
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(name: &'a str) -> Self {
        ColumnRef::Name(name)
    }
}

impl<'a> From<&'a String> for ColumnRef<'a> {
    fn from(name: &'a String) -> Self {
        ColumnRef::Name(name)
    }
}

impl<'a> From<&'a Series<Value>> for ColumnRef<'a> {
    fn from(series: &'a Series<Value>) -> Self {
        ColumnRef::Series(series)
    }
}

impl DataFrame {
    /// Returns a copy sorted by `key`. Equal keys keep their row order.
    pub fn sort_by<'a>(&self, key: impl Into<ColumnRef<'a>>, order: SortOrder) -> Result<DataFrame> {
        let permutation = self.sort_permutation(key.into(), order)?;
        let mut sorted = self.copy();
        sorted.reorder(&permutation)?;
        Ok(sorted)
    }

    /// Sorts the rows of this dataframe by `key`.
    pub fn sort_by_in_place<'a>(&mut self, key: impl Into<ColumnRef<'a>>, order: SortOrder) -> Result<()> {
        let permutation = self.sort_permutation(key.into(), order)?;
        self.reorder(&permutation)
    }

    fn sort_permutation(&self, key: ColumnRef<'_>, order: SortOrder) -> Result<Permutation> {
        let master = key.resolve(self)?;
        let map = compute_move_permutation(master.as_slice(), order);
        debug!(
            "sorted {} rows by {} ({:?})",
            self.size(),
            key.label().unwrap_or("<unnamed>"),
            order
        );
        Ok(map.permutation)
    }
}
