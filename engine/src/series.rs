//! FILENAME: engine/src/series.rs
//! Series - an ordered, named sequence of values of one logical type.
//!
//! A series is either free-standing or attached to exactly one dataframe.
//! While attached, only the dataframe may change its length or order: the
//! length-mutating operations here fail with `FrameError::Owned`. Element
//! writes through `set` remain allowed because they keep rows aligned.

use std::cmp::Ordering;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::error::{FrameError, Result};
use crate::value::Value;

// ============================================================================
// OWNERSHIP TAG
// ============================================================================

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a dataframe, used to tag the series it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

impl FrameId {
    pub(crate) fn next() -> Self {
        FrameId(NEXT_FRAME_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

// ============================================================================
// NUMERIC CONTENT
// ============================================================================

/// Element types that statistics can be computed over.
/// Absent entries read as 0; non-numeric entries are an error.
pub trait Numeric {
    fn to_number(&self) -> Result<f64>;
}

macro_rules! numeric_primitive {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn to_number(&self) -> Result<f64> {
                    Ok(*self as f64)
                }
            }
        )*
    };
}

numeric_primitive!(f64, f32, i32, i64, u32, u64, usize);

impl Numeric for Option<f64> {
    fn to_number(&self) -> Result<f64> {
        Ok(self.unwrap_or(0.0))
    }
}

impl Numeric for Value {
    fn to_number(&self) -> Result<f64> {
        match self {
            Value::Empty => Ok(0.0),
            Value::Number(n) => Ok(*n),
            other => Err(FrameError::NotNumeric(other.display_value())),
        }
    }
}

// ============================================================================
// SERIES
// ============================================================================

/// An ordered sequence of values, optionally named and optionally owned by
/// a dataframe.
///
/// `Clone` keeps the owner tag: a clone of an attached column still counts
/// as owned, so its length cannot change and no dataframe will take it
/// over. Use [`Series::copy`] for a free-standing copy.
#[derive(Debug, Clone)]
pub struct Series<T> {
    data: Vec<T>,
    name: Option<String>,
    owner: Option<FrameId>,
}

impl<T> Series<T> {
    pub fn new(data: Vec<T>) -> Self {
        Series {
            data,
            name: None,
            owner: None,
        }
    }

    pub fn named(name: impl Into<String>, data: Vec<T>) -> Self {
        Series {
            data,
            name: Some(name.into()),
            owner: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Renames a free-standing series. Attached series take their name from
    /// the dataframe.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.assert_unowned("set_name")?;
        self.name = Some(name.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    // ------------------------------------------------------------------------
    // Ownership plumbing (dataframe only)
    // ------------------------------------------------------------------------

    pub(crate) fn attach(&mut self, owner: FrameId, name: String) {
        self.owner = Some(owner);
        self.name = Some(name);
    }

    pub(crate) fn data_mut(&mut self) -> &mut Vec<T> {
        &mut self.data
    }

    pub(crate) fn into_data(self) -> Vec<T> {
        self.data
    }

    fn assert_unowned(&self, operation: &'static str) -> Result<()> {
        if self.owner.is_some() {
            return Err(FrameError::Owned { operation });
        }
        Ok(())
    }

    fn check_index(&self, index: isize) -> Result<usize> {
        resolve_index(index, self.data.len())
    }

    // ------------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------------

    /// Gets an item by index. Negative values access the series from behind.
    pub fn get(&self, index: isize) -> Result<&T> {
        let index = self.check_index(index)?;
        Ok(&self.data[index])
    }

    /// Sets an item by index. Allowed on attached series.
    pub fn set(&mut self, index: isize, value: T) -> Result<()> {
        let index = self.check_index(index)?;
        self.data[index] = value;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Length-mutating operations (free-standing series only)
    // ------------------------------------------------------------------------

    pub fn append(&mut self, values: impl IntoIterator<Item = T>) -> Result<()> {
        self.assert_unowned("append")?;
        self.data.extend(values);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Option<T>> {
        self.assert_unowned("pop")?;
        Ok(self.data.pop())
    }

    pub fn remove_at(&mut self, index: isize) -> Result<T> {
        self.assert_unowned("remove_at")?;
        let index = self.check_index(index)?;
        Ok(self.data.remove(index))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.assert_unowned("clear")?;
        self.data.clear();
        Ok(())
    }

    pub fn sort_in_place_by<F>(&mut self, compare: F) -> Result<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.assert_unowned("sort")?;
        self.data.sort_by(compare);
        Ok(())
    }

    pub fn sort_in_place(&mut self) -> Result<()>
    where
        T: Ord,
    {
        self.sort_in_place_by(|a, b| a.cmp(b))
    }

    // ------------------------------------------------------------------------
    // Copying traversal
    // ------------------------------------------------------------------------

    /// Creates a free-standing copy that keeps the name.
    pub fn copy(&self) -> Series<T>
    where
        T: Clone,
    {
        Series {
            data: self.data.clone(),
            name: self.name.clone(),
            owner: None,
        }
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.clone()
    }

    pub fn map<R, F>(&self, mut f: F) -> Series<R>
    where
        F: FnMut(&T, usize) -> R,
    {
        let data = self.data.iter().enumerate().map(|(i, v)| f(v, i)).collect();
        Series {
            data,
            name: self.name.clone(),
            owner: None,
        }
    }

    pub fn flat_map<R, I, F>(&self, mut f: F) -> Series<R>
    where
        I: IntoIterator<Item = R>,
        F: FnMut(&T, usize) -> I,
    {
        let data = self
            .data
            .iter()
            .enumerate()
            .flat_map(|(i, v)| f(v, i))
            .collect();
        Series {
            data,
            name: self.name.clone(),
            owner: None,
        }
    }

    pub fn filter<F>(&self, mut predicate: F) -> Series<T>
    where
        T: Clone,
        F: FnMut(&T, usize) -> bool,
    {
        let data = self
            .data
            .iter()
            .enumerate()
            .filter(|(i, v)| predicate(v, *i))
            .map(|(_, v)| v.clone())
            .collect();
        Series {
            data,
            name: self.name.clone(),
            owner: None,
        }
    }

    pub fn reduce<R, F>(&self, initial: R, mut f: F) -> R
    where
        F: FnMut(R, &T, usize) -> R,
    {
        self.data
            .iter()
            .enumerate()
            .fold(initial, |acc, (i, v)| f(acc, v, i))
    }

    /// Runs `f` over `[start, stop)`; bounds default to the whole series and
    /// negative bounds count from the end.
    pub fn for_each<F>(&self, start: Option<isize>, stop: Option<isize>, mut f: F)
    where
        F: FnMut(&T, usize),
    {
        for i in resolve_range(start, stop, self.data.len()) {
            f(&self.data[i], i);
        }
    }

    /// Combines two series element by element.
    pub fn zip<U, R, F>(&self, other: &Series<U>, mut f: F) -> Result<Series<R>>
    where
        F: FnMut(&T, &U) -> R,
    {
        if self.len() != other.len() {
            return Err(FrameError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| f(a, b))
            .collect();
        Ok(Series {
            data,
            name: self.name.clone(),
            owner: None,
        })
    }

    // ------------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------------

    /// Returns the first element in `[start, stop)` matching the predicate.
    pub fn find<F>(&self, predicate: F, start: Option<isize>, stop: Option<isize>) -> Option<&T>
    where
        F: FnMut(&T, usize) -> bool,
    {
        self.position(predicate, start, stop).map(|i| &self.data[i])
    }

    /// Returns the index of the first element in `[start, stop)` matching the
    /// predicate.
    pub fn position<F>(&self, mut predicate: F, start: Option<isize>, stop: Option<isize>) -> Option<usize>
    where
        F: FnMut(&T, usize) -> bool,
    {
        resolve_range(start, stop, self.data.len()).find(|&i| predicate(&self.data[i], i))
    }

    /// Returns the index of the first element in `[start, stop)` equal to `value`.
    pub fn index_of(&self, value: &T, start: Option<isize>, stop: Option<isize>) -> Option<usize>
    where
        T: PartialEq,
    {
        self.position(|v, _| v == value, start, stop)
    }

    // ------------------------------------------------------------------------
    // Extremes by comparator
    // ------------------------------------------------------------------------

    /// Returns the first maximal element according to `compare`.
    pub fn max_by<F>(&self, mut compare: F) -> Result<&T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut iter = self.data.iter();
        let mut current = iter.next().ok_or(FrameError::EmptySeries)?;
        for value in iter {
            if compare(current, value) == Ordering::Less {
                current = value;
            }
        }
        Ok(current)
    }

    /// Returns the first minimal element according to `compare`.
    pub fn min_by<F>(&self, mut compare: F) -> Result<&T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.max_by(|a, b| compare(b, a))
    }
}

impl<T: Into<Value>> Series<T> {
    /// Converts the elements into dataframe values. The result is
    /// free-standing and keeps the name.
    pub fn into_values(self) -> Series<Value> {
        Series {
            data: self.data.into_iter().map(Into::into).collect(),
            name: self.name,
            owner: None,
        }
    }
}

impl Series<Value> {
    /// Builds a value series from anything convertible to `Value`.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Series::new(values.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// STATISTICS
// ============================================================================

impl<T: Numeric> Series<T> {
    fn numbers(&self) -> Result<Vec<f64>> {
        self.data.iter().map(Numeric::to_number).collect()
    }

    /// Smallest numeric value. Fails on an empty series.
    pub fn min(&self) -> Result<f64> {
        self.numbers()?
            .into_iter()
            .reduce(f64::min)
            .ok_or(FrameError::EmptySeries)
    }

    /// Largest numeric value. Fails on an empty series.
    pub fn max(&self) -> Result<f64> {
        self.numbers()?
            .into_iter()
            .reduce(f64::max)
            .ok_or(FrameError::EmptySeries)
    }

    pub fn sum(&self) -> Result<f64> {
        Ok(self.numbers()?.into_iter().sum())
    }

    /// Arithmetic mean; zero for an empty series.
    pub fn mean(&self) -> Result<f64> {
        if self.data.is_empty() {
            return Ok(0.0);
        }
        Ok(self.sum()? / self.data.len() as f64)
    }

    /// Element at position `len / 2` of a sorted copy; zero for an empty series.
    pub fn median(&self) -> Result<f64> {
        let mut numbers = self.numbers()?;
        if numbers.is_empty() {
            return Ok(0.0);
        }
        numbers.sort_by(f64::total_cmp);
        Ok(numbers[numbers.len() / 2])
    }

    /// Sum of squared deviations from the mean. It is not divided by the
    /// count. Zero for an empty series.
    pub fn variance(&self) -> Result<f64> {
        let numbers = self.numbers()?;
        if numbers.is_empty() {
            return Ok(0.0);
        }
        let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
        Ok(numbers.iter().map(|n| (mean - n) * (mean - n)).sum())
    }

    /// Square root of [`Series::variance`].
    pub fn stddev(&self) -> Result<f64> {
        Ok(self.variance()?.sqrt())
    }

    /// Running totals: entry `i` is the sum of entries `0..=i`.
    pub fn cumulative_sum(&self) -> Result<Series<f64>> {
        let mut total = 0.0;
        let data = self
            .numbers()?
            .into_iter()
            .map(|n| {
                total += n;
                total
            })
            .collect();
        Ok(Series {
            data,
            name: self.name.clone(),
            owner: None,
        })
    }
}

// ============================================================================
// TRAIT IMPLS
// ============================================================================

// Ownership is identity, not content.
impl<T: PartialEq> PartialEq for Series<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.data == other.data
    }
}

impl<T> From<Vec<T>> for Series<T> {
    fn from(data: Vec<T>) -> Self {
        Series::new(data)
    }
}

impl<T> FromIterator<T> for Series<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Series::new(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Series<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

// ============================================================================
// INDEX HELPERS
// ============================================================================

/// Resolves a possibly negative index against `len`.
pub(crate) fn resolve_index(index: isize, len: usize) -> Result<usize> {
    let resolved = if index < 0 { len as isize + index } else { index };
    if resolved < 0 || resolved as usize >= len {
        return Err(FrameError::IndexOutOfRange { index, len });
    }
    Ok(resolved as usize)
}

/// Resolves optional `[start, stop)` bounds against `len`. `stop` is clamped
/// to the length, negative bounds wrap, and an inverted range is empty.
pub(crate) fn resolve_range(start: Option<isize>, stop: Option<isize>, len: usize) -> Range<usize> {
    let len_i = len as isize;
    let wrap = |i: isize| if i < 0 { len_i + i } else { i };
    let start = wrap(start.unwrap_or(0)).clamp(0, len_i);
    let stop = wrap(stop.unwrap_or(len_i).min(len_i)).clamp(0, len_i);
    start as usize..stop.max(start) as usize
}
