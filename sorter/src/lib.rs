//! FILENAME: sorter/src/lib.rs
//! Move-permutation sorter.
//!
//! Sorting a table column by column would tear rows apart. Instead the
//! master column is sorted once, producing a move-map (permutation) that is
//! then replayed on every parallel sequence:
//! - `compute_move_permutation`: stable sort of the master values, returning
//!   the permutation together with the sorted values
//! - `apply_permutation`: reorders any other sequence of the same length

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// TYPES
// ============================================================================

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// A reordering of positions.
/// `permutation[i]` is the source index of the element that ends up at `i`.
pub type Permutation = Vec<usize>;

/// Result of sorting the master sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveMap<T> {
    pub permutation: Permutation,
    pub sorted: Vec<T>,
}

/// Returned when a permutation cannot be replayed on a sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    #[error("permutation covers {expected} positions but the sequence has {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("position {0} is missing or referenced twice")]
    InvalidPosition(usize),
}

// ============================================================================
// SORTING
// ============================================================================

/// Stable-sorts `values` in the given order and returns the move-map.
/// Equal values keep their relative order in both directions.
pub fn compute_move_permutation<T: Ord + Clone>(values: &[T], order: SortOrder) -> MoveMap<T> {
    compute_move_permutation_by(values, |a, b| match order {
        SortOrder::Ascending => a.cmp(b),
        SortOrder::Descending => b.cmp(a),
    })
}

/// Stable-sorts `values` with a caller-supplied comparator.
pub fn compute_move_permutation_by<T, F>(values: &[T], mut compare: F) -> MoveMap<T>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut permutation: Permutation = (0..values.len()).collect();
    // sort_by is stable: equal keys keep their row order
    permutation.sort_by(|&a, &b| compare(&values[a], &values[b]));

    let sorted = permutation.iter().map(|&i| values[i].clone()).collect();
    MoveMap { permutation, sorted }
}

/// Reorders `values` according to `permutation`.
pub fn apply_permutation<T>(
    values: Vec<T>,
    permutation: &[usize],
) -> Result<Vec<T>, PermutationError> {
    if values.len() != permutation.len() {
        return Err(PermutationError::LengthMismatch {
            expected: permutation.len(),
            actual: values.len(),
        });
    }

    let mut slots: Vec<Option<T>> = values.into_iter().map(Some).collect();
    let mut result = Vec::with_capacity(slots.len());
    for &source in permutation {
        match slots.get_mut(source).and_then(Option::take) {
            Some(value) => result.push(value),
            None => return Err(PermutationError::InvalidPosition(source)),
        }
    }
    Ok(result)
}
