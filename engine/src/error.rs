//! FILENAME: engine/src/error.rs

use thiserror::Error;

/// Failures surfaced by series, dataframe and partition operations.
/// None of them leave the receiver in a corrupted state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("operation \"{operation}\" cannot be performed on a series attached to a dataframe")]
    Owned { operation: &'static str },

    #[error("column \"{0}\" does not exist in the dataframe")]
    MissingColumn(String),

    #[error("column \"{0}\" appears more than once")]
    DuplicateColumn(String),

    #[error("incoming series size ({actual}) differs from dataframe size ({expected})")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    #[error("series is empty")]
    EmptySeries,

    #[error("cannot zip series of length {left} with series of length {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("numeric value expected, found \"{0}\"")]
    NotNumeric(String),

    #[error("invalid row source: {0}")]
    InvalidRowSource(String),

    #[error("Sort error: {0}")]
    Sort(#[from] sorter::PermutationError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
