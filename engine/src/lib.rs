//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the dataframe engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod config;
pub mod error;
pub mod frame;
pub mod group;
pub mod render;
pub mod row;
pub mod series;
pub mod sort;
pub mod value;

// Re-export commonly used types at the crate root
pub use config::{RenderConfig, DEFAULT_KEY_COLUMN};
pub use error::{FrameError, Result};
pub use frame::DataFrame;
pub use group::{Aggregated, Field, Group, GroupColumns, GroupKey, Partition};
pub use row::{Row, RowSource};
pub use series::{FrameId, Numeric, Series};
pub use sort::ColumnRef;
pub use sorter::SortOrder;
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record, values};

    #[test]
    fn it_builds_sorts_and_renders() {
        let df = DataFrame::from_rows(vec![
            values![4, 5, "bar"],
            record! { "a" => 1, "b" => 2, "c" => "spam" },
            record! { "b" => 7, "c" => "eggs", "d" => 42 },
        ])
        .unwrap();

        let sorted = df.sort_by("c", SortOrder::Ascending).unwrap();
        assert_eq!(
            sorted.to_string(),
            "a b c    d\n\
             - - ---- --\n\
             4 5 bar  ?\n\
             ? 7 eggs 42\n\
             1 2 spam ?\n"
        );
        assert_ne!(df.to_string(), sorted.to_string());
    }

    #[test]
    fn integration_test_group_and_aggregate() {
        let df = DataFrame::from_rows_with_names(
            vec![values![1, 2, 3], values![1, 5, 6], values![2, 8, 9]],
            &["col1", "col2", "col3"],
        )
        .unwrap();

        let agg = df
            .group_by("col1")
            .unwrap()
            .aggregate(|group| Ok(Aggregated::fields().with("sum", group.column("col2")?.sum()?)))
            .unwrap();
        assert_eq!(agg.column_names(), vec!["col1", "sum"]);
        assert_eq!(
            agg.column("sum").unwrap().to_vec(),
            vec![Value::from(7), Value::from(8)]
        );
    }
}
