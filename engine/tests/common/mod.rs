//! FILENAME: tests/common/mod.rs
//! Fixtures and assertion helpers for engine integration tests.

#![allow(dead_code)]

use engine::{record, values, DataFrame, Value};

// ============================================================================
// FIXTURES
// ============================================================================

/// Positional and keyed rows mixed in one input.
pub fn mixed_rows() -> DataFrame {
    DataFrame::from_rows(vec![
        values![4, 5, "bar"],
        record! { "a" => 1, "b" => 2, "c" => "spam" },
        record! { "b" => 7, "c" => "eggs", "d" => 42 },
    ])
    .unwrap()
}

/// Three positional rows with explicit column names.
pub fn readme_frame() -> DataFrame {
    DataFrame::from_rows_with_names(
        vec![values![1, 2, 3], values![1, 5, 6], values![2, 8, 9]],
        &["col1", "col2", "col3"],
    )
    .unwrap()
}

/// Six measurements keyed by time and group.
pub fn time_series() -> DataFrame {
    DataFrame::from_rows(vec![
        record! { "time" => 0, "group" => "a", "value" => 10 },
        record! { "time" => 0, "group" => "b", "value" => 20 },
        record! { "time" => 0, "group" => "b", "value" => 20 },
        record! { "time" => 1, "group" => "a", "value" => 15 },
        record! { "time" => 1, "group" => "b", "value" => 20 },
        record! { "time" => 1, "group" => "c", "value" => -10 },
    ])
    .unwrap()
}

pub struct SalesFixture;

impl SalesFixture {
    pub fn frame() -> DataFrame {
        let rows = vec![
            ("North", "Widget", "Q1", 10000.0, 100.0),
            ("North", "Widget", "Q2", 12000.0, 120.0),
            ("North", "Gadget", "Q1", 8000.0, 80.0),
            ("South", "Widget", "Q1", 15000.0, 150.0),
            ("South", "Gadget", "Q2", 13000.0, 130.0),
            ("East", "Widget", "Q2", 11000.0, 110.0),
            ("East", "Gadget", "Q1", 7000.0, 70.0),
        ];
        DataFrame::from_rows(rows.into_iter().map(|(region, product, quarter, sales, quantity)| {
            record! {
                "Region" => region,
                "Product" => product,
                "Quarter" => quarter,
                "Sales" => sales,
                "Quantity" => quantity,
            }
        }))
        .unwrap()
    }
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

/// Assert that a column holds exactly the given numbers.
pub fn assert_column_numbers(df: &DataFrame, name: &str, expected: &[f64]) {
    let actual: Vec<Value> = df.column(name).unwrap().to_vec();
    let expected: Vec<Value> = expected.iter().map(|&n| Value::from(n)).collect();
    assert_eq!(actual, expected, "column {}", name);
}

/// Assert that every row of `derived` is a row of `source`, counted with
/// multiplicity.
pub fn assert_rows_permuted(source: &DataFrame, derived: &DataFrame) {
    assert_eq!(source.size(), derived.size());
    let mut remaining: Vec<_> = source.rows().collect();
    for row in derived.rows() {
        let position = remaining
            .iter()
            .position(|candidate| *candidate == row)
            .unwrap_or_else(|| panic!("row {:?} not found in source", row));
        remaining.swap_remove(position);
    }
}
