//! FILENAME: tests/test_grouping.rs
//! Integration tests for grouping and aggregation.

mod common;

use common::{assert_column_numbers, mixed_rows, readme_frame, time_series, SalesFixture};
use engine::{Aggregated, DataFrame, GroupKey, Value, DEFAULT_KEY_COLUMN};

// ============================================================================
// SINGLE COLUMN
// ============================================================================

#[test]
fn test_group_by_column_with_absent_keys() {
    let df = mixed_rows();
    let mut agg = df
        .group_by("d")
        .unwrap()
        .aggregate(|group| {
            let longest = group
                .column("c")?
                .max_by(|a, b| a.display_value().len().cmp(&b.display_value().len()))?
                .clone();
            Ok(Aggregated::fields()
                .with("sum", group.column("a")?.sum()?)
                .with("max", longest))
        })
        .unwrap();

    assert_eq!(
        agg.to_string(),
        "d  sum max\n\
         -- --- ----\n\
         42 0   eggs\n\
         ?  5   spam\n"
    );

    agg.remove_row(-1).unwrap();
    assert_eq!(
        agg.to_string(),
        "d  sum max\n\
         -- --- ----\n\
         42 0   eggs\n"
    );
}

#[test]
fn test_readme_grouping() {
    let agg = readme_frame()
        .group_by("col1")
        .unwrap()
        .aggregate(|group| Ok(Aggregated::fields().with("sum", group.column("col2")?.sum()?)))
        .unwrap();
    assert_column_numbers(&agg, "sum", &[7.0, 8.0]);
    assert_column_numbers(&agg, "col1", &[1.0, 2.0]);
}

#[test]
fn test_grouping_is_complete() {
    let df = SalesFixture::frame();
    for key in ["Region", "Product", "Quarter"] {
        let counts = df
            .group_by(key)
            .unwrap()
            .aggregate(|group| Ok(Aggregated::fields().with("n", group.size())))
            .unwrap();
        assert_eq!(counts.column("n").unwrap().sum().unwrap(), df.size() as f64);
    }
}

#[test]
fn test_partition_lookup() {
    let partition = SalesFixture::frame().group_by("Region").unwrap();
    assert_eq!(partition.len(), 3);
    let regions: Vec<Value> = partition.keys().map(|key| key.values()[0].clone()).collect();
    assert_eq!(
        regions,
        vec![Value::from("East"), Value::from("North"), Value::from("South")]
    );

    let north = partition.get(&GroupKey::from(Value::from("North"))).unwrap();
    assert_eq!(north.size(), 3);
    assert_eq!(north.column("Sales").unwrap().sum().unwrap(), 30000.0);
    assert!(partition.get(&GroupKey::from(Value::from("West"))).is_none());

    let total: usize = partition.iter().map(|group| group.frame.size()).sum();
    assert_eq!(total, 7);
}

#[test]
fn test_group_by_named_series() {
    let df = readme_frame();
    let parity = df
        .column("col2")
        .unwrap()
        .map(|value, _| Value::from(value.as_f64().unwrap_or(0.0) as i64 % 2 == 0));
    let agg = df
        .group_by(&parity)
        .unwrap()
        .aggregate(|group| Ok(Aggregated::fields().with("rows", group.size())))
        .unwrap();
    // the mapped series keeps the name of its source column
    assert_eq!(agg.column_names(), vec!["col2", "rows"]);
    assert_eq!(
        agg.column("col2").unwrap().to_vec(),
        vec![Value::from(false), Value::from(true)]
    );
    assert_column_numbers(&agg, "rows", &[1.0, 2.0]);
}

#[test]
fn test_group_by_unnamed_series() {
    let df = readme_frame();
    let buckets = engine::Series::from_values(vec!["x", "y", "x"]);
    let agg = df
        .group_by(&buckets)
        .unwrap()
        .aggregate(|group| Ok(Aggregated::fields().with("col3", group.column("col3")?.sum()?)))
        .unwrap();
    assert_eq!(agg.column_names(), vec![DEFAULT_KEY_COLUMN, "col3"]);
    assert_column_numbers(&agg, "col3", &[12.0, 6.0]);
}

// ============================================================================
// MULTIPLE COLUMNS
// ============================================================================

#[test]
fn test_group_by_multiple_columns_sum() {
    let agg = time_series()
        .group_by(["time", "group"])
        .unwrap()
        .aggregate(|group| Ok(Aggregated::fields().with("value", group.column("value")?.sum()?)))
        .unwrap();
    assert_eq!(
        agg.to_string(),
        "time group value\n\
         ---- ----- -----\n\
         0    a     10\n\
         0    b     40\n\
         1    a     15\n\
         1    b     20\n\
         1    c     -10\n"
    );
}

#[test]
fn test_group_by_multiple_columns_cumulative() {
    let agg = time_series()
        .group_by(["time", "group"])
        .unwrap()
        .aggregate(|group| {
            Ok(Aggregated::fields().with("value", group.column("value")?.cumulative_sum()?))
        })
        .unwrap();
    assert_eq!(
        agg.to_string(),
        "time group value\n\
         ---- ----- -----\n\
         0    a     10\n\
         0    b     20\n\
         0    b     40\n\
         1    a     15\n\
         1    b     20\n\
         1    c     -10\n"
    );
}

#[test]
fn test_multi_column_keys_restore_column_order() {
    let df = SalesFixture::frame();
    let agg = df
        .group_by(vec!["Product", "Region"])
        .unwrap()
        .aggregate(|group| Ok(Aggregated::fields().with("Sales", group.column("Sales")?.sum()?)))
        .unwrap();
    assert_eq!(agg.column_names(), vec!["Product", "Region", "Sales"]);
    assert_eq!(agg.size(), 6);
    assert_eq!(agg.row(0).unwrap().value("Product"), &Value::from("Gadget"));
    assert_eq!(agg.row(0).unwrap().value("Region"), &Value::from("East"));
    assert_eq!(agg.column("Sales").unwrap().sum().unwrap(), 76000.0);
}

#[test]
fn test_reducer_returning_frame() {
    let agg = time_series()
        .group_by(["time"])
        .unwrap()
        .aggregate(|group| {
            let top = group.sort_by("value", engine::SortOrder::Descending)?.slice(0, 1);
            Ok(Aggregated::from(top.without_columns(&["time"])?))
        })
        .unwrap();
    assert_eq!(agg.column_names(), vec!["time", "group", "value"]);
    assert_column_numbers(&agg, "value", &[20.0, 20.0]);
    assert_eq!(
        agg.column("group").unwrap().to_vec(),
        vec![Value::from("b"), Value::from("b")]
    );
}

// ============================================================================
// EMPTY INPUT
// ============================================================================

#[test]
fn test_group_by_on_empty_dataframe() {
    let df = DataFrame::with_column_names(&["a", "b", "c", "d"]).unwrap();
    assert_eq!(df.size(), 0);
    assert_eq!(df.column_names(), vec!["a", "b", "c", "d"]);

    let partition = df.group_by(["a", "b"]).unwrap();
    assert!(partition.is_empty());

    let agg = partition
        .aggregate(|group| Ok(Aggregated::fields().with("c", group.column("c")?.sum()?)))
        .unwrap();
    assert_eq!(agg.size(), 0);
    assert_eq!(agg.column_names(), vec!["a", "b", "c"]);
    assert_eq!(agg.to_string(), "a b c\n- - -\n");
}

#[test]
fn test_empty_single_column_grouping_keeps_shape() {
    let df = DataFrame::with_column_names(&["k", "v"]).unwrap();
    let agg = df
        .group_by("k")
        .unwrap()
        .aggregate(|group| {
            Ok(Aggregated::fields()
                .with("total", group.column("v")?.sum()?)
                .with("rows", group.size()))
        })
        .unwrap();
    assert_eq!(agg.column_names(), vec!["k", "total", "rows"]);
    assert!(agg.is_empty());
}
