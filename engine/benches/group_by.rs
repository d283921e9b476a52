//! Grouping benchmarks (criterion).
//!
//! Builds synthetic frames of increasing size and measures sorting,
//! single-column grouping and two-column grouping with a sum reducer.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use engine::{record, Aggregated, DataFrame, SortOrder};

fn synthetic_frame(rows: usize, keys: usize) -> DataFrame {
    DataFrame::from_rows((0..rows).map(|i| {
        record! {
            "id" => i,
            "bucket" => format!("k{}", i % keys),
            "parity" => i % 2 == 0,
            "value" => (i * 7 % 101) as f64,
        }
    }))
    .expect("synthetic rows are well formed")
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_by");
    for rows in [1_000, 10_000] {
        let df = synthetic_frame(rows, 100);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &df, |b, df| {
            b.iter(|| black_box(df.sort_by("value", SortOrder::Descending).unwrap()));
        });
    }
    group.finish();
}

fn bench_group_by(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_by");
    for rows in [1_000, 10_000] {
        let df = synthetic_frame(rows, 100);
        group.bench_with_input(BenchmarkId::new("single", rows), &df, |b, df| {
            b.iter(|| {
                let agg = df
                    .group_by("bucket")
                    .unwrap()
                    .aggregate(|g| Ok(Aggregated::fields().with("value", g.column("value")?.sum()?)))
                    .unwrap();
                black_box(agg)
            });
        });
        group.bench_with_input(BenchmarkId::new("composite", rows), &df, |b, df| {
            b.iter(|| {
                let agg = df
                    .group_by(["bucket", "parity"])
                    .unwrap()
                    .aggregate(|g| Ok(Aggregated::fields().with("value", g.column("value")?.sum()?)))
                    .unwrap();
                black_box(agg)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sort, bench_group_by);
criterion_main!(benches);
