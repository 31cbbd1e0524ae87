//! Performance benchmarks for mdframe
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mdframe::config::Config;
use mdframe::query::{collect, Mode, Query};
use mdframe::record::{load_records, Record, RowElement, Scalar};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Synthetic records shaped like flattened metadata files
fn synthetic_records(count: i64) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let textures = (0..4)
                .map(|t| Scalar::from(format!("IMG_{}", 7000 + (i * 4 + t) % 500)))
                .collect();
            Record::new(i)
                .with_field("weight", vec![RowElement::Scalar(Scalar::Int(i % 400))])
                .with_field("unit", vec![RowElement::Scalar(Scalar::from("g"))])
                .with_field("started", vec![RowElement::Scalar(Scalar::from(format!("14:{:02}:00", i % 60)))])
                .with_field("texture_sources", vec![RowElement::Nested(textures)])
        })
        .collect()
}

/// Write metadata files that satisfy the bundled schema
fn create_benchmark_fixtures(count: usize) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root_path = temp_dir.path().to_path_buf();

    for i in 0..count {
        let content = format!(
            r#"gid = {i}
uid = "bench-{i}"

[item]
nutrition_subgroup = "fruit"
food_type = "apple"
description = "apple {i}"

[metrics]
weight = {weight}
unit = "g"

[model]
project_name = "bench"
rgbd_file_names = ["IMG_{i}"]
texture_sources = ["IMG_{a}", "IMG_{b}"]

[time]
started = "14:{minute:02}:00"
"#,
            i = i,
            weight = i % 400,
            a = 7000 + i % 500,
            b = 7001 + i % 500,
            minute = i % 60
        );
        fs::write(root_path.join(format!("{}.toml", i)), content).expect("Failed to write file");
    }

    (temp_dir, root_path)
}

fn bench_query_parsing(c: &mut Criterion) {
    let queries = vec![
        r#"{"weight": 321}"#,
        r#"{"texture_sources": ["IMG_7082", "IMG_7083"]}"#,
        r#"{"texture_sources": [["IMG_7082", "IMG_7083"], "IMG_7088"], "started": "14:38:34"}"#,
    ];

    let mut group = c.benchmark_group("query_parsing");
    for query in queries {
        group.bench_with_input(BenchmarkId::from_parameter(query), &query, |b, &q| {
            b.iter(|| Query::parse(Mode::And, black_box(q)))
        });
    }
    group.finish();
}

fn bench_collect(c: &mut Criterion) {
    let records = synthetic_records(10_000);

    let mut group = c.benchmark_group("collect");

    group.bench_function("scalar_and", |b| {
        let query = Query::parse(Mode::And, r#"{"weight": 321, "unit": "g"}"#).unwrap();
        b.iter(|| collect(black_box(&records), &query))
    });

    group.bench_function("or_list", |b| {
        let query = Query::parse(Mode::And, r#"{"texture_sources": ["IMG_7082", "IMG_7300", "IMG_7450"]}"#).unwrap();
        b.iter(|| collect(black_box(&records), &query))
    });

    group.bench_function("and_groups_or_mode", |b| {
        let query = Query::parse(
            Mode::Or,
            r#"{"texture_sources": [["IMG_7082", "IMG_7083"], ["IMG_7100", "IMG_7101"]], "started": "14:38:00"}"#,
        )
        .unwrap();
        b.iter(|| collect(black_box(&records), &query))
    });

    group.bench_function("unknown_field", |b| {
        let query = Query::parse(Mode::And, r#"{"colour": "red", "weight": 5}"#).unwrap();
        b.iter(|| collect(black_box(&records), &query))
    });

    group.finish();
}

fn bench_loading(c: &mut Criterion) {
    let (_temp_dir, root_path) = create_benchmark_fixtures(500);
    let config = Config::new(&root_path);

    c.bench_function("load_500_records", |b| b.iter(|| load_records(black_box(&config))));
}

criterion_group!(benches, bench_query_parsing, bench_collect, bench_loading);

criterion_main!(benches);
