//! Benchmarks for pipeline execution
//!
//! These benchmarks cover condition parsing, single-step application over a
//! large array, and full preview runs with trace capture.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reshape_core::condition::Condition;
use reshape_core::{apply, TransformationPipeline, TransformationStep};
use serde_json::{json, Value};

fn create_large_data() -> Value {
    let items: Vec<Value> = (0..1000)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("item {}", i),
                "category": if i % 3 == 0 { "A" } else if i % 3 == 1 { "B" } else { "C" },
                "price": (i as f64) * 1.5 + 10.0,
                "inStock": i % 2 == 0
            })
        })
        .collect();
    Value::Array(items)
}

fn step(value: Value) -> TransformationStep {
    serde_json::from_value(value).unwrap()
}

fn bench_condition_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition_parsing");

    let expressions = [
        "price > 100",
        "category == 'A' && inStock",
        "(price >= 10 && price < 500) || name =~ '^item 9'",
    ];

    for expr in expressions.iter() {
        group.bench_with_input(BenchmarkId::new("parse", expr), expr, |b, expr| {
            b.iter(|| Condition::parse(black_box(expr)))
        });
    }

    group.finish();
}

fn bench_single_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_steps");
    let data = create_large_data();

    let steps = [
        ("filter_condition", step(json!({"type": "filter", "condition": "price > 500 && inStock"}))),
        ("filter_structured", step(json!({"type": "filter", "operation": "equals", "field": "category", "value": "B"}))),
        ("sort_by_name", step(json!({"type": "sort", "field": "name", "operation": "desc"}))),
        ("aggregate_sum", step(json!({"type": "aggregate", "operation": "sum", "field": "price"}))),
        ("loop_format", step(json!({
            "type": "loop",
            "itemTransformations": [{"type": "format", "field": "name", "operation": "title_case"}]
        }))),
    ];

    for (name, step) in steps.iter() {
        group.bench_with_input(BenchmarkId::new("apply", name), step, |b, step| {
            b.iter(|| apply(black_box(&data), step))
        });
    }

    group.finish();
}

fn bench_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("preview");
    let data = create_large_data();

    let pipeline = TransformationPipeline::from_steps(vec![
        step(json!({"type": "filter", "condition": "inStock"})),
        step(json!({"type": "loop", "itemTransformations": [
            {"type": "format", "field": "price", "operation": "multiply", "value": 1.2},
            {"type": "combine", "operation": "concat", "value": ["category", "id"], "outputField": "sku"}
        ]})),
        step(json!({"type": "sort", "field": "price", "operation": "desc"})),
    ]);

    group.bench_function("three_steps_with_trace", |b| {
        b.iter(|| pipeline.preview(black_box(&data)))
    });
    group.bench_function("three_steps_run", |b| b.iter(|| pipeline.run(black_box(&data))));

    group.finish();
}

criterion_group!(benches, bench_condition_parsing, bench_single_steps, bench_preview);
criterion_main!(benches);
