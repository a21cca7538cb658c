use crate::common::{configure_criterion, layered_error};
use criterion::{criterion_group, Criterion};
use std::hint::black_box;

pub fn bench_display(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting/display");

    let err = layered_error();
    let _ = err.stack_trace().len();

    group.bench_function("display", |b| b.iter(|| black_box(err.to_string())));
    group.bench_function("display_alternate", |b| b.iter(|| black_box(format!("{err:#}"))));
    group.bench_function("debug", |b| b.iter(|| black_box(format!("{err:?}"))));

    group.finish();
}

#[cfg(feature = "serde")]
pub fn bench_serde(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting/serde");

    let err = layered_error();
    group.bench_function("metadata_json", |b| {
        b.iter(|| black_box(serde_json::to_string(err.metadata())))
    });
    group.bench_function("stack_trace_json", |b| {
        b.iter(|| black_box(serde_json::to_string(err.stack_trace())))
    });

    group.finish();
}

criterion_group! {
    name = formatting_benches;
    config = configure_criterion();
    targets = bench_display
}

#[cfg(feature = "serde")]
criterion_group! {
    name = serde_benches;
    config = configure_criterion();
    targets = bench_serde
}
