//! End-to-end mask/restore throughput across input sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use oneaifw_core::entity::NerRecognizerKind;
use oneaifw_core::Pipeline;

fn repeated_text(unit: &str, times: usize) -> String {
    unit.repeat(times)
}

fn bench_mask(c: &mut Criterion) {
    let pipeline = Pipeline::new(NerRecognizerKind::TokenClassification).unwrap();
    let unit = "Contact a@b.com or visit https://example.com, code 8K2N91. ";
    let mut group = c.benchmark_group("mask");

    for &repeats in &[1usize, 8, 64, 512] {
        let text = repeated_text(unit, repeats);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("mask", repeats), &text, |b, text| {
            b.iter(|| black_box(pipeline.mask(text, &[])));
        });
    }
    group.finish();
}

fn bench_restore(c: &mut Criterion) {
    let pipeline = Pipeline::new(NerRecognizerKind::TokenClassification).unwrap();
    let unit = "Contact a@b.com or visit https://example.com, code 8K2N91. ";
    let mut group = c.benchmark_group("restore");

    for &repeats in &[1usize, 8, 64, 512] {
        let text = repeated_text(unit, repeats);
        let result = pipeline.mask(&text, &[]);
        group.throughput(Throughput::Bytes(result.masked_text.len() as u64));
        group.bench_with_input(BenchmarkId::new("restore", repeats), &result, |b, result| {
            b.iter(|| black_box(pipeline.restore(&result.masked_text, &result.metadata_blob)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mask, bench_restore);
criterion_main!(benches);
