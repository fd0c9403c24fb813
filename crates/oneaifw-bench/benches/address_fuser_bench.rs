//! Throughput of the Chinese address growth algorithm in isolation, since
//! it is the most expensive single stage of detection (backward boundary
//! walks plus bidirectional growth loops per seed).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use oneaifw_core::address::fuse_addresses;
use oneaifw_core::entity::{EntityKind, RecognitionSpan};

fn seed(text: &str, needle: &str) -> RecognitionSpan {
    let start = text.find(needle).unwrap() as u32;
    RecognitionSpan {
        entity_type: EntityKind::PhysicalAddress,
        start,
        end: start + needle.len() as u32,
        score: 0.95,
        description: Some("bench-seed"),
    }
}

fn bench_fuse(c: &mut Criterion) {
    let text = "请寄到江苏省南京市鼓楼区广州路18号楼之3，电话另附。";
    let seeds = vec![seed(text, "鼓楼区")];

    c.bench_function("fuse_addresses/single_seed", |b| {
        b.iter(|| black_box(fuse_addresses(text, &seeds)));
    });
}

criterion_group!(benches, bench_fuse);
criterion_main!(benches);
