//! Benchmarks for telemetry record decoding
//!
//! Covers the full record the aircraft sends at ~10 Hz, a partial record and
//! a record full of unparseable values.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tellolink::codec;
use tellolink::test_utils::SAMPLE_TELEMETRY;

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("telemetry_decode");

    let records = [
        ("full", SAMPLE_TELEMETRY.to_string()),
        ("partial", "pitch:5;roll:-3;bat:80;".to_string()),
        ("garbage", SAMPLE_TELEMETRY.replace(|c: char| c.is_ascii_digit(), "x")),
    ];

    for (name, record) in &records {
        group.bench_with_input(BenchmarkId::from_parameter(name), record, |b, record| {
            b.iter(|| black_box(codec::decode(black_box(record))))
        });
    }

    group.finish();
}

fn bench_lossy_datagram(c: &mut Criterion) {
    let datagram = SAMPLE_TELEMETRY.as_bytes().to_vec();

    c.bench_function("telemetry_datagram_to_snapshot", |b| {
        b.iter(|| {
            let text = String::from_utf8_lossy(black_box(&datagram));
            black_box(codec::decode(&text))
        })
    });
}

criterion_group!(benches, bench_decode, bench_lossy_datagram);
criterion_main!(benches);
