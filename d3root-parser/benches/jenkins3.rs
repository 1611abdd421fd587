//! Benchmarks for the fingerprint hash.

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use d3root_parser::jenkins3::{hash_path, hashlittle2};

const SHORT_PATH: &str = "Actor\\Wizard";
const LONG_PATH: &str = "SoundBank\\X1_Monk_Female_VO_Emotes_And_Callouts";
const MEDIUM_DATA: &[u8] = &[0xf0u8; 1024]; // 1KB
const LARGE_DATA: &[u8] = &[0x0fu8; 1024 * 1024]; // 1MB

fn bench_hashlittle2(c: &mut Criterion) {
    let mut group = c.benchmark_group("hashlittle2");

    for (name, data) in &[("medium", MEDIUM_DATA), ("large", LARGE_DATA)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), data, |b, &data| {
            b.iter_batched(
                || {},
                |_| {
                    let mut pc = 0;
                    let mut pb = 0;
                    hashlittle2(data, &mut pc, &mut pb);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_hash_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_path");

    for (name, path) in &[("short", SHORT_PATH), ("long", LONG_PATH)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), path, |b, &path| {
            b.iter(|| hash_path(path));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hashlittle2, bench_hash_path);

criterion_main!(benches);
