// In pax-delta-core/benches/delta_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use pax_delta::{decode_into, encode_into, BlockLayout, DataBuffer};

// --- Data Generation ---

/// Sorted offsets with small jitter: mostly narrow mini-blocks.
fn generate_sorted_offsets(size: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut current = 0u32;
    (0..size)
        .map(|_| {
            current = current.wrapping_add(rng.random_range(0..64));
            current
        })
        .collect()
}

/// Crafted so each mini-block lands on one of the dedicated decode widths.
fn generate_fixed_width_deltas(size: usize, max_delta: u32) -> Vec<u32> {
    let mut current = 0u32;
    (0..size)
        .map(|i| {
            current = current.wrapping_add(if i % 2 == 0 { 0 } else { max_delta });
            current
        })
        .collect()
}

/// Uniformly random values: every mini-block at full 32-bit width.
fn generate_random(size: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(11);
    (0..size).map(|_| rng.random()).collect()
}

// --- Benchmark Suite ---

const BENCH_VALUE_COUNT: usize = 1 << 16;

fn bench_delta_codec(c: &mut Criterion) {
    let layout = BlockLayout::default();
    let inputs = [
        ("Sorted Offsets", generate_sorted_offsets(BENCH_VALUE_COUNT)),
        ("Width 8", generate_fixed_width_deltas(BENCH_VALUE_COUNT, 0xFF)),
        ("Width 13", generate_fixed_width_deltas(BENCH_VALUE_COUNT, 0x1FFF)),
        ("Width 16", generate_fixed_width_deltas(BENCH_VALUE_COUNT, 0xFFFF)),
        ("Random", generate_random(BENCH_VALUE_COUNT)),
    ];

    let mut group = c.benchmark_group("Delta Codec");
    group.throughput(criterion::Throughput::Elements(BENCH_VALUE_COUNT as u64));

    for (name, values) in &inputs {
        let mut encoded = DataBuffer::new();
        encode_into(values, &layout, &mut encoded).unwrap();

        group.bench_function(format!("Encode ({})", name), |b| {
            b.iter(|| {
                let mut out = DataBuffer::new();
                encode_into(black_box(values), &layout, &mut out).unwrap();
                black_box(out)
            })
        });
        group.bench_function(format!("Decode ({})", name), |b| {
            b.iter(|| {
                let mut out = DataBuffer::new();
                decode_into::<u32>(black_box(encoded.as_slice()), &mut out).unwrap();
                black_box(out)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_delta_codec);
criterion_main!(benches);
