//! Benchmarks for the overlap engine
//!
//! - index build over a read at several strides
//! - locate on an overlapping and a non-overlapping pair
//! - whole-pair resolution (index, locate, classify)
//!
//! Run with: cargo bench --bench overlap_operations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use overlapper::operations::{locate, reverse_complement, KmerIndex};
use overlapper::overlapper::resolve_pair;
use overlapper::{OverlapConfig, Read, ReadPair};

/// Deterministic pseudo-random DNA (xorshift)
fn generate_sequence(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            [b'A', b'C', b'G', b'T'][(state % 4) as usize]
        })
        .collect()
}

fn read(id: &str, seq: Vec<u8>) -> Read {
    let qual = vec![b'I'; seq.len()];
    Read::new(id.to_string(), seq, qual)
}

/// 2×150 bp pair from a fragment of `insert` bases
fn pair_from_fragment(insert: usize) -> ReadPair {
    let fragment = generate_sequence(insert, 42);
    let len = insert.min(150);
    ReadPair::new(
        read("r1", fragment[..len].to_vec()),
        read("r2", reverse_complement(&fragment[insert - len..])),
    )
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmer_index_build");
    let seq = generate_sequence(150, 7);

    for stride in [1, 2, 4, 8] {
        group.throughput(Throughput::Bytes(seq.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format!("stride={}", stride)), &stride, |b, &stride| {
            b.iter(|| KmerIndex::build(black_box(&seq), 8, stride))
        });
    }

    group.finish();
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");
    let config = OverlapConfig::default();

    let overlapping = pair_from_fragment(250);
    let unrelated = ReadPair::new(
        read("r1", generate_sequence(150, 1)),
        read("r2", generate_sequence(150, 2)),
    );

    for (name, pair) in [("overlap", &overlapping), ("no_overlap", &unrelated)] {
        let index = KmerIndex::build(pair.r1.seq(), config.kmer, config.kmer_offset);
        let short_rc = read("r2", pair.r2.seq_rc());
        group.bench_function(name, |b| {
            b.iter(|| locate(black_box(&pair.r1), black_box(&short_rc), &index, &config))
        });
    }

    group.finish();
}

fn bench_resolve_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_pair");
    let config = OverlapConfig::default();

    for insert in [120, 200, 280] {
        let pair = pair_from_fragment(insert);
        group.bench_with_input(BenchmarkId::from_parameter(format!("insert={}", insert)), &pair, |b, pair| {
            b.iter(|| resolve_pair(black_box(pair), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_index_build, bench_locate, bench_resolve_pair);
criterion_main!(benches);
