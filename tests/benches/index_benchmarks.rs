//! # Main-Index Benchmarks
//!
//! | Path | Work per call |
//! |------|---------------|
//! | Owner hash derivation | one SHA-256 over 72 bytes |
//! | State decode | bincode of a snapshot with N entries |
//! | Contract execution | owner check plus one list update |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mi_02_public_state::{decode_state, encode_state};
use mi_03_ownership::{derive_owner_hash, owner_matches};
use mi_06_index_registry::IndexContract;
use shared_types::{IndexOperation, PublicState, SecretKey};

fn bench_owner_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("mi-03-ownership");
    let secret = [7u8; 32];

    group.bench_function("derive_owner_hash", |b| {
        b.iter(|| derive_owner_hash(black_box(&secret), black_box(42)))
    });

    let stored = derive_owner_hash(&secret, 42).unwrap_or_default();
    let candidate = derive_owner_hash(&[8u8; 32], 42).unwrap_or_default();
    group.bench_function("owner_matches_mismatch", |b| {
        b.iter(|| owner_matches(black_box(&stored), black_box(&candidate)))
    });
    group.finish();
}

fn snapshot(entries: usize) -> PublicState {
    let mut state = PublicState::initial();
    state.entries = (0..entries).map(|i| format!("0x{i:040x},Site {i}")).collect();
    state.entry_count = entries as u64;
    state
}

fn bench_state_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("mi-02-public-state");
    for size in [0usize, 10, 100, 1_000] {
        let Ok(raw) = encode_state(&snapshot(size)) else {
            continue;
        };
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode_state", size), &raw, |b, raw| {
            b.iter(|| decode_state(black_box(raw)))
        });
    }
    group.finish();
}

fn bench_contract_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("mi-06-index-registry");
    let secret = SecretKey::from_bytes([3u8; 32]);
    let Ok(owned) = IndexContract::execute(
        &IndexContract::genesis(),
        &IndexOperation::Initialize,
        &secret,
    ) else {
        return;
    };

    for size in [0usize, 100, 1_000] {
        let mut state = owned.clone();
        state.entries = snapshot(size).entries;
        state.entry_count = size as u64;
        let add = IndexOperation::AddAddress {
            entry: "deadbeef,Site1".to_string(),
        };
        group.bench_with_input(BenchmarkId::new("add_address", size), &state, |b, state| {
            b.iter(|| IndexContract::execute(black_box(state), &add, &secret))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_owner_derivation,
    bench_state_decode,
    bench_contract_execution
);
criterion_main!(benches);
