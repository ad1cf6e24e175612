//! # DfTx Indexing Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | extraction | script decoding over blocks of N DfTx outputs |
//! | oracle-prices | index then invalidate of a block of N price reports |
//! | swaps | index then invalidate of a block of N routed swaps |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ix_01_dftx::DfTxExtractor;
use ix_02_model_store::ModelStore;
use ix_tests::fixtures::*;
use rand::Rng;
use shared_types::RawBlock;
use std::time::Duration;

const SIZES: [usize; 3] = [10, 100, 500];

fn oracle_txid(n: usize) -> String {
    txid(0xa000 + n as u64)
}

/// Oracles appointed on TA-USD, one per report slot.
fn oracle_setup(oracles: usize) -> RawBlock {
    let mut builder = BlockBuilder::new(1);
    for n in 0..oracles {
        builder = builder.dftx(oracle_txid(n), appoint_oracle(1, &[("TA", "USD")]));
    }
    builder.build()
}

/// One report per oracle at random prices.
fn price_block(oracles: usize) -> RawBlock {
    let mut rng = rand::thread_rng();
    let time = DAY_START + 60;
    let mut builder = BlockBuilder::new(2);
    for n in 0..oracles {
        let sats = rng.gen_range(50_000_000..150_000_000);
        builder = builder.dftx(
            txid(0xb000 + n as u64),
            set_oracle_data(&oracle_txid(n), time, &[("TA", "USD", sats)]),
        );
    }
    builder.build()
}

fn pool_setup() -> RawBlock {
    BlockBuilder::new(1)
        .dftx(txid(1), create_token("BTC", true))
        .dftx(txid(2), create_token("DFI", true))
        .dftx(txid(3), create_token("ETH", true))
        .dftx(txid(4), create_pool_pair(1, 2))
        .dftx(txid(5), create_pool_pair(2, 3))
        .build()
}

fn swap_block(swaps: usize) -> RawBlock {
    let mut rng = rand::thread_rng();
    let mut builder = BlockBuilder::new(2);
    for n in 0..swaps {
        let sats = rng.gen_range(1_000..1_000_000_000);
        let dftx = if n % 2 == 0 {
            pool_swap(1, 2, sats)
        } else {
            composite_swap(1, 3, sats, &[4, 5])
        };
        builder = builder.dftx(txid(0xc000 + n as u64), dftx);
    }
    builder.build()
}

// ============================================================================
// EXTRACTION
// ============================================================================

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    let extractor = DfTxExtractor::default();

    for size in SIZES {
        let block = price_block(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("set_oracle_data", size), &block, |b, block| {
            b.iter(|| black_box(extractor.extract(block).len()))
        });
    }
    group.finish();
}

// ============================================================================
// INDEX + INVALIDATE
// ============================================================================

fn bench_oracle_prices(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle-prices");
    group.measurement_time(Duration::from_secs(10));
    let dispatcher = dispatcher();

    for size in SIZES {
        let mut store = ModelStore::in_memory();
        dispatcher
            .index(&mut store, &oracle_setup(size))
            .expect("appoint oracles");
        let block = price_block(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("index_invalidate", size), &block, |b, block| {
            b.iter(|| {
                dispatcher.index(&mut store, block).expect("index");
                dispatcher.invalidate(&mut store, &block.hash).expect("invalidate");
            })
        });
    }
    group.finish();
}

fn bench_swaps(c: &mut Criterion) {
    let mut group = c.benchmark_group("swaps");
    let dispatcher = dispatcher();

    for size in SIZES {
        let mut store = ModelStore::in_memory();
        dispatcher.index(&mut store, &pool_setup()).expect("create pools");
        let block = swap_block(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("index_invalidate", size), &block, |b, block| {
            b.iter(|| {
                dispatcher.index(&mut store, block).expect("index");
                dispatcher.invalidate(&mut store, &block.hash).expect("invalidate");
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_extraction, bench_oracle_prices, bench_swaps);
criterion_main!(benches);
