//! Benchmarks for streamsum summaries
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use streamsum::cardinality::ExactCardinalityTracker;
use streamsum::engine::{EngineConfig, StreamDispatcher};
use streamsum::event::EventRecord;
use streamsum::membership::HashedMembershipFilter;
use streamsum::sampling::AdaptiveSampleSet;
use streamsum::statistics::MomentAccumulator;
use streamsum::traits::CountEstimate;
use streamsum::window::SlidingWindowCounter;

const KINDS: [&str; 4] = ["report", "memo", "presentation", "email"];

// ============================================================================
// Membership Benchmarks
// ============================================================================

fn bench_membership(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership");
    group.throughput(Throughput::Elements(1));

    for bits in [1 << 10, 1 << 16] {
        group.bench_function(format!("observe_m{}", bits), |b| {
            let mut filter = HashedMembershipFilter::new(bits, 3, 64);
            let mut t = 0u64;
            b.iter(|| {
                let signature = format!("{}_{}", KINDS[(t % 4) as usize], t % 10);
                black_box(filter.observe(&signature, t));
                t += 1;
            });
        });
    }

    group.bench_function("query", |b| {
        let mut filter = HashedMembershipFilter::new(1 << 16, 3, 64);
        for t in 0..10_000u64 {
            filter.observe(&format!("sig_{}", t % 500), t);
        }
        b.iter(|| black_box(filter.query("sig_42", 10_000)));
    });

    group.finish();
}

// ============================================================================
// Sampling Benchmarks
// ============================================================================

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    group.throughput(Throughput::Elements(1));

    group.bench_function("observe", |b| {
        let mut sample = AdaptiveSampleSet::new(1000, 100, 7919, 13);
        let mut i = 0u64;
        b.iter(|| {
            black_box(sample.observe(i % 100_000 + 1, i));
            i = i.wrapping_add(1);
        });
    });

    group.finish();
}

// ============================================================================
// Cardinality and Moment Benchmarks
// ============================================================================

fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact");
    group.throughput(Throughput::Elements(1));

    group.bench_function("cardinality_observe", |b| {
        let mut tracker = ExactCardinalityTracker::new();
        let mut i = 0u64;
        b.iter(|| {
            tracker.observe(i % 1000 + 1, KINDS[(i % 4) as usize]);
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("moment_observe", |b| {
        let mut f1 = MomentAccumulator::new();
        let mut i = 0i64;
        b.iter(|| {
            let _ = black_box(f1.observe(i % 100));
            i = i.wrapping_add(1);
        });
    });

    group.finish();
}

// ============================================================================
// DGIM Benchmarks
// ============================================================================

fn bench_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("dgim");
    group.throughput(Throughput::Elements(1));

    for window in [64u64, 4096, 1 << 20] {
        group.bench_function(format!("observe_w{}", window), |b| {
            let mut dgim = SlidingWindowCounter::new(window);
            let mut i = 0u64;
            b.iter(|| {
                dgim.observe(i % 3 != 0);
                i = i.wrapping_add(1);
            });
        });
    }

    group.bench_function("estimate", |b| {
        let mut dgim = SlidingWindowCounter::new(1 << 20);
        for i in 0..1_000_000u64 {
            dgim.observe(i % 3 != 0);
        }
        b.iter(|| black_box(dgim.estimate()));
    });

    group.finish();
}

// ============================================================================
// Engine Benchmarks
// ============================================================================

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(1));

    group.bench_function("ingest", |b| {
        let config = EngineConfig::default()
            .with_filter(1 << 16, 3)
            .with_sample(1000, 100)
            .with_sample_hash(7919, 13);
        let mut engine = StreamDispatcher::new(config).unwrap();
        let mut i = 0u64;
        b.iter(|| {
            let record = EventRecord::new(KINDS[(i % 4) as usize], (i % 100) as i64, i % 5000 + 1);
            black_box(engine.ingest(record).unwrap());
            i = i.wrapping_add(1);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_membership,
    bench_sampling,
    bench_exact,
    bench_window,
    bench_engine,
);

criterion_main!(benches);
