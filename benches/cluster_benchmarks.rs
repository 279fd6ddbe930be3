use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geocluster::compute::geohash::encode;
use geocluster::{BoundingBox, ClusterEngine, GeotaggedRecord, MemoryPostStore, PostStore};
use std::time::{Duration, UNIX_EPOCH};
use uuid::Uuid;

/// Records scattered over `bbox` with a cheap deterministic sequence.
fn generate_records(n: usize, bbox: &BoundingBox, with_geohash: bool) -> Vec<GeotaggedRecord> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..n)
        .map(|i| {
            let lat = bbox.south + next() * bbox.lat_span();
            let lng = bbox.west + next() * bbox.lng_span();
            let record = GeotaggedRecord::new(Uuid::new_v4(), UNIX_EPOCH + Duration::from_secs(i as u64))
                .at(lat, lng);
            if with_geohash {
                record.with_geohash(encode(lat, lng, 9))
            } else {
                record
            }
        })
        .collect()
}

fn benchmark_geohash_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("geohash_codec");

    for precision in [5, 9, 12] {
        group.bench_with_input(
            BenchmarkId::new("encode", precision),
            &precision,
            |b, &precision| b.iter(|| encode(black_box(39.9334), black_box(32.8597), precision)),
        );
    }

    group.bench_function("decode_bounds", |b| {
        b.iter(|| geocluster::compute::geohash::decode_bounds(black_box("sxk3ftz2v")))
    });

    group.finish();
}

fn benchmark_geohash_strategy(c: &mut Criterion) {
    let mut group = c.benchmark_group("geohash_strategy");
    let engine = ClusterEngine::new();
    let bbox = BoundingBox::new(42.1, 35.8, 44.8, 25.6);

    for &size in &[10_000, 100_000] {
        let cached = generate_records(size, &bbox, true);
        let uncached = generate_records(size, &bbox, false);

        group.bench_with_input(BenchmarkId::new("cached", size), &cached, |b, records| {
            b.iter(|| engine.compute(black_box(&bbox), 7, black_box(records)))
        });

        group.bench_with_input(BenchmarkId::new("uncached", size), &uncached, |b, records| {
            b.iter(|| engine.compute(black_box(&bbox), 7, black_box(records)))
        });
    }

    group.finish();
}

fn benchmark_tile_strategy(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile_strategy");
    let engine = ClusterEngine::new();
    let bbox = BoundingBox::new(41.2, 40.8, 29.4, 28.6);

    for &size in &[10_000, 100_000] {
        let records = generate_records(size, &bbox, false);

        for zoom in [10, 14] {
            group.bench_with_input(
                BenchmarkId::new(format!("zoom_{}", zoom), size),
                &records,
                |b, records| b.iter(|| engine.compute(black_box(&bbox), zoom, black_box(records))),
            );
        }
    }

    group.finish();
}

fn benchmark_store_viewport(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_viewport");
    let world = BoundingBox::new(42.1, 35.8, 44.8, 25.6);
    let store = MemoryPostStore::from_records(generate_records(100_000, &world, true)).unwrap();
    let istanbul = BoundingBox::new(41.2, 40.8, 29.4, 28.6);

    group.bench_function("records_within", |b| {
        b.iter(|| store.records_within(black_box(&istanbul)).unwrap())
    });

    group.bench_function("records_by_geohash_prefix", |b| {
        b.iter(|| store.records_by_geohash_prefix(black_box("sxk")).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_geohash_codec,
    benchmark_geohash_strategy,
    benchmark_tile_strategy,
    benchmark_store_viewport
);
criterion_main!(benches);
