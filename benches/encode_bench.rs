// In shpforge-core/benches/encode_bench.rs

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shpforge::pipeline::infer_schema;
use shpforge::{encode_bucket, EncoderConfig, Feature, FeatureBucket, ShapeType};

// --- Mock Data Generation ---

fn config() -> EncoderConfig {
    EncoderConfig {
        table_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        ..EncoderConfig::default()
    }
}

/// Points with a handful of mixed-kind attributes per feature.
fn generate_points(count: usize) -> FeatureBucket {
    let mut rng = StdRng::seed_from_u64(42);
    let mut bucket = FeatureBucket::new(ShapeType::Point);
    for i in 0..count {
        let mut feature = Feature::point(rng.random_range(-180.0..180.0), rng.random_range(-90.0..90.0));
        feature.attributes.insert("NAME", format!("site-{}", i));
        feature.attributes.insert("ELEV", rng.random_range(0.0..4000.0_f64).round());
        feature.attributes.insert("ACTIVE", rng.random_bool(0.5));
        bucket.push(feature).unwrap();
    }
    bucket
}

/// Polygons with `rings` rings of `vertices` vertices each.
fn generate_polygons(count: usize, rings: usize, vertices: usize) -> FeatureBucket {
    let mut rng = StdRng::seed_from_u64(7);
    let mut bucket = FeatureBucket::new(ShapeType::Polygon);
    for i in 0..count {
        let parts = (0..rings)
            .map(|_| {
                let mut ring: Vec<(f64, f64)> = (0..vertices)
                    .map(|_| (rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0)))
                    .collect();
                ring.push(ring[0]);
                ring
            })
            .collect();
        let mut feature = Feature::polygon(parts);
        feature.attributes.insert("PARCEL_ID", i as i64);
        bucket.push(feature).unwrap();
    }
    bucket
}

// --- Benchmark Suite ---

const POINT_COUNT: usize = 10_000;
const POLYGON_COUNT: usize = 1_000;

fn bench_encode(c: &mut Criterion) {
    let points = generate_points(POINT_COUNT);
    let polygons = generate_polygons(POLYGON_COUNT, 3, 64);
    let config = config();

    let mut group = c.benchmark_group("Shapefile Encode");

    group.throughput(Throughput::Elements(POINT_COUNT as u64));
    group.bench_function("Infer schema (10k points)", |b| {
        b.iter(|| black_box(infer_schema(black_box(&points), &config)))
    });
    group.bench_function("Encode triple (10k points)", |b| {
        b.iter(|| black_box(encode_bucket(black_box(&points), &config).unwrap()))
    });

    group.throughput(Throughput::Elements(POLYGON_COUNT as u64));
    group.bench_function("Encode triple (1k polygons x 3 rings x 64 vertices)", |b| {
        b.iter(|| black_box(encode_bucket(black_box(&polygons), &config).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
