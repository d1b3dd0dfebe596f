//! Criterion microbenches for voxpaint rasterization and materialization.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - single ring scanline fill (fill_ring)
//! - checkpoint parsing (checkpoint_from_json_slice)
//! - whole-task materialization in label and channel mode

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use voxpaint::model::io_json::polygons_from_json_str;
use voxpaint::model::{Checkpoint, Coord, Polygon, Ring, Task, Volume};
use voxpaint::raster::scanline::fill_ring;
use voxpaint::raster::PixelMask;
use voxpaint::volume::materialize;

const POLYGONS_FIXTURE: &str = include_str!("../tests/fixtures/polygons.json");

/// A regular n-gon centred in a `size` x `size` slice.
fn ngon(n: usize, size: f64) -> Vec<(f64, f64)> {
    let r = size * 0.45;
    (0..n)
        .map(|i| {
            let a = i as f64 / n as f64 * std::f64::consts::TAU;
            (size / 2.0 + r * a.cos(), size / 2.0 + r * a.sin())
        })
        .collect()
}

fn bench_fill_ring(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_ring");

    for &size in &[64usize, 512] {
        let ring: Vec<Coord<Volume>> = ngon(64, size as f64)
            .into_iter()
            .map(|(x, y)| Coord::new(x, y))
            .collect();
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ring, |b, ring| {
            b.iter(|| {
                let mut mask = PixelMask::new(size, size);
                fill_ring(black_box(ring), &mut mask);
                black_box(mask)
            })
        });
    }

    group.finish();
}

fn bench_checkpoint_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("checkpoint_parse");
    group.throughput(Throughput::Bytes(POLYGONS_FIXTURE.len() as u64));

    group.bench_function("polygons_from_json_str", |b| {
        b.iter(|| {
            let polygons = polygons_from_json_str(black_box(POLYGONS_FIXTURE)).unwrap();
            black_box(polygons)
        })
    });

    group.finish();
}

fn bench_materialize(c: &mut Criterion) {
    let task = Task::new("c", "e", "ch", 0, (0, 256), (0, 256), (0, 16));
    let polygons: Vec<Polygon> = (0..16)
        .flat_map(|z| {
            (1..=4u64).map(move |segment| {
                let offset = segment as f64 * 20.0;
                let points = ngon(32, 160.0)
                    .into_iter()
                    .map(move |(x, y)| (x + offset, y + offset));
                Polygon::new(segment, z, Ring::new(points))
            })
        })
        .collect();
    let checkpoints = vec![Checkpoint::new("bench", polygons)];

    let mut group = c.benchmark_group("materialize");
    group.sample_size(20);

    group.bench_function("labels", |b| {
        b.iter(|| black_box(materialize(&task, black_box(&checkpoints), false).unwrap()))
    });
    group.bench_function("channels", |b| {
        b.iter(|| black_box(materialize(&task, black_box(&checkpoints), true).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_fill_ring,
    bench_checkpoint_parse,
    bench_materialize
);
criterion_main!(benches);
