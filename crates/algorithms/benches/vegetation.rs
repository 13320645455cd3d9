//! Benchmarks for vegetation index conversions

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pmjpl_algorithms::vegetation::{fractional_vegetation_cover, leaf_area_index, LaiParams};
use pmjpl_core::{Field, GeoTransform, Raster};

fn create_ndvi(size: usize) -> Field<f64> {
    let mut r = Raster::new(size, size);
    r.set_transform(GeoTransform::new(0.0, size as f64, 1.0, -1.0));
    for row in 0..size {
        for col in 0..size {
            let v = ((row * 7 + col * 13) % 200) as f64 / 200.0;
            r.set(row, col, v).unwrap();
        }
    }
    r.into()
}

fn bench_fvc(c: &mut Criterion) {
    let mut group = c.benchmark_group("vegetation/fvc");
    for size in [256, 512, 1024, 2048] {
        let ndvi = create_ndvi(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| fractional_vegetation_cover(black_box(&ndvi)))
        });
    }
    group.finish();
}

fn bench_lai(c: &mut Criterion) {
    let mut group = c.benchmark_group("vegetation/lai");
    let params = LaiParams::default();
    for size in [256, 512, 1024, 2048] {
        let ndvi = create_ndvi(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| leaf_area_index(black_box(&ndvi), &params))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fvc, bench_lai);
criterion_main!(benches);
