use criterion::{criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};
use ogkit::optimize::{optimize_image, target_dimensions, OptimizeConfig};

fn bench_target_dimensions(c: &mut Criterion) {
    c.bench_function("target_dimensions", |b| {
        b.iter(|| target_dimensions(criterion::black_box(2400), criterion::black_box(1350), 1200))
    });
}

fn bench_optimize_png(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bench.png");
    let source = RgbaImage::from_fn(2400, 1200, |x, y| Rgba([(x % 251) as u8, (y % 241) as u8, 90, 255]));
    let cfg = OptimizeConfig::for_public_dir(dir.path());

    let mut group = c.benchmark_group("optimize");
    group.sample_size(10);
    group.bench_function("png_2400x1200", |b| {
        b.iter(|| {
            // optimize_image rewrites in place, so restore the wide original each round
            source.save(&path).expect("write source");
            optimize_image(&path, &cfg).expect("optimize");
        })
    });
    group.finish();
}

criterion_group!(benches, bench_target_dimensions, bench_optimize_png);
criterion_main!(benches);
