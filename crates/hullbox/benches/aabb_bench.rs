//! Criterion microbenches for bounding boxes (group "aabb").
//!
//! - Construction from point sets, union and overlap boxes.
//! - Slab ray tests over a batch of random rays.
//! - Viewport derivation (all three variants).

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use hullbox::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

const EPS: f64 = 1e-9;

fn random_point(rng: &mut StdRng) -> Point3<f64> {
    Point3::new(
        rng.gen_range(-10.0..10.0),
        rng.gen_range(-10.0..10.0),
        rng.gen_range(-10.0..10.0),
    )
}

fn bench_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("aabb");
    let mut rng = StdRng::seed_from_u64(42);
    for n in [8usize, 1024] {
        let pts: Vec<Point3<f64>> = (0..n).map(|_| random_point(&mut rng)).collect();
        group.bench_function(BenchmarkId::new("from_points", n), |b| {
            b.iter(|| Aabb::from_points(&pts))
        });
    }
    group.bench_function("union_intersect", |b| {
        b.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(7);
                (
                    Aabb::new(random_point(&mut rng), random_point(&mut rng)),
                    Aabb::new(random_point(&mut rng), random_point(&mut rng)),
                )
            },
            |(a, b)| {
                let _ = a.union(&b);
                let _ = a.intersect(&b);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_rays(c: &mut Criterion) {
    let mut group = c.benchmark_group("aabb");
    let mut rng = StdRng::seed_from_u64(11);
    let boxed = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    let rays: Vec<Ray> = (0..1024)
        .map(|_| {
            let o = random_point(&mut rng);
            Ray::new(o, Point3::origin() - o + Vector3::new(0.5, 0.0, 0.0))
        })
        .collect();
    group.bench_function("intersects_ray_1024", |b| {
        b.iter(|| rays.iter().filter(|r| boxed.intersects_ray(r, EPS)).count())
    });
    group.finish();
}

fn bench_viewport(c: &mut Criterion) {
    let mut group = c.benchmark_group("aabb");
    let boxed = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0));
    let eye = Point3::new(4.0, -6.0, 2.0);
    let right = Vector3::x();
    group.bench_function("viewport", |b| b.iter(|| boxed.viewport(&eye, &right, EPS)));
    group.bench_function("viewport_at_distance", |b| {
        b.iter(|| boxed.viewport_at_distance(&eye, &right, 1.0, EPS))
    });
    group.bench_function("viewport_zoomed", |b| {
        b.iter(|| boxed.viewport_zoomed(&eye, &right, 1.0, 2.0, EPS))
    });
    group.finish();
}

criterion_group!(benches, bench_algebra, bench_rays, bench_viewport);
criterion_main!(benches);
