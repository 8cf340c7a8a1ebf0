use criterion::{criterion_group, criterion_main, Criterion};
use ordered_tet::{Bounds, OrderedTriangulator, PointClass, Pt3};

use rand::distributions::{Distribution, Uniform};
use rand_distr::UnitSphere;
use rand_pcg::Pcg64;

const PCG_STATE: u128 = 0xcafef00dd15ea5e5;
const PCG_STREAM: u128 = 0xa02bdbf7bb3c0a7ac28fa16a64abf96;

fn triangulate(tri: &mut OrderedTriangulator, bounds: [f64; 6], data: &[Pt3]) -> usize {
    tri.init_triangulation(bounds, data.len()).unwrap();
    for (i, p) in data.iter().enumerate() {
        tri.insert_point(i as i64, *p, PointClass::Inside).unwrap();
    }
    tri.triangulate(false).unwrap();
    tri.num_tetras()
}

fn ordered_tets_random(c: &mut Criterion) {
    let mut rng = Pcg64::new(PCG_STATE, PCG_STREAM);
    let dist = Uniform::new_inclusive(-10.0, 10.0);
    let data = (0..10000)
        .map(|_| {
            let vals = dist.sample_iter(&mut rng).take(3).collect::<Vec<_>>();
            Pt3::new(vals[0], vals[1], vals[2])
        })
        .collect::<Vec<_>>();
    let bounds = Bounds::from_points(data.iter().copied()).unwrap().to_array();

    // Reused across iterations, like a caller triangulating many cells would.
    let mut tri = OrderedTriangulator::new();
    c.bench_function("ordered_tets_random", |b| {
        b.iter(|| triangulate(&mut tri, bounds, &data))
    });
}

fn ordered_tets_cospherical(c: &mut Criterion) {
    let mut rng = Pcg64::new(PCG_STATE, PCG_STREAM);
    let data = UnitSphere
        .sample_iter(&mut rng)
        .take(10000)
        .map(|vals| Pt3::new(vals[0], vals[1], vals[2]))
        .collect::<Vec<_>>();
    let bounds = Bounds::from_points(data.iter().copied()).unwrap().to_array();

    let mut tri = OrderedTriangulator::new();
    c.bench_function("ordered_tets_cospherical", |b| {
        b.iter(|| triangulate(&mut tri, bounds, &data))
    });
}

fn ordered_tets_grid(c: &mut Criterion) {
    let data = (0..1000)
        .map(|i| Pt3::new((i / 100) as f64, (i / 10 % 10) as f64, (i % 10) as f64))
        .collect::<Vec<_>>();
    let bounds = [0.0, 9.0, 0.0, 9.0, 0.0, 9.0];

    let mut tri = OrderedTriangulator::new();
    c.bench_function("ordered_tets_grid", |b| {
        b.iter(|| triangulate(&mut tri, bounds, &data))
    });
}

criterion_group!(
    bench_ordered_tets,
    ordered_tets_random,
    ordered_tets_cospherical,
    ordered_tets_grid
);
criterion_main!(bench_ordered_tets);
