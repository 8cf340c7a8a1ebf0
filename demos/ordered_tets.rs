//! Tetrahedralize a random point set, split into inside and outside points

use ordered_tet::{Bounds, Connectivity, OrderedTriangulator, PointClass, Pt3, TetFilter};

use rand::distributions::{Distribution, Uniform};
use rand_pcg::Pcg64;

const PCG_STATE: u128 = 0xcafef00dd15ea5e5;
const PCG_STREAM: u128 = 0xa02bdbf7bb3c0a7ac28fa16a64abf96;

fn main() {
    let mut rng = Pcg64::new(PCG_STATE, PCG_STREAM);
    let dist = Uniform::new_inclusive(-10.0, 10.0);
    let data = (0..10000)
        .map(|_| {
            let vals = dist.sample_iter(&mut rng).take(3).collect::<Vec<_>>();
            Pt3::new(vals[0], vals[1], vals[2])
        })
        .collect::<Vec<_>>();
    let bounds = Bounds::from_points(data.iter().copied()).unwrap();

    let mut tri = OrderedTriangulator::new();
    tri.init_triangulation(bounds.to_array(), data.len()).unwrap();
    for (i, p) in data.iter().enumerate() {
        let class = if p.coords.norm() < 8.0 {
            PointClass::Inside
        } else {
            PointClass::Outside
        };
        tri.insert_point(i as i64, *p, class).unwrap();
    }
    let report = tri.triangulate(false).unwrap();
    println!("Inserted {} points, skipped {:?}", report.inserted, report.skipped);
    println!("Num tets including envelope: {}", tri.num_tetras());

    let mut inside = Connectivity::new();
    println!("Inside tets: {}", tri.extract(TetFilter::Inside, &mut inside));
}
