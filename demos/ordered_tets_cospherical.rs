//! Tetrahedralize points on a sphere and a cube's corners, where many point sets
//! share a circumsphere, and show the result does not depend on the buffer order

use ordered_tet::{Bounds, Connectivity, OrderedTriangulator, PointClass, Pt3, TetFilter};

use rand::distributions::Distribution;
use rand::seq::SliceRandom;
use rand_distr::UnitSphere;
use rand_pcg::Pcg64;

const PCG_STATE: u128 = 0xcafef00dd15ea5e5;
const PCG_STREAM: u128 = 0xa02bdbf7bb3c0a7ac28fa16a64abf96;

fn cells(points: &[(i64, Pt3)]) -> Vec<[i64; 4]> {
    let bounds = Bounds::from_points(points.iter().map(|(_, p)| *p)).unwrap();
    let mut tri = OrderedTriangulator::new();
    tri.init_triangulation(bounds.to_array(), points.len()).unwrap();
    for (id, p) in points {
        tri.insert_point(*id, *p, PointClass::Boundary).unwrap();
    }
    tri.triangulate(false).unwrap();

    let mut sink = Connectivity::new();
    tri.extract(TetFilter::Inside, &mut sink);
    let mut cells = sink
        .cells
        .into_iter()
        .map(|mut c| {
            c.sort_unstable();
            c
        })
        .collect::<Vec<_>>();
    cells.sort_unstable();
    cells
}

fn main() {
    let mut rng = Pcg64::new(PCG_STATE, PCG_STREAM);
    let sphere = UnitSphere
        .sample_iter(&mut rng)
        .take(10000)
        .enumerate()
        .map(|(i, vals)| (i as i64, Pt3::new(vals[0], vals[1], vals[2])))
        .collect::<Vec<_>>();
    let cube = (0..8)
        .map(|i| {
            (i, Pt3::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64))
        })
        .collect::<Vec<_>>();

    for (name, mut points) in [("sphere", sphere), ("cube", cube)] {
        let expected = cells(&points);
        points.shuffle(&mut rng);
        let shuffled = cells(&points);
        println!(
            "{}: {} inside tets, same after shuffling: {}",
            name,
            expected.len(),
            expected == shuffled
        );
    }
}
