//! Tetrahedralize a 3x3x3 grid of points and export the inside tets as an obj
//!
//! Requires the "obj" feature.

fn main() {
    #[cfg(feature = "obj")]
    {
        use ordered_tet::{OrderedTriangulator, PointClass, Pt3, TetFilter};

        let output = std::env::args().nth(1).unwrap_or_else(|| {
            println!("Usage: <program> <output_obj>");
            panic!("Missing output obj")
        });

        let mut tri = OrderedTriangulator::new();
        tri.init_triangulation([0.0, 2.0, 0.0, 2.0, 0.0, 2.0], 27)
            .expect("Valid bounds");
        for i in 0..27 {
            let p = Pt3::new((i / 9) as f64, (i / 3 % 3) as f64, (i % 3) as f64);
            tri.insert_point(i, p, PointClass::Inside)
                .expect("Within capacity");
        }
        tri.triangulate(false).expect("Initialized");

        tri.export_debug_obj(TetFilter::Inside, output)
            .expect("Could not save output");
    }

    #[cfg(not(feature = "obj"))]
    panic!("This example requires the \"obj\" feature.");
}
