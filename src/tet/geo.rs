use nalgebra::Matrix3;

use super::*;

/// Gets the center and squared radius of the sphere through 4 points.
///
/// If the points are coplanar, the sphere is infinitely large:
/// the center is the origin and the squared radius is `f64::MAX`.
pub fn circumsphere(p0: Pt3, p1: Pt3, p2: Pt3, p3: Pt3) -> (Pt3, f64) {
    let e1 = p1 - p0;
    let e2 = p2 - p0;
    let e3 = p3 - p0;
    let a = Matrix3::new(
        e1.x, e1.y, e1.z, //
        e2.x, e2.y, e2.z, //
        e3.x, e3.y, e3.z,
    );
    let b = Vec3::new(
        0.5 * e1.norm_squared(),
        0.5 * e2.norm_squared(),
        0.5 * e3.norm_squared(),
    );

    match a.lu().solve(&b) {
        Some(offset) if offset.iter().all(|x| x.is_finite()) => {
            (p0 + offset, offset.norm_squared())
        }
        _ => (Pt3::origin(), f64::MAX),
    }
}

impl TetMesh {
    /// Gets whether a point is strictly inside the circumsphere of a tet
    /// shrunk by the relative amount `epsilon`.
    ///
    /// Points on the circumsphere are never inside it, so with cospherical points
    /// the tet that was created first keeps its shape.
    pub fn in_sphere(&self, tet: &Tet, point: PointId) -> bool {
        let p = self.points[point].param();
        (p - tet.center).norm_squared() < (1.0 - self.epsilon) * tet.radius2
    }

    /// Classifies a tet: inside if all of its points are inside or on the boundary.
    pub fn classify(&self, tet: &Tet) -> TetClass {
        if tet.points.iter().all(|p| self.points[*p].class().is_solid()) {
            TetClass::Inside
        } else {
            TetClass::Outside
        }
    }
}
