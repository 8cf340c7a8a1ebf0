//! Read-only export of a finished mesh.
//!
//! Tets are visited in traversal order and handed to a [`TetraSink`].
//! Extraction never mutates the mesh, so it can run any number of times
//! with different filters.

#[cfg(feature = "obj")]
use std::path::Path;

use crate::point::{Point, PointClass};
use crate::tet::{TetFilter, TetMesh};
use crate::{PointId, Pt3};

/// Receives the tets of a mesh.
pub trait TetraSink {
    /// Called once before the first tet with every point a tet can refer to,
    /// indexed by internal id.
    fn begin(&mut self, _points: &[Point]) {}

    /// Called for every extracted tet, with its point ids and its points.
    fn add_tetra(&mut self, ids: [PointId; 4], points: [&Point; 4]);
}

/// Bare connectivity: the external ids of the corners of each tet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Connectivity {
    pub cells: Vec<[i64; 4]>,
}

impl Connectivity {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TetraSink for Connectivity {
    fn add_tetra(&mut self, _ids: [PointId; 4], points: [&Point; 4]) {
        self.cells.push(points.map(Point::id));
    }
}

/// A fresh point list indexed by internal id, and cells indexing into it.
///
/// The list holds the envelope points too, so cells of tets touching
/// the envelope stay valid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexedTetMesh {
    pub points: Vec<Pt3>,
    pub cells: Vec<[usize; 4]>,
}

impl IndexedTetMesh {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TetraSink for IndexedTetMesh {
    fn begin(&mut self, points: &[Point]) {
        self.points.clear();
        self.cells.clear();
        self.points.extend(points.iter().map(Point::position));
    }

    fn add_tetra(&mut self, ids: [PointId; 4], _points: [&Point; 4]) {
        self.cells.push(ids.map(PointId::index));
    }
}

/// Cells that keep the external ids of their corners along with their positions.
/// Appends to whatever the lists already hold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TetSoup {
    pub ids: Vec<[i64; 4]>,
    pub positions: Vec<[Pt3; 4]>,
}

impl TetSoup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tets held.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl TetraSink for TetSoup {
    fn add_tetra(&mut self, _ids: [PointId; 4], points: [&Point; 4]) {
        self.ids.push(points.map(Point::id));
        self.positions.push(points.map(Point::position));
    }
}

impl TetMesh {
    /// Iterates over the points of the tets that pass a filter, in traversal order.
    pub fn tetras(&self, filter: TetFilter) -> impl Iterator<Item = [&Point; 4]> + '_ {
        self.tets()
            .filter(move |(_, tet)| filter.accepts(self.classify(tet)))
            .map(move |(_, tet)| tet.points().map(move |p| &self[p]))
    }

    /// Sends the tets that pass a filter to a sink. Returns how many were sent.
    pub fn extract<S: TetraSink + ?Sized>(&self, filter: TetFilter, sink: &mut S) -> usize {
        sink.begin(self.all_points());

        let mut count = 0;
        for (_, tet) in self.tets() {
            if filter.accepts(self.classify(tet)) {
                let ids = tet.points();
                sink.add_tetra(ids, ids.map(|p| &self[p]));
                count += 1;
            }
        }
        count
    }

    /// Appends the external ids of every face made only of boundary points,
    /// each face once. Returns how many faces were appended.
    pub fn extract_triangles(&self, out: &mut Vec<[i64; 3]>) -> usize {
        self.boundary_triangles(None, out)
    }

    /// Like [`extract_triangles`](Self::extract_triangles), restricted to the faces
    /// that have the point with external id `id` as a corner.
    pub fn extract_triangles_at(&self, id: i64, out: &mut Vec<[i64; 3]>) -> usize {
        self.boundary_triangles(Some(id), out)
    }

    fn boundary_triangles(&self, at: Option<i64>, out: &mut Vec<[i64; 3]>) -> usize {
        let start = out.len();

        for (id, tet) in self.tets() {
            for face in 0..4 {
                // The tet with the smaller id owns a shared face.
                if tet.neighbor(face).map_or(false, |adj| adj < id) {
                    continue;
                }

                let points = tet.face_points(face).map(|p| &self[p]);
                if points.iter().all(|p| p.class() == PointClass::Boundary)
                    && at.map_or(true, |at| points.iter().any(|p| p.id() == at))
                {
                    out.push(points.map(Point::id));
                }
            }
        }

        out.len() - start
    }

    /// Writes the tets that pass a filter as a Wavefront OBJ file,
    /// each tet as 4 separate triangles.
    #[cfg(feature = "obj")]
    pub fn export_debug_obj<P: AsRef<Path>>(
        &self,
        filter: TetFilter,
        path: P,
    ) -> Result<(), obj::ObjError> {
        let tets = || self.tetras(filter).enumerate();

        let obj = obj::ObjData {
            position: tets()
                .flat_map(|(_, points)| points)
                .map(|p| {
                    let pos = p.position();
                    [pos.x as f32, pos.y as f32, pos.z as f32]
                })
                .collect(),
            texture: vec![],
            normal: vec![],

            objects: vec![obj::Object {
                name: "Ordered Tet Mesh".to_owned(),
                groups: vec![obj::Group {
                    name: format!("{:?}", filter),
                    index: 0,
                    material: None,
                    polys: tets()
                        .flat_map(|(i, _)| {
                            crate::tet::FACES.map(|[a, b, c]| [4 * i + a, 4 * i + b, 4 * i + c])
                        })
                        .map(|[a, b, c]| {
                            obj::SimplePolygon(vec![
                                obj::IndexTuple(a, None, None),
                                obj::IndexTuple(b, None, None),
                                obj::IndexTuple(c, None, None),
                            ])
                        })
                        .collect::<Vec<_>>(),
                }],
            }],

            material_libs: vec![],
        };
        obj.save(path)
    }
}
