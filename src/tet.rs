use bitflags::bitflags;
use std::cell::Cell;
use std::collections::{TryReserveError, VecDeque};
use std::ops::Index;

use crate::edge_table::EdgeTable;
use crate::id_map::{self, IdMap, IdType};
use crate::point::{Point, PointClass, PointPool};
use crate::util::Bounds;
use crate::{Pt3, PointId, Vec3};

mod cavity;
mod geo;

pub use cavity::CavityStats;
pub use geo::circumsphere;

crate::id! {
    /// A tet id. Ids of removed tets are reused.
    pub struct TetId
}

bitflags! {
    /// Role of a tet in the cavity of the point stamped on it.
    /// Only meaningful while that point is being inserted.
    struct TetFlags: u32 {
        /// The circumsphere contains the point; the tet will be removed.
        const IN_CAVITY = 1 << 0;
        /// The tet borders the cavity but stays.
        const OUTSIDE_CAVITY = 1 << 1;
    }
}

/// Vertices of each face of a tet. Face `i` is made of the vertices other than `i`,
/// wound the same way around the tet.
pub(crate) const FACES: [[usize; 3]; 4] = [[1, 3, 2], [0, 2, 3], [0, 3, 1], [0, 1, 2]];

/// Classification of a tet from the classification of its points.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TetClass {
    /// All 4 points are inside or on the boundary.
    Inside,
    Outside,
}

/// Which tets to extract.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TetFilter {
    Inside,
    Outside,
    All,
}

impl TetFilter {
    pub fn accepts(self, class: TetClass) -> bool {
        match self {
            TetFilter::Inside => class == TetClass::Inside,
            TetFilter::Outside => class == TetClass::Outside,
            TetFilter::All => true,
        }
    }
}

/// A tet stores its points, the tets across each of its faces and its circumsphere.
///
/// `neighbors[i]` is the tet across face `i`, or an invalid id on the outside of the envelope.
#[derive(Clone, Debug)]
pub struct Tet {
    points: [PointId; 4],
    neighbors: [TetId; 4],
    center: Pt3,
    radius2: f64,
    /// The last point whose cavity search visited this tet.
    stamp: Cell<PointId>,
    flags: Cell<TetFlags>,
}

impl Tet {
    fn new(points: [PointId; 4], center: Pt3, radius2: f64) -> Self {
        Self {
            points,
            neighbors: [TetId::invalid(); 4],
            center,
            radius2,
            stamp: Cell::new(PointId::invalid()),
            flags: Cell::new(TetFlags::empty()),
        }
    }

    /// Gets the points of this tet.
    pub fn points(&self) -> [PointId; 4] {
        self.points
    }

    /// Gets the tet across face `face`, if there is one.
    pub fn neighbor(&self, face: usize) -> Option<TetId> {
        self.neighbors[face].valid()
    }

    /// Gets the tets across each face.
    pub fn neighbors(&self) -> [Option<TetId>; 4] {
        [
            self.neighbor(0),
            self.neighbor(1),
            self.neighbor(2),
            self.neighbor(3),
        ]
    }

    /// Gets the points of face `face`.
    pub fn face_points(&self, face: usize) -> [PointId; 3] {
        let [a, b, c] = FACES[face];
        [self.points[a], self.points[b], self.points[c]]
    }

    /// Gets the center of the circumsphere.
    pub fn center(&self) -> Pt3 {
        self.center
    }

    /// Gets the squared radius of the circumsphere.
    pub fn radius2(&self) -> f64 {
        self.radius2
    }

    fn visit(&self, point: PointId, role: TetFlags) {
        self.stamp.set(point);
        self.flags.set(role);
    }

    fn visited_by(&self, point: PointId) -> bool {
        self.stamp.get() == point
    }

    fn has_flags(&self, flag: TetFlags) -> bool {
        self.flags.get().intersects(flag)
    }
}

/// A face on the boundary of a cavity, with the tet that stays on the other side.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Face {
    points: [PointId; 3],
    neighbor: TetId,
}

impl Face {
    fn new(points: [PointId; 3], neighbor: TetId) -> Self {
        Self { points, neighbor }
    }
}

/// A Delaunay tetrahedralization of buffered points inside a bounding envelope.
///
/// Points `0..num_points` are the buffered points. After the envelope is built,
/// the 6 envelope points follow them.
#[derive(Clone, Debug)]
pub struct TetMesh {
    points: PointPool,
    num_points: usize,
    capacity: usize,
    tets: IdMap<TetId, Tet>,
    epsilon: f64,
    // Scratch for a single insertion.
    faces: Vec<Face>,
    queue: VecDeque<TetId>,
    cavity: Vec<TetId>,
    edges: EdgeTable,
}

impl Default for TetMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl TetMesh {
    /// Number of points in the bounding envelope.
    pub const ENVELOPE_POINTS: usize = 6;

    /// Largest number of points a mesh can be reset for.
    /// Every point and envelope point needs a valid `PointId`.
    pub const MAX_POINTS: usize = IdType::MAX as usize - Self::ENVELOPE_POINTS;

    /// Tets reserved up front at most.
    const MAX_TET_RESERVATION: usize = 1 << 20;

    /// Creates an empty mesh with room for no points.
    pub fn new() -> Self {
        Self {
            points: PointPool::new(),
            num_points: 0,
            capacity: 0,
            tets: IdMap::new(),
            epsilon: 0.0,
            faces: vec![],
            queue: VecDeque::new(),
            cavity: vec![],
            edges: EdgeTable::new(),
        }
    }

    /// Empties the mesh and builds the bounding envelope: an octahedron around `bounds`
    /// whose points are `scale` bounds diagonals away from the bounds center,
    /// split into 4 tets around its z axis.
    /// The envelope points get the ids `capacity..capacity + 6`.
    ///
    /// `capacity` must be at most [`MAX_POINTS`](Self::MAX_POINTS).
    /// Fails if the point buffer cannot be allocated, leaving the mesh empty.
    pub(crate) fn reset(
        &mut self,
        bounds: Bounds,
        capacity: usize,
        scale: f64,
        epsilon: f64,
    ) -> Result<(), TryReserveError> {
        assert!(
            capacity <= Self::MAX_POINTS,
            "Capacity {} exceeds {}",
            capacity,
            Self::MAX_POINTS
        );
        self.num_points = 0;
        self.capacity = 0;
        self.tets.clear();
        self.points.allocate(capacity + Self::ENVELOPE_POINTS)?;
        self.points.set_len(capacity);
        self.capacity = capacity;
        // About 6.5 tets per point for evenly spread points
        let tets = capacity.saturating_mul(7).saturating_add(4);
        self.tets.reserve(tets.min(Self::MAX_TET_RESERVATION));
        self.epsilon = epsilon;
        self.faces.clear();
        self.queue.clear();
        self.cavity.clear();
        self.edges.init_for_capacity(capacity);

        let center = bounds.center();
        let diagonal = if bounds.diagonal() > 0.0 {
            bounds.diagonal()
        } else {
            1.0
        };
        let length = scale * diagonal;
        let offsets = [
            Vec3::new(-length, 0.0, 0.0),
            Vec3::new(length, 0.0, 0.0),
            Vec3::new(0.0, -length, 0.0),
            Vec3::new(0.0, length, 0.0),
            Vec3::new(0.0, 0.0, -length),
            Vec3::new(0.0, 0.0, length),
        ];
        let ids = offsets.map(|offset| {
            let position = center + offset;
            let id = self.points.push(Point::new(
                -1,
                [i64::MAX, i64::MAX],
                position,
                position,
                PointClass::Added,
            ));
            self.points[id].set_internal_id(id);
            id
        });

        // -x, -y, +x, +y around the axis from -z to +z
        let ring = [ids[0], ids[2], ids[1], ids[3]];
        let mut tets = [TetId::invalid(); 4];
        for i in 0..4 {
            let tet = self.new_tet([ring[i], ring[(i + 1) % 4], ids[4], ids[5]]);
            tets[i] = self.tets.insert(tet);
        }
        for i in 0..4 {
            self.assign_neighbors(tets[i], tets[(i + 1) % 4]);
        }
        Ok(())
    }

    /// Buffers a point. Returns None if the mesh is full.
    pub(crate) fn buffer_point(&mut self, point: Point) -> Option<PointId> {
        if self.num_points >= self.capacity {
            return None;
        }
        let id = PointId(self.num_points as IdType);
        self.points[id] = point;
        self.num_points += 1;
        Some(id)
    }

    /// Gets the buffered points mutably.
    pub(crate) fn buffered_points_mut(&mut self) -> &mut [Point] {
        &mut self.points.as_mut_slice()[..self.num_points]
    }

    /// Gives every buffered point its position as internal id and moves
    /// the envelope points right after the last buffered point.
    pub(crate) fn assign_internal_ids(&mut self) {
        let n = self.num_points;
        for (i, point) in self.buffered_points_mut().iter_mut().enumerate() {
            point.set_internal_id(PointId(i as IdType));
        }

        if n < self.capacity {
            let shift = (self.capacity - n) as IdType;
            self.points.as_mut_slice()[n..].rotate_left(self.capacity - n);
            self.points.set_len(n + Self::ENVELOPE_POINTS);
            for (i, point) in self.points.as_mut_slice()[n..].iter_mut().enumerate() {
                point.set_internal_id(PointId((n + i) as IdType));
            }

            // Only the envelope exists before the first insertion.
            let keys = self.tets.keys().collect::<Vec<_>>();
            for key in keys {
                for point in &mut self.tets[key].points {
                    point.0 -= shift;
                }
            }
            self.capacity = n;
        }
    }

    /// Creates a tet from 4 points, computing its circumsphere.
    fn new_tet(&self, points: [PointId; 4]) -> Tet {
        let [p0, p1, p2, p3] = points.map(|p| self.points[p].param());
        let (center, radius2) = circumsphere(p0, p1, p2, p3);
        Tet::new(points, center, radius2)
    }

    /// Gets the index of the only point of `tet` that is not a point of `other`.
    /// That is the index of the face they share.
    fn unshared_point(&self, tet: TetId, other: TetId) -> usize {
        let points = self.tets[tet].points;
        let others = self.tets[other].points;

        let mut mask = 0u32;
        for (i, point) in points.iter().enumerate() {
            if !others.contains(point) {
                mask |= 1 << i;
            }
        }

        if mask.count_ones() != 1 {
            panic!(
                "Tets {} {:?} and {} {:?} do not share exactly one face.",
                tet, points, other, others
            );
        }
        mask.trailing_zeros() as usize
    }

    /// Makes 2 tets that share a face each other's neighbor across that face.
    fn assign_neighbors(&mut self, t0: TetId, t1: TetId) {
        let f0 = self.unshared_point(t0, t1);
        let f1 = self.unshared_point(t1, t0);
        self.tets[t0].neighbors[f0] = t1;
        self.tets[t1].neighbors[f1] = t0;
    }

    /// Gets the number of buffered points, not including the envelope.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Gets the buffered points.
    pub fn points(&self) -> &[Point] {
        &self.points.as_slice()[..self.num_points]
    }

    /// Gets every point that tets can refer to, the envelope included.
    /// Indexed by internal id once the points are triangulated.
    pub fn all_points(&self) -> &[Point] {
        self.points.as_slice()
    }

    /// Gets a point, if it exists. Envelope points are included.
    pub fn point(&self, point: PointId) -> Option<&Point> {
        if point.index() < self.num_points || point.index() >= self.capacity {
            self.points.get(point)
        } else {
            None
        }
    }

    /// Gets the point with an id, if it exists.
    pub(crate) fn point_mut(&mut self, point: PointId) -> Option<&mut Point> {
        if point.index() < self.num_points {
            Some(&mut self.points[point])
        } else {
            None
        }
    }

    /// Gets the number of tets, including the ones touching the envelope.
    pub fn num_tets(&self) -> usize {
        self.tets.len()
    }

    /// Iterates over tet ids and tets in traversal order.
    pub fn tets(&self) -> Tets<'_> {
        self.tets.iter()
    }

    /// Gets a tet, if it exists.
    pub fn tet(&self, tet: TetId) -> Option<&Tet> {
        self.tets.get(tet)
    }

    /// Gets the relative circumsphere shrinkage used by `in_sphere`.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub(crate) fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Assert all the invariants of this tet mesh.
    #[cfg(test)]
    #[track_caller]
    pub(crate) fn assert_integrity(&self) {
        let inserted = self
            .tets
            .values()
            .flat_map(|tet| tet.points)
            .collect::<fnv::FnvHashSet<_>>();

        let mut outer_faces = 0;
        for (id, tet) in self.tets.iter() {
            let mut points = tet.points.to_vec();
            points.sort();
            points.dedup();
            assert_eq!(points.len(), 4, "Tet {} does not have unique points.", id);

            for (i, adj) in tet.neighbors().iter().enumerate() {
                match adj {
                    None => outer_faces += 1,
                    Some(adj) => {
                        let adj_tet = self.tet(*adj).unwrap_or_else(|| {
                            panic!("Tet {} points to removed tet {}", id, adj)
                        });
                        let back = adj_tet.neighbors().iter().filter(|t| **t == Some(id)).count();
                        assert_eq!(back, 1, "Tet {} is not adjacent to tet {} exactly once.", adj, id);
                        assert_eq!(self.unshared_point(id, *adj), i, "Tet {} and tet {} do not share face {}.", id, adj, i);
                    }
                }
            }

            for &p in &inserted {
                if tet.points.contains(&p) {
                    continue;
                }
                let point = &self.points[p];
                assert!(
                    (point.param() - tet.center).norm_squared()
                        >= (1.0 - self.epsilon) * tet.radius2,
                    "Point {} is inside the circumsphere of tet {} {:?}.",
                    p,
                    id,
                    tet.points
                );
            }
        }
        assert_eq!(outer_faces, 8, "The envelope should have 8 outer faces.");
    }
}

impl Index<PointId> for TetMesh {
    type Output = Point;

    fn index(&self, index: PointId) -> &Self::Output {
        &self.points[index]
    }
}

impl Index<TetId> for TetMesh {
    type Output = Tet;

    fn index(&self, index: TetId) -> &Self::Output {
        &self.tets[index]
    }
}

/// Iterator over tet ids and tets.
pub type Tets<'a> = id_map::Iter<'a, TetId, Tet>;
