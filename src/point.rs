use std::collections::TryReserveError;
use std::ops::{Index, IndexMut};

use crate::{Pt3, PointId};

/// Classification of an input point.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PointClass {
    Inside,
    Outside,
    Boundary,
    /// One of the 6 points of the bounding envelope.
    Added,
}

impl PointClass {
    /// Whether a tetra made only of points like this one counts as inside.
    pub(crate) fn is_solid(self) -> bool {
        matches!(self, PointClass::Inside | PointClass::Boundary)
    }
}

/// A point to triangulate.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    id: i64,
    sort_ids: [i64; 2],
    position: Pt3,
    param: Pt3,
    class: PointClass,
    internal_id: PointId,
}

impl Point {
    pub(crate) fn new(
        id: i64,
        sort_ids: [i64; 2],
        position: Pt3,
        param: Pt3,
        class: PointClass,
    ) -> Self {
        Self {
            id,
            sort_ids,
            position,
            param,
            class,
            internal_id: PointId::invalid(),
        }
    }

    /// The caller-defined id.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The ids this point is sorted by.
    pub fn sort_ids(&self) -> [i64; 2] {
        self.sort_ids
    }

    /// Global coordinates, the ones written to output points.
    pub fn position(&self) -> Pt3 {
        self.position
    }

    /// Coordinates the triangulation is computed in.
    pub fn param(&self) -> Pt3 {
        self.param
    }

    pub fn class(&self) -> PointClass {
        self.class
    }

    /// Rank in the insertion order. Invalid until the points are sorted.
    pub fn internal_id(&self) -> Option<PointId> {
        self.internal_id.valid()
    }

    pub(crate) fn set_class(&mut self, class: PointClass) {
        self.class = class;
    }

    pub(crate) fn set_internal_id(&mut self, id: PointId) {
        self.internal_id = id;
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(
            0,
            [0, 0],
            Pt3::origin(),
            Pt3::origin(),
            PointClass::Outside,
        )
    }
}

/// Growable indexed storage of points.
///
/// Reallocates only when asked for more room than it already has.
#[derive(Clone, Debug, Default)]
pub(crate) struct PointPool {
    points: Vec<Point>,
}

impl PointPool {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Empties the pool and makes room for `capacity` points.
    pub(crate) fn allocate(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        self.points.clear();
        self.points.try_reserve(capacity)
    }

    /// Truncates the pool or extends it with default points.
    pub(crate) fn set_len(&mut self, len: usize) {
        self.points.resize_with(len, Point::default);
    }

    pub(crate) fn push(&mut self, point: Point) -> PointId {
        let id = PointId(self.points.len() as crate::id_map::IdType);
        self.points.push(point);
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.points.capacity()
    }

    pub(crate) fn get(&self, id: PointId) -> Option<&Point> {
        self.points.get(id.index())
    }

    pub(crate) fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Point] {
        &mut self.points
    }
}

impl Index<PointId> for PointPool {
    type Output = Point;

    fn index(&self, index: PointId) -> &Self::Output {
        &self.points[index.index()]
    }
}

impl IndexMut<PointId> for PointPool {
    fn index_mut(&mut self, index: PointId) -> &mut Self::Output {
        &mut self.points[index.index()]
    }
}
