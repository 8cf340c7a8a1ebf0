use fnv::FnvHashMap;

use crate::{tet::TetId, PointId};

/// Scratch map from an undirected edge to the new tet that first claimed it.
/// Lives for one cavity re-triangulation.
#[derive(Clone, Debug, Default)]
pub(crate) struct EdgeTable {
    map: FnvHashMap<[PointId; 2], TetId>,
}

#[inline(always)]
fn sorted_2(mut arr: [PointId; 2]) -> [PointId; 2] {
    if arr[0] > arr[1] {
        arr.swap(0, 1);
    }
    arr
}

impl EdgeTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sizes the table for a mesh of `max_points` points and empties it.
    pub(crate) fn init_for_capacity(&mut self, max_points: usize) {
        self.map.clear();
        // Cavity boundaries are small, so the up-front reservation is capped.
        self.map.reserve(max_points.min(1024));
    }

    /// Empties the table, keeping its allocation.
    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }

    pub(crate) fn lookup(&self, p0: PointId, p1: PointId) -> Option<TetId> {
        self.map.get(&sorted_2([p0, p1])).copied()
    }

    pub(crate) fn insert(&mut self, p0: PointId, p1: PointId, tet: TetId) {
        self.map.insert(sorted_2([p0, p1]), tet);
    }
}
