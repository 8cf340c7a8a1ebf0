use tracing::{debug, error, trace, warn};

use crate::config::TriangulatorConfig;
use crate::error::TriangulatorError;
use crate::extract::TetraSink;
use crate::id_map::IdType;
use crate::point::{Point, PointClass};
use crate::tet::{TetFilter, TetMesh};
use crate::util::Bounds;
use crate::{PointId, Pt3};

/// Where a triangulator is in its life cycle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Stage {
    /// `init_triangulation` has not been called.
    #[default]
    Uninitialized,
    /// Points are being buffered.
    Unsorted,
    /// Points are in insertion order and have internal ids.
    Sorted,
    /// The point with this internal id is being inserted.
    Inserting(usize),
    /// Every point was processed. Only extraction is left.
    Done,
}

/// What `triangulate` did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriangulationReport {
    /// Number of points inserted into the mesh.
    pub inserted: usize,
    /// External ids of the points no tet contained, in insertion order.
    pub skipped: Vec<i64>,
}

/// Builds a Delaunay tetrahedralization whose connectivity only depends
/// on the ids of the points and their coordinates, never on the order they were buffered in.
///
/// ```
/// use ordered_tet::{OrderedTriangulator, PointClass, Pt3, TetFilter, Connectivity};
///
/// let mut tri = OrderedTriangulator::new();
/// tri.init_triangulation([0.0, 1.0, 0.0, 1.0, 0.0, 1.0], 8).unwrap();
/// for i in 0..8 {
///     let p = Pt3::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64);
///     tri.insert_point(i, p, PointClass::Inside).unwrap();
/// }
/// tri.triangulate(false).unwrap();
///
/// let mut cells = Connectivity::new();
/// assert_eq!(tri.extract(TetFilter::Inside, &mut cells), 6);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OrderedTriangulator {
    mesh: TetMesh,
    config: TriangulatorConfig,
    stage: Stage,
}

impl OrderedTriangulator {
    /// Creates a triangulator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TriangulatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &TriangulatorConfig {
        &self.config
    }

    /// Replaces the configuration. The envelope scale takes effect
    /// at the next `init_triangulation`, everything else at the next `triangulate`.
    pub fn set_config(&mut self, config: TriangulatorConfig) {
        self.config = config;
    }

    /// Empties the triangulator and prepares it for up to `max_points` points
    /// inside `bounds`, given as (xmin, xmax, ymin, ymax, zmin, zmax) in parametric coordinates.
    ///
    /// Allocations from earlier triangulations are reused.
    /// `max_points` may be at most [`TetMesh::MAX_POINTS`].
    pub fn init_triangulation(
        &mut self,
        bounds: [f64; 6],
        max_points: usize,
    ) -> Result<(), TriangulatorError> {
        let region = Bounds::from_array(bounds);
        if !region.is_valid() {
            return Err(TriangulatorError::InvalidBounds { bounds });
        }
        if max_points > TetMesh::MAX_POINTS {
            return Err(TriangulatorError::TooManyPoints {
                max_points,
                limit: TetMesh::MAX_POINTS,
            });
        }

        if let Err(err) = self.mesh.reset(
            region,
            max_points,
            self.config.envelope_scale,
            self.config.epsilon,
        ) {
            error!(max_points, %err, "Could not allocate the point buffer");
            self.stage = Stage::Uninitialized;
            return Err(TriangulatorError::AllocationFailed { max_points });
        }
        self.stage = Stage::Unsorted;
        debug!(
            max_points,
            envelope_points = TetMesh::ENVELOPE_POINTS,
            envelope_tets = self.mesh.num_tets(),
            "Initialized triangulation"
        );
        Ok(())
    }

    /// Buffers a point whose parametric coordinates are its position.
    /// It is sorted by its id.
    pub fn insert_point(
        &mut self,
        id: i64,
        position: Pt3,
        class: PointClass,
    ) -> Result<PointId, TriangulatorError> {
        self.insert_point_sorted(id, [id, 0], position, position, class)
    }

    /// Buffers a point with separate global and parametric coordinates.
    /// It is sorted by its id.
    pub fn insert_point_param(
        &mut self,
        id: i64,
        position: Pt3,
        param: Pt3,
        class: PointClass,
    ) -> Result<PointId, TriangulatorError> {
        self.insert_point_sorted(id, [id, 0], position, param, class)
    }

    /// Buffers a point with explicit sort ids.
    /// The second one only matters if the configuration says to use both.
    pub fn insert_point_sorted(
        &mut self,
        id: i64,
        sort_ids: [i64; 2],
        position: Pt3,
        param: Pt3,
        class: PointClass,
    ) -> Result<PointId, TriangulatorError> {
        self.check_unsorted()?;

        self.mesh
            .buffer_point(Point::new(id, sort_ids, position, param, class))
            .ok_or_else(|| {
                let capacity = self.mesh.num_points();
                error!(id, capacity, "Point buffer is full");
                TriangulatorError::CapacityExceeded { capacity }
            })
    }

    /// Changes the class of a buffered point.
    pub fn update_point_class(
        &mut self,
        handle: PointId,
        class: PointClass,
    ) -> Result<(), TriangulatorError> {
        self.check_unsorted()?;

        self.mesh
            .point_mut(handle)
            .map(|point| point.set_class(class))
            .ok_or(TriangulatorError::UnknownPoint { handle })
    }

    /// Sorts the buffered points by id unless `pre_sorted` is set, and inserts them
    /// one by one in that order.
    ///
    /// A point that no tet contains is skipped and reported.
    pub fn triangulate(&mut self, pre_sorted: bool) -> Result<TriangulationReport, TriangulatorError> {
        self.check_unsorted()?;

        if !pre_sorted {
            let use_two = self.config.use_two_sort_ids;
            self.mesh.buffered_points_mut().sort_by_key(|point| {
                let [first, second] = point.sort_ids();
                (first, if use_two { second } else { 0 })
            });
        }
        self.mesh.assign_internal_ids();
        self.mesh.set_epsilon(self.config.epsilon);
        self.stage = Stage::Sorted;

        let num_points = self.mesh.num_points();
        debug!(num_points, pre_sorted, "Triangulating");

        let mut report = TriangulationReport::default();
        for i in 0..num_points {
            self.stage = Stage::Inserting(i);
            let point = PointId(i as IdType);

            match self.mesh.insert_point(point) {
                Some(stats) => {
                    report.inserted += 1;
                    trace!(
                        point = i,
                        removed = stats.removed,
                        created = stats.created,
                        "Inserted point"
                    );
                }
                None => {
                    let id = self.mesh[point].id();
                    warn!(id, internal_id = i, "No tet contains the point; skipping it");
                    report.skipped.push(id);
                }
            }
        }

        self.stage = Stage::Done;
        debug!(
            inserted = report.inserted,
            skipped = report.skipped.len(),
            num_tets = self.mesh.num_tets(),
            "Triangulated"
        );
        Ok(report)
    }

    fn check_unsorted(&self) -> Result<(), TriangulatorError> {
        match self.stage {
            Stage::Unsorted => Ok(()),
            Stage::Uninitialized => Err(TriangulatorError::NotInitialized),
            _ => Err(TriangulatorError::AlreadyTriangulated),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Gets the number of buffered points.
    pub fn num_points(&self) -> usize {
        self.mesh.num_points()
    }

    /// Gets a buffered point.
    ///
    /// Before `triangulate`, a handle is the one `insert_point` returned.
    /// After it, a handle is an internal id.
    pub fn point(&self, handle: PointId) -> Option<&Point> {
        self.mesh.points().get(handle.index())
    }

    /// Gets the mesh. It only holds the envelope until `triangulate` runs.
    pub fn mesh(&self) -> &TetMesh {
        &self.mesh
    }

    /// Gets the number of tets, including the ones touching the envelope.
    pub fn num_tetras(&self) -> usize {
        self.mesh.num_tets()
    }

    /// See [`TetMesh::tetras`].
    pub fn tetras(&self, filter: TetFilter) -> impl Iterator<Item = [&Point; 4]> + '_ {
        self.mesh.tetras(filter)
    }

    /// See [`TetMesh::extract`].
    pub fn extract<S: TetraSink + ?Sized>(&self, filter: TetFilter, sink: &mut S) -> usize {
        self.mesh.extract(filter, sink)
    }

    /// See [`TetMesh::extract_triangles`].
    pub fn extract_triangles(&self, out: &mut Vec<[i64; 3]>) -> usize {
        self.mesh.extract_triangles(out)
    }

    /// See [`TetMesh::extract_triangles_at`].
    pub fn extract_triangles_at(&self, id: i64, out: &mut Vec<[i64; 3]>) -> usize {
        self.mesh.extract_triangles_at(id, out)
    }

    /// See [`TetMesh::export_debug_obj`].
    #[cfg(feature = "obj")]
    pub fn export_debug_obj<P: AsRef<std::path::Path>>(
        &self,
        filter: TetFilter,
        path: P,
    ) -> Result<(), obj::ObjError> {
        self.mesh.export_debug_obj(filter, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Connectivity;

    fn unit_cube() -> [f64; 6] {
        [0.0, 1.0, 0.0, 1.0, 0.0, 1.0]
    }

    fn corner(i: i64) -> Pt3 {
        Pt3::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64)
    }

    #[test]
    fn test_not_initialized() {
        let mut tri = OrderedTriangulator::new();
        assert_eq!(tri.stage(), Stage::Uninitialized);
        assert_eq!(
            tri.insert_point(0, Pt3::origin(), PointClass::Inside),
            Err(TriangulatorError::NotInitialized)
        );
        assert_eq!(tri.triangulate(false), Err(TriangulatorError::NotInitialized));
    }

    #[test]
    fn test_invalid_bounds() {
        let mut tri = OrderedTriangulator::new();
        let bounds = [1.0, 0.0, 0.0, 1.0, 0.0, 1.0];
        assert_eq!(
            tri.init_triangulation(bounds, 4),
            Err(TriangulatorError::InvalidBounds { bounds })
        );
        assert_eq!(tri.stage(), Stage::Uninitialized);
    }

    #[test]
    fn test_too_many_points() {
        let mut tri = OrderedTriangulator::new();
        for max_points in [TetMesh::MAX_POINTS + 1, usize::MAX] {
            assert_eq!(
                tri.init_triangulation(unit_cube(), max_points),
                Err(TriangulatorError::TooManyPoints {
                    max_points,
                    limit: TetMesh::MAX_POINTS,
                })
            );
            assert_eq!(tri.stage(), Stage::Uninitialized);
        }

        // A rejected call leaves an earlier triangulation alone.
        tri.init_triangulation(unit_cube(), 1).unwrap();
        assert!(tri.init_triangulation(unit_cube(), usize::MAX).is_err());
        assert_eq!(tri.stage(), Stage::Unsorted);
        assert_eq!(tri.num_tetras(), 4);
        assert!(TetMesh::MAX_POINTS + TetMesh::ENVELOPE_POINTS <= IdType::MAX as usize);
    }

    #[test]
    fn test_default_stage() {
        assert_eq!(Stage::default(), Stage::Uninitialized);
        assert_eq!(OrderedTriangulator::default().stage(), Stage::Uninitialized);
    }

    #[test]
    fn test_capacity_is_checked_before_writing() {
        let mut tri = OrderedTriangulator::new();
        tri.init_triangulation(unit_cube(), 2).unwrap();
        tri.insert_point(0, corner(0), PointClass::Inside).unwrap();
        tri.insert_point(1, corner(1), PointClass::Inside).unwrap();
        assert_eq!(
            tri.insert_point(2, corner(2), PointClass::Inside),
            Err(TriangulatorError::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(tri.num_points(), 2);
        // The envelope is untouched.
        assert_eq!(tri.mesh().all_points().len(), 2 + TetMesh::ENVELOPE_POINTS);
        assert!(tri.mesh().all_points()[2..]
            .iter()
            .all(|p| p.class() == PointClass::Added));
    }

    #[test]
    fn test_stages() {
        let mut tri = OrderedTriangulator::new();
        tri.init_triangulation(unit_cube(), 8).unwrap();
        assert_eq!(tri.stage(), Stage::Unsorted);
        for i in 0..8 {
            tri.insert_point(i, corner(i), PointClass::Inside).unwrap();
        }
        let report = tri.triangulate(false).unwrap();
        assert_eq!(tri.stage(), Stage::Done);
        assert_eq!(report.inserted, 8);
        assert!(report.skipped.is_empty());

        assert_eq!(
            tri.insert_point(8, Pt3::origin(), PointClass::Inside),
            Err(TriangulatorError::AlreadyTriangulated)
        );
        assert_eq!(
            tri.update_point_class(PointId(0), PointClass::Outside),
            Err(TriangulatorError::AlreadyTriangulated)
        );
        assert_eq!(tri.triangulate(false), Err(TriangulatorError::AlreadyTriangulated));

        // Re-initializing starts over.
        tri.init_triangulation(unit_cube(), 1).unwrap();
        assert_eq!(tri.stage(), Stage::Unsorted);
        assert_eq!(tri.num_points(), 0);
        assert_eq!(tri.num_tetras(), 4);
    }

    #[test]
    fn test_sort_by_id() {
        let mut tri = OrderedTriangulator::new();
        tri.init_triangulation(unit_cube(), 3).unwrap();
        let h5 = tri.insert_point(5, corner(5), PointClass::Inside).unwrap();
        tri.insert_point(-2, corner(2), PointClass::Inside).unwrap();
        tri.insert_point(3, corner(3), PointClass::Inside).unwrap();
        assert_eq!(tri.point(h5).map(Point::id), Some(5));

        tri.triangulate(false).unwrap();
        let ids = tri.mesh().points().iter().map(Point::id).collect::<Vec<_>>();
        assert_eq!(ids, vec![-2, 3, 5]);
        for (i, point) in tri.mesh().points().iter().enumerate() {
            assert_eq!(point.internal_id(), Some(PointId(i as IdType)));
        }
    }

    #[test]
    fn test_pre_sorted_keeps_buffer_order() {
        let mut tri = OrderedTriangulator::new();
        tri.init_triangulation(unit_cube(), 2).unwrap();
        tri.insert_point(9, corner(1), PointClass::Inside).unwrap();
        tri.insert_point(4, corner(2), PointClass::Inside).unwrap();
        tri.triangulate(true).unwrap();
        let ids = tri.mesh().points().iter().map(Point::id).collect::<Vec<_>>();
        assert_eq!(ids, vec![9, 4]);
    }

    #[test]
    fn test_two_sort_ids() {
        let sorted = |use_two| {
            let mut tri = OrderedTriangulator::with_config(
                TriangulatorConfig::new().use_two_sort_ids(use_two),
            );
            tri.init_triangulation(unit_cube(), 3).unwrap();
            tri.insert_point_sorted(0, [1, 2], corner(0), corner(0), PointClass::Inside)
                .unwrap();
            tri.insert_point_sorted(1, [1, 1], corner(1), corner(1), PointClass::Inside)
                .unwrap();
            tri.insert_point_sorted(2, [0, 9], corner(2), corner(2), PointClass::Inside)
                .unwrap();
            tri.triangulate(false).unwrap();
            tri.mesh().points().iter().map(Point::id).collect::<Vec<_>>()
        };
        // Ties on the first id keep the buffer order.
        assert_eq!(sorted(false), vec![2, 0, 1]);
        assert_eq!(sorted(true), vec![2, 1, 0]);
    }

    #[test]
    fn test_update_point_class() {
        let mut tri = OrderedTriangulator::new();
        tri.init_triangulation(unit_cube(), 8).unwrap();
        let handles = (0..8)
            .map(|i| tri.insert_point(i, corner(i), PointClass::Inside).unwrap())
            .collect::<Vec<_>>();
        tri.update_point_class(handles[7], PointClass::Outside).unwrap();
        assert_eq!(
            tri.update_point_class(PointId(8), PointClass::Outside),
            Err(TriangulatorError::UnknownPoint {
                handle: PointId(8)
            })
        );
        tri.triangulate(false).unwrap();

        let mut inside = Connectivity::new();
        assert_eq!(tri.extract(TetFilter::Inside, &mut inside), 5);
        assert!(inside.cells.iter().all(|cell| !cell.contains(&7)));
    }

    #[test]
    fn test_param_coordinates_drive_the_triangulation() {
        let mut tri = OrderedTriangulator::new();
        tri.init_triangulation(unit_cube(), 8).unwrap();
        for i in 0..8 {
            let position = corner(i) * 10.0 + crate::Vec3::new(5.0, 0.0, 0.0);
            tri.insert_point_param(i, position, corner(i), PointClass::Inside)
                .unwrap();
        }
        tri.triangulate(false).unwrap();

        let mut soup = crate::TetSoup::new();
        assert_eq!(tri.extract(TetFilter::Inside, &mut soup), 6);
        assert!(soup
            .positions
            .iter()
            .flatten()
            .all(|p| p.x == 5.0 || p.x == 15.0));
    }

    #[test]
    fn test_point_outside_the_envelope_is_skipped() {
        let mut tri = OrderedTriangulator::new();
        tri.init_triangulation(unit_cube(), 2).unwrap();
        tri.insert_point(0, Pt3::new(1000.0, 0.0, 0.0), PointClass::Inside)
            .unwrap();
        tri.insert_point(1, Pt3::new(0.5, 0.5, 0.5), PointClass::Inside)
            .unwrap();
        let report = tri.triangulate(false).unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.skipped, vec![0]);
        assert_eq!(tri.num_tetras(), 8);
        tri.mesh().assert_integrity();
    }
}
