use thiserror::Error;

use crate::PointId;

/// Errors returned by [`OrderedTriangulator`](crate::OrderedTriangulator).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TriangulatorError {
    /// More points were inserted than declared in `init_triangulation`.
    #[error("Cannot insert more than {capacity} points; call init_triangulation with a larger capacity")]
    CapacityExceeded {
        /// The number of points declared at initialization.
        capacity: usize,
    },
    /// The triangulator was used before `init_triangulation`.
    #[error("The triangulator has not been initialized")]
    NotInitialized,
    /// The points were already triangulated; the triangulator must be re-initialized.
    #[error("The points were already triangulated")]
    AlreadyTriangulated,
    /// The handle does not refer to a buffered point.
    #[error("Point {handle} does not exist")]
    UnknownPoint {
        /// The offending handle.
        handle: PointId,
    },
    /// More points were declared than point ids can address.
    #[error("Cannot triangulate {max_points} points; at most {limit} are supported")]
    TooManyPoints {
        /// The number of points asked for.
        max_points: usize,
        /// [`TetMesh::MAX_POINTS`](crate::tet::TetMesh::MAX_POINTS).
        limit: usize,
    },
    /// The point buffer could not be allocated.
    #[error("Could not allocate room for {max_points} points")]
    AllocationFailed {
        /// The number of points asked for.
        max_points: usize,
    },
    /// The bounds are not finite or have a minimum greater than the maximum.
    #[error("Invalid bounds {bounds:?}")]
    InvalidBounds {
        /// The bounds as passed in (xmin, xmax, ymin, ymax, zmin, zmax).
        bounds: [f64; 6],
    },
}
