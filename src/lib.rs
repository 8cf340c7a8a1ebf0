//! Incremental 3D Delaunay triangulation whose connectivity only depends on
//! the ids of the input points.
//!
//! Points are buffered with [`OrderedTriangulator::insert_point`], sorted by id and
//! inserted one at a time into a bounding envelope. Degenerate configurations
//! (more than 4 cospherical points) are resolved by a slightly shrunk in-sphere
//! test, so the same ids always produce the same tetrahedra.

mod config;
mod edge_table;
mod error;
mod extract;
mod id_map;
mod point;
pub mod tet;
mod triangulator;
mod util;

pub use crate::config::TriangulatorConfig;
pub use crate::error::TriangulatorError;
pub use crate::extract::{Connectivity, IndexedTetMesh, TetSoup, TetraSink};
pub use crate::point::{Point, PointClass};
pub use crate::tet::{TetClass, TetFilter, TetId};
pub use crate::triangulator::{OrderedTriangulator, Stage, TriangulationReport};
pub use crate::util::Bounds;

use nalgebra::{Point3, Vector3};

pub type Pt3 = Point3<f64>;
type Vec3 = Vector3<f64>;

#[macro_export]
#[doc(hidden)]
macro_rules! id {
    ($(#[$attr:meta])* $pub:vis struct $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        $pub struct $name(pub(crate) crate::id_map::IdType);

        impl crate::id_map::Id for $name {
            fn int(self) -> crate::id_map::IdType {
                self.0
            }

            fn from_int(int: crate::id_map::IdType) -> Self {
                Self(int)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl $name {
            /// Returns an invalid id.
            pub(crate) const fn invalid() -> Self {
                Self(crate::id_map::IdType::MAX)
            }

            /// Returns this id if it's valid or None otherwise.
            #[allow(dead_code)]
            pub(crate) fn valid(self) -> Option<Self> {
                if self == Self::invalid() {
                    None
                } else {
                    Some(self)
                }
            }

            /// The index of this id into a dense array.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

id! {
    /// A point handle: the buffer slot before triangulation,
    /// the rank in the insertion order after it.
    pub struct PointId
}
