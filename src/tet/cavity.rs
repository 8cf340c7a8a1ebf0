use super::*;

/// What one insertion did to the mesh.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CavityStats {
    /// Number of tets whose circumsphere contained the point.
    pub removed: usize,
    /// Number of tets created around the point, one per cavity boundary face.
    pub created: usize,
}

impl CavityStats {
    /// Change in the number of tets.
    pub fn delta(&self) -> isize {
        self.created as isize - self.removed as isize
    }
}

impl TetMesh {
    /// Gets the first tet in traversal order whose circumsphere contains a point.
    pub fn locate(&self, point: PointId) -> Option<TetId> {
        self.tets
            .iter()
            .find(|(_, tet)| self.in_sphere(tet, point))
            .map(|(id, _)| id)
    }

    /// Inserts a point into the mesh, replacing the tets whose circumsphere contains it
    /// with tets that connect it to the boundary of their union.
    ///
    /// Returns None if no tet contains the point; the mesh is left untouched.
    pub(crate) fn insert_point(&mut self, point: PointId) -> Option<CavityStats> {
        let seed = self.locate(point)?;
        self.build_cavity(point, seed);
        let removed = self.cavity.len();
        let created = self.fill_cavity(point);
        Some(CavityStats { removed, created })
    }

    /// Floods out from `seed` through the tets whose circumsphere contains `point`,
    /// records the faces bounding them and removes them.
    fn build_cavity(&mut self, point: PointId, seed: TetId) {
        let mut faces = std::mem::take(&mut self.faces);
        let mut queue = std::mem::take(&mut self.queue);
        let mut cavity = std::mem::take(&mut self.cavity);
        faces.clear();
        queue.clear();
        cavity.clear();

        self.tets[seed].visit(point, TetFlags::IN_CAVITY);
        queue.push_back(seed);
        cavity.push(seed);

        while let Some(id) = queue.pop_front() {
            let tet = &self.tets[id];

            for face in 0..4 {
                let points = tet.face_points(face);
                let adj = match tet.neighbor(face) {
                    Some(adj) => adj,
                    None => {
                        faces.push(Face::new(points, TetId::invalid()));
                        continue;
                    }
                };

                let adj_tet = &self.tets[adj];
                if !adj_tet.visited_by(point) {
                    if self.in_sphere(adj_tet, point) {
                        adj_tet.visit(point, TetFlags::IN_CAVITY);
                        queue.push_back(adj);
                        cavity.push(adj);
                    } else {
                        adj_tet.visit(point, TetFlags::OUTSIDE_CAVITY);
                        faces.push(Face::new(points, adj));
                    }
                } else if adj_tet.has_flags(TetFlags::OUTSIDE_CAVITY) {
                    // Bordering the cavity through another face
                    faces.push(Face::new(points, adj));
                }
            }
        }

        for &id in &cavity {
            self.tets.remove(id);
        }

        self.faces = faces;
        self.queue = queue;
        self.cavity = cavity;
    }

    /// Connects `point` to every recorded cavity face and wires up the new tets.
    /// Returns the number of tets created.
    fn fill_cavity(&mut self, point: PointId) -> usize {
        let faces = std::mem::take(&mut self.faces);
        self.edges.clear();

        for face in &faces {
            let [p0, p1, p2] = face.points;
            let tet = self.new_tet([point, p0, p1, p2]);
            let id = self.tets.insert(tet);

            if let Some(adj) = face.neighbor.valid() {
                self.assign_neighbors(id, adj);
            }

            // Each edge of the cavity boundary is shared by exactly 2 faces.
            for [a, b] in [[p0, p1], [p1, p2], [p2, p0]] {
                match self.edges.lookup(a, b) {
                    Some(other) => self.assign_neighbors(id, other),
                    None => self.edges.insert(a, b, id),
                }
            }
        }

        let created = faces.len();
        self.faces = faces;
        created
    }
}
