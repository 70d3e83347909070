// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use glam::Vec3;

use crate::error::CollisionError;
use crate::physics::horizon::EdgeCounter;

const EPSILON: f32 = 1e-6;
const FACE_VISIBILITY_EPSILON: f32 = 1e-6;

/// Faces of the starting tetrahedron, each one leaving out a single vertex.
const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[3, 2, 1], [3, 1, 0], [3, 0, 2], [0, 1, 2]];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub indices: [usize; 3],
    /// Outward unit normal, valid after [`Polytope::orient_faces`].
    pub normal: Vec3,
    /// Distance from the origin to the face plane, valid after [`Polytope::orient_faces`].
    pub distance: f32,
}

impl Face {
    fn new(indices: [usize; 3]) -> Self {
        Self {
            indices,
            normal: Vec3::ZERO,
            distance: 0.0,
        }
    }
}

/// Convex mesh grown by EPA. Vertices are append-only and addressed by index; faces are index
/// triples whose winding gives the outward normal.
#[derive(Debug, Clone)]
pub struct Polytope {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    /// Centroid of the starting tetrahedron. Stays strictly inside as the polytope grows.
    interior: Vec3,
}

impl Polytope {
    pub fn from_tetrahedron(points: [Vec3; 4]) -> Result<Self, CollisionError> {
        let [p0, p1, p2, p3] = points;
        let volume = (p1 - p0).dot((p2 - p0).cross(p3 - p0));
        if !volume.is_finite() || volume.abs() <= EPSILON {
            return Err(CollisionError::degenerate("starting tetrahedron has no volume"));
        }

        let mut vertices = Vec::with_capacity(64);
        vertices.extend_from_slice(&points);
        let mut faces = Vec::with_capacity(128);
        faces.extend(TETRAHEDRON_FACES.map(Face::new));

        let interior = (p0 + p1 + p2 + p3) * 0.25;
        Ok(Self {
            vertices,
            faces,
            interior,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Recomputes every face normal and distance, flipping the winding of faces whose normal
    /// points back into the polytope. Faces are judged against the interior point rather than the
    /// origin, which may lie on a face when the hulls only touch.
    pub fn orient_faces(&mut self) -> Result<(), CollisionError> {
        for face in &mut self.faces {
            let [i0, i1, i2] = face.indices;
            let a = self.vertices[i0];
            let normal = (self.vertices[i1] - a)
                .cross(self.vertices[i2] - a)
                .try_normalize()
                .ok_or(CollisionError::degenerate("polytope face has no area"))?;

            if normal.dot(a - self.interior) < 0.0 {
                face.indices.swap(1, 2);
                face.normal = -normal;
            } else {
                face.normal = normal;
            }
            face.distance = face.normal.dot(a);
        }
        Ok(())
    }

    /// Face nearest to the origin. Ties go to the lowest face index.
    pub fn closest_face(&self) -> Option<&Face> {
        let mut best: Option<&Face> = None;
        for face in &self.faces {
            if best.is_none_or(|b| face.distance < b.distance) {
                best = Some(face);
            }
        }
        best
    }

    /// Inserts `vertex` and rebuilds the faces it can see.
    ///
    /// Each visible face is rebuilt from its horizon edges:
    /// - no interior edges: split into three faces around the new vertex,
    /// - one interior edge: two faces, the first reusing the face slot,
    /// - two interior edges: one face in the same slot,
    /// - three interior edges: removed.
    ///
    /// Removed slots are compacted only after every replacement is written, so the indices held
    /// by the visible list stay valid throughout. Returns the number of faces that were visible.
    pub fn expand(&mut self, vertex: Vec3) -> usize {
        let new_index = self.vertices.len();
        self.vertices.push(vertex);

        let visible: Vec<usize> = self
            .faces
            .iter()
            .enumerate()
            .filter(|(_, face)| face.normal.dot(vertex) - face.distance > FACE_VISIBILITY_EPSILON)
            .map(|(i, _)| i)
            .collect();

        let edge_counts = EdgeCounter::from_faces(visible.iter().map(|&i| self.faces[i].indices));

        let mut removed = vec![false; self.faces.len()];
        for &slot in &visible {
            let classified = edge_counts.classify(self.faces[slot].indices);
            log::trace!(
                "EPA: face {} has {} interior edges",
                slot,
                classified.interior_count()
            );

            let mut replacements = classified.horizon().map(|edge| {
                let (x, y) = edge.endpoints();
                Face::new([x, new_index, y])
            });

            match replacements.next() {
                Some(face) => self.faces[slot] = face,
                None => removed[slot] = true,
            }
            self.faces.extend(replacements);
        }

        removed.resize(self.faces.len(), false);
        let mut slot = 0;
        self.faces.retain(|_| {
            let keep = !removed[slot];
            slot += 1;
            keep
        });

        visible.len()
    }
}
