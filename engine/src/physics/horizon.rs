// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

//! Edge bookkeeping used to patch the EPA polytope when a vertex is inserted.
//!
//! Every visible face hands its three undirected edges to an [`EdgeCounter`]. An edge seen by two
//! visible faces lies inside the region being replaced; an edge seen once lies on the horizon and
//! gets connected to the new vertex.

use std::collections::HashMap;

/// Undirected edge between two polytope vertices, stored with the smaller index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(usize, usize);

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b { Edge(a, b) } else { Edge(b, a) }
    }

    pub fn endpoints(self) -> (usize, usize) {
        (self.0, self.1)
    }
}

/// The three edges of a triangle, built from its sorted indices.
pub fn face_edges(indices: [usize; 3]) -> [Edge; 3] {
    let mut sorted = indices;
    sorted.sort_unstable();
    let [s0, s1, s2] = sorted;
    [Edge::new(s0, s1), Edge::new(s0, s2), Edge::new(s1, s2)]
}

#[derive(Debug, Default)]
pub struct EdgeCounter {
    counts: HashMap<Edge, u32>,
}

impl EdgeCounter {
    pub fn from_faces<I>(faces: I) -> Self
    where
        I: IntoIterator<Item = [usize; 3]>,
    {
        let mut counter = EdgeCounter::default();
        for indices in faces {
            for edge in face_edges(indices) {
                *counter.counts.entry(edge).or_insert(0) += 1;
            }
        }
        counter
    }

    pub fn count(&self, edge: Edge) -> u32 {
        self.counts.get(&edge).copied().unwrap_or(0)
    }

    pub fn is_interior(&self, edge: Edge) -> bool {
        self.count(edge) >= 2
    }

    pub fn classify(&self, indices: [usize; 3]) -> FaceEdges {
        let edges = face_edges(indices);
        FaceEdges {
            edges,
            interior: edges.map(|edge| self.is_interior(edge)),
        }
    }
}

/// Edges of one visible face, split into interior and horizon edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceEdges {
    edges: [Edge; 3],
    interior: [bool; 3],
}

impl FaceEdges {
    pub fn interior_count(&self) -> usize {
        self.interior.iter().filter(|&&interior| interior).count()
    }

    pub fn horizon(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges
            .iter()
            .zip(self.interior)
            .filter(|(_, interior)| !interior)
            .map(|(edge, _)| *edge)
    }
}
