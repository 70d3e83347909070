// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use glam::Vec3;

/// Working simplex of GJK, stored oldest point first so the newest point is always last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Simplex {
    Point([Vec3; 1]),
    Segment([Vec3; 2]),
    Triangle([Vec3; 3]),
    Tetrahedron([Vec3; 4]),
}

impl Simplex {
    pub fn new(point: Vec3) -> Self {
        Simplex::Point([point])
    }

    /// Appends a point, or returns `None` when the simplex is already a tetrahedron.
    pub fn push(self, p: Vec3) -> Option<Self> {
        match self {
            Simplex::Point([a]) => Some(Simplex::Segment([a, p])),
            Simplex::Segment([a, b]) => Some(Simplex::Triangle([a, b, p])),
            Simplex::Triangle([a, b, c]) => Some(Simplex::Tetrahedron([a, b, c, p])),
            Simplex::Tetrahedron(_) => None,
        }
    }

    /// Drops the point at `index`, keeping the others in their original order.
    ///
    /// A single point cannot shrink further and is returned unchanged.
    pub fn without(self, index: usize) -> Self {
        let points = self.as_slice();
        if index >= points.len() {
            return self;
        }

        let mut kept = [Vec3::ZERO; 3];
        let mut n = 0;
        for (i, p) in points.iter().enumerate() {
            if i != index {
                kept[n] = *p;
                n += 1;
            }
        }

        match (self, n) {
            (Simplex::Segment(_), 1) => Simplex::Point([kept[0]]),
            (Simplex::Triangle(_), 2) => Simplex::Segment([kept[0], kept[1]]),
            (Simplex::Tetrahedron(_), 3) => Simplex::Triangle(kept),
            _ => self,
        }
    }

    pub fn as_slice(&self) -> &[Vec3] {
        match self {
            Simplex::Point(p) => p.as_slice(),
            Simplex::Segment(p) => p.as_slice(),
            Simplex::Triangle(p) => p.as_slice(),
            Simplex::Tetrahedron(p) => p.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Always false; every variant holds at least one point.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn newest(&self) -> Vec3 {
        match self {
            Simplex::Point([a]) => *a,
            Simplex::Segment([.., a]) => *a,
            Simplex::Triangle([.., a]) => *a,
            Simplex::Tetrahedron([.., a]) => *a,
        }
    }
}
