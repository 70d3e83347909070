// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use glam::Vec3;

use crate::error::CollisionError;
use crate::physics::support::support;

/// Points of a body that lie within the penetration depth of its deepest point along the
/// contact direction. A plain per-point distance filter, not a contact manifold.
///
/// `penetration` is the vector reported by EPA for the pair in which this body is `B`; the
/// filter looks along `-penetration`.
pub fn colliding_vertices(points: &[Vec3], penetration: Vec3) -> Result<Vec<Vec3>, CollisionError> {
    if points.is_empty() {
        return Err(CollisionError::invalid("contact filter needs a non-empty point set"));
    }
    let direction = (-penetration)
        .try_normalize()
        .ok_or(CollisionError::degenerate("penetration vector has no direction"))?;
    let depth = penetration.length();

    let deepest = support(points, direction)?;
    Ok(points
        .iter()
        .copied()
        .filter(|&v| (deepest - v).dot(direction) < depth)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(center: Vec3, half: f32) -> Vec<Vec3> {
        let mut points = Vec::with_capacity(8);
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for z in [-1.0, 1.0] {
                    points.push(center + Vec3::new(x, y, z) * half);
                }
            }
        }
        points
    }

    #[test]
    fn keeps_the_face_pushed_into_the_other_body() {
        let b = cube(Vec3::new(0.5, 0.0, 0.0), 0.5);
        let colliding = colliding_vertices(&b, Vec3::new(0.5, 0.0, 0.0)).unwrap();

        assert_eq!(colliding.len(), 4);
        assert!(colliding.iter().all(|v| v.x == 0.0));
    }

    #[test]
    fn shallow_contact_keeps_only_the_deepest_points() {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.05, 1.0, 0.0),
            Vec3::new(0.5, 0.0, 1.0),
        ];
        let colliding = colliding_vertices(&points, Vec3::new(0.1, 0.0, 0.0)).unwrap();

        assert_eq!(colliding, vec![points[0], points[1]]);
    }

    #[test]
    fn rejects_empty_points_and_zero_penetration() {
        assert!(matches!(
            colliding_vertices(&[], Vec3::X),
            Err(CollisionError::InvalidInput { .. })
        ));
        assert!(matches!(
            colliding_vertices(&[Vec3::ONE], Vec3::ZERO),
            Err(CollisionError::Degenerate { .. })
        ));
    }
}
