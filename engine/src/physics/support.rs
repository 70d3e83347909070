// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use glam::Vec3;

use crate::error::CollisionError;

/// Farthest point of `points` along `direction`.
///
/// Ties go to the first point in slice order, so the result is stable across calls.
pub fn support(points: &[Vec3], direction: Vec3) -> Result<Vec3, CollisionError> {
    let (first, rest) = points
        .split_first()
        .ok_or(CollisionError::invalid("support of an empty point set"))?;

    let mut best = *first;
    let mut best_dot = first.dot(direction);
    for point in rest {
        let d = point.dot(direction);
        if d > best_dot {
            best_dot = d;
            best = *point;
        }
    }

    Ok(best)
}

/// Support of the Minkowski difference A ⊖ B, without building it.
pub fn support_difference(a: &[Vec3], b: &[Vec3], direction: Vec3) -> Result<Vec3, CollisionError> {
    let p1 = support(a, direction)?;
    let p2 = support(b, -direction)?;
    Ok(p1 - p2)
}
