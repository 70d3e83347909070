// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use approx::abs_diff_eq;
use glam::Vec3;

use crate::config::QueryConfig;
use crate::error::CollisionError;
use crate::physics::polytope::Polytope;
use crate::physics::support::support_difference;
use crate::utils::scope_timer::ScopeTimer;

#[derive(Debug, Clone, PartialEq)]
pub struct EpaResult {
    /// Outward normal of the Minkowski difference A ⊖ B at the closest face.
    pub normal: Vec3,
    pub penetration_depth: f32,
    pub iterations: usize,
}

impl EpaResult {
    /// Minimum translation vector. Moving A by the negated vector (or B by the vector itself)
    /// separates the two hulls.
    pub fn penetration_vector(&self) -> Vec3 {
        self.normal * self.penetration_depth
    }
}

/// Runs EPA on a tetrahedron produced by GJK that encloses the origin.
pub fn epa(a: &[Vec3], b: &[Vec3], simplex: &[Vec3; 4]) -> Result<EpaResult, CollisionError> {
    epa_with_config(a, b, simplex, &QueryConfig::default())
}

pub fn epa_with_config(
    a: &[Vec3],
    b: &[Vec3],
    simplex: &[Vec3; 4],
    config: &QueryConfig,
) -> Result<EpaResult, CollisionError> {
    config.validate()?;
    if a.is_empty() || b.is_empty() {
        return Err(CollisionError::invalid("EPA needs two non-empty point sets"));
    }

    let mut timer = ScopeTimer::new("epa");
    let mut polytope = Polytope::from_tetrahedron(*simplex).inspect_err(|e| {
        log::warn!("EPA: {}", e);
    })?;

    for iteration in 0..config.epa_max_iterations {
        timer.record_iteration();
        polytope.orient_faces()?;

        let closest = *polytope
            .closest_face()
            .ok_or(CollisionError::degenerate("polytope has no faces"))?;

        let support = support_difference(a, b, closest.normal)?;
        let support_distance = support.dot(closest.normal);

        if abs_diff_eq!(
            support_distance,
            closest.distance,
            epsilon = config.epa_tolerance
        ) {
            log::debug!(
                "EPA: converged after {} iterations, depth {}",
                iteration + 1,
                closest.distance
            );
            return Ok(EpaResult {
                normal: closest.normal,
                penetration_depth: closest.distance,
                iterations: iteration + 1,
            });
        }

        let visible = polytope.expand(support);
        log::trace!(
            "EPA iteration {}: {} faces visible, {} faces total",
            iteration,
            visible,
            polytope.faces().len()
        );
    }

    log::warn!(
        "EPA: no convergence after {} iterations ({} vertices)",
        config.epa_max_iterations,
        polytope.vertices().len()
    );
    Err(CollisionError::NonConvergence {
        iterations: config.epa_max_iterations,
    })
}
