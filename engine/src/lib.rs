// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

//! Convex hull collision queries on plain point sets: GJK for the overlap test and EPA for the
//! minimum translation vector.

pub mod config;
pub mod error;
pub mod physics;
pub mod utils;

use glam::Vec3;

pub use config::QueryConfig;
pub use error::CollisionError;
pub use physics::contact::colliding_vertices;
pub use physics::epa::{EpaResult, epa, epa_with_config};
pub use physics::gjk::{GjkHit, GjkResult, gjk_intersect, gjk_intersect_with_config};
pub use physics::support::{support, support_difference};

/// Runs GJK and, when the hulls overlap, EPA. `None` means the hulls are separated.
pub fn collide(a: &[Vec3], b: &[Vec3]) -> Result<Option<EpaResult>, CollisionError> {
    collide_with_config(a, b, &QueryConfig::default())
}

pub fn collide_with_config(
    a: &[Vec3],
    b: &[Vec3],
    config: &QueryConfig,
) -> Result<Option<EpaResult>, CollisionError> {
    match gjk_intersect_with_config(a, b, config)? {
        GjkResult::Separated => Ok(None),
        GjkResult::Intersection(hit) => epa_with_config(a, b, &hit.simplex, config).map(Some),
    }
}
