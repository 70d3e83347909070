// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use glam::Vec3;

use crate::config::QueryConfig;
use crate::error::CollisionError;
use crate::physics::simplex::Simplex;
use crate::physics::support::support_difference;
use crate::utils::scope_timer::ScopeTimer;

/// The first search direction. Fixed, not adapted to the input geometry.
const INITIAL_DIRECTION: Vec3 = Vec3::X;

/// Smallest spread a point must add before it counts as a new dimension of the simplex.
const SPREAD_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct GjkHit {
    /// Tetrahedron enclosing the origin, ready to seed EPA. Oldest point first.
    pub simplex: [Vec3; 4],
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GjkResult {
    Separated,
    Intersection(GjkHit),
}

/// Performs GJK intersection testing between the convex hulls of two point sets.
/// Returns a tetrahedron suitable as EPA seed when the hulls overlap.
pub fn gjk_intersect(a: &[Vec3], b: &[Vec3]) -> Result<GjkResult, CollisionError> {
    gjk_intersect_with_config(a, b, &QueryConfig::default())
}

pub fn gjk_intersect_with_config(
    a: &[Vec3],
    b: &[Vec3],
    config: &QueryConfig,
) -> Result<GjkResult, CollisionError> {
    config.validate()?;
    if a.is_empty() || b.is_empty() {
        return Err(CollisionError::invalid("GJK needs two non-empty point sets"));
    }

    let mut timer = ScopeTimer::new("gjk");

    let start = support_difference(a, b, INITIAL_DIRECTION)?;
    let mut simplex = Simplex::new(start);
    let mut dir = -start;

    for iteration in 1..=config.gjk_max_iterations {
        if dir == Vec3::ZERO {
            return enclosing_hit(a, b, simplex, iteration - 1);
        }
        timer.record_iteration();

        let support = support_difference(a, b, dir)?;
        if support.dot(dir) < 0.0 {
            log::debug!("GJK: separated after {} iterations", iteration);
            return Ok(GjkResult::Separated);
        }

        simplex = simplex
            .push(support)
            .ok_or(CollisionError::degenerate("GJK simplex overflowed a tetrahedron"))?;
        dir = handle_simplex(&mut simplex);
        log::trace!("GJK iteration {}: {} points, dir {}", iteration, simplex.len(), dir);
    }

    if dir == Vec3::ZERO {
        return enclosing_hit(a, b, simplex, config.gjk_max_iterations);
    }

    log::warn!(
        "GJK: no decision after {} iterations",
        config.gjk_max_iterations
    );
    Err(CollisionError::degenerate("GJK iteration cap reached"))
}

fn enclosing_hit(
    a: &[Vec3],
    b: &[Vec3],
    simplex: Simplex,
    iterations: usize,
) -> Result<GjkResult, CollisionError> {
    if simplex.len() < 4 {
        // Usually the hulls only touch and the origin sits on the difference's boundary.
        log::debug!(
            "GJK: origin on a {}-point simplex after {} iterations",
            simplex.len(),
            iterations
        );
    } else {
        log::debug!("GJK: origin enclosed after {} iterations", iterations);
    }

    let points = complete_tetrahedron(a, b, simplex.as_slice()).inspect_err(|e| {
        log::warn!("GJK: {}", e);
    })?;
    Ok(GjkResult::Intersection(GjkHit {
        simplex: points,
        iterations,
    }))
}

/// Grows a simplex that contains the origin into a tetrahedron with volume.
///
/// Points that add no new dimension are skipped. Missing dimensions are filled with support
/// points taken along directions orthogonal to what is already spanned, keeping the one that
/// spreads the simplex the most.
fn complete_tetrahedron(
    a: &[Vec3],
    b: &[Vec3],
    points: &[Vec3],
) -> Result<[Vec3; 4], CollisionError> {
    let mut basis: Vec<Vec3> = Vec::with_capacity(4);
    for &p in points {
        if basis.len() < 4 && spread(&basis, p) > SPREAD_EPSILON {
            basis.push(p);
        }
    }

    while basis.len() < 4 {
        let mut best = None;
        let mut best_spread = SPREAD_EPSILON;
        for dir in spanning_directions(&basis) {
            let candidate = support_difference(a, b, dir)?;
            let candidate_spread = spread(&basis, candidate);
            if candidate_spread > best_spread {
                best_spread = candidate_spread;
                best = Some(candidate);
            }
        }

        let point = best.ok_or(CollisionError::degenerate(
            "Minkowski difference is flat; no tetrahedron can enclose the origin",
        ))?;
        basis.push(point);
    }

    Ok([basis[0], basis[1], basis[2], basis[3]])
}

/// How far `p` lies outside the affine span of `basis`: squared distance, squared doubled area,
/// or absolute sextupled volume depending on the basis size.
fn spread(basis: &[Vec3], p: Vec3) -> f32 {
    match *basis {
        [] => f32::INFINITY,
        [o] => (p - o).length_squared(),
        [o, q] => (q - o).cross(p - o).length_squared(),
        [o, q, r] => (q - o).cross(r - o).dot(p - o).abs(),
        _ => 0.0,
    }
}

fn spanning_directions(basis: &[Vec3]) -> Vec<Vec3> {
    match *basis {
        [_] => vec![
            Vec3::X,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::Z,
            Vec3::NEG_Z,
        ],
        [o, q] => {
            let edge = q - o;
            let u = edge.any_orthogonal_vector().normalize();
            let v = edge.cross(u).normalize();
            vec![u, -u, v, -v]
        }
        [o, q, r] => {
            let normal = (q - o).cross(r - o);
            vec![normal, -normal]
        }
        _ => Vec::new(),
    }
}

/// Computes the next search direction, shrinking `simplex` to the feature nearest the origin.
/// A zero vector means the simplex contains the origin, either inside a tetrahedron or on a
/// segment when the hulls only touch.
pub fn handle_simplex(simplex: &mut Simplex) -> Vec3 {
    loop {
        match *simplex {
            Simplex::Point([a]) => return -a,
            Simplex::Segment([b, a]) => return handle_line(a, b),
            Simplex::Triangle(points) => return handle_triangle(simplex, points),
            Simplex::Tetrahedron(points) => match face_toward_origin(points) {
                // The triangle rule runs on the next pass.
                Some(opposite) => *simplex = simplex.without(opposite),
                None => return Vec3::ZERO,
            },
        }
    }
}

fn handle_line(a: Vec3, b: Vec3) -> Vec3 {
    perpendicular_toward_origin(b - a, -a)
}

/// Voronoi-region test around the newest vertex `a` of triangle (c, b, a).
fn handle_triangle(simplex: &mut Simplex, [c, b, a]: [Vec3; 3]) -> Vec3 {
    let ao = -a;
    let ab = b - a;
    let ac = c - a;

    let up = ab.cross(ac);
    // Not mirror images of each other.
    let right = up.cross(ac);
    let left = up.cross(-ab);

    if right.dot(ao) >= 0.0 {
        return if ac.dot(ao) > 0.0 {
            *simplex = Simplex::Segment([c, a]);
            perpendicular_toward_origin(ac, ao)
        } else {
            *simplex = Simplex::Point([a]);
            ao
        };
    }

    if left.dot(ao) >= 0.0 {
        return if ab.dot(ao) > 0.0 {
            *simplex = Simplex::Segment([b, a]);
            perpendicular_toward_origin(ab, ao)
        } else {
            *simplex = Simplex::Point([a]);
            ao
        };
    }

    if up.dot(ao) >= 0.0 { up } else { -up }
}

/// Finds the face incident to the newest vertex whose outward normal faces the origin most,
/// and returns the index of the vertex opposite to it.
fn face_toward_origin([d, c, b, a]: [Vec3; 4]) -> Option<usize> {
    let ao = -a;
    // (face vertices, opposite vertex, index of the opposite vertex in the simplex)
    let faces = [(b, c, d, 0), (b, d, c, 1), (c, d, b, 2)];

    let mut best = None;
    let mut best_dot = 0.0;
    for (p, q, opposite, index) in faces {
        let Some(normal) = outward_normal(a, p, q, opposite) else {
            continue;
        };
        let d = normal.dot(ao);
        if d > best_dot {
            best_dot = d;
            best = Some(index);
        }
    }

    best
}

fn outward_normal(a: Vec3, b: Vec3, c: Vec3, opposite: Vec3) -> Option<Vec3> {
    let mut normal = (b - a).cross(c - a);
    if normal.dot(opposite - a) > 0.0 {
        normal = -normal;
    }
    normal.try_normalize()
}

/// Component of `ao` perpendicular to `edge`, where `edge` and `ao` both start at the newest
/// vertex. When the origin lies on the edge itself the result is zero. On the edge's line but
/// past its ends there is no unique answer and any vector orthogonal to the edge is returned.
fn perpendicular_toward_origin(edge: Vec3, ao: Vec3) -> Vec3 {
    let dir = edge.cross(ao).cross(edge);
    if dir != Vec3::ZERO {
        return dir;
    }

    let along = edge.dot(ao);
    if (0.0..=edge.length_squared()).contains(&along) {
        Vec3::ZERO
    } else {
        edge.any_orthogonal_vector()
    }
}
