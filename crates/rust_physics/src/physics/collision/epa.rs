//! Expanding polytope algorithm
//!
//! Starts from the tetrahedron GJK ends with and pushes the face closest to
//! the origin outwards until the Minkowski difference boundary is reached.
//! The final face gives the penetration normal and depth.

use crate::foundation::math::{same_direction, Vec3};
use super::gjk::{minkowski_support, Simplex};
use super::shape::SupportMap;

/// Convergence tolerance on the support distance
pub const EPA_TOLERANCE: f32 = 0.001;

/// Iteration cap for polytope expansion
pub const MAX_EPA_ITERATIONS: usize = 64;

/// Minimum translation separating two shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Unit normal on the Minkowski difference boundary (from A towards B)
    pub normal: Vec3,
    /// Overlap depth along `normal`
    pub depth: f32,
}

#[derive(Debug, Clone, Copy)]
struct Face {
    indices: [usize; 3],
    normal: Vec3,
    distance: f32,
}

impl Face {
    /// Face over `vertices[i], vertices[j], vertices[k]`, counter-clockwise
    /// seen from outside
    fn new(vertices: &[Vec3], i: usize, j: usize, k: usize) -> Self {
        let a = vertices[i];
        let normal = (vertices[j] - a).cross(&(vertices[k] - a));
        let length_sq = normal.norm_squared();
        if length_sq <= f32::EPSILON * f32::EPSILON {
            // sliver: never closest, never visible
            return Self {
                indices: [i, j, k],
                normal: Vec3::zeros(),
                distance: f32::MAX,
            };
        }
        let normal = normal / length_sq.sqrt();
        Self {
            indices: [i, j, k],
            normal,
            distance: normal.dot(&a),
        }
    }

    fn is_degenerate(&self) -> bool {
        self.distance == f32::MAX
    }

    fn penetration(&self) -> Penetration {
        Penetration {
            normal: self.normal,
            depth: self.distance.max(0.0),
        }
    }
}

/// Add `(i, j)` to the horizon, or cancel it against its reverse
fn add_edge(edges: &mut Vec<(usize, usize)>, i: usize, j: usize) {
    if let Some(position) = edges.iter().position(|&edge| edge == (j, i)) {
        edges.swap_remove(position);
    } else {
        edges.push((i, j));
    }
}

fn closest_face(faces: &[Face]) -> Option<Face> {
    faces
        .iter()
        .filter(|face| !face.is_degenerate())
        .min_by(|x, y| x.distance.total_cmp(&y.distance))
        .copied()
}

/// Penetration normal and depth for overlapping shapes
///
/// `simplex` must be the tetrahedron returned by [`super::gjk::gjk`]. Returns
/// `None` when the polytope has no usable face.
pub fn epa<A, B>(a: &A, b: &B, simplex: &Simplex) -> Option<Penetration>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    if simplex.len() != 4 {
        return None;
    }

    let mut vertices: Vec<Vec3> = simplex.points().to_vec();
    let mut faces: Vec<Face> = Vec::with_capacity(16);

    // orient every face away from the vertex it does not use
    for (i, j, k, opposite) in [(0, 1, 2, 3), (0, 3, 1, 2), (0, 2, 3, 1), (1, 3, 2, 0)] {
        let face = Face::new(&vertices, i, j, k);
        if same_direction(&face.normal, &(vertices[opposite] - vertices[i])) {
            faces.push(Face::new(&vertices, i, k, j));
        } else {
            faces.push(face);
        }
    }

    let mut best = closest_face(&faces)?;
    for _ in 0..MAX_EPA_ITERATIONS {
        let support = minkowski_support(a, b, &best.normal);
        if best.normal.dot(&support) - best.distance <= EPA_TOLERANCE {
            return Some(best.penetration());
        }

        let new_index = vertices.len();
        vertices.push(support);

        let mut horizon = Vec::new();
        faces.retain(|face| {
            let visible = same_direction(&face.normal, &(support - vertices[face.indices[0]]));
            if visible {
                let [i, j, k] = face.indices;
                add_edge(&mut horizon, i, j);
                add_edge(&mut horizon, j, k);
                add_edge(&mut horizon, k, i);
            }
            !visible
        });

        if horizon.is_empty() {
            return Some(best.penetration());
        }

        for (i, j) in horizon {
            faces.push(Face::new(&vertices, i, j, new_index));
        }

        best = closest_face(&faces)?;
    }

    log::trace!("EPA hit the iteration cap; using closest face so far");
    Some(best.penetration())
}
