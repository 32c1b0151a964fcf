//! GJK intersection test for convex shapes
//!
//! Works on the Minkowski difference `A - B`: the shapes overlap exactly
//! when the difference contains the origin. The simplex grows towards the
//! origin one support point at a time and is reduced to the feature closest
//! to it after every step.

use crate::foundation::math::{any_perpendicular, normalize_or, same_direction, Vec3, EPSILON_SQ};
use super::shape::SupportMap;

/// Iteration cap for the simplex search
pub const MAX_GJK_ITERATIONS: usize = 64;

/// Up to four points of the Minkowski difference, newest first
#[derive(Debug, Clone, Copy)]
pub struct Simplex {
    points: [Vec3; 4],
    len: usize,
}

impl Default for Simplex {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplex {
    /// Empty simplex
    pub fn new() -> Self {
        Self {
            points: [Vec3::zeros(); 4],
            len: 0,
        }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when the simplex holds no points
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Points, newest first
    pub fn points(&self) -> &[Vec3] {
        &self.points[..self.len]
    }

    fn push_front(&mut self, point: Vec3) {
        self.points = [point, self.points[0], self.points[1], self.points[2]];
        self.len = (self.len + 1).min(4);
    }

    fn set(&mut self, points: &[Vec3]) {
        self.points[..points.len()].copy_from_slice(points);
        self.len = points.len();
    }
}

/// Support point of the Minkowski difference `A - B` along `direction`
pub fn minkowski_support<A, B>(a: &A, b: &B, direction: &Vec3) -> Vec3
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    a.support(direction) - b.support(&-direction)
}

/// Run GJK; returns the enclosing tetrahedron when the shapes overlap
///
/// Shapes that merely touch, or configurations the search cannot resolve
/// within [`MAX_GJK_ITERATIONS`], report no intersection.
pub fn gjk<A, B>(a: &A, b: &B) -> Option<Simplex>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    let mut direction = normalize_or(a.center() - b.center(), Vec3::x());
    let mut simplex = Simplex::new();

    let first = minkowski_support(a, b, &direction);
    simplex.push_front(first);
    direction = -first;

    for _ in 0..MAX_GJK_ITERATIONS {
        if direction.norm_squared() <= f32::EPSILON * f32::EPSILON {
            // origin sits on the simplex: contact without depth
            return None;
        }

        let point = minkowski_support(a, b, &direction);
        if !same_direction(&point, &direction) {
            return None;
        }

        simplex.push_front(point);
        if next_simplex(&mut simplex, &mut direction) {
            return Some(simplex);
        }
    }

    log::trace!("GJK hit the iteration cap without a verdict");
    None
}

/// `true` when the two shapes overlap
pub fn intersects<A, B>(a: &A, b: &B) -> bool
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    gjk(a, b).is_some()
}

fn next_simplex(simplex: &mut Simplex, direction: &mut Vec3) -> bool {
    match simplex.len() {
        2 => line(simplex, direction),
        3 => triangle(simplex, direction),
        4 => tetrahedron(simplex, direction),
        _ => false,
    }
}

/// Direction perpendicular to `ab`, in the plane of `ab` and `ao`, facing `ao`
fn towards_origin_from_edge(ab: &Vec3, ao: &Vec3) -> Vec3 {
    let normal = ab.cross(ao);
    if normal.norm_squared() < EPSILON_SQ {
        // origin is (nearly) on the line through the edge
        any_perpendicular(ab)
    } else {
        normal.cross(ab)
    }
}

fn line(simplex: &mut Simplex, direction: &mut Vec3) -> bool {
    let a = simplex.points[0];
    let b = simplex.points[1];
    let ab = b - a;
    let ao = -a;

    if same_direction(&ab, &ao) {
        *direction = towards_origin_from_edge(&ab, &ao);
    } else {
        simplex.set(&[a]);
        *direction = ao;
    }
    false
}

fn triangle(simplex: &mut Simplex, direction: &mut Vec3) -> bool {
    let a = simplex.points[0];
    let b = simplex.points[1];
    let c = simplex.points[2];

    let ab = b - a;
    let ac = c - a;
    let ao = -a;
    let abc = ab.cross(&ac);

    if abc.norm_squared() < EPSILON_SQ * EPSILON_SQ {
        // collinear: keep the newest edge
        simplex.set(&[a, b]);
        return line(simplex, direction);
    }

    if same_direction(&abc.cross(&ac), &ao) {
        if same_direction(&ac, &ao) {
            simplex.set(&[a, c]);
            *direction = towards_origin_from_edge(&ac, &ao);
        } else {
            simplex.set(&[a, b]);
            return line(simplex, direction);
        }
    } else if same_direction(&ab.cross(&abc), &ao) {
        simplex.set(&[a, b]);
        return line(simplex, direction);
    } else if same_direction(&abc, &ao) {
        *direction = abc;
    } else {
        simplex.set(&[a, c, b]);
        *direction = -abc;
    }
    false
}

fn tetrahedron(simplex: &mut Simplex, direction: &mut Vec3) -> bool {
    let a = simplex.points[0];
    let b = simplex.points[1];
    let c = simplex.points[2];
    let d = simplex.points[3];

    let ab = b - a;
    let ac = c - a;
    let ad = d - a;
    let ao = -a;

    let abc = ab.cross(&ac);
    let acd = ac.cross(&ad);
    let adb = ad.cross(&ab);

    if same_direction(&abc, &ao) {
        simplex.set(&[a, b, c]);
        return triangle(simplex, direction);
    }
    if same_direction(&acd, &ao) {
        simplex.set(&[a, c, d]);
        return triangle(simplex, direction);
    }
    if same_direction(&adb, &ao) {
        simplex.set(&[a, d, b]);
        return triangle(simplex, direction);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Transform, Vector3};
    use crate::physics::collider::ConvexHull;
    use crate::physics::collision::shape::WorldHull;

    fn cube(half: f32) -> ConvexHull {
        ConvexHull::cuboid(Vec3::new(half, half, half)).unwrap()
    }

    fn placed(hull: &ConvexHull, x: f32, y: f32, z: f32) -> WorldHull<'_> {
        WorldHull::new(hull, Vec3::zeros(), Transform::from_position(Vec3::new(x, y, z)))
    }

    #[test]
    fn test_overlapping_cubes() {
        let hull = cube(1.0);
        let simplex = gjk(&placed(&hull, 0.0, 0.0, 0.0), &placed(&hull, 1.5, 0.2, 0.0));
        assert_eq!(simplex.map(|s| s.len()), Some(4));
    }

    #[test]
    fn test_separated_cubes() {
        let hull = cube(1.0);
        assert!(!intersects(&placed(&hull, 0.0, 0.0, 0.0), &placed(&hull, 2.5, 0.0, 0.0)));
        assert!(!intersects(&placed(&hull, 0.0, 0.0, 0.0), &placed(&hull, 3.0, 3.0, -3.0)));
    }

    #[test]
    fn test_nested_cubes() {
        let big = cube(2.0);
        let small = cube(0.25);
        assert!(intersects(&placed(&big, 0.0, 0.0, 0.0), &placed(&small, 0.3, -0.2, 0.1)));
    }

    #[test]
    fn test_concentric_cubes() {
        let hull = cube(1.0);
        assert!(intersects(&placed(&hull, 0.0, 0.0, 0.0), &placed(&hull, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_rotated_cube_corner() {
        let hull = cube(1.0);
        let a = placed(&hull, 0.0, 0.0, 0.0);
        // turned 45 degrees, B's edge reaches sqrt(2) towards A
        let rotation = Quat::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_4);
        let near = WorldHull::new(
            &hull,
            Vec3::zeros(),
            Transform::from_position_orientation(Vec3::new(2.3, 0.0, 0.0), rotation),
        );
        let far = WorldHull::new(
            &hull,
            Vec3::zeros(),
            Transform::from_position_orientation(Vec3::new(2.5, 0.0, 0.0), rotation),
        );
        assert!(intersects(&a, &near));
        assert!(!intersects(&a, &far));
    }

    #[test]
    fn test_simplex_push_front_keeps_newest_first() {
        let mut simplex = Simplex::new();
        assert!(simplex.is_empty());
        simplex.push_front(Vec3::x());
        simplex.push_front(Vec3::y());
        assert_eq!(simplex.points(), &[Vec3::y(), Vec3::x()]);
    }
}
