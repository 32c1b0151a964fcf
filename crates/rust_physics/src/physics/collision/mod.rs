//! Narrow-phase collision tests
//!
//! [`collide`] places both colliders in the world and dispatches on the pair
//! of shape kinds. Round shapes use closed-form tests, convex hulls go through
//! GJK and EPA. Pairs without a test come back as
//! [`PhysicsError::MissingCollisionTest`].

pub mod epa;
pub mod gjk;
pub mod primitives;
pub mod shape;

use crate::error::PhysicsError;
use crate::foundation::math::{Transform, Vec3};
use super::collider::Collider;
use shape::{WorldHull, WorldShape};

pub use shape::SupportMap;

/// Contact between two shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first shape towards the second
    pub normal: Vec3,
    /// Overlap depth along `normal` (never negative)
    pub penetration: f32,
}

impl Contact {
    /// The same contact seen from the other shape
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            penetration: self.penetration,
        }
    }
}

/// Test two colliders placed with their bodies' transforms
///
/// Returns `Ok(None)` when the shapes are apart (touching counts as apart for
/// convex hulls).
pub fn collide(
    a: &Collider,
    transform_a: &Transform,
    b: &Collider,
    transform_b: &Transform,
) -> Result<Option<Contact>, PhysicsError> {
    use WorldShape::*;

    match (a.to_world_space(transform_a), b.to_world_space(transform_b)) {
        (Sphere(sa), Sphere(sb)) => Ok(primitives::sphere_sphere(&sa, &sb)),
        (Sphere(sphere), Capsule(capsule)) => Ok(primitives::sphere_capsule(&sphere, &capsule)),
        (Capsule(capsule), Sphere(sphere)) => {
            Ok(primitives::sphere_capsule(&sphere, &capsule).map(Contact::flipped))
        }
        (Capsule(ca), Capsule(cb)) => Ok(primitives::capsule_capsule(&ca, &cb)),
        (Hull(ha), Hull(hb)) => Ok(hull_hull(&ha, &hb)),
        (Sphere(_) | Capsule(_), Hull(_))
        | (Hull(_), Sphere(_) | Capsule(_))
        | (Cylinder { .. } | Obb { .. }, _)
        | (_, Cylinder { .. } | Obb { .. }) => Err(PhysicsError::MissingCollisionTest {
            a: a.kind(),
            b: b.kind(),
        }),
    }
}

fn hull_hull(a: &WorldHull<'_>, b: &WorldHull<'_>) -> Option<Contact> {
    let simplex = gjk::gjk(a, b)?;
    let penetration = epa::epa(a, b, &simplex)?;
    Some(Contact {
        normal: penetration.normal,
        penetration: penetration.depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::physics::collider::ShapeKind;

    fn at(x: f32, y: f32, z: f32) -> Transform {
        Transform::from_position(Vec3::new(x, y, z))
    }

    #[test]
    fn test_sphere_pair() {
        let sphere = Collider::sphere(1.0).unwrap();
        let contact = collide(&sphere, &at(0.0, 0.0, 0.0), &sphere, &at(1.5, 0.0, 0.0))
            .unwrap()
            .unwrap();
        assert_relative_eq!(contact.normal, Vec3::x());
        assert_relative_eq!(contact.penetration, 0.5);
    }

    #[test]
    fn test_capsule_sphere_normal_points_to_second_shape() {
        let capsule = Collider::capsule(0.5, 2.0).unwrap();
        let sphere = Collider::sphere(0.5).unwrap();
        let contact = collide(&capsule, &at(0.0, 0.0, 0.0), &sphere, &at(0.8, 0.0, 0.0))
            .unwrap()
            .unwrap();
        assert_relative_eq!(contact.normal, Vec3::x());
        assert_relative_eq!(contact.penetration, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_hull_pair() {
        let cube = Collider::cuboid_hull(Vec3::new(1.0, 1.0, 1.0)).unwrap();
        let contact = collide(&cube, &at(0.0, 0.0, 0.0), &cube, &at(1.5, 0.2, 0.0))
            .unwrap()
            .unwrap();
        assert_relative_eq!(contact.normal, Vec3::x(), epsilon = 1e-2);
        assert_relative_eq!(contact.penetration, 0.5, epsilon = 1e-2);
    }

    #[test]
    fn test_separated_hulls() {
        let cube = Collider::cuboid_hull(Vec3::new(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(collide(&cube, &at(0.0, 0.0, 0.0), &cube, &at(5.0, 0.0, 0.0)), Ok(None));
    }

    #[test]
    fn test_missing_pairs_are_errors() {
        let obb = Collider::obb(Vec3::new(1.0, 1.0, 1.0)).unwrap();
        let sphere = Collider::sphere(1.0).unwrap();
        let hull = Collider::cuboid_hull(Vec3::new(1.0, 1.0, 1.0)).unwrap();
        let origin = at(0.0, 0.0, 0.0);

        assert_eq!(
            collide(&obb, &origin, &sphere, &origin),
            Err(PhysicsError::MissingCollisionTest { a: ShapeKind::Obb, b: ShapeKind::Sphere })
        );
        assert_eq!(
            collide(&sphere, &origin, &hull, &origin),
            Err(PhysicsError::MissingCollisionTest { a: ShapeKind::Sphere, b: ShapeKind::ConvexHull })
        );
        let cylinder = Collider::cylinder(1.0, 2.0).unwrap();
        assert!(collide(&cylinder, &origin, &cylinder, &origin).is_err());
    }
}
