//! World-space views of colliders
//!
//! Colliders live in body space. Before a narrow-phase test each one is
//! placed in the world with its body's transform; the result only lives for
//! the duration of the test.

use crate::foundation::math::{Quat, Transform, Vec3};
use crate::physics::collider::{Collider, ColliderShape, ConvexHull};

/// Anything with a support function (furthest point along a direction)
pub trait SupportMap {
    /// Point of the shape furthest along `direction`
    fn support(&self, direction: &Vec3) -> Vec3;

    /// A point inside the shape, used to seed the search direction
    fn center(&self) -> Vec3;
}

/// Sphere placed in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSphere {
    /// Centre
    pub center: Vec3,
    /// Radius
    pub radius: f32,
}

/// Capsule placed in the world: a core segment swept by a radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldCapsule {
    /// One end of the core segment
    pub start: Vec3,
    /// Other end of the core segment
    pub end: Vec3,
    /// Radius
    pub radius: f32,
}

/// Convex hull placed in the world
///
/// Vertices stay in body space; the support function rotates the query
/// direction into body space instead of transforming every vertex.
#[derive(Debug, Clone, Copy)]
pub struct WorldHull<'a> {
    hull: &'a ConvexHull,
    offset: Vec3,
    transform: Transform,
}

impl<'a> WorldHull<'a> {
    /// Place `hull`, shifted by `offset` in body space, with `transform`
    pub fn new(hull: &'a ConvexHull, offset: Vec3, transform: Transform) -> Self {
        Self { hull, offset, transform }
    }
}

impl SupportMap for WorldHull<'_> {
    fn support(&self, direction: &Vec3) -> Vec3 {
        let local_direction = self.transform.orientation.inverse_transform_vector(direction);
        let mut best = self.hull.vertices()[0];
        let mut best_dot = best.dot(&local_direction);
        for vertex in &self.hull.vertices()[1..] {
            let dot = vertex.dot(&local_direction);
            if dot > best_dot {
                best_dot = dot;
                best = *vertex;
            }
        }
        self.transform.transform_point(&(self.offset + best))
    }

    fn center(&self) -> Vec3 {
        let vertices = self.hull.vertices();
        let sum: Vec3 = vertices.iter().sum();
        // hull construction guarantees at least one vertex
        self.transform.transform_point(&(self.offset + sum / vertices.len() as f32))
    }
}

/// Collider shape placed in the world
#[derive(Debug, Clone, Copy)]
pub enum WorldShape<'a> {
    /// Sphere
    Sphere(WorldSphere),
    /// Capsule
    Capsule(WorldCapsule),
    /// Cylinder: centre, axis, radius and half height
    Cylinder {
        /// Centre
        center: Vec3,
        /// Unit axis
        axis: Vec3,
        /// Radius
        radius: f32,
        /// Half of the full height
        half_height: f32,
    },
    /// Oriented box
    Obb {
        /// Centre
        center: Vec3,
        /// Orientation of the box axes
        orientation: Quat,
        /// Half size along each box axis
        half_extents: Vec3,
    },
    /// Convex hull
    Hull(WorldHull<'a>),
}

impl Collider {
    /// Place this collider in the world using its body's transform
    ///
    /// Capsule and cylinder axes follow the body's local Z axis.
    pub fn to_world_space(&self, transform: &Transform) -> WorldShape<'_> {
        let center = transform.transform_point(&self.offset());
        let axis = transform.transform_vector(&Vec3::z());

        match self.shape() {
            ColliderShape::Sphere { radius } => WorldShape::Sphere(WorldSphere {
                center,
                radius: *radius,
            }),
            ColliderShape::Capsule { radius, length } => {
                let half = axis * (length * 0.5);
                WorldShape::Capsule(WorldCapsule {
                    start: center - half,
                    end: center + half,
                    radius: *radius,
                })
            }
            ColliderShape::Cylinder { radius, height } => WorldShape::Cylinder {
                center,
                axis,
                radius: *radius,
                half_height: height * 0.5,
            },
            ColliderShape::Obb { half_extents } => WorldShape::Obb {
                center,
                orientation: transform.orientation,
                half_extents: *half_extents,
            },
            ColliderShape::ConvexHull(hull) => {
                WorldShape::Hull(WorldHull::new(hull, self.offset(), *transform))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::foundation::math::Vector3;

    #[test]
    fn test_capsule_segment_follows_orientation() {
        let collider = Collider::capsule(0.5, 2.0).unwrap();
        // quarter turn about X maps local Z onto world -Y
        let transform = Transform::from_position_orientation(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_axis_angle(&Vector3::x_axis(), std::f32::consts::FRAC_PI_2),
        );
        let WorldShape::Capsule(capsule) = collider.to_world_space(&transform) else {
            panic!("expected a capsule");
        };
        assert_relative_eq!(capsule.start, Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(capsule.end, Vec3::new(1.0, -1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_offset_is_rotated_with_body() {
        let collider = Collider::new(
            ColliderShape::Sphere { radius: 1.0 },
            Vec3::new(1.0, 0.0, 0.0),
        ).unwrap();
        let transform = Transform::from_position_orientation(
            Vec3::zeros(),
            Quat::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_2),
        );
        let WorldShape::Sphere(sphere) = collider.to_world_space(&transform) else {
            panic!("expected a sphere");
        };
        assert_relative_eq!(sphere.center, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_hull_support_picks_furthest_vertex() {
        let collider = Collider::cuboid_hull(Vec3::new(1.0, 2.0, 3.0)).unwrap();
        let transform = Transform::from_position(Vec3::new(10.0, 0.0, 0.0));
        let WorldShape::Hull(hull) = collider.to_world_space(&transform) else {
            panic!("expected a hull");
        };
        let support = hull.support(&Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(support, Vec3::new(11.0, 2.0, 3.0));
        assert_relative_eq!(hull.center(), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_hull_support_rotated() {
        let collider = Collider::cuboid_hull(Vec3::new(2.0, 0.5, 0.5)).unwrap();
        let transform = Transform::from_position_orientation(
            Vec3::zeros(),
            Quat::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_2),
        );
        let WorldShape::Hull(hull) = collider.to_world_space(&transform) else {
            panic!("expected a hull");
        };
        // long axis now points along world Y
        let support = hull.support(&Vec3::y());
        assert_relative_eq!(support.y, 2.0, epsilon = 1e-5);
    }
}
