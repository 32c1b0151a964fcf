//! Collider shapes stored in body-local space
//!
//! A collider is a shape plus an offset from the body origin. Geometry stays
//! in local coordinates and is moved to world space only when a narrow-phase
//! test needs it (see [`super::collision::shape`]).

use crate::error::PhysicsError;
use crate::foundation::math::{Aabb, Mat3, Vec3};

/// Most vertices a convex hull collider may carry
pub const MAX_HULL_VERTICES: usize = 64;

/// Shape tag, used for dispatch and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Sphere
    Sphere,
    /// Capsule (segment along local Z with a radius)
    Capsule,
    /// Cylinder along local Z
    Cylinder,
    /// Oriented box
    Obb,
    /// Convex point cloud
    ConvexHull,
}

/// Convex hull collider geometry
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    vertices: Vec<Vec3>,
}

impl ConvexHull {
    /// Build a hull from local-space vertices
    ///
    /// Fails for an empty vertex list, more than [`MAX_HULL_VERTICES`]
    /// vertices or non-finite coordinates. Interior points are allowed; only
    /// the support function is used.
    pub fn new(vertices: Vec<Vec3>) -> Result<Self, PhysicsError> {
        if vertices.is_empty() {
            return Err(PhysicsError::EmptyHull);
        }
        if vertices.len() > MAX_HULL_VERTICES {
            return Err(PhysicsError::TooManyHullVertices {
                count: vertices.len(),
                max: MAX_HULL_VERTICES,
            });
        }
        if vertices.iter().any(|v| !v.iter().all(|c| c.is_finite())) {
            return Err(PhysicsError::InvalidShape("hull vertex is not finite".to_string()));
        }
        Ok(Self { vertices })
    }

    /// The eight corners of a box with the given half extents
    pub fn cuboid(half_extents: Vec3) -> Result<Self, PhysicsError> {
        let h = half_extents;
        let mut corners = Vec::with_capacity(8);
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    corners.push(Vec3::new(h.x * sx, h.y * sy, h.z * sz));
                }
            }
        }
        Self::new(corners)
    }

    /// Local-space vertices
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }
}

/// Shape-specific parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    /// Sphere of the given radius
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Segment of `length` along local Z, swept by `radius`
    Capsule {
        /// Radius
        radius: f32,
        /// Length of the core segment (caps excluded)
        length: f32,
    },
    /// Cylinder of `height` along local Z
    Cylinder {
        /// Radius
        radius: f32,
        /// Full height
        height: f32,
    },
    /// Box with the given half extents
    Obb {
        /// Half size along each local axis
        half_extents: Vec3,
    },
    /// Convex point cloud
    ConvexHull(ConvexHull),
}

impl ColliderShape {
    /// Tag of this shape
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Capsule { .. } => ShapeKind::Capsule,
            Self::Cylinder { .. } => ShapeKind::Cylinder,
            Self::Obb { .. } => ShapeKind::Obb,
            Self::ConvexHull(_) => ShapeKind::ConvexHull,
        }
    }

    /// Bounds of the shape around its own origin
    fn bounds(&self) -> Aabb {
        match self {
            Self::Sphere { radius } => {
                Aabb::from_center_half_extents(Vec3::zeros(), Vec3::repeat(*radius))
            }
            Self::Capsule { radius, length } => Aabb::from_center_half_extents(
                Vec3::zeros(),
                Vec3::new(*radius, *radius, radius + length * 0.5),
            ),
            Self::Cylinder { radius, height } => Aabb::from_center_half_extents(
                Vec3::zeros(),
                Vec3::new(*radius, *radius, height * 0.5),
            ),
            Self::Obb { half_extents } => {
                Aabb::from_center_half_extents(Vec3::zeros(), *half_extents)
            }
            Self::ConvexHull(hull) => Aabb::from_points(hull.vertices())
                .unwrap_or_else(|| Aabb::new(Vec3::zeros(), Vec3::zeros())),
        }
    }

    /// Diagonal of the inertia tensor for unit mass
    fn unit_inertia(&self) -> Vec3 {
        let box_inertia = |size: Vec3| {
            let sq = size.component_mul(&size);
            Vec3::new(sq.y + sq.z, sq.x + sq.z, sq.x + sq.y) / 12.0
        };
        let cylinder_inertia = |radius: f32, height: f32| {
            let side = (3.0 * radius * radius + height * height) / 12.0;
            Vec3::new(side, side, 0.5 * radius * radius)
        };

        match self {
            Self::Sphere { radius } => Vec3::repeat(0.4 * radius * radius),
            // Capsule approximated by the cylinder spanning both caps
            Self::Capsule { radius, length } => cylinder_inertia(*radius, length + 2.0 * radius),
            Self::Cylinder { radius, height } => cylinder_inertia(*radius, *height),
            Self::Obb { half_extents } => box_inertia(half_extents * 2.0),
            Self::ConvexHull(_) => {
                let bounds = self.bounds();
                box_inertia(bounds.max - bounds.min)
            }
        }
    }

    fn validate(&self) -> Result<(), PhysicsError> {
        let check = |name: &str, value: f32| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(PhysicsError::InvalidShape(format!("{name} must be finite and >= 0, got {value}")))
            }
        };

        match self {
            Self::Sphere { radius } => check("radius", *radius),
            Self::Capsule { radius, length } => {
                check("radius", *radius)?;
                check("length", *length)
            }
            Self::Cylinder { radius, height } => {
                check("radius", *radius)?;
                check("height", *height)
            }
            Self::Obb { half_extents } => {
                check("half_extents.x", half_extents.x)?;
                check("half_extents.y", half_extents.y)?;
                check("half_extents.z", half_extents.z)
            }
            Self::ConvexHull(_) => Ok(()),
        }
    }
}

/// Shape attached to a body, with its cached local bounds
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    shape: ColliderShape,
    offset: Vec3,
    local_bounds: Aabb,
}

impl Collider {
    /// Create a collider from a shape placed at `offset` in body space
    pub fn new(shape: ColliderShape, offset: Vec3) -> Result<Self, PhysicsError> {
        shape.validate()?;
        if !offset.iter().all(|c| c.is_finite()) {
            return Err(PhysicsError::InvalidShape("offset is not finite".to_string()));
        }
        let local_bounds = shape.bounds().translated(&offset);
        Ok(Self { shape, offset, local_bounds })
    }

    /// Sphere centred on the body origin
    pub fn sphere(radius: f32) -> Result<Self, PhysicsError> {
        Self::new(ColliderShape::Sphere { radius }, Vec3::zeros())
    }

    /// Capsule along local Z centred on the body origin
    pub fn capsule(radius: f32, length: f32) -> Result<Self, PhysicsError> {
        Self::new(ColliderShape::Capsule { radius, length }, Vec3::zeros())
    }

    /// Cylinder along local Z centred on the body origin
    pub fn cylinder(radius: f32, height: f32) -> Result<Self, PhysicsError> {
        Self::new(ColliderShape::Cylinder { radius, height }, Vec3::zeros())
    }

    /// Box centred on the body origin
    pub fn obb(half_extents: Vec3) -> Result<Self, PhysicsError> {
        Self::new(ColliderShape::Obb { half_extents }, Vec3::zeros())
    }

    /// Convex hull from body-space vertices
    pub fn convex_hull(vertices: Vec<Vec3>) -> Result<Self, PhysicsError> {
        Self::new(ColliderShape::ConvexHull(ConvexHull::new(vertices)?), Vec3::zeros())
    }

    /// Convex hull shaped like a box, usable by the GJK/EPA path
    pub fn cuboid_hull(half_extents: Vec3) -> Result<Self, PhysicsError> {
        Self::new(ColliderShape::ConvexHull(ConvexHull::cuboid(half_extents)?), Vec3::zeros())
    }

    /// Shape parameters
    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    /// Shape tag
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Offset of the shape origin from the body origin
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Bounding box in body space (offset applied, rotation not)
    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }

    /// Inverse inertia tensor for a body with the given inverse mass
    ///
    /// Zero for infinite mass. Axes with zero extent get zero inverse
    /// inertia rather than infinity.
    pub fn inverse_inertia(&self, inverse_mass: f32) -> Mat3 {
        if inverse_mass <= 0.0 {
            return Mat3::zeros();
        }
        let unit = self.shape.unit_inertia();
        let invert = |k: f32| if k > f32::EPSILON { inverse_mass / k } else { 0.0 };
        Mat3::from_diagonal(&Vec3::new(invert(unit.x), invert(unit.y), invert(unit.z)))
    }
}
