//! Math utilities and types
//!
//! Provides the vector, quaternion and bounding-box types shared by the
//! broad phase, the narrow phase and the solver.

pub use nalgebra::{
    Vector3,
    Matrix3, Matrix4,
    Quaternion,
    UnitQuaternion,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Squared-length threshold below which a vector is treated as zero
pub const EPSILON_SQ: f32 = 1.0e-6;

/// Canonical up axis used when a direction cannot be derived
pub fn up_axis() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// `true` when `a` and `b` point into the same half-space (strictly)
#[inline]
pub fn same_direction(a: &Vec3, b: &Vec3) -> bool {
    a.dot(b) > 0.0
}

/// Normalize `v`, substituting `fallback` for vectors too short to normalize
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let length_sq = v.norm_squared();
    if length_sq > EPSILON_SQ * EPSILON_SQ && length_sq.is_finite() {
        v / length_sq.sqrt()
    } else {
        fallback
    }
}

/// Any unit vector perpendicular to `v`
///
/// Crosses with the world axis least aligned with `v`; returns the up axis
/// when `v` is degenerate.
pub fn any_perpendicular(v: &Vec3) -> Vec3 {
    let abs = v.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::x()
    } else if abs.y <= abs.z {
        Vec3::y()
    } else {
        Vec3::z()
    };
    normalize_or(v.cross(&axis), up_axis())
}

/// Rigid transform: position and orientation (no scale)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Orientation quaternion
    pub orientation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and orientation
    pub fn from_position_orientation(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position) * self.orientation.to_homogeneous()
    }

    /// Apply this transform to a point given in local space
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        self.position + self.orientation * point
    }

    /// Rotate a local-space direction into world space
    pub fn transform_vector(&self, vector: &Vec3) -> Vec3 {
        self.orientation * vector
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest AABB containing every point, `None` for an empty slice
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::new(*first, *first);
        for point in rest {
            bounds.min = bounds.min.inf(point);
            bounds.max = bounds.max.sup(point);
        }
        Some(bounds)
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half extents of the AABB
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: &Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB overlaps another (touching counts as overlap)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// The same box moved by `offset`
    pub fn translated(&self, offset: &Vec3) -> Aabb {
        Aabb::new(self.min + offset, self.max + offset)
    }

    /// The box grown by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Aabb {
        let margin = Vec3::repeat(margin);
        Aabb::new(self.min - margin, self.max + margin)
    }

    /// Smallest box containing both boxes
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_or_falls_back_on_zero() {
        let up = up_axis();
        assert_eq!(normalize_or(Vec3::zeros(), up), up);
        assert_relative_eq!(normalize_or(Vec3::new(3.0, 0.0, 4.0), up), Vec3::new(0.6, 0.0, 0.8));
    }

    #[test]
    fn test_any_perpendicular_is_unit_and_orthogonal() {
        for v in [Vec3::x(), Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -5.0)] {
            let p = any_perpendicular(&v);
            assert_relative_eq!(p.norm(), 1.0, epsilon = 1e-5);
            assert!(p.dot(&v).abs() < 1e-4);
        }
        assert_eq!(any_perpendicular(&Vec3::zeros()), up_axis());
    }

    #[test]
    fn test_same_direction_is_strict() {
        assert!(same_direction(&Vec3::x(), &Vec3::new(1.0, 1.0, 0.0)));
        assert!(!same_direction(&Vec3::x(), &Vec3::y()));
    }

    #[test]
    fn test_aabb_overlap_and_touching() {
        let a = Aabb::new(Vec3::zeros(), Vec3::repeat(1.0));
        let touching = a.translated(&Vec3::new(1.0, 0.0, 0.0));
        let apart = a.translated(&Vec3::new(1.5, 0.0, 0.0));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
        assert!(a.expanded(0.5).intersects(&apart));
    }

    #[test]
    fn test_aabb_from_points() {
        let bounds = Aabb::from_points(&[
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
        ]).unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 3.0, 0.5));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_transform_point_applies_rotation_then_translation() {
        let transform = Transform::from_position_orientation(
            Vec3::new(0.0, 0.0, 1.0),
            Quat::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_2),
        );
        let p = transform.transform_point(&Vec3::x());
        assert_relative_eq!(p, Vec3::new(0.0, 1.0, 1.0), epsilon = 1e-6);
    }
}
