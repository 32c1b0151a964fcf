//! Rigid body state
//!
//! Bodies are created through [`super::PhysicsSystem::register_body`] from a
//! [`BodyDesc`] and addressed afterwards by [`BodyHandle`].

use slotmap::new_key_type;

use crate::foundation::math::{Aabb, Mat3, Quat, Quaternion, Transform, Vec3};
use super::collider::Collider;
use super::collision_layers::CollisionLayers;

new_key_type! {
    /// Stable handle to a body owned by a `PhysicsSystem`
    pub struct BodyHandle;
}

/// How the solver treats a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Never moves; infinite mass
    Static,
    /// Moved by the owner; velocity is derived from its motion
    Kinematic,
    /// Integrated and pushed by contacts
    Dynamic,
}

/// Restitution given to bodies by the `BodyDesc` constructors
pub const DEFAULT_RESTITUTION: f32 = 0.5;

/// Everything needed to register a body
#[derive(Debug, Clone)]
pub struct BodyDesc {
    /// Solver treatment
    pub kind: BodyKind,
    /// Collision shape
    pub collider: Collider,
    /// Initial position and orientation
    pub transform: Transform,
    /// Mass in kg; ignored unless `kind` is Dynamic
    pub mass: f32,
    /// Bounciness in [0, 1]
    pub restitution: f32,
    /// Initial linear velocity
    pub velocity: Vec3,
    /// Layers this body belongs to
    pub layer: CollisionLayers,
    /// Layers this body collides with
    pub mask: CollisionLayers,
}

impl BodyDesc {
    /// Dynamic body of the given mass
    pub fn dynamic(collider: Collider, mass: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            collider,
            transform: Transform::identity(),
            mass,
            restitution: DEFAULT_RESTITUTION,
            velocity: Vec3::zeros(),
            layer: CollisionLayers::default(),
            mask: CollisionLayers::default(),
        }
    }

    /// Immovable body
    pub fn fixed(collider: Collider) -> Self {
        Self {
            kind: BodyKind::Static,
            mass: 0.0,
            ..Self::dynamic(collider, 0.0)
        }
    }

    /// Body driven by its owner
    pub fn kinematic(collider: Collider) -> Self {
        Self {
            kind: BodyKind::Kinematic,
            mass: 0.0,
            ..Self::dynamic(collider, 0.0)
        }
    }

    /// Set the initial position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Set the initial orientation
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.transform.orientation = orientation;
        self
    }

    /// Set the restitution coefficient
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set layer membership and collision mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }
}

/// Simulated rigid body
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    id: String,
    kind: BodyKind,
    /// Current position and orientation
    pub transform: Transform,
    previous_transform: Transform,
    /// Linear velocity (m/s)
    pub velocity: Vec3,
    /// Angular velocity (rad/s)
    pub angular_velocity: Vec3,
    force: Vec3,
    inverse_mass: f32,
    inverse_inertia: Mat3,
    restitution: f32,
    collider: Collider,
    layer: CollisionLayers,
    mask: CollisionLayers,
    dirty: bool,
}

impl PhysicsBody {
    pub(crate) fn from_desc(id: String, desc: BodyDesc) -> Self {
        let inverse_mass = match desc.kind {
            BodyKind::Dynamic if desc.mass.is_finite() && desc.mass > 0.0 => 1.0 / desc.mass,
            BodyKind::Dynamic => {
                log::warn!("Body '{}' has non-positive mass {}, treating it as immovable", id, desc.mass);
                0.0
            }
            BodyKind::Static | BodyKind::Kinematic => 0.0,
        };
        let velocity = match desc.kind {
            BodyKind::Dynamic => desc.velocity,
            BodyKind::Static | BodyKind::Kinematic => Vec3::zeros(),
        };
        let restitution = if desc.restitution.is_finite() {
            desc.restitution.clamp(0.0, 1.0)
        } else {
            DEFAULT_RESTITUTION
        };

        Self {
            id,
            kind: desc.kind,
            transform: desc.transform,
            previous_transform: desc.transform,
            velocity,
            angular_velocity: Vec3::zeros(),
            force: Vec3::zeros(),
            inverse_mass,
            inverse_inertia: desc.collider.inverse_inertia(inverse_mass),
            restitution,
            collider: desc.collider,
            layer: desc.layer,
            mask: desc.mask,
            dirty: true,
        }
    }

    /// Name the body was registered under
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Solver treatment
    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// `true` for Dynamic bodies
    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    /// Transform at the end of the previous step
    pub fn previous_transform(&self) -> &Transform {
        &self.previous_transform
    }

    /// 1 / mass, zero for immovable bodies
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Body-space inverse inertia tensor
    pub fn inverse_inertia(&self) -> &Mat3 {
        &self.inverse_inertia
    }

    /// Restitution coefficient in [0, 1]
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Change the restitution coefficient (clamped to [0, 1])
    pub fn set_restitution(&mut self, restitution: f32) {
        if restitution.is_finite() {
            self.restitution = restitution.clamp(0.0, 1.0);
        }
    }

    /// Collision shape
    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    /// Layers this body belongs to
    pub fn layer(&self) -> CollisionLayers {
        self.layer
    }

    /// Layers this body collides with
    pub fn mask(&self) -> CollisionLayers {
        self.mask
    }

    /// Accumulated force (acceleration) for the coming step
    pub fn accumulated_force(&self) -> Vec3 {
        self.force
    }

    /// Add an acceleration for the coming step
    ///
    /// Not scaled by mass: gravity applied as `(0, 0, -9.81)` accelerates
    /// every body alike. Cleared after each step. Ignored for non-Dynamic
    /// bodies.
    pub fn apply_force(&mut self, force: Vec3) {
        if self.is_dynamic() {
            self.force += force;
        }
    }

    /// Change velocity immediately by `impulse / mass`
    ///
    /// Ignored for non-Dynamic bodies.
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.is_dynamic() {
            self.velocity += impulse * self.inverse_mass;
            self.dirty = true;
        }
    }

    /// Move the body; for Kinematic bodies this is how they are driven
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.dirty = true;
    }

    /// Move the body to `position`, keeping its orientation
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.dirty = true;
    }

    /// Whether the transform changed since the last [`Self::clear_dirty`]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledge that the owner has synchronised this body
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Advance velocity from forces, or derive it from motion for kinematics
    pub(crate) fn integrate_state(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }

        match self.kind {
            BodyKind::Dynamic => {
                self.velocity += self.force * dt;
            }
            BodyKind::Kinematic => {
                let delta = self.transform.position - self.previous_transform.position;
                self.velocity = delta / dt;
                self.previous_transform = self.transform;
            }
            BodyKind::Static => {}
        }
    }

    /// Advance the transform from velocity (Dynamic only)
    pub(crate) fn integrate_transform(&mut self, dt: f32) {
        if !self.is_dynamic() {
            return;
        }

        self.previous_transform = self.transform;
        self.transform.position += self.velocity * dt;

        if self.angular_velocity.norm_squared() > 0.0 {
            let q = self.transform.orientation.into_inner();
            let spin = Quaternion::from_imag(self.angular_velocity) * q * (0.5 * dt);
            self.transform.orientation = Quat::new_normalize(q + spin);
        }

        if self.velocity.norm_squared() > 0.0 || self.angular_velocity.norm_squared() > 0.0 {
            self.dirty = true;
        }
    }

    pub(crate) fn clear_forces(&mut self) {
        self.force = Vec3::zeros();
    }

    /// World-space bounds used by the broad phase
    ///
    /// Local bounds translated by position; orientation is not applied.
    pub fn broad_phase_bounds(&self) -> Aabb {
        self.collider.local_bounds().translated(&self.transform.position)
    }
}
