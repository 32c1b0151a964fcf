//! Rigid-body physics
//!
//! Bodies carry a collider in local space. Each [`PhysicsSystem::update`]
//! integrates forces, finds overlapping pairs through the spatial hash,
//! tests them with the narrow phase and resolves the contacts with
//! sequential impulses.

pub mod body;
pub mod collider;
pub mod collision;
pub mod collision_layers;
pub mod solver;
pub mod system;

#[cfg(test)]
mod tests;

pub use body::{BodyDesc, BodyHandle, BodyKind, PhysicsBody, DEFAULT_RESTITUTION};
pub use collider::{Collider, ColliderShape, ConvexHull, ShapeKind, MAX_HULL_VERTICES};
pub use collision::{collide, Contact};
pub use collision_layers::CollisionLayers;
pub use system::{CollisionPair, CollisionResult, PhysicsSystem, StepStats};
