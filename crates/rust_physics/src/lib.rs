//! # Rust Physics
//!
//! Real-time rigid-body physics core.
//!
//! ## Features
//!
//! - **Broad phase**: spatial hash grid with incremental cell updates
//! - **Narrow phase**: closed-form sphere/capsule tests, GJK + EPA for convex hulls
//! - **Resolution**: positional correction followed by sequential impulses
//! - **Integration**: semi-implicit Euler with kinematic velocity tracking
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rust_physics::prelude::*;
//!
//! fn main() -> Result<(), PhysicsError> {
//!     let mut physics = PhysicsSystem::new(PhysicsConfig::default())?;
//!
//!     let ground = BodyDesc::fixed(Collider::cuboid_hull(Vec3::new(10.0, 0.5, 10.0))?);
//!     physics.register_body("ground", ground)?;
//!
//!     let crate_box = BodyDesc::dynamic(Collider::cuboid_hull(Vec3::new(0.5, 0.5, 0.5))?, 1.0)
//!         .with_position(Vec3::new(0.0, 3.0, 0.0));
//!     let handle = physics.register_body("crate", crate_box)?;
//!
//!     for _ in 0..60 {
//!         if let Some(body) = physics.body_mut(handle) {
//!             body.apply_force(Vec3::new(0.0, -9.81, 0.0));
//!         }
//!         physics.update(1.0 / 60.0);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod physics;
pub mod spatial;

pub use error::PhysicsError;

/// Common imports for physics users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PhysicsConfig},
        error::PhysicsError,
        foundation::math::{Aabb, Quat, Transform, Vec3},
        physics::{
            BodyDesc, BodyHandle, BodyKind, Collider, CollisionLayers, CollisionPair,
            CollisionResult, PhysicsBody, PhysicsSystem, ShapeKind, StepStats,
        },
    };
}
