//! Whole-pipeline scenarios driven through `PhysicsSystem::update`

mod integration;

use crate::config::PhysicsConfig;
use crate::foundation::math::Vec3;
use crate::physics::{BodyDesc, Collider, PhysicsSystem};

const DT: f32 = 1.0 / 60.0;

fn world() -> PhysicsSystem {
    PhysicsSystem::new(PhysicsConfig::default()).unwrap()
}

fn sphere(radius: f32, mass: f32, position: Vec3) -> BodyDesc {
    BodyDesc::dynamic(Collider::sphere(radius).unwrap(), mass).with_position(position)
}
