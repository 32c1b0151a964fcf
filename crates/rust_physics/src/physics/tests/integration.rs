use approx::assert_relative_eq;

use super::{sphere, world, DT};
use crate::foundation::math::Vec3;
use crate::physics::{BodyDesc, Collider};

#[test]
fn test_gravity_single_step() {
    let mut physics = world();
    let handle = physics.register_body("ball", sphere(0.5, 1.0, Vec3::zeros())).unwrap();

    physics.body_mut(handle).unwrap().apply_force(Vec3::new(0.0, 0.0, -9.81));
    physics.update(DT);

    let body = physics.body(handle).unwrap();
    assert_relative_eq!(body.velocity.z, -0.1635, epsilon = 1e-4);
    assert_relative_eq!(body.transform.position.z, -0.1635 * DT, epsilon = 1e-5);
    // forces do not carry over
    assert_eq!(body.accumulated_force(), Vec3::zeros());
}

#[test]
fn test_force_ignores_mass() {
    let mut physics = world();
    let light = physics.register_body("light", sphere(0.5, 1.0, Vec3::zeros())).unwrap();
    let heavy = physics
        .register_body("heavy", sphere(0.5, 50.0, Vec3::new(10.0, 0.0, 0.0)))
        .unwrap();

    for handle in [light, heavy] {
        physics.body_mut(handle).unwrap().apply_force(Vec3::new(0.0, 0.0, -9.81));
    }
    physics.update(DT);

    assert_relative_eq!(
        physics.body(light).unwrap().velocity,
        physics.body(heavy).unwrap().velocity
    );
}

#[test]
fn test_kinematic_velocity_is_derived() {
    let mut physics = world();
    let handle = physics
        .register_body("platform", BodyDesc::kinematic(Collider::obb(Vec3::new(2.0, 0.25, 2.0)).unwrap()))
        .unwrap();

    physics.body_mut(handle).unwrap().set_position(Vec3::new(1.0, 0.0, 0.0));
    physics.update(DT);

    let body = physics.body(handle).unwrap();
    assert_relative_eq!(body.velocity, Vec3::new(60.0, 0.0, 0.0), epsilon = 1e-3);
    assert_eq!(body.transform.position, Vec3::new(1.0, 0.0, 0.0));

    physics.update(DT);
    assert_relative_eq!(physics.body(handle).unwrap().velocity, Vec3::zeros());
}

#[test]
fn test_kinematic_ignores_forces() {
    let mut physics = world();
    let handle = physics
        .register_body("lift", BodyDesc::kinematic(Collider::sphere(1.0).unwrap()))
        .unwrap();

    let body = physics.body_mut(handle).unwrap();
    body.apply_force(Vec3::new(0.0, 0.0, -9.81));
    body.apply_impulse(Vec3::new(5.0, 0.0, 0.0));
    physics.update(DT);

    let body = physics.body(handle).unwrap();
    assert_eq!(body.velocity, Vec3::zeros());
    assert_eq!(body.transform.position, Vec3::zeros());
}

#[test]
fn test_dirty_flags_track_motion() {
    let mut physics = world();
    let ball = physics.register_body("ball", sphere(0.5, 1.0, Vec3::zeros())).unwrap();
    let wall = physics
        .register_body(
            "wall",
            BodyDesc::fixed(Collider::obb(Vec3::new(1.0, 5.0, 5.0)).unwrap())
                .with_position(Vec3::new(20.0, 0.0, 0.0)),
        )
        .unwrap();

    // freshly registered bodies need a first sync
    assert_eq!(physics.dirty_bodies().count(), 2);
    physics.clear_dirty();

    physics.body_mut(ball).unwrap().apply_force(Vec3::new(0.0, -9.81, 0.0));
    physics.update(DT);

    let dirty: Vec<_> = physics.dirty_bodies().map(|(handle, _)| handle).collect();
    assert_eq!(dirty, vec![ball]);
    assert!(!physics.body(wall).unwrap().is_dirty());
}

#[test]
fn test_resting_body_stays_clean() {
    let mut physics = world();
    let ball = physics.register_body("ball", sphere(0.5, 1.0, Vec3::zeros())).unwrap();
    physics.clear_dirty();

    physics.update(DT);

    assert!(!physics.body(ball).unwrap().is_dirty());
}
