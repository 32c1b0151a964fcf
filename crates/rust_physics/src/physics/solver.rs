//! Contact resolution
//!
//! Each contact is resolved once: bodies are first pushed apart along the
//! normal, then an impulse removes the approaching normal velocity. Only
//! bodies with a non-zero inverse mass move, so Static and Kinematic bodies
//! act as immovable inputs.

use super::body::PhysicsBody;
use super::collision::Contact;

/// Restitution used for a pair of bodies
pub fn combined_restitution(a: &PhysicsBody, b: &PhysicsBody) -> f32 {
    (a.restitution() + b.restitution()) * 0.5
}

/// Resolve one contact whose normal points from `a` to `b`
///
/// Returns `true` when either body was changed. Changed bodies are marked
/// dirty.
pub fn resolve_contact(a: &mut PhysicsBody, b: &mut PhysicsBody, contact: &Contact) -> bool {
    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return false;
    }

    let normal = contact.normal;

    // positional correction first
    if contact.penetration > 0.0 {
        let correction = normal * (contact.penetration / inv_sum);
        a.transform.position -= correction * inv_a;
        b.transform.position += correction * inv_b;
    }

    let normal_velocity = (b.velocity - a.velocity).dot(&normal);
    if normal_velocity <= 0.0 {
        let restitution = combined_restitution(a, b);
        let impulse = normal * (-(1.0 + restitution) * normal_velocity / inv_sum);
        a.velocity -= impulse * inv_a;
        b.velocity += impulse * inv_b;
    }

    if inv_a > 0.0 {
        a.mark_dirty();
    }
    if inv_b > 0.0 {
        b.mark_dirty();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::foundation::math::Vec3;
    use crate::physics::body::BodyDesc;
    use crate::physics::collider::Collider;

    fn dynamic(position: Vec3, velocity: Vec3, mass: f32, restitution: f32) -> PhysicsBody {
        let desc = BodyDesc::dynamic(Collider::sphere(1.0).unwrap(), mass)
            .with_position(position)
            .with_velocity(velocity)
            .with_restitution(restitution);
        PhysicsBody::from_desc("dynamic".to_string(), desc)
    }

    fn fixed(position: Vec3) -> PhysicsBody {
        let desc = BodyDesc::fixed(Collider::sphere(1.0).unwrap()).with_position(position);
        PhysicsBody::from_desc("fixed".to_string(), desc)
    }

    fn contact_x(penetration: f32) -> Contact {
        Contact { normal: Vec3::x(), penetration }
    }

    #[test]
    fn test_elastic_equal_masses_swap_velocities() {
        let mut a = dynamic(Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0), 1.0, 1.0);
        let mut b = dynamic(Vec3::new(1.5, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), 1.0, 1.0);
        let before = (b.velocity - a.velocity).dot(&Vec3::x());

        assert!(resolve_contact(&mut a, &mut b, &contact_x(0.5)));

        let after = (b.velocity - a.velocity).dot(&Vec3::x());
        assert_relative_eq!(after, -before, epsilon = 1e-6);
        assert_relative_eq!(a.velocity, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(b.velocity, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-6);
        // momentum unchanged
        assert_relative_eq!(a.velocity + b.velocity, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_positional_correction_split_by_inverse_mass() {
        let mut a = dynamic(Vec3::zeros(), Vec3::zeros(), 1.0, 0.5);
        let mut b = dynamic(Vec3::new(1.5, 0.0, 0.0), Vec3::zeros(), 3.0, 0.5);

        resolve_contact(&mut a, &mut b, &contact_x(0.4));

        // inverse masses 1 and 1/3 share the 0.4 overlap 3:1
        assert_relative_eq!(a.transform.position.x, -0.3, epsilon = 1e-6);
        assert_relative_eq!(b.transform.position.x, 1.6, epsilon = 1e-6);
    }

    #[test]
    fn test_static_body_never_moves() {
        let mut ground = fixed(Vec3::zeros());
        let mut ball = dynamic(Vec3::new(0.0, 1.8, 0.0), Vec3::new(0.0, -3.0, 0.0), 1.0, 0.0);
        let contact = Contact { normal: Vec3::y(), penetration: 0.2 };

        assert!(resolve_contact(&mut ground, &mut ball, &contact));

        assert_eq!(ground.transform.position, Vec3::zeros());
        assert_eq!(ground.velocity, Vec3::zeros());
        assert_relative_eq!(ball.transform.position.y, 2.0, epsilon = 1e-6);
        // restitution averages to 0.25 with the default on the ground
        assert_relative_eq!(ball.velocity.y, 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_separating_contact_keeps_velocity() {
        let mut a = dynamic(Vec3::zeros(), Vec3::new(-1.0, 0.0, 0.0), 1.0, 1.0);
        let mut b = dynamic(Vec3::new(1.5, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 1.0, 1.0);

        resolve_contact(&mut a, &mut b, &contact_x(0.5));

        assert_eq!(a.velocity, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.velocity, Vec3::new(1.0, 0.0, 0.0));
        assert!(a.transform.position.x < 0.0);
    }

    #[test]
    fn test_two_immovable_bodies_are_left_alone() {
        let mut a = fixed(Vec3::zeros());
        let mut b = fixed(Vec3::new(0.5, 0.0, 0.0));
        b.clear_dirty();
        assert!(!resolve_contact(&mut a, &mut b, &contact_x(1.5)));
        assert!(!b.is_dirty());
    }
}
