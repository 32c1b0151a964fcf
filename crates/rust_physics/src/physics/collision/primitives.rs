//! Closed-form tests for round shapes
//!
//! Spheres and capsules reduce to "closest points on core segments, then
//! compare against the summed radii".

use crate::foundation::math::{normalize_or, up_axis, Vec3, EPSILON_SQ};
use super::shape::{WorldCapsule, WorldSphere};
use super::Contact;

/// Closest point to `point` on the segment `start..end`
pub fn closest_point_on_segment(point: &Vec3, start: &Vec3, end: &Vec3) -> Vec3 {
    let segment = end - start;
    let length_sq = segment.norm_squared();
    if length_sq <= EPSILON_SQ {
        return *start;
    }
    let t = ((point - start).dot(&segment) / length_sq).clamp(0.0, 1.0);
    start + segment * t
}

/// Closest pair of points between segments `p1..q1` and `p2..q2`
///
/// Returns `(on_first, on_second)`. Segments shorter than the epsilon are
/// treated as points and parallel segments pick the first endpoint.
pub fn closest_points_segments(p1: &Vec3, q1: &Vec3, p2: &Vec3, q2: &Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    if a <= EPSILON_SQ && e <= EPSILON_SQ {
        return (*p1, *p2);
    }

    let (s, t) = if a <= EPSILON_SQ {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= EPSILON_SQ {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            let mut s = if denom > EPSILON_SQ * a * e {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}

/// Contact between two balls given by centre and radius
///
/// Coincident centres fall back to the up axis with full overlap.
fn ball_ball(center_a: &Vec3, radius_a: f32, center_b: &Vec3, radius_b: f32) -> Option<Contact> {
    let delta = center_b - center_a;
    let distance_sq = delta.norm_squared();
    let radius_sum = radius_a + radius_b;
    if distance_sq > radius_sum * radius_sum {
        return None;
    }

    let distance = distance_sq.sqrt();
    Some(Contact {
        normal: normalize_or(delta, up_axis()),
        penetration: (radius_sum - distance).max(0.0),
    })
}

/// Sphere vs sphere
pub fn sphere_sphere(a: &WorldSphere, b: &WorldSphere) -> Option<Contact> {
    ball_ball(&a.center, a.radius, &b.center, b.radius)
}

/// Sphere vs capsule, normal pointing from the sphere to the capsule
pub fn sphere_capsule(sphere: &WorldSphere, capsule: &WorldCapsule) -> Option<Contact> {
    let on_core = closest_point_on_segment(&sphere.center, &capsule.start, &capsule.end);
    ball_ball(&sphere.center, sphere.radius, &on_core, capsule.radius)
}

/// Capsule vs capsule
pub fn capsule_capsule(a: &WorldCapsule, b: &WorldCapsule) -> Option<Contact> {
    let (on_a, on_b) = closest_points_segments(&a.start, &a.end, &b.start, &b.end);
    ball_ball(&on_a, a.radius, &on_b, b.radius)
}
