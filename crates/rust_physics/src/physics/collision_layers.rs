//! Collision layers for filtering broad-phase pairs
//!
//! Every body sits on one or more layers and carries a mask of the layers it
//! collides with. A pair is tested only when each body's layer is in the
//! other's mask.

use bitflags::bitflags;

bitflags! {
    /// Layer membership / collision mask bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Static level geometry
        const WORLD = 1 << 0;
        /// Player-controlled bodies
        const PLAYER = 1 << 1;
        /// Props and other simulated objects
        const PROP = 1 << 2;
        /// Small debris that need not hit each other
        const DEBRIS = 1 << 3;
        /// Projectiles
        const PROJECTILE = 1 << 4;
        /// Remaining bits are free for the owning simulation
        const _ = !0;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::all()
    }
}

impl CollisionLayers {
    /// Check if two bodies should collide based on their layers and masks
    ///
    /// A's layer must be in B's mask and B's layer must be in A's mask.
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::PROP,
            CollisionLayers::PROP,
            CollisionLayers::PLAYER | CollisionLayers::WORLD,
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::PROP,
            CollisionLayers::PROP,
            CollisionLayers::WORLD,
        ));
    }

    #[test]
    fn test_debris_ignores_debris() {
        let debris_mask = CollisionLayers::all() - CollisionLayers::DEBRIS;
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::DEBRIS, debris_mask,
            CollisionLayers::DEBRIS, debris_mask,
        ));
        assert!(CollisionLayers::should_collide(
            CollisionLayers::DEBRIS, debris_mask,
            CollisionLayers::WORLD, CollisionLayers::all(),
        ));
    }

    #[test]
    fn test_custom_bits_survive() {
        let custom = CollisionLayers::from_bits_retain(1 << 20);
        assert!(CollisionLayers::default().contains(custom));
    }
}
