//! Physics system: owns every body and runs the per-frame pipeline
//!
//! A step runs six stages in order:
//!
//! 1. integrate state (forces into velocity, kinematic velocity from motion)
//! 2. broad phase (refresh the spatial hash, gather candidate pairs)
//! 3. narrow phase (shape tests, producing [`CollisionResult`]s)
//! 4. resolution (positional correction, then impulses)
//! 5. integrate transforms
//! 6. clear accumulated forces
//!
//! Bodies are addressed by [`BodyHandle`]; handles stay valid while other
//! bodies are added or removed, so they can be held across frames.

use std::collections::{HashMap, HashSet};

use slotmap::SlotMap;

use crate::config::PhysicsConfig;
use crate::error::PhysicsError;
use crate::foundation::math::Vec3;
use crate::spatial::SpatialHashGrid;
use super::body::{BodyDesc, BodyHandle, PhysicsBody};
use super::collider::ShapeKind;
use super::collision::{collide, Contact};
use super::collision_layers::CollisionLayers;
use super::solver::resolve_contact;

/// Unordered pair of bodies, stored with the smaller handle first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// Body with the smaller handle
    pub a: BodyHandle,
    /// Body with the larger handle
    pub b: BodyHandle,
}

impl CollisionPair {
    /// Create a pair (order of arguments does not matter)
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        if a < b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// `true` if `handle` is one of the two bodies
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.a == handle || self.b == handle
    }
}

/// Contact found during the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// First body
    pub a: BodyHandle,
    /// Second body
    pub b: BodyHandle,
    /// Unit normal pointing from `a` to `b`
    pub normal: Vec3,
    /// Overlap depth along `normal`, as detected before resolution
    pub penetration: f32,
}

/// Counters for one [`PhysicsSystem::update`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Bodies simulated
    pub bodies: usize,
    /// Distinct pairs that passed the broad phase and layer filtering
    pub candidate_pairs: usize,
    /// Pairs confirmed by the narrow phase
    pub contacts: usize,
    /// Contacts that moved at least one body
    pub resolved: usize,
    /// Pairs skipped because no test exists for their shapes
    pub skipped_pairs: usize,
}

/// Rigid-body simulation
pub struct PhysicsSystem {
    config: PhysicsConfig,
    bodies: SlotMap<BodyHandle, PhysicsBody>,
    ids: HashMap<String, BodyHandle>,
    grid: SpatialHashGrid<BodyHandle>,
    contacts: Vec<CollisionResult>,
    current_pairs: HashSet<CollisionPair>,
    previous_pairs: HashSet<CollisionPair>,
    reported_missing: HashSet<(ShapeKind, ShapeKind)>,
    candidates: Vec<BodyHandle>,
}

impl PhysicsSystem {
    /// Create an empty simulation
    pub fn new(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        let grid = SpatialHashGrid::new(config.cell_size)?;
        log::info!(
            "Physics system created (cell size {}, capacity {})",
            config.cell_size,
            config.initial_capacity
        );

        Ok(Self {
            bodies: SlotMap::with_capacity_and_key(config.initial_capacity),
            ids: HashMap::with_capacity(config.initial_capacity),
            grid,
            contacts: Vec::new(),
            current_pairs: HashSet::new(),
            previous_pairs: HashSet::new(),
            reported_missing: HashSet::new(),
            candidates: Vec::new(),
            config,
        })
    }

    /// Configuration the system was built with
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Register a body under a unique id
    pub fn register_body(
        &mut self,
        id: impl Into<String>,
        desc: BodyDesc,
    ) -> Result<BodyHandle, PhysicsError> {
        let id = id.into();
        if self.ids.contains_key(&id) {
            return Err(PhysicsError::DuplicateBody(id));
        }

        let body = PhysicsBody::from_desc(id.clone(), desc);
        let bounds = body.broad_phase_bounds();
        log::debug!("Registering {:?} body '{}' ({:?})", body.kind(), id, body.collider().kind());

        let handle = self.bodies.insert(body);
        self.grid.add(handle, bounds);
        self.ids.insert(id, handle);
        Ok(handle)
    }

    /// Remove a body; its handle becomes stale
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<PhysicsBody> {
        let body = self.bodies.remove(handle)?;
        self.ids.remove(body.id());
        self.grid.remove(handle);
        self.contacts.retain(|result| result.a != handle && result.b != handle);
        self.current_pairs.retain(|pair| !pair.contains(handle));
        self.previous_pairs.retain(|pair| !pair.contains(handle));
        log::debug!("Removed body '{}'", body.id());
        Some(body)
    }

    /// Handle of the body registered under `id`
    pub fn handle(&self, id: &str) -> Option<BodyHandle> {
        self.ids.get(id).copied()
    }

    /// Body behind `handle`
    pub fn body(&self, handle: BodyHandle) -> Option<&PhysicsBody> {
        self.bodies.get(handle)
    }

    /// Mutable body behind `handle`, for applying forces or moving kinematics
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(handle)
    }

    /// Body registered under `id`
    pub fn body_by_id(&self, id: &str) -> Result<&PhysicsBody, PhysicsError> {
        self.handle(id)
            .and_then(|handle| self.bodies.get(handle))
            .ok_or_else(|| PhysicsError::UnknownBody(id.to_string()))
    }

    /// Mutable body registered under `id`
    pub fn body_by_id_mut(&mut self, id: &str) -> Result<&mut PhysicsBody, PhysicsError> {
        match self.ids.get(id) {
            Some(&handle) => self
                .bodies
                .get_mut(handle)
                .ok_or_else(|| PhysicsError::UnknownBody(id.to_string())),
            None => Err(PhysicsError::UnknownBody(id.to_string())),
        }
    }

    /// All bodies with their handles
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &PhysicsBody)> {
        self.bodies.iter()
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Bodies whose transform changed since their dirty flag was last cleared
    pub fn dirty_bodies(&self) -> impl Iterator<Item = (BodyHandle, &PhysicsBody)> {
        self.bodies.iter().filter(|(_, body)| body.is_dirty())
    }

    /// Clear every body's dirty flag
    pub fn clear_dirty(&mut self) {
        for body in self.bodies.values_mut() {
            body.clear_dirty();
        }
    }

    /// Contacts found by the last step
    pub fn contacts(&self) -> &[CollisionResult] {
        &self.contacts
    }

    /// Pairs in contact during the last step
    pub fn current_collisions(&self) -> &HashSet<CollisionPair> {
        &self.current_pairs
    }

    /// Pairs that started touching in the last step
    pub fn collisions_entered(&self) -> Vec<CollisionPair> {
        self.current_pairs
            .difference(&self.previous_pairs)
            .copied()
            .collect()
    }

    /// Pairs that stopped touching in the last step
    pub fn collisions_exited(&self) -> Vec<CollisionPair> {
        self.previous_pairs
            .difference(&self.current_pairs)
            .copied()
            .collect()
    }

    /// Broad-phase grid, for inspection and debug drawing
    pub fn grid(&self) -> &SpatialHashGrid<BodyHandle> {
        &self.grid
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Zero, negative or non-finite `dt` leaves the world untouched.
    pub fn update(&mut self, dt: f32) -> StepStats {
        let mut stats = StepStats {
            bodies: self.bodies.len(),
            ..StepStats::default()
        };
        if !(dt.is_finite() && dt > 0.0) {
            log::warn!("Skipping physics step with invalid dt {}", dt);
            return stats;
        }

        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();
        self.contacts.clear();

        // 1. Integrate state
        for body in self.bodies.values_mut() {
            body.integrate_state(dt);
        }

        // 2. Broad phase
        let pairs = self.broad_phase();
        stats.candidate_pairs = pairs.len();

        // 3. Narrow phase
        self.narrow_phase(&pairs, &mut stats);
        stats.contacts = self.contacts.len();

        // 4. Resolution
        for result in &self.contacts {
            let Some([a, b]) = self.bodies.get_disjoint_mut([result.a, result.b]) else {
                continue;
            };
            let contact = Contact {
                normal: result.normal,
                penetration: result.penetration,
            };
            if resolve_contact(a, b, &contact) {
                stats.resolved += 1;
            }
        }

        // 5. Integrate transforms, 6. clear forces
        for body in self.bodies.values_mut() {
            body.integrate_transform(dt);
            body.clear_forces();
        }

        log::trace!(
            "Physics step: {} bodies, {} candidates, {} contacts, {} resolved",
            stats.bodies,
            stats.candidate_pairs,
            stats.contacts,
            stats.resolved
        );
        stats
    }

    /// Refresh the grid and collect distinct, layer-compatible pairs
    ///
    /// Pairs where neither body is Dynamic are dropped: nothing could move.
    fn broad_phase(&mut self) -> Vec<CollisionPair> {
        self.grid.clear_dirty();
        for (handle, body) in &self.bodies {
            self.grid.update(handle, body.broad_phase_bounds());
        }

        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for (handle, body) in &self.bodies {
            self.candidates.clear();
            self.grid.potential_collisions(handle, &body.broad_phase_bounds(), &mut self.candidates);

            for &other_handle in &self.candidates {
                let Some(other) = self.bodies.get(other_handle) else {
                    continue;
                };
                if !body.is_dynamic() && !other.is_dynamic() {
                    continue;
                }
                if !CollisionLayers::should_collide(body.layer(), body.mask(), other.layer(), other.mask()) {
                    continue;
                }

                let pair = CollisionPair::new(handle, other_handle);
                if seen.insert(pair) {
                    pairs.push(pair);
                }
            }
        }
        pairs
    }

    fn narrow_phase(&mut self, pairs: &[CollisionPair], stats: &mut StepStats) {
        for pair in pairs {
            let (Some(a), Some(b)) = (self.bodies.get(pair.a), self.bodies.get(pair.b)) else {
                continue;
            };

            match collide(a.collider(), &a.transform, b.collider(), &b.transform) {
                Ok(Some(contact)) => {
                    self.contacts.push(CollisionResult {
                        a: pair.a,
                        b: pair.b,
                        normal: contact.normal,
                        penetration: contact.penetration,
                    });
                    self.current_pairs.insert(*pair);
                }
                Ok(None) => {}
                Err(PhysicsError::MissingCollisionTest { a: kind_a, b: kind_b }) => {
                    stats.skipped_pairs += 1;
                    if self.reported_missing.insert((kind_a, kind_b)) {
                        log::warn!("No collision test for {:?} vs {:?}; skipping such pairs", kind_a, kind_b);
                    } else {
                        log::trace!("Skipped {:?} vs {:?} pair '{}' / '{}'", kind_a, kind_b, a.id(), b.id());
                    }
                }
                Err(error) => {
                    stats.skipped_pairs += 1;
                    log::error!("Collision test failed for '{}' / '{}': {}", a.id(), b.id(), error);
                }
            }
        }
    }
}
