//! Physics sandbox
//!
//! Drops a scripted scene onto a hull floor and runs it headless: a sweeping
//! kinematic paddle, falling spheres and crates, and one box-shaped prop
//! whose pairs have no narrow-phase test. Progress and contact events go to
//! the log.
//!
//! Usage: `physics_sandbox [scene.toml|scene.ron]`

use rand::prelude::*;
use rust_physics::foundation::logging;
use rust_physics::foundation::time::{FixedTimestep, StepTimer};
use rust_physics::prelude::*;
use serde::{Deserialize, Serialize};

/// Static capsules the spheres rest on
const ROLLERS: CollisionLayers = CollisionLayers::from_bits_retain(1 << 8);

const ROLLER_COUNT: usize = 25;

/// Sandbox failures
#[derive(thiserror::Error, Debug)]
enum SandboxError {
    #[error("Failed to load scene: {0}")]
    Config(#[from] ConfigError),

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Invalid scene: {0}")]
    Scene(String),
}

/// Scene settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct SandboxConfig {
    /// Acceleration applied to every dynamic body each step
    gravity: [f32; 3],
    /// Fixed simulation step in seconds
    timestep: f32,
    /// Simulated frame time fed into the step accumulator
    frame_time: f32,
    /// Seconds of simulation to run
    duration: f32,
    /// Broad-phase cell size
    cell_size: f32,
    sphere_count: usize,
    crate_count: usize,
    seed: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            timestep: 1.0 / 60.0,
            frame_time: 1.0 / 30.0,
            duration: 5.0,
            cell_size: 3.0,
            sphere_count: 24,
            crate_count: 6,
            seed: 7,
        }
    }
}

impl Config for SandboxConfig {}

impl SandboxConfig {
    fn gravity(&self) -> Vec3 {
        Vec3::new(self.gravity[0], self.gravity[1], self.gravity[2])
    }
}

struct Sandbox {
    config: SandboxConfig,
    physics: PhysicsSystem,
    paddle: BodyHandle,
    dynamic: Vec<BodyHandle>,
    elapsed: f32,
}

impl Sandbox {
    fn new(config: SandboxConfig) -> Result<Self, SandboxError> {
        if !(config.timestep > 0.0 && config.frame_time > 0.0) {
            return Err(SandboxError::Scene(format!(
                "timestep {} and frame time {} must be positive",
                config.timestep, config.frame_time
            )));
        }

        let mut physics = PhysicsSystem::new(PhysicsConfig {
            cell_size: config.cell_size,
            initial_capacity: config.sphere_count + config.crate_count + ROLLER_COUNT + 3,
        })?;

        // crates land on the hull floor, spheres on a bed of capsule rollers
        // level with its top
        physics.register_body(
            "floor",
            BodyDesc::fixed(Collider::cuboid_hull(Vec3::new(12.0, 0.5, 12.0))?)
                .with_restitution(0.2)
                .with_layers(CollisionLayers::WORLD, CollisionLayers::all()),
        )?;
        for i in 0..ROLLER_COUNT {
            let x = -12.0 + i as f32;
            physics.register_body(
                format!("roller_{i}"),
                BodyDesc::fixed(Collider::capsule(0.5, 24.0)?)
                    .with_position(Vec3::new(x, 0.0, 0.0))
                    .with_restitution(0.2)
                    .with_layers(ROLLERS, CollisionLayers::all()),
            )?;
        }

        let paddle = physics.register_body(
            "paddle",
            BodyDesc::kinematic(Collider::capsule(0.6, 6.0)?)
                .with_position(Vec3::new(-8.0, 1.5, 0.0))
                .with_layers(CollisionLayers::PLAYER, CollisionLayers::all()),
        )?;

        // no box-vs-sphere test exists; its pairs are reported and skipped
        physics.register_body(
            "pillar",
            BodyDesc::fixed(Collider::obb(Vec3::new(1.0, 3.0, 1.0))?)
                .with_position(Vec3::new(6.0, 3.5, 6.0)),
        )?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut dynamic = Vec::with_capacity(config.sphere_count + config.crate_count);

        for i in 0..config.sphere_count {
            let position = Vec3::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(3.0..12.0),
                rng.gen_range(-8.0..8.0),
            );
            let desc = BodyDesc::dynamic(Collider::sphere(rng.gen_range(0.3..0.8))?, rng.gen_range(0.5..3.0))
                .with_position(position)
                .with_restitution(rng.gen_range(0.1..0.9))
                .with_layers(CollisionLayers::DEBRIS, CollisionLayers::all() - CollisionLayers::WORLD);
            dynamic.push(physics.register_body(format!("sphere_{i}"), desc)?);
        }

        for i in 0..config.crate_count {
            let half = rng.gen_range(0.4..0.9);
            let position = Vec3::new(rng.gen_range(-6.0..6.0), rng.gen_range(2.0..6.0), rng.gen_range(-6.0..6.0));
            let desc = BodyDesc::dynamic(Collider::cuboid_hull(Vec3::new(half, half, half))?, 4.0)
                .with_position(position)
                .with_restitution(0.1)
                .with_layers(CollisionLayers::PROP, CollisionLayers::all() - ROLLERS);
            dynamic.push(physics.register_body(format!("crate_{i}"), desc)?);
        }

        log::info!("Scene ready with {} bodies", physics.body_count());

        Ok(Self {
            config,
            physics,
            paddle,
            dynamic,
            elapsed: 0.0,
        })
    }

    fn step(&mut self, dt: f32) {
        self.elapsed += dt;
        let gravity = self.config.gravity();
        for &handle in &self.dynamic {
            if let Some(body) = self.physics.body_mut(handle) {
                body.apply_force(gravity);
            }
        }

        if let Some(paddle) = self.physics.body_mut(self.paddle) {
            let x = 8.0 * (self.elapsed * 0.8).sin();
            paddle.set_position(Vec3::new(x, 1.5, 0.0));
        }

        let stats = self.physics.update(dt);
        log::debug!("t={:.2}s {:?}", self.elapsed, stats);

        for pair in self.physics.collisions_entered() {
            log::trace!("Contact began: {} / {}", self.name(pair.a), self.name(pair.b));
        }
        for pair in self.physics.collisions_exited() {
            log::trace!("Contact ended: {} / {}", self.name(pair.a), self.name(pair.b));
        }
    }

    /// Stand-in for pushing transforms into a renderer
    fn sync(&mut self) -> usize {
        let synced = self.physics.dirty_bodies().count();
        self.physics.clear_dirty();
        synced
    }

    fn name(&self, handle: BodyHandle) -> &str {
        self.physics.body(handle).map_or("<removed>", |body| body.id())
    }

    fn run(&mut self) {
        let mut timestep = FixedTimestep::new(self.config.timestep, 8);
        let mut timer = StepTimer::new();

        while self.elapsed < self.config.duration {
            timer.begin();
            let steps = timestep.advance(self.config.frame_time);
            for _ in 0..steps {
                self.step(timestep.step());
            }
            let cost_ms = timer.end();
            let synced = self.sync();

            if timer.frames() % 30 == 0 {
                log::info!(
                    "Frame {} (t={:.2}s): {} bodies synced, {} contacts, {:.3}ms",
                    timer.frames(),
                    self.elapsed,
                    synced,
                    self.physics.contacts().len(),
                    cost_ms
                );
            }
        }

        self.report();
        log::info!(
            "Physics cost per frame: {:.3}ms average, {:.3}ms worst over {} frames",
            timer.average_ms(),
            timer.worst_ms(),
            timer.frames()
        );
    }

    fn report(&self) {
        let mut resting = 0;
        for &handle in &self.dynamic {
            let Some(body) = self.physics.body(handle) else {
                continue;
            };
            if body.transform.position.y < -1.0 {
                log::warn!("{} fell through the floor (y={:.2})", body.id(), body.transform.position.y);
            } else if body.velocity.norm() < 0.5 {
                resting += 1;
            }
        }
        log::info!(
            "Finished {:.2}s of simulation: {}/{} dynamic bodies at rest",
            self.elapsed,
            resting,
            self.dynamic.len()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(logging::LevelFilter::Info);
    log::info!("Starting physics sandbox");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading scene from {}", path);
            SandboxConfig::load_from_file(&path).map_err(SandboxError::from)?
        }
        None => SandboxConfig::default(),
    };

    let mut sandbox = Sandbox::new(config)?;
    sandbox.run();
    Ok(())
}
