//! Error types for the physics core

use thiserror::Error;

use crate::config::ConfigError;
use crate::physics::collider::ShapeKind;

/// Errors reported by the physics core
///
/// Construction-time problems (bad cell size, oversized hulls) are fatal for
/// the value being built. `MissingCollisionTest` is recoverable: the pair is
/// skipped for the frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Spatial hash cell size is zero, negative or not finite
    #[error("Invalid spatial hash cell size: {0} (must be finite and > 0)")]
    InvalidCellSize(f32),

    /// Convex hull exceeds the per-collider vertex storage
    #[error("Convex hull has {count} vertices, maximum is {max}")]
    TooManyHullVertices {
        /// Vertices supplied
        count: usize,
        /// Compile-time limit
        max: usize,
    },

    /// Convex hull built from no vertices
    #[error("Convex hull has no vertices")]
    EmptyHull,

    /// Shape dimension negative or not finite
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// No narrow-phase test exists for this shape pair
    #[error("No collision test for {a:?} vs {b:?}")]
    MissingCollisionTest {
        /// Shape of the first collider
        a: ShapeKind,
        /// Shape of the second collider
        b: ShapeKind,
    },

    /// A body with this id is already registered
    #[error("Body already registered: {0}")]
    DuplicateBody(String),

    /// No body is registered under this id
    #[error("Unknown body: {0}")]
    UnknownBody(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ConfigError> for PhysicsError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}
