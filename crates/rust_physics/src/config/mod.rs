//! Configuration system
//!
//! `PhysicsConfig` carries the tunables the physics core recognises. Anything
//! the owning simulation decides (gravity, default restitution of its
//! objects) stays in the caller's own configuration.

pub use serde::{Serialize, Deserialize};

use crate::error::PhysicsError;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        Self::from_str_with_format(&contents, path)
    }

    /// Parse configuration text, picking the format from `path`'s extension
    fn from_str_with_format(contents: &str, path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Default broad-phase cell edge length in world units
pub const DEFAULT_CELL_SIZE: f32 = 3.0;

/// Tunables of the physics core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Edge length of a spatial hash cell; must be finite and > 0
    pub cell_size: f32,

    /// Number of bodies to reserve storage for up front
    pub initial_capacity: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            initial_capacity: 64,
        }
    }
}

impl Config for PhysicsConfig {}

impl PhysicsConfig {
    /// Default configuration with a custom cell size
    pub fn with_cell_size(cell_size: f32) -> Self {
        Self {
            cell_size,
            ..Default::default()
        }
    }

    /// Reject values the core cannot run with
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(PhysicsError::InvalidCellSize(self.cell_size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PhysicsConfig::default();
        assert_eq!(config.cell_size, DEFAULT_CELL_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_cell_size() {
        for cell_size in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let result = PhysicsConfig::with_cell_size(cell_size).validate();
            assert!(matches!(result, Err(PhysicsError::InvalidCellSize(_))));
        }
    }

    #[test]
    fn test_parse_toml_and_ron() {
        let from_toml = PhysicsConfig::from_str_with_format("cell_size = 2.5\n", "physics.toml").unwrap();
        assert_eq!(from_toml.cell_size, 2.5);
        assert_eq!(from_toml.initial_capacity, 64);

        let from_ron = PhysicsConfig::from_str_with_format(
            "(cell_size: 4.0, initial_capacity: 8)",
            "physics.ron",
        ).unwrap();
        assert_eq!(from_ron.cell_size, 4.0);
        assert_eq!(from_ron.initial_capacity, 8);
    }

    #[test]
    fn test_unsupported_format() {
        let result = PhysicsConfig::from_str_with_format("{}", "physics.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!("rust_physics_config_{}.toml", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let config = PhysicsConfig { cell_size: 1.5, initial_capacity: 12 };
        config.save_to_file(&path).unwrap();
        let loaded = PhysicsConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
