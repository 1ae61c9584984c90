//! Simulation configuration resource.
//!
//! Manages simulation settings loaded from an INI configuration file.
//! Provides defaults for safe startup and a loader that keeps current values
//! for any key the file omits.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! tile_size = 32.0
//! tick_interval = 0.6
//! belt_speed = 0.5
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_TILE_SIZE: f32 = 32.0;
const DEFAULT_TICK_INTERVAL: f32 = 0.6;
const DEFAULT_BELT_SPEED: f32 = crate::components::conveyor::CONVEYOR_SPEED;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Simulation configuration resource.
///
/// Stores the tile size, the fixed simulation tick interval, and the belt
/// speed in progress units per second.
#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    /// Edge length of one grid tile in world units.
    pub tile_size: f32,
    /// Fixed simulation tick interval in seconds.
    pub tick_interval: f32,
    /// Belt speed in normalized progress per second.
    pub belt_speed: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            tick_interval: DEFAULT_TICK_INTERVAL,
            belt_speed: DEFAULT_BELT_SPEED,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("failed to load {}: {}", self.config_path.display(), e))?;

        if let Ok(Some(v)) = config.getfloat("simulation", "tile_size") {
            self.tile_size = v as f32;
        }
        if let Ok(Some(v)) = config.getfloat("simulation", "tick_interval") {
            self.tick_interval = v as f32;
        }
        if let Ok(Some(v)) = config.getfloat("simulation", "belt_speed") {
            self.belt_speed = v as f32;
        }

        info!(
            "loaded config from {}: tile_size={}, tick_interval={}, belt_speed={}",
            self.config_path.display(),
            self.tile_size,
            self.tick_interval,
            self.belt_speed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimConfig::new();
        assert_eq!(config.tile_size, 32.0);
        assert_eq!(config.tick_interval, 0.6);
        assert_eq!(config.belt_speed, 0.5);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = SimConfig::with_path("/nonexistent/config.ini");
        assert!(config.load_from_file().is_err());
        // Defaults survive a failed load.
        assert_eq!(config.tile_size, 32.0);
    }
}
