//! # Game Configuration
//!
//! All numeric tuning constants consumed by the core live here: the
//! engine reads them and never mutates them at runtime. Configurations
//! load from TOML or RON files through the [`Config`] trait, with
//! builder-style overrides for tests and embedding hosts.

use serde::{Deserialize, Serialize};

/// Configuration trait with file loading support
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
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

/// # Game Configuration
///
/// Tuning constants for physics, input grace windows, the spatial grid,
/// and the performance manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Gravity in units per second squared, positive downward
    pub gravity: f32,
    /// Upward launch speed applied on jump, in units per second
    pub jump_impulse: f32,
    /// Y coordinate the entity's position rests on while grounded
    pub ground_y: f32,
    /// Play-area width in units
    pub play_width: f32,
    /// Play-area height in units
    pub play_height: f32,
    /// Entity start position on the x axis
    pub start_x: f32,
    /// Entity box width
    pub entity_width: f32,
    /// Entity box height
    pub entity_height: f32,
    /// Horizontal run speed in units per second
    pub run_speed: f32,
    /// Seconds after leaving the ground during which jump is still honored
    pub coyote_window: f32,
    /// Seconds the Landing state holds before releasing to Idle/Running
    pub landing_grace: f32,
    /// Spatial grid cell edge length; roughly 2-4x typical object size
    pub cell_size: f32,
    /// Target frame rate for the performance manager
    pub target_fps: u32,
    /// Deltas above this multiple of the target frame time skip physics
    pub max_frame_scale: f32,
    /// Maximum idle instances kept per object pool
    pub pool_max_free: usize,
    /// Free-list floor applied by the cleanup operation
    pub pool_trim_floor: usize,
    /// Per-frame quality factor step
    pub quality_step: f32,
    /// Rolling frame-time window length, in frames
    pub frame_history: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 2200.0,
            jump_impulse: 880.0,
            ground_y: 400.0,
            play_width: 800.0,
            play_height: 450.0,
            start_x: 96.0,
            entity_width: 32.0,
            entity_height: 48.0,
            run_speed: 240.0,
            coyote_window: 0.1,
            landing_grace: 0.1,
            cell_size: 100.0,
            target_fps: 60,
            max_frame_scale: 4.0,
            pool_max_free: 64,
            pool_trim_floor: 8,
            quality_step: 0.05,
            frame_history: 120,
        }
    }
}

impl GameConfig {
    /// Target frame time in seconds
    pub fn target_frame_time(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the jump launch impulse
    pub fn with_jump_impulse(mut self, impulse: f32) -> Self {
        self.jump_impulse = impulse;
        self
    }

    /// Set the ground reference line
    pub fn with_ground_y(mut self, ground_y: f32) -> Self {
        self.ground_y = ground_y;
        self
    }

    /// Set the horizontal run speed
    pub fn with_run_speed(mut self, speed: f32) -> Self {
        self.run_speed = speed;
        self
    }

    /// Set the coyote window length
    pub fn with_coyote_window(mut self, seconds: f32) -> Self {
        self.coyote_window = seconds;
        self
    }

    /// Set the landing grace duration
    pub fn with_landing_grace(mut self, seconds: f32) -> Self {
        self.landing_grace = seconds;
        self
    }

    /// Set the spatial grid cell size
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the target frame rate
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cell_size <= 0.0 {
            return Err("Grid cell size must be positive".to_string());
        }
        if self.target_fps == 0 {
            return Err("Target FPS must be at least 1".to_string());
        }
        if self.play_width <= 0.0 || self.play_height <= 0.0 {
            return Err("Play area dimensions must be positive".to_string());
        }
        if self.entity_width <= 0.0 || self.entity_height <= 0.0 {
            return Err("Entity dimensions must be positive".to_string());
        }
        if self.max_frame_scale < 1.0 {
            return Err("Max frame scale must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.quality_step) {
            return Err("Quality step must lie in [0, 1]".to_string());
        }
        Ok(())
    }
}

impl Config for GameConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = GameConfig::default()
            .with_gravity(0.8)
            .with_jump_impulse(15.0)
            .with_ground_y(300.0);

        assert_eq!(config.gravity, 0.8);
        assert_eq!(config.jump_impulse, 15.0);
        assert_eq!(config.ground_y, 300.0);
    }

    #[test]
    fn test_invalid_cell_size_rejected() {
        let config = GameConfig::default().with_cell_size(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_target_fps_rejected() {
        let config = GameConfig::default().with_target_fps(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_target_frame_time() {
        let config = GameConfig::default().with_target_fps(60);
        assert!((config.target_frame_time() - 1.0 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GameConfig::default().with_gravity(123.0);
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: GameConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.gravity, 123.0);
        assert_eq!(parsed.target_fps, config.target_fps);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = GameConfig::default().with_cell_size(64.0);
        let text = ron::ser::to_string_pretty(&config, Default::default()).unwrap();
        let parsed: GameConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed.cell_size, 64.0);
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let result = GameConfig::default().save_to_file("config.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = GameConfig::load_from_file("does_not_exist.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
