//! Play-field configuration
//!
//! A `GameConfig` is built once per session and handed to the simulation.
//! Nothing in the simulation reads screen dimensions from anywhere else.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Immutable geometry and pacing of a game session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play-field width in pixels
    pub width: f32,
    /// Play-field height in pixels
    pub height: f32,

    /// Paddle size at level start
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Distance from the bottom edge to the paddle top
    pub paddle_bottom_offset: f32,
    /// Paddle speed (pixels per frame)
    pub paddle_speed: f32,
    /// Largest width the big-paddle power-up may reach
    pub paddle_max_width: f32,

    /// Ball radius at launch
    pub ball_radius: f32,
    /// Smallest radius the tiny-ball power-up may reach
    pub ball_min_radius: f32,
    /// Launch speed per axis (pixels per frame)
    pub ball_launch_speed: f32,
    /// Speed limits applied when power-ups scale ball speed
    pub ball_min_speed: f32,
    pub ball_max_speed: f32,

    /// Lives at session start
    pub start_lives: u32,
    /// Clearing this level wins the game
    pub max_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 720.0,

            paddle_width: 120.0,
            paddle_height: 12.0,
            paddle_bottom_offset: 40.0,
            paddle_speed: 7.0,
            paddle_max_width: 300.0,

            ball_radius: 7.0,
            ball_min_radius: 3.0,
            ball_launch_speed: 4.0,
            ball_min_speed: 2.0,
            ball_max_speed: 16.0,

            start_lives: 3,
            max_level: 50,
        }
    }
}

impl GameConfig {
    /// Y coordinate of the paddle's top edge
    pub fn paddle_top(&self) -> f32 {
        self.height - self.paddle_bottom_offset
    }

    /// Load a config file, falling back to defaults if it is missing or bad
    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read config {}: {}, using defaults", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(config) => {
                log::info!("Loaded game config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Malformed config {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Config from the file named by `$ARKANOID_CONFIG`, or the defaults
    pub fn from_env() -> Self {
        match std::env::var_os("ARKANOID_CONFIG") {
            Some(path) => Self::load_from(Path::new(&path)),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paddle_sits_above_bottom() {
        let config = GameConfig::default();
        assert!(config.paddle_top() < config.height);
        assert!(config.paddle_top() + config.paddle_height <= config.height);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"width": 640.0}"#).unwrap();
        assert_eq!(config.width, 640.0);
        assert_eq!(config.height, GameConfig::default().height);
        assert_eq!(config.max_level, 50);
    }

    #[test]
    fn test_load_from_file() {
        let path =
            std::env::temp_dir().join(format!("arkanoid_config_{}.json", std::process::id()));
        let config = GameConfig {
            start_lives: 5,
            max_level: 12,
            ..GameConfig::default()
        };
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(GameConfig::load_from(&path), config);

        fs::write(&path, "[1, 2").unwrap();
        assert_eq!(GameConfig::load_from(&path), GameConfig::default());
        fs::remove_file(&path).unwrap();
        assert_eq!(GameConfig::load_from(&path), GameConfig::default());
    }
}
