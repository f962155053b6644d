//! Game settings and preferences
//!
//! Persisted as JSON next to the record file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::highscores::DEFAULT_RECORD_PATH;

/// Settings file used when `$ARKANOID_SETTINGS` is unset
pub const DEFAULT_SETTINGS_PATH: &str = "arkanoid_settings.json";

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 512,
        }
    }

    /// Ball trail length in positions
    pub fn trail_length(&self) -> usize {
        match self {
            QualityPreset::Low => 2,
            QualityPreset::Medium | QualityPreset::High => crate::consts::TRAIL_LENGTH,
        }
    }

    /// Whether to draw the background starfield
    pub fn starfield_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Ball trails
    pub trails: bool,
    /// Particle effects (brick debris)
    pub particles: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Accessibility ===
    /// Reduced motion (no starfield, no flashes)
    pub reduced_motion: bool,

    // === Storage ===
    /// Best score file
    pub record_path: PathBuf,

    /// Fixed run seed; random when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            trails: true,
            particles: true,

            show_fps: false,

            sound: true,
            master_volume: 0.8,

            reduced_motion: false,

            record_path: PathBuf::from(DEFAULT_RECORD_PATH),
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops trails for readability on small terminals
        if preset == QualityPreset::Low {
            self.trails = false;
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective trail length
    pub fn trail_length(&self) -> usize {
        if !self.trails {
            0
        } else {
            self.quality.trail_length()
        }
    }

    /// Effective starfield (respects reduced_motion)
    pub fn effective_starfield(&self) -> bool {
        self.quality.starfield_enabled() && !self.reduced_motion
    }

    /// Effective flashes (respects reduced_motion)
    pub fn effective_flashes(&self) -> bool {
        !self.reduced_motion
    }

    /// Settings path from `$ARKANOID_SETTINGS`, or the default file
    pub fn default_path() -> PathBuf {
        std::env::var_os("ARKANOID_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH))
    }

    /// Load settings, falling back to defaults if the file is missing or bad
    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Malformed settings {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "arkanoid_settings_{}_{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }

    #[test]
    fn test_effective_caps() {
        let mut settings = Settings::default();
        assert_eq!(settings.max_particles(), 256);
        assert_eq!(settings.trail_length(), crate::consts::TRAIL_LENGTH);

        settings.particles = false;
        settings.trails = false;
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.trail_length(), 0);

        let low = Settings::from_preset(QualityPreset::Low);
        assert_eq!(low.trail_length(), 0);
        assert_eq!(low.max_particles(), 64);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_settings("roundtrip");
        let mut settings = Settings::from_preset(QualityPreset::High);
        settings.sound = false;
        settings.seed = Some(42);
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_or_malformed_falls_back() {
        let path = temp_settings("fallback");
        assert_eq!(Settings::load_from(&path), Settings::default());

        fs::write(&path, "{ this is not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_settings("partial");
        fs::write(&path, r#"{ "sound": false }"#).unwrap();
        let settings = Settings::load_from(&path);
        assert!(!settings.sound);
        assert_eq!(settings.record_path, PathBuf::from(DEFAULT_RECORD_PATH));
        fs::remove_file(&path).unwrap();
    }
}
