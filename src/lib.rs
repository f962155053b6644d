//! Arkanoid - a brick breaker with power-ups, combos and boss levels
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, level generation, scoring)
//! - `renderer`: Terminal rendering of the simulation state
//! - `app`: Menu and session handling on top of the simulation
//! - `config` / `settings`: Play-field configuration and user preferences
//! - `highscores`: Best score persistence

pub mod app;
pub mod audio;
pub mod config;
pub mod highscores;
pub mod input;
pub mod palette;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use highscores::HighScore;
pub use settings::{QualityPreset, Settings};

/// Game tuning constants
pub mod consts {
    /// Nominal frame rate the game is tuned for
    pub const TARGET_FPS: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TARGET_FPS as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Motion scale of one simulation step, in nominal frames
    pub const FRAME_STEP: f32 = 1.0;

    /// Power-up effect duration (ticks)
    pub const EFFECT_DURATION_TICKS: u32 = 600;
    /// Ticks between laser volleys
    pub const LASER_COOLDOWN_TICKS: u32 = 15;
    /// Laser bolt speed (pixels per frame, upward)
    pub const LASER_SPEED: f32 = 10.0;
    pub const LASER_WIDTH: f32 = 3.0;
    pub const LASER_HEIGHT: f32 = 15.0;
    /// Horizontal inset of the laser cannons from the paddle edges
    pub const LASER_INSET: f32 = 7.0;

    /// Power-up pickup fall speed and size
    pub const POWERUP_FALL_SPEED: f32 = 2.5;
    pub const POWERUP_RADIUS: f32 = 10.0;
    /// Chance a destroyed brick drops a power-up
    pub const POWERUP_DROP_CHANCE: f64 = 0.35;

    /// Magnet pull radius and strength
    pub const MAGNET_RADIUS: f32 = 200.0;
    pub const MAGNET_FORCE: f32 = 0.3;

    /// Explosive brick blast reach beyond its own rect
    pub const EXPLOSION_REACH: f32 = 50.0;

    /// Combo decay window (ticks)
    pub const COMBO_WINDOW_TICKS: u32 = 120;
    /// Base score of a brick destruction before combo scaling
    pub const COMBO_BASE_SCORE: f64 = 100.0;

    /// Flat score rewards
    pub const SCORE_BRICK_DAMAGED: u64 = 25;
    pub const SCORE_CHAIN_DESTROYED: u64 = 50;
    pub const SCORE_LASER_DESTROYED: u64 = 50;

    /// On-screen message lifetimes (ticks)
    pub const POWERUP_MESSAGE_TICKS: u32 = 120;
    pub const LEVEL_MESSAGE_TICKS: u32 = 90;

    /// Every Nth level is a boss level
    pub const BOSS_LEVEL_INTERVAL: u32 = 10;

    /// Ball trail length (positions)
    pub const TRAIL_LENGTH: usize = 5;

    /// Particle gravity (pixels per frame squared)
    pub const PARTICLE_GRAVITY: f32 = 0.2;
}
