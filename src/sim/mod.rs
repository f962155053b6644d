//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod combo;
pub mod level;
pub mod rect;
pub mod state;
pub mod tick;

pub use boss::{BeamPhase, Boss, BossAttack};
pub use collision::{ReflectAxis, ball_paddle_collision, reflect_from_rect};
pub use combo::ComboTracker;
pub use level::{cols, generate_level, is_boss_level, rows};
pub use rect::Rect;
pub use state::{
    ActiveEffects, Ball, Brick, BrickKind, GameEvent, GamePhase, GameState, HitOutcome, Laser,
    Message, Paddle, Particle, PowerUp, PowerUpKind,
};
pub use tick::{TickInput, apply_powerup, multiply_balls, tick};
