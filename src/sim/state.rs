//! Game state and core simulation types
//!
//! Everything the frame step mutates lives here: the paddle, the entity
//! collections, progression counters and the outgoing event queue.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::boss::Boss;
use super::combo::ComboTracker;
use super::rect::Rect;
use crate::config::GameConfig;
use crate::consts::*;
use crate::palette;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen until the pause key is pressed again
    Paused,
    /// All lives lost
    GameOver,
    /// Cleared the final level
    Victory,
}

impl GamePhase {
    /// True once the session can no longer continue
    pub fn is_finished(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}

/// A ball entity
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
    /// Recent positions for rendering (newest first)
    pub trail: Vec<Vec2>,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            alive: true,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Record current position to trail, keeping at most `max_len` points
    pub fn record_trail(&mut self, max_len: usize) {
        if max_len == 0 {
            self.trail.clear();
            return;
        }
        self.trail.insert(0, self.pos);
        self.trail.truncate(max_len);
    }

    /// Integrate position and bounce off the left, right and top walls
    pub fn advance(&mut self, dt: f32, field_width: f32) {
        self.pos += self.vel * dt;

        if self.pos.x - self.radius <= 0.0 {
            self.pos.x = self.radius;
            self.vel.x = -self.vel.x;
        }
        if self.pos.x + self.radius >= field_width {
            self.pos.x = field_width - self.radius;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y - self.radius <= 0.0 {
            self.pos.y = self.radius;
            self.vel.y = -self.vel.y;
        }
    }
}

/// Timed paddle power-ups (an effect is active while its counter is non-zero)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveEffects {
    pub laser_ticks: u32,
    pub shield_ticks: u32,
    pub magnet_ticks: u32,
}

impl ActiveEffects {
    pub fn has_laser(&self) -> bool {
        self.laser_ticks > 0
    }

    pub fn has_shield(&self) -> bool {
        self.shield_ticks > 0
    }

    pub fn has_magnet(&self) -> bool {
        self.magnet_ticks > 0
    }

    pub fn any(&self) -> bool {
        self.has_laser() || self.has_shield() || self.has_magnet()
    }

    fn countdown(&mut self) {
        self.laser_ticks = self.laser_ticks.saturating_sub(1);
        self.shield_ticks = self.shield_ticks.saturating_sub(1);
        self.magnet_ticks = self.magnet_ticks.saturating_sub(1);
    }
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    pub rect: Rect,
    /// Movement speed (pixels per frame)
    pub speed: f32,
    /// Width restored at every level start
    pub base_width: f32,
    pub effects: ActiveEffects,
    /// Ticks until the laser can fire again
    pub laser_cooldown: u32,
    /// Cosmetic flash after a boss attack touches the paddle
    pub graze_ticks: u32,
}

impl Paddle {
    pub fn new(config: &GameConfig) -> Self {
        let x = config.width / 2.0 - config.paddle_width / 2.0;
        Self {
            rect: Rect::new(x, config.paddle_top(), config.paddle_width, config.paddle_height),
            speed: config.paddle_speed,
            base_width: config.paddle_width,
            effects: ActiveEffects::default(),
            laser_cooldown: 0,
            graze_ticks: 0,
        }
    }

    /// Move horizontally by `dir` (-1, 0, 1), clamped to the play-field
    pub fn move_by(&mut self, dir: f32, dt: f32, field_width: f32) {
        self.rect.x += dir * self.speed * dt;
        self.clamp_to(field_width);
    }

    pub fn clamp_to(&mut self, field_width: f32) {
        let max_x = (field_width - self.rect.w).max(0.0);
        self.rect.x = self.rect.x.clamp(0.0, max_x);
    }

    /// Count down effect timers and the laser cooldown
    pub fn update_timers(&mut self) {
        self.effects.countdown();
        self.laser_cooldown = self.laser_cooldown.saturating_sub(1);
        self.graze_ticks = self.graze_ticks.saturating_sub(1);
    }

    /// Drop every timed effect and restore the level-start width
    pub fn reset_for_level(&mut self, field_width: f32) {
        self.effects = ActiveEffects::default();
        self.laser_cooldown = 0;
        self.graze_ticks = 0;
        let center = self.rect.center().x;
        self.rect.w = self.base_width;
        self.rect.x = center - self.base_width / 2.0;
        self.clamp_to(field_width);
    }

    /// Fire a pair of lasers if the laser effect is active and cooled down
    pub fn shoot_laser(&mut self) -> Option<[Laser; 2]> {
        if !self.effects.has_laser() || self.laser_cooldown > 0 {
            return None;
        }
        self.laser_cooldown = LASER_COOLDOWN_TICKS;
        let top = self.rect.top();
        Some([
            Laser::new(Vec2::new(self.rect.left() + LASER_INSET, top)),
            Laser::new(Vec2::new(self.rect.right() - LASER_INSET, top)),
        ])
    }
}

/// Brick variants with their per-variant behaviour state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrickKind {
    /// Plain brick, darkens as it takes hits
    Normal,
    /// Indestructible, never counts toward clearing a level
    Obstacle,
    /// Slides back and forth around its spawn column
    Moving {
        origin_x: f32,
        dir: f32,
        speed: f32,
        range: f32,
    },
    /// Damages its neighbours when destroyed
    Explosive,
    /// Cycles through the rainbow palette
    Rainbow { color_index: usize, timer: u32 },
    /// Fills every cell of a boss level
    Boss,
}

/// Frames between rainbow colour steps
pub const RAINBOW_STEP_TICKS: u32 = 5;
/// How far a moving brick strays from its spawn x
pub const MOVING_BRICK_RANGE: f32 = 50.0;
pub const MOVING_BRICK_SPEED: f32 = 1.0;

/// Result of striking a brick once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Obstacle shrugged it off
    Blocked,
    /// Lost a hit point but still standing
    Damaged,
    /// Hit count reached zero
    Destroyed,
}

/// A brick entity
#[derive(Debug, Clone)]
pub struct Brick {
    pub id: u32,
    pub rect: Rect,
    pub hits: u32,
    pub max_hits: u32,
    pub kind: BrickKind,
}

impl Brick {
    pub fn new(id: u32, rect: Rect, hits: u32, kind: BrickKind) -> Self {
        Self {
            id,
            rect,
            hits,
            max_hits: hits,
            kind,
        }
    }

    /// Per-frame animation
    pub fn update(&mut self) {
        match &mut self.kind {
            BrickKind::Moving {
                origin_x,
                dir,
                speed,
                range,
            } => {
                self.rect.x += *dir * *speed;
                if (self.rect.x - *origin_x).abs() > *range {
                    *dir = -*dir;
                }
            }
            BrickKind::Rainbow { color_index, timer } => {
                *timer += 1;
                if *timer >= RAINBOW_STEP_TICKS {
                    *timer = 0;
                    *color_index = (*color_index + 1) % palette::RAINBOW.len();
                }
            }
            _ => {}
        }
    }

    /// Apply a single hit
    pub fn hit(&mut self) -> HitOutcome {
        if self.is_obstacle() {
            return HitOutcome::Blocked;
        }
        if self.hits == 0 {
            // Already destroyed; never score twice
            return HitOutcome::Blocked;
        }
        self.hits -= 1;
        if self.hits == 0 {
            HitOutcome::Destroyed
        } else {
            HitOutcome::Damaged
        }
    }

    pub fn is_obstacle(&self) -> bool {
        self.kind == BrickKind::Obstacle
    }

    pub fn is_explosive(&self) -> bool {
        self.kind == BrickKind::Explosive
    }

    /// Returns true if this brick must be destroyed to clear the level
    pub fn counts_for_clear(&self) -> bool {
        !self.is_obstacle()
    }

    /// Display colour for the current state
    pub fn color(&self) -> u32 {
        match self.kind {
            BrickKind::Normal => {
                let ratio = self.hits as f32 / self.max_hits.max(1) as f32;
                palette::shade(palette::BRICK, ratio)
            }
            _ => self.base_color(),
        }
    }

    /// Undamaged colour, used for debris
    pub fn base_color(&self) -> u32 {
        match self.kind {
            BrickKind::Normal => palette::BRICK,
            BrickKind::Obstacle => palette::OBSTACLE,
            BrickKind::Moving { .. } => palette::MOVING_BRICK,
            BrickKind::Explosive => palette::EXPLOSIVE_BRICK,
            BrickKind::Rainbow { color_index, .. } => palette::RAINBOW[color_index],
            BrickKind::Boss => palette::BOSS,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    MultiBall2,
    MultiBall3,
    Slow,
    Fast,
    BigPaddle,
    TinyBall,
    Laser,
    Shield,
    Magnet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 9] = [
        PowerUpKind::MultiBall2,
        PowerUpKind::MultiBall3,
        PowerUpKind::Slow,
        PowerUpKind::Fast,
        PowerUpKind::BigPaddle,
        PowerUpKind::TinyBall,
        PowerUpKind::Laser,
        PowerUpKind::Shield,
        PowerUpKind::Magnet,
    ];

    /// Relative drop weight, indexed like `ALL`
    pub const WEIGHTS: [f64; 9] = [0.20, 0.15, 0.12, 0.12, 0.08, 0.05, 0.10, 0.10, 0.08];

    /// Short label drawn on the falling pickup
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::MultiBall2 => "x2",
            PowerUpKind::MultiBall3 => "x3",
            PowerUpKind::Slow => "slo",
            PowerUpKind::Fast => "fas",
            PowerUpKind::BigPaddle => "big",
            PowerUpKind::TinyBall => "tin",
            PowerUpKind::Laser => "las",
            PowerUpKind::Shield => "shi",
            PowerUpKind::Magnet => "mag",
        }
    }

    /// Banner shown when the pickup is collected
    pub fn message(self) -> &'static str {
        match self {
            PowerUpKind::MultiBall2 => "Ball x2!",
            PowerUpKind::MultiBall3 => "Ball x3!",
            PowerUpKind::Slow => "Slow Motion!",
            PowerUpKind::Fast => "Speed Up!",
            PowerUpKind::BigPaddle => "Big Paddle!",
            PowerUpKind::TinyBall => "Tiny Ball!",
            PowerUpKind::Laser => "LASER ACTIVATED!",
            PowerUpKind::Shield => "SHIELD ON!",
            PowerUpKind::Magnet => "MAGNET POWER!",
        }
    }
}

/// A falling power-up pickup
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub vel_y: f32,
    pub radius: f32,
    pub alive: bool,
    /// Spin angle in degrees (cosmetic)
    pub rotation: f32,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel_y: POWERUP_FALL_SPEED,
            radius: POWERUP_RADIUS,
            alive: true,
            rotation: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }

    pub fn update(&mut self, dt: f32, field_height: f32) {
        self.pos.y += self.vel_y * dt;
        self.rotation = (self.rotation + 5.0 * dt) % 360.0;
        if self.pos.y > field_height + 50.0 {
            self.alive = false;
        }
    }
}

/// A laser bolt fired from the paddle
#[derive(Debug, Clone)]
pub struct Laser {
    /// Horizontal centre and top edge
    pub pos: Vec2,
    pub speed: f32,
    pub alive: bool,
}

impl Laser {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            speed: LASER_SPEED,
            alive: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x - LASER_WIDTH / 2.0, self.pos.y, LASER_WIDTH, LASER_HEIGHT)
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y -= self.speed * dt;
        if self.pos.y < -20.0 {
            self.alive = false;
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Packed 0xRRGGBB colour
    pub color: u32,
    /// Remaining lifetime in ticks
    pub life: u32,
    pub size: f32,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel.y += PARTICLE_GRAVITY * dt;
        self.life = self.life.saturating_sub(1);
    }

    /// Opacity in 0-1, fading over the last 30 ticks
    pub fn alpha(&self) -> f32 {
        (self.life as f32 / 30.0).min(1.0)
    }
}

/// Default particle cap (overridden by settings)
pub const MAX_PARTICLES: usize = 512;

/// Things that happened during a tick, for sound and flashes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PaddleHit,
    BrickDamaged,
    BrickDestroyed,
    Explosion,
    LaserFired,
    PowerUpCollected(PowerUpKind),
    BossAppeared,
    PaddleGrazed,
    LifeLost,
    LevelCleared { next_level: u32 },
    GameOver,
    Victory,
}

/// Transient banner text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub ticks: u32,
}

impl Message {
    /// Opacity in 0-1, fading out near the end
    pub fn alpha(&self) -> f32 {
        (self.ticks as f32 * 3.0 / 255.0).min(1.0)
    }
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Current level (1-based)
    pub level: u32,
    pub lives: u32,
    pub score: u64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub powerups: Vec<PowerUp>,
    pub lasers: Vec<Laser>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Present on boss levels
    pub boss: Option<Boss>,
    pub combo: ComboTracker,
    pub message: Option<Message>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Particle cap
    pub max_particles: usize,
    /// Ball trail length
    pub trail_length: usize,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session at level 1
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_level(config, seed, 1)
    }

    /// Create a new session starting at `level`
    pub fn with_level(config: GameConfig, seed: u64, level: u32) -> Self {
        let mut state = Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level,
            lives: config.start_lives,
            score: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            paddle: Paddle::new(&config),
            balls: Vec::new(),
            bricks: Vec::new(),
            powerups: Vec::new(),
            lasers: Vec::new(),
            particles: Vec::new(),
            boss: None,
            combo: ComboTracker::default(),
            message: None,
            events: Vec::new(),
            max_particles: MAX_PARTICLES,
            trail_length: TRAIL_LENGTH,
            next_id: 1,
        };

        state.spawn_ball(state.config.ball_launch_speed);
        state.load_level();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a ball just above the paddle centre, heading up
    pub fn spawn_ball(&mut self, vx: f32) {
        let id = self.next_entity_id();
        let pos = Vec2::new(self.paddle.rect.center().x, self.paddle.rect.top() - 10.0);
        let vel = Vec2::new(vx, -self.config.ball_launch_speed);
        self.balls.push(Ball::new(id, pos, vel, self.config.ball_radius));
    }

    /// Replace the ball set after a lost life, with a random horizontal direction
    pub fn respawn_ball(&mut self) {
        let sign = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.balls.clear();
        self.spawn_ball(sign * self.config.ball_launch_speed);
    }

    /// Generate bricks (and the boss, if any) for the current level
    pub fn load_level(&mut self) {
        self.bricks = super::level::generate_level(self);
        self.boss = if super::level::is_boss_level(self.level) {
            self.events.push(GameEvent::BossAppeared);
            Some(Boss::new(self.level, &self.config))
        } else {
            None
        };
    }

    /// Bricks still standing between the player and the next level
    pub fn bricks_remaining(&self) -> usize {
        self.bricks.iter().filter(|b| b.counts_for_clear()).count()
    }

    pub fn set_message(&mut self, text: impl Into<String>, ticks: u32) {
        self.message = Some(Message {
            text: text.into(),
            ticks,
        });
    }

    /// Burst of particles at `pos`, respecting the particle cap
    pub fn spawn_explosion(&mut self, pos: Vec2, color: u32, count: usize) {
        let room = self.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed: f32 = self.rng.random_range(2.0..6.0);
            let life = self.rng.random_range(20..=40);
            let size = self.rng.random_range(2..=5) as f32;
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life,
                size,
            });
        }
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
