//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use super::boss::BossAttack;
use super::collision::{
    ball_below_field, ball_hits_rect, ball_paddle_collision, blast_area, magnet_pull,
    reflect_from_rect, shield_bounce,
};
use super::rect::Rect;
use super::state::{
    Ball, Brick, GameEvent, GamePhase, GameState, HitOutcome, PowerUp, PowerUpKind,
};
use crate::consts::*;

/// Ticks the paddle flashes after a boss attack touches it
pub const GRAZE_FLASH_TICKS: u32 = 30;

/// Largest heading change applied to a split-off ball (radians)
const SPLIT_SPREAD: f32 = 0.4;
/// Largest positional jitter applied to a split-off ball (pixels)
const SPLIT_JITTER: f32 = 6.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal paddle direction: -1 left, 0 idle, 1 right
    pub move_dir: f32,
    /// Fire lasers (only does something while the laser effect is active)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one frame
///
/// `dt` scales motion relative to a nominal 60 Hz frame (1.0 = one frame).
/// Timers always advance by exactly one tick.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    let width = state.config.width;
    state.paddle.move_by(input.move_dir.clamp(-1.0, 1.0), dt, width);
    state.paddle.update_timers();
    state.combo.update();

    for brick in &mut state.bricks {
        brick.update();
    }

    for particle in &mut state.particles {
        particle.update(dt);
    }
    state.particles.retain(|p| p.life > 0);

    if input.fire {
        if let Some(pair) = state.paddle.shoot_laser() {
            state.lasers.extend(pair);
            state.events.push(GameEvent::LaserFired);
        }
    }

    move_balls(state, dt);

    for ball in &mut state.balls {
        if ball.alive && ball_paddle_collision(ball, &state.paddle) {
            state.events.push(GameEvent::PaddleHit);
        }
    }

    resolve_ball_bricks(state);
    update_lasers(state, dt);
    update_powerups(state, dt);

    if handle_ball_loss(state) {
        return;
    }

    update_boss(state);

    if state.bricks_remaining() == 0 {
        advance_level(state);
    }

    if let Some(message) = &mut state.message {
        message.ticks = message.ticks.saturating_sub(1);
        if message.ticks == 0 {
            state.message = None;
        }
    }
}

fn move_balls(state: &mut GameState, dt: f32) {
    let width = state.config.width;
    let magnet = state.paddle.effects.has_magnet();
    let target = state.paddle.rect.center();
    let ceiling = state.paddle.rect.top();

    for ball in &mut state.balls {
        ball.record_trail(state.trail_length);
        ball.advance(dt, width);
        if magnet {
            ball.vel += magnet_pull(ball, target, ceiling, MAGNET_RADIUS, MAGNET_FORCE) * dt;
        }
    }
}

/// Each ball strikes at most one brick per tick
fn resolve_ball_bricks(state: &mut GameState) {
    for i in 0..state.balls.len() {
        if !state.balls[i].alive {
            continue;
        }
        let Some(j) = state
            .bricks
            .iter()
            .position(|brick| ball_hits_rect(&state.balls[i], &brick.rect))
        else {
            continue;
        };

        let brick_rect = state.bricks[j].rect;
        reflect_from_rect(&mut state.balls[i], &brick_rect);

        match state.bricks[j].hit() {
            HitOutcome::Destroyed => {
                let brick = state.bricks.remove(j);
                destroy_brick(state, &brick);
            }
            HitOutcome::Damaged | HitOutcome::Blocked => {
                state.score += SCORE_BRICK_DAMAGED;
                state.events.push(GameEvent::BrickDamaged);
            }
        }
    }
}

/// Reward, debris, blast and drop for a brick a ball just destroyed
fn destroy_brick(state: &mut GameState, brick: &Brick) {
    state.combo.hit();
    state.score += state.combo.bonus();
    state.events.push(GameEvent::BrickDestroyed);
    state.spawn_explosion(brick.rect.center(), brick.base_color(), 15);

    if brick.is_explosive() {
        detonate(state, &brick.rect);
    }

    maybe_drop_powerup(state, brick);
}

/// Hit every destructible brick near an exploding one
///
/// Bricks destroyed by the blast do not detonate in turn.
fn detonate(state: &mut GameState, origin: &Rect) {
    let area = blast_area(origin, EXPLOSION_REACH);
    state.events.push(GameEvent::Explosion);

    let mut k = 0;
    while k < state.bricks.len() {
        let brick = &mut state.bricks[k];
        if !brick.is_obstacle()
            && brick.rect.overlaps(&area)
            && brick.hit() == HitOutcome::Destroyed
        {
            let brick = state.bricks.remove(k);
            state.score += SCORE_CHAIN_DESTROYED;
            state.spawn_explosion(brick.rect.center(), brick.base_color(), 10);
            continue;
        }
        k += 1;
    }
}

fn maybe_drop_powerup(state: &mut GameState, brick: &Brick) {
    if brick.is_obstacle() || !state.rng.random_bool(POWERUP_DROP_CHANCE) {
        return;
    }
    let kind = roll_powerup(&mut state.rng);
    let id = state.next_entity_id();
    state.powerups.push(PowerUp::new(id, kind, brick.rect.center()));
}

/// Pick a power-up kind by its drop weight
pub fn roll_powerup(rng: &mut impl Rng) -> PowerUpKind {
    match WeightedIndex::new(PowerUpKind::WEIGHTS) {
        Ok(dist) => PowerUpKind::ALL[dist.sample(rng)],
        Err(_) => PowerUpKind::MultiBall2,
    }
}

fn update_lasers(state: &mut GameState, dt: f32) {
    for laser in &mut state.lasers {
        laser.update(dt);
    }

    for i in 0..state.lasers.len() {
        if !state.lasers[i].alive {
            continue;
        }
        let rect = state.lasers[i].rect();
        let Some(j) = state
            .bricks
            .iter()
            .position(|brick| !brick.is_obstacle() && brick.rect.overlaps(&rect))
        else {
            continue;
        };

        state.lasers[i].alive = false;
        if state.bricks[j].hit() == HitOutcome::Destroyed {
            let brick = state.bricks.remove(j);
            state.score += SCORE_LASER_DESTROYED;
            state.events.push(GameEvent::BrickDestroyed);
            state.spawn_explosion(brick.rect.center(), brick.base_color(), 10);
        } else {
            state.events.push(GameEvent::BrickDamaged);
        }
    }

    state.lasers.retain(|l| l.alive);
}

fn update_powerups(state: &mut GameState, dt: f32) {
    let height = state.config.height;
    let paddle_rect = state.paddle.rect;
    let mut collected = Vec::new();

    for powerup in &mut state.powerups {
        powerup.update(dt, height);
        if powerup.alive && powerup.rect().overlaps(&paddle_rect) {
            powerup.alive = false;
            collected.push(powerup.kind);
        }
    }
    state.powerups.retain(|p| p.alive);

    for kind in collected {
        apply_powerup(state, kind);
    }
}

/// Apply a collected power-up to the paddle or balls
pub fn apply_powerup(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::MultiBall2 => multiply_balls(state, 2),
        PowerUpKind::MultiBall3 => multiply_balls(state, 3),
        PowerUpKind::Slow => scale_ball_speed(state, 0.7),
        PowerUpKind::Fast => scale_ball_speed(state, 1.3),
        PowerUpKind::BigPaddle => {
            let max_width = state.config.paddle_max_width;
            let paddle = &mut state.paddle;
            paddle.rect.w = (paddle.rect.w * 1.5).min(max_width);
            paddle.clamp_to(state.config.width);
        }
        PowerUpKind::TinyBall => {
            let min_radius = state.config.ball_min_radius;
            for ball in &mut state.balls {
                ball.radius = (ball.radius - 3.0).max(min_radius);
            }
        }
        PowerUpKind::Laser => state.paddle.effects.laser_ticks = EFFECT_DURATION_TICKS,
        PowerUpKind::Shield => state.paddle.effects.shield_ticks = EFFECT_DURATION_TICKS,
        PowerUpKind::Magnet => state.paddle.effects.magnet_ticks = EFFECT_DURATION_TICKS,
    }

    state.events.push(GameEvent::PowerUpCollected(kind));
    state.set_message(kind.message(), POWERUP_MESSAGE_TICKS);
}

/// Scale every ball's velocity, keeping speeds inside the configured band
fn scale_ball_speed(state: &mut GameState, factor: f32) {
    let min = state.config.ball_min_speed;
    let max = state.config.ball_max_speed;
    for ball in &mut state.balls {
        ball.vel = (ball.vel * factor).clamp_length(min, max);
    }
}

/// Split the live balls so there are `factor` times as many
///
/// Runs `factor - 1` generations; each generation clones the previous one
/// with a nudged heading and position.
pub fn multiply_balls(state: &mut GameState, factor: u32) {
    if factor <= 1 {
        return;
    }

    let mut current: Vec<Ball> = state.balls.iter().filter(|b| b.alive).cloned().collect();
    let mut spawned = Vec::new();

    for _ in 1..factor {
        let mut generation = Vec::with_capacity(current.len());
        for ball in &current {
            let heading =
                ball.vel.y.atan2(ball.vel.x) + state.rng.random_range(-SPLIT_SPREAD..=SPLIT_SPREAD);
            let jitter = Vec2::new(
                state.rng.random_range(-SPLIT_JITTER..=SPLIT_JITTER),
                state.rng.random_range(-SPLIT_JITTER..=SPLIT_JITTER),
            );
            let id = state.next_entity_id();
            generation.push(Ball::new(
                id,
                ball.pos + jitter,
                Vec2::from_angle(heading) * ball.speed(),
                ball.radius,
            ));
        }
        spawned.extend(generation.iter().cloned());
        current = generation;
    }

    state.balls.extend(spawned);
}

/// Drop balls that left the field; returns true if the game just ended
fn handle_ball_loss(state: &mut GameState) -> bool {
    let height = state.config.height;
    let shield = state.paddle.effects.has_shield();
    let paddle_top = state.paddle.rect.top();

    for ball in &mut state.balls {
        if ball_below_field(ball, height) {
            if shield {
                shield_bounce(ball, paddle_top);
            } else {
                ball.alive = false;
            }
        }
    }
    state.balls.retain(|b| b.alive);

    if !state.balls.is_empty() {
        return false;
    }

    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::LifeLost);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!(
            "Game over on level {} with score {} (max combo {})",
            state.level,
            state.score,
            state.combo.max_combo
        );
        return true;
    }

    log::debug!("Life lost, {} remaining", state.lives);
    state.respawn_ball();
    false
}

fn update_boss(state: &mut GameState) {
    let Some(boss) = &mut state.boss else {
        return;
    };
    boss.update(&mut state.rng, &state.config);

    let height = state.config.height;
    let paddle_rect = state.paddle.rect;
    let mut grazed = false;
    for attack in &mut boss.attacks {
        if attack.is_dangerous() && attack.rect(height).overlaps(&paddle_rect) {
            grazed = true;
            if matches!(attack, BossAttack::Bullet { .. }) {
                attack.absorb();
            }
        }
    }
    boss.attacks.retain(BossAttack::is_alive);

    if grazed && state.paddle.graze_ticks == 0 {
        state.paddle.graze_ticks = GRAZE_FLASH_TICKS;
        state.events.push(GameEvent::PaddleGrazed);
    }
}

/// Move on to the next level, or finish the run after the last one
fn advance_level(state: &mut GameState) {
    let next = state.level + 1;
    if next > state.config.max_level {
        state.phase = GamePhase::Victory;
        state.events.push(GameEvent::Victory);
        log::info!("Victory with score {}", state.score);
        return;
    }

    state.level = next;
    state.lives += 1;

    state.paddle.reset_for_level(state.config.width);
    state.balls.clear();
    state.spawn_ball(state.config.ball_launch_speed);
    state.powerups.clear();
    state.lasers.clear();
    state.particles.clear();

    state.events.push(GameEvent::LevelCleared { next_level: next });
    state.set_message(format!("LEVEL {next}!"), LEVEL_MESSAGE_TICKS);
    log::info!("Level {} reached, {} lives", next, state.lives);

    state.load_level();
}
