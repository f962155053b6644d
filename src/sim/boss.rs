//! Boss encounter on every tenth level
//!
//! The boss patrols above the bricks and rains bullets and beams on the
//! paddle. Its attacks only graze the paddle; they never cost a life.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::rect::Rect;
use crate::config::GameConfig;

pub const BOSS_HEIGHT: f32 = 40.0;
pub const BOSS_Y: f32 = 100.0;

pub const BULLET_RADIUS: f32 = 8.0;
pub const BULLET_SPEED: f32 = 3.0;
pub const BULLET_FAST_SPEED: f32 = 5.0;
/// Bullets speed up once they pass this fraction of the field height
pub const BULLET_ACCEL_FRACTION: f32 = 0.7;

pub const BEAM_WIDTH: f32 = 15.0;
pub const BEAM_WARNING_TICKS: u32 = 60;
pub const BEAM_HOLD_TICKS: u32 = 180;
pub const BEAM_GROW_RATE: f32 = 10.0;
pub const BEAM_SHRINK_RATE: f32 = 15.0;

/// Lifecycle of a beam attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeamPhase {
    /// Telegraphed column, harmless
    Warning { ticks: u32 },
    Growing,
    Holding { ticks: u32 },
    Shrinking,
}

/// A projectile or beam launched by the boss
#[derive(Debug, Clone, PartialEq)]
pub enum BossAttack {
    Bullet {
        pos: Vec2,
        speed: f32,
        alive: bool,
    },
    Beam {
        x: f32,
        height: f32,
        max_height: f32,
        phase: BeamPhase,
        alive: bool,
    },
}

impl BossAttack {
    pub fn bullet(pos: Vec2) -> Self {
        BossAttack::Bullet {
            pos,
            speed: BULLET_SPEED,
            alive: true,
        }
    }

    pub fn beam(x: f32, field_height: f32) -> Self {
        BossAttack::Beam {
            x,
            height: 0.0,
            max_height: field_height - 100.0,
            phase: BeamPhase::Warning {
                ticks: BEAM_WARNING_TICKS,
            },
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        match self {
            BossAttack::Bullet { alive, .. } | BossAttack::Beam { alive, .. } => *alive,
        }
    }

    /// True while the attack can touch the paddle
    pub fn is_dangerous(&self) -> bool {
        match self {
            BossAttack::Bullet { alive, .. } => *alive,
            BossAttack::Beam { phase, alive, .. } => {
                *alive && !matches!(phase, BeamPhase::Warning { .. })
            }
        }
    }

    pub fn update(&mut self, field_height: f32) {
        match self {
            BossAttack::Bullet { pos, speed, alive } => {
                pos.y += *speed;
                if pos.y > field_height * BULLET_ACCEL_FRACTION {
                    *speed = BULLET_FAST_SPEED;
                }
                if pos.y > field_height + 20.0 {
                    *alive = false;
                }
            }
            BossAttack::Beam {
                height,
                max_height,
                phase,
                alive,
                ..
            } => match phase {
                BeamPhase::Warning { ticks } => {
                    *ticks = ticks.saturating_sub(1);
                    if *ticks == 0 {
                        *phase = BeamPhase::Growing;
                    }
                }
                BeamPhase::Growing => {
                    *height += BEAM_GROW_RATE;
                    if *height >= *max_height {
                        *phase = BeamPhase::Holding {
                            ticks: BEAM_HOLD_TICKS,
                        };
                    }
                }
                BeamPhase::Holding { ticks } => {
                    *ticks = ticks.saturating_sub(1);
                    if *ticks == 0 {
                        *phase = BeamPhase::Shrinking;
                    }
                }
                BeamPhase::Shrinking => {
                    *height -= BEAM_SHRINK_RATE;
                    if *height <= 0.0 {
                        *height = 0.0;
                        *alive = false;
                    }
                }
            },
        }
    }

    /// Remove a bullet that struck something; beams are unaffected
    pub fn absorb(&mut self) {
        if let BossAttack::Bullet { alive, .. } = self {
            *alive = false;
        }
    }

    /// Collision rect; a warning beam covers the whole column
    pub fn rect(&self, field_height: f32) -> Rect {
        match self {
            BossAttack::Bullet { pos, .. } => Rect::around_circle(*pos, BULLET_RADIUS),
            BossAttack::Beam {
                x, height, phase, ..
            } => {
                let h = if matches!(phase, BeamPhase::Warning { .. }) {
                    field_height
                } else {
                    *height
                };
                Rect::new(x - BEAM_WIDTH / 2.0, 0.0, BEAM_WIDTH, h)
            }
        }
    }
}

/// The boss entity
#[derive(Debug, Clone)]
pub struct Boss {
    pub level: u32,
    pub rect: Rect,
    pub hp: u32,
    pub max_hp: u32,
    pub speed: f32,
    pub direction: f32,
    /// Ticks until the next attack
    pub attack_timer: u32,
    pub attacks: Vec<BossAttack>,
    pub invulnerable_ticks: u32,
}

impl Boss {
    pub fn new(level: u32, config: &GameConfig) -> Self {
        let width = (200.0 + level as f32 * 20.0).min(400.0);
        let hp = 100 + level * 50;
        Self {
            level,
            rect: Rect::new(config.width / 2.0 - width / 2.0, BOSS_Y, width, BOSS_HEIGHT),
            hp,
            max_hp: hp,
            speed: 2.0 + level as f32 * 0.5,
            direction: 1.0,
            attack_timer: 0,
            attacks: Vec::new(),
            invulnerable_ticks: 0,
        }
    }

    pub fn health_fraction(&self) -> f32 {
        self.hp as f32 / self.max_hp.max(1) as f32
    }

    /// Patrol, launch attacks and advance the live ones
    pub fn update(&mut self, rng: &mut Pcg32, config: &GameConfig) {
        self.rect.x += self.speed * self.direction;
        if self.rect.left() <= 0.0 || self.rect.right() >= config.width {
            self.direction = -self.direction;
            self.rect.x = self.rect.x.clamp(0.0, (config.width - self.rect.w).max(0.0));
        }

        if self.attack_timer == 0 {
            self.launch_attack(rng, config);
            self.attack_timer = rng.random_range(90..=180);
        } else {
            self.attack_timer -= 1;
        }

        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);

        for attack in &mut self.attacks {
            attack.update(config.height);
        }
        self.attacks.retain(BossAttack::is_alive);
    }

    fn launch_attack(&mut self, rng: &mut Pcg32, config: &GameConfig) {
        let muzzle = Vec2::new(self.rect.center().x, self.rect.bottom());
        // One beam for every three bullets
        if rng.random_range(0..4) == 0 {
            self.attacks.push(BossAttack::beam(muzzle.x, config.height));
        } else {
            self.attacks.push(BossAttack::bullet(muzzle));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_boss_scales_with_level() {
        let config = GameConfig::default();
        let boss = Boss::new(10, &config);
        assert_eq!(boss.rect.w, 400.0);
        assert_eq!(boss.hp, 600);
        assert_eq!(boss.speed, 7.0);
        assert_eq!(boss.rect.center().x, config.width / 2.0);
    }

    #[test]
    fn test_boss_attacks_immediately_and_stays_in_bounds() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut boss = Boss::new(10, &config);
        boss.update(&mut rng, &config);
        assert_eq!(boss.attacks.len(), 1);
        assert!((90..=180).contains(&boss.attack_timer));

        for _ in 0..2000 {
            boss.update(&mut rng, &config);
            assert!(boss.rect.left() >= 0.0);
            assert!(boss.rect.right() <= config.width);
        }
    }

    #[test]
    fn test_bullet_accelerates_then_leaves() {
        let mut bullet = BossAttack::bullet(Vec2::new(100.0, 100.0));
        let height = 600.0;
        let mut ticks = 0;
        while bullet.is_alive() {
            bullet.update(height);
            ticks += 1;
            if let BossAttack::Bullet { pos, speed, .. } = &bullet {
                if pos.y > height * BULLET_ACCEL_FRACTION {
                    assert_eq!(*speed, BULLET_FAST_SPEED);
                }
            }
            assert!(ticks < 1000);
        }
    }

    #[test]
    fn test_beam_lifecycle() {
        let height = 600.0;
        let mut beam = BossAttack::beam(300.0, height);
        assert!(!beam.is_dangerous());
        assert_eq!(beam.rect(height).h, height);

        for _ in 0..BEAM_WARNING_TICKS {
            beam.update(height);
        }
        assert!(beam.is_dangerous());
        assert_eq!(beam.rect(height).h, 0.0);

        // Grow to 500 in 50 ticks
        for _ in 0..50 {
            beam.update(height);
        }
        assert!(matches!(beam, BossAttack::Beam { phase: BeamPhase::Holding { .. }, .. }));

        let mut guard = 0;
        while beam.is_alive() {
            beam.update(height);
            guard += 1;
            assert!(guard < 1000);
        }
    }
}
