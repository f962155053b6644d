//! Shape generation for 2D primitives
//!
//! Turns a game state into a flat list of shapes in play-field coordinates
//! (origin top-left, y down). The terminal backend maps them onto its canvas.

use glam::Vec2;

use crate::consts::LASER_INSET;
use crate::palette;
use crate::settings::Settings;
use crate::sim::boss::{BULLET_RADIUS, BeamPhase, Boss, BossAttack};
use crate::sim::{Ball, GameState, Paddle, Rect};

/// A drawable primitive; colours are packed 0xRRGGBB
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect { rect: Rect, color: u32, filled: bool },
    Circle { center: Vec2, radius: f32, color: u32 },
    Line { from: Vec2, to: Vec2, color: u32 },
    Points { points: Vec<Vec2>, color: u32 },
    /// Text centred horizontally on `pos`
    Text { pos: Vec2, text: String, color: u32 },
}

/// Number of background stars
const STAR_COUNT: u32 = 60;

/// Every shape for one frame, back to front
pub fn scene(state: &GameState, settings: &Settings) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(state.bricks.len() + 64);

    if settings.effective_starfield() {
        shapes.push(starfield(
            state.config.width,
            state.config.height,
            state.time_ticks,
            state.seed,
        ));
    }

    for brick in &state.bricks {
        shapes.push(Shape::Rect {
            rect: brick.rect,
            color: brick.color(),
            filled: true,
        });
    }

    if let Some(boss) = &state.boss {
        boss_shapes(boss, state.config.height, state.time_ticks, &mut shapes);
    }

    particle_shapes(state, &mut shapes);

    for powerup in &state.powerups {
        shapes.push(Shape::Circle {
            center: powerup.pos,
            radius: powerup.radius,
            color: palette::POWERUP,
        });
        // Spinning spoke
        let spoke = Vec2::from_angle(powerup.rotation.to_radians()) * powerup.radius;
        shapes.push(Shape::Line {
            from: powerup.pos - spoke,
            to: powerup.pos + spoke,
            color: palette::shade(palette::POWERUP, 0.6),
        });
        shapes.push(Shape::Text {
            pos: powerup.pos,
            text: powerup.kind.label().to_string(),
            color: palette::POWERUP_TEXT,
        });
    }

    for laser in &state.lasers {
        shapes.push(Shape::Rect {
            rect: laser.rect(),
            color: palette::LASER,
            filled: true,
        });
    }

    for ball in &state.balls {
        ball_shapes(ball, &mut shapes);
    }

    paddle_shapes(
        &state.paddle,
        state.config.width,
        settings.effective_flashes(),
        &mut shapes,
    );

    if let Some(message) = &state.message {
        shapes.push(Shape::Text {
            pos: Vec2::new(state.config.width / 2.0, state.config.height / 3.0),
            text: message.text.clone(),
            color: palette::shade(palette::POWERUP_TEXT, message.alpha()),
        });
    }

    shapes
}

/// Slowly drifting stars, derived from the seed so they need no state
pub fn starfield(width: f32, height: f32, time_ticks: u64, seed: u64) -> Shape {
    let mut points = Vec::with_capacity(STAR_COUNT as usize);
    for i in 0..STAR_COUNT {
        let h = hash(seed ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let x = (h & 0xFFFF) as f32 / 65535.0 * width;
        let y0 = ((h >> 16) & 0xFFFF) as f32 / 65535.0 * height;
        // Three parallax speeds
        let speed = 0.1 + ((h >> 32) % 3) as f32 * 0.15;
        let y = (y0 + time_ticks as f32 * speed) % height;
        points.push(Vec2::new(x, y));
    }
    Shape::Points {
        points,
        color: palette::BACKGROUND_LOW,
    }
}

fn hash(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    x ^= x >> 33;
    x = x.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    x ^ (x >> 33)
}

fn ball_shapes(ball: &Ball, shapes: &mut Vec<Shape>) {
    // Trail fades out and shrinks toward the tail
    let len = ball.trail.len() as f32;
    for (i, &pos) in ball.trail.iter().enumerate() {
        let t = 1.0 - i as f32 / len.max(1.0);
        shapes.push(Shape::Circle {
            center: pos,
            radius: (ball.radius * 0.6 * t).max(1.0),
            color: palette::shade(palette::BALL, 0.3 + 0.4 * t),
        });
    }
    shapes.push(Shape::Circle {
        center: ball.pos,
        radius: ball.radius,
        color: palette::BALL,
    });
}

fn paddle_shapes(paddle: &Paddle, field_width: f32, flashes: bool, shapes: &mut Vec<Shape>) {
    let rect = paddle.rect;
    let color = if flashes && paddle.graze_ticks > 0 && paddle.graze_ticks % 6 < 3 {
        palette::GRAZE
    } else {
        palette::PADDLE
    };
    shapes.push(Shape::Rect {
        rect,
        color,
        filled: true,
    });

    if paddle.effects.has_laser() {
        for x in [rect.left() + LASER_INSET, rect.right() - LASER_INSET] {
            shapes.push(Shape::Line {
                from: Vec2::new(x, rect.top()),
                to: Vec2::new(x, rect.top() - 8.0),
                color: palette::LASER,
            });
        }
    }

    if paddle.effects.has_shield() {
        // Shield spans the field just below the paddle
        let y = rect.bottom() + 20.0;
        shapes.push(Shape::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(field_width, y),
            color: palette::SHIELD,
        });
    }

    if paddle.effects.has_magnet() {
        shapes.push(Shape::Circle {
            center: rect.center(),
            radius: rect.w / 2.0 + 10.0,
            color: palette::MAGNET,
        });
    }
}

fn particle_shapes(state: &GameState, shapes: &mut Vec<Shape>) {
    for particle in &state.particles {
        shapes.push(Shape::Points {
            points: vec![particle.pos],
            color: palette::shade(particle.color, particle.alpha()),
        });
    }
}

fn boss_shapes(boss: &Boss, field_height: f32, time_ticks: u64, shapes: &mut Vec<Shape>) {
    shapes.push(Shape::Rect {
        rect: boss.rect,
        color: palette::BOSS,
        filled: true,
    });

    // Health bar above the body
    let bar = Rect::new(boss.rect.x + 10.0, boss.rect.y - 15.0, boss.rect.w - 20.0, 8.0);
    shapes.push(Shape::Rect {
        rect: bar,
        color: palette::OBSTACLE,
        filled: false,
    });
    let fill = Rect::new(bar.x, bar.y, bar.w * boss.health_fraction(), bar.h);
    shapes.push(Shape::Rect {
        rect: fill,
        color: palette::POWERUP,
        filled: true,
    });
    shapes.push(Shape::Text {
        pos: Vec2::new(boss.rect.center().x, boss.rect.y - 30.0),
        text: format!("BOSS LEVEL {}", boss.level),
        color: palette::TEXT,
    });

    for attack in &boss.attacks {
        match attack {
            BossAttack::Bullet { pos, .. } => shapes.push(Shape::Circle {
                center: *pos,
                radius: BULLET_RADIUS,
                color: palette::LASER,
            }),
            BossAttack::Beam { x, phase, .. } => match phase {
                BeamPhase::Warning { ticks } => {
                    // Blink the warning column
                    if (time_ticks / 10) % 2 == 0 {
                        shapes.push(Shape::Rect {
                            rect: attack.rect(field_height),
                            color: palette::LASER,
                            filled: false,
                        });
                    }
                    if ticks % 30 < 20 {
                        shapes.push(Shape::Text {
                            pos: Vec2::new(*x, 50.0),
                            text: "LASER WARNING!".to_string(),
                            color: palette::LASER,
                        });
                    }
                }
                _ => {
                    let rect = attack.rect(field_height);
                    shapes.push(Shape::Rect {
                        rect,
                        color: palette::LASER,
                        filled: true,
                    });
                    shapes.push(Shape::Line {
                        from: Vec2::new(*x, rect.top()),
                        to: Vec2::new(*x, rect.bottom()),
                        color: palette::BOSS_BEAM_CORE,
                    });
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::ActiveEffects;
    use crate::sim::{PowerUp, PowerUpKind};

    fn count(shapes: &[Shape], pred: impl Fn(&Shape) -> bool) -> usize {
        shapes.iter().filter(|s| pred(s)).count()
    }

    #[test]
    fn test_scene_draws_every_brick_and_ball() {
        let state = GameState::new(GameConfig::default(), 4);
        let mut settings = Settings::default();
        settings.reduced_motion = true;
        let shapes = scene(&state, &settings);

        let filled_rects = count(&shapes, |s| matches!(s, Shape::Rect { filled: true, .. }));
        // Bricks plus the paddle
        assert_eq!(filled_rects, state.bricks.len() + 1);

        let balls = count(&shapes, |s| {
            matches!(s, Shape::Circle { color, .. } if *color == palette::BALL)
        });
        assert_eq!(balls, state.balls.len());
        assert!(!shapes.iter().any(|s| matches!(s, Shape::Points { .. })));
    }

    #[test]
    fn test_effects_add_paddle_decorations() {
        let mut state = GameState::new(GameConfig::default(), 4);
        state.paddle.effects = ActiveEffects {
            laser_ticks: 10,
            shield_ticks: 10,
            magnet_ticks: 10,
        };
        let shapes = scene(&state, &Settings::default());
        assert_eq!(
            count(&shapes, |s| matches!(s, Shape::Line { color, .. } if *color == palette::LASER)),
            2
        );
        assert_eq!(
            count(&shapes, |s| matches!(s, Shape::Line { color, .. } if *color == palette::SHIELD)),
            1
        );
        let magnets = count(&shapes, |s| {
            matches!(s, Shape::Circle { color, .. } if *color == palette::MAGNET)
        });
        assert_eq!(magnets, 1);
    }

    #[test]
    fn test_powerup_spoke_follows_rotation() {
        let mut state = GameState::new(GameConfig::default(), 4);
        let mut powerup = PowerUp::new(99, PowerUpKind::Shield, Vec2::new(100.0, 200.0));
        powerup.rotation = 90.0;
        state.powerups.push(powerup);
        let shapes = scene(&state, &Settings::default());

        let spoke = shapes.iter().find_map(|s| match s {
            Shape::Line { from, to, color } if *color == palette::shade(palette::POWERUP, 0.6) => {
                Some((*from, *to))
            }
            _ => None,
        });
        let (from, to) = spoke.expect("power-up spoke");
        assert!((from.x - 100.0).abs() < 1e-3 && (to.x - 100.0).abs() < 1e-3);
        assert!((from.y - 190.0).abs() < 1e-3);
        assert!((to.y - 210.0).abs() < 1e-3);
    }

    #[test]
    fn test_message_is_drawn() {
        let mut state = GameState::new(GameConfig::default(), 4);
        state.set_message("LEVEL 3!", 90);
        let shapes = scene(&state, &Settings::default());
        assert!(shapes.iter().any(|s| matches!(s, Shape::Text { text, .. } if text == "LEVEL 3!")));
    }

    #[test]
    fn test_starfield_stays_in_field() {
        for t in [0, 1, 1000, 123_456] {
            let Shape::Points { points, .. } = starfield(960.0, 720.0, t, 9) else {
                panic!("starfield is a point set");
            };
            assert_eq!(points.len(), STAR_COUNT as usize);
            for p in points {
                assert!((0.0..=960.0).contains(&p.x));
                assert!((0.0..720.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn test_boss_level_draws_boss() {
        let state = GameState::with_level(GameConfig::default(), 4, 10);
        let shapes = scene(&state, &Settings::default());
        assert!(
            shapes
                .iter()
                .any(|s| matches!(s, Shape::Text { text, .. } if text == "BOSS LEVEL 10"))
        );
    }
}
