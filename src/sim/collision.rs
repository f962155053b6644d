//! Collision detection and response
//!
//! Everything here is axis-aligned: balls collide through their bounding
//! square, matching the blocky feel of the original arcade rules.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Ball, Paddle};

/// Widest rebound off the paddle edge, either side of vertical (60°)
pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

/// Which velocity component a brick hit flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectAxis {
    Horizontal,
    Vertical,
}

/// Check whether a ball overlaps a rect
#[inline]
pub fn ball_hits_rect(ball: &Ball, rect: &Rect) -> bool {
    ball.rect().overlaps(rect)
}

/// Pick the axis to reflect on when a ball strikes `rect`
///
/// Flip horizontally when the ball is further from the centre sideways than
/// vertically, otherwise flip vertically. This is a heuristic, not
/// closest-edge physics.
pub fn brick_reflect_axis(ball_pos: Vec2, rect: &Rect) -> ReflectAxis {
    let offset = ball_pos - rect.center();
    if offset.x.abs() > offset.y.abs() {
        ReflectAxis::Horizontal
    } else {
        ReflectAxis::Vertical
    }
}

/// Bounce a ball off a brick
pub fn reflect_from_rect(ball: &mut Ball, rect: &Rect) -> ReflectAxis {
    let axis = brick_reflect_axis(ball.pos, rect);
    match axis {
        ReflectAxis::Horizontal => ball.vel.x = -ball.vel.x,
        ReflectAxis::Vertical => ball.vel.y = -ball.vel.y,
    }
    axis
}

/// Bounce a ball off the paddle if they overlap
///
/// The rebound angle depends on where the ball lands along the paddle:
/// dead centre goes straight up, the edges go out at ±60°. Speed is kept.
pub fn ball_paddle_collision(ball: &mut Ball, paddle: &Paddle) -> bool {
    if !ball_hits_rect(ball, &paddle.rect) {
        return false;
    }

    ball.pos.y = paddle.rect.top() - ball.radius - 0.1;

    let hit_pos = ((ball.pos.x - paddle.rect.left()) / paddle.rect.w).clamp(0.0, 1.0);
    let angle = (hit_pos - 0.5) * 2.0 * MAX_BOUNCE_ANGLE;
    let speed = ball.speed();
    ball.vel = Vec2::new(speed * angle.sin(), -(speed * angle.cos()).abs());
    true
}

/// Bounce a falling ball back up off the shield at the paddle line
pub fn shield_bounce(ball: &mut Ball, paddle_top: f32) {
    ball.pos.y = paddle_top - ball.radius;
    ball.vel.y = -ball.vel.y;
}

/// True once the ball has fully left the bottom of the play-field
pub fn ball_below_field(ball: &Ball, field_height: f32) -> bool {
    ball.pos.y - ball.radius > field_height
}

/// Area damaged when an explosive brick goes off
pub fn blast_area(rect: &Rect, reach: f32) -> Rect {
    rect.inflate(reach, reach)
}

/// Magnet pull toward `target` for a ball within `radius` and above `ceiling`
pub fn magnet_pull(ball: &Ball, target: Vec2, ceiling: f32, radius: f32, force: f32) -> Vec2 {
    let delta = target - ball.pos;
    let dist = delta.length();
    if dist > 0.0 && dist < radius && ball.pos.y < ceiling {
        delta / dist * force
    } else {
        Vec2::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use proptest::prelude::*;

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        Ball::new(1, Vec2::new(x, y), Vec2::new(vx, vy), 7.0)
    }

    #[test]
    fn test_reflect_axis_heuristic() {
        let brick = Rect::new(100.0, 100.0, 60.0, 20.0);
        // Side hit: further out horizontally
        assert_eq!(
            brick_reflect_axis(Vec2::new(165.0, 112.0), &brick),
            ReflectAxis::Horizontal
        );
        // Top hit
        assert_eq!(
            brick_reflect_axis(Vec2::new(130.0, 95.0), &brick),
            ReflectAxis::Vertical
        );
    }

    #[test]
    fn test_reflect_from_rect_flips_one_component() {
        let brick = Rect::new(100.0, 100.0, 60.0, 20.0);
        let mut ball = ball_at(130.0, 95.0, 3.0, 4.0);
        reflect_from_rect(&mut ball, &brick);
        assert_eq!(ball.vel, Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_paddle_center_hit_goes_straight_up() {
        let paddle = Paddle::new(&GameConfig::default());
        let center = paddle.rect.center().x;
        let mut ball = ball_at(center, paddle.rect.top() + 2.0, 3.0, 4.0);
        assert!(ball_paddle_collision(&mut ball, &paddle));
        assert!(ball.vel.x.abs() < 1e-4);
        assert!((ball.vel.y + 5.0).abs() < 1e-4);
        assert!(ball.pos.y < paddle.rect.top());
    }

    #[test]
    fn test_paddle_edge_hit_is_sixty_degrees() {
        let paddle = Paddle::new(&GameConfig::default());
        let mut ball = ball_at(paddle.rect.right(), paddle.rect.top() + 1.0, 0.0, 5.0);
        assert!(ball_paddle_collision(&mut ball, &paddle));
        let angle = ball.vel.x.atan2(-ball.vel.y);
        assert!((angle - MAX_BOUNCE_ANGLE).abs() < 1e-4);
        assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn test_paddle_miss() {
        let paddle = Paddle::new(&GameConfig::default());
        let mut ball = ball_at(10.0, 10.0, 3.0, 4.0);
        assert!(!ball_paddle_collision(&mut ball, &paddle));
        assert_eq!(ball.vel, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_magnet_only_pulls_from_above_and_nearby() {
        let ball = ball_at(100.0, 100.0, 0.0, 0.0);
        let pull = magnet_pull(&ball, Vec2::new(100.0, 200.0), 150.0, 200.0, 0.3);
        assert!((pull - Vec2::new(0.0, 0.3)).length() < 1e-5);

        let far = magnet_pull(&ball, Vec2::new(100.0, 400.0), 390.0, 200.0, 0.3);
        assert_eq!(far, Vec2::ZERO);

        let below = magnet_pull(&ball, Vec2::new(100.0, 150.0), 90.0, 200.0, 0.3);
        assert_eq!(below, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_paddle_rebound_preserves_speed(
            offset in 0.0f32..1.0,
            vx in -8.0f32..8.0,
            vy in 0.5f32..8.0,
        ) {
            let paddle = Paddle::new(&GameConfig::default());
            let x = paddle.rect.left() + offset * paddle.rect.w;
            let mut ball = ball_at(x, paddle.rect.top() + 1.0, vx, vy);
            let before = ball.speed();
            prop_assert!(ball_paddle_collision(&mut ball, &paddle));
            prop_assert!((ball.speed() - before).abs() < 1e-3);
            prop_assert!(ball.vel.y <= 0.0);
            let angle = ball.vel.x.atan2(-ball.vel.y).abs();
            prop_assert!(angle <= MAX_BOUNCE_ANGLE + 1e-4);
        }

        #[test]
        fn prop_side_wall_bounce_is_elastic(
            y in 50.0f32..500.0,
            vx in 0.5f32..12.0,
            vy in -12.0f32..12.0,
            left in any::<bool>(),
        ) {
            let width = 800.0;
            let (x, vx) = if left { (7.5, -vx) } else { (width - 7.5, vx) };
            let mut ball = ball_at(x, y, vx, vy);
            ball.advance(1.0, width);
            prop_assert_eq!(ball.vel.x.abs(), vx.abs());
            prop_assert_eq!(ball.vel.x.signum(), -vx.signum());
            prop_assert_eq!(ball.vel.y, vy);
            prop_assert!(ball.pos.x >= ball.radius && ball.pos.x <= width - ball.radius);
        }

        #[test]
        fn prop_top_wall_bounce_is_elastic(
            x in 50.0f32..700.0,
            vx in -12.0f32..12.0,
            vy in 0.5f32..12.0,
        ) {
            let mut ball = ball_at(x, 7.5, vx, -vy);
            ball.advance(1.0, 800.0);
            prop_assert_eq!(ball.vel.y, vy);
            prop_assert_eq!(ball.vel.x, vx);
            prop_assert_eq!(ball.pos.y, ball.radius);
        }
    }
}
