//! Procedural level layouts
//!
//! A level is a grid of bricks that grows by a row every ten levels and a
//! column every five. Special brick kinds unlock as the level number rises.

use rand::Rng;

use super::rect::Rect;
use super::state::{Brick, BrickKind, GameState, MOVING_BRICK_RANGE, MOVING_BRICK_SPEED};
use crate::consts::BOSS_LEVEL_INTERVAL;

/// Distance from the field edges to the brick grid
pub const GRID_MARGIN: f32 = 60.0;
pub const BRICK_HEIGHT: f32 = 22.0;
pub const BRICK_GAP: f32 = 4.0;

/// Hit points of the indestructible placeholder (never decremented)
const OBSTACLE_HITS: u32 = 999;

/// Number of brick rows on level `n`
pub fn rows(level: u32) -> u32 {
    5 + level / 10
}

/// Number of brick columns on level `n`
pub fn cols(level: u32) -> u32 {
    8 + level / 5
}

pub fn is_boss_level(level: u32) -> bool {
    level > 0 && level % BOSS_LEVEL_INTERVAL == 0
}

/// Width of a single brick for the given field width and column count
pub fn brick_width(field_width: f32, cols: u32) -> f32 {
    ((field_width - 2.0 * GRID_MARGIN) / cols as f32).floor() - BRICK_GAP
}

/// Build the brick grid for the state's current level
///
/// Consumes randomness from the state's RNG, so the layout is reproducible
/// for a given seed and level sequence.
pub fn generate_level(state: &mut GameState) -> Vec<Brick> {
    let level = state.level;
    let rows = rows(level);
    let cols = cols(level);
    let brick_w = brick_width(state.config.width, cols);
    let boss = is_boss_level(level);

    let mut bricks = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let x = GRID_MARGIN + col as f32 * (brick_w + BRICK_GAP);
            let y = GRID_MARGIN + row as f32 * (BRICK_HEIGHT + BRICK_GAP);
            let rect = Rect::new(x, y, brick_w, BRICK_HEIGHT);

            let (hits, kind) = if boss {
                (state.rng.random_range(3..=5), BrickKind::Boss)
            } else {
                let roll: f64 = state.rng.random();
                roll_brick(level, roll, x, &mut state.rng)
            };

            let id = state.next_entity_id();
            bricks.push(Brick::new(id, rect, hits, kind));
        }
    }

    log::info!(
        "Level {}: {}x{} bricks{}",
        level,
        rows,
        cols,
        if boss { " (boss)" } else { "" }
    );

    bricks
}

/// Pick hit points and kind for a non-boss cell from a uniform roll in [0, 1)
fn roll_brick(level: u32, roll: f64, x: f32, rng: &mut impl Rng) -> (u32, BrickKind) {
    if roll < 0.03 {
        (OBSTACLE_HITS, BrickKind::Obstacle)
    } else if roll < 0.10 && level > 3 {
        let dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let kind = BrickKind::Moving {
            origin_x: x,
            dir,
            speed: MOVING_BRICK_SPEED,
            range: MOVING_BRICK_RANGE,
        };
        (2, kind)
    } else if roll < 0.15 && level > 5 {
        (1, BrickKind::Explosive)
    } else if roll < 0.20 && level > 2 {
        let kind = BrickKind::Rainbow {
            color_index: 0,
            timer: 0,
        };
        (1, kind)
    } else if roll < 0.5 {
        (rng.random_range(1..=3), BrickKind::Normal)
    } else {
        (1, BrickKind::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_grid_dimensions() {
        assert_eq!((rows(1), cols(1)), (5, 8));
        assert_eq!((rows(10), cols(10)), (6, 10));
        assert_eq!((rows(50), cols(50)), (10, 18));
        assert_eq!(brick_width(960.0, 8), 101.0);
    }

    #[test]
    fn test_boss_levels() {
        assert!(!is_boss_level(1));
        assert!(!is_boss_level(9));
        assert!(is_boss_level(10));
        assert!(is_boss_level(50));
    }

    #[test]
    fn test_early_levels_have_no_special_bricks() {
        let state = GameState::with_level(GameConfig::default(), 42, 2);
        for brick in &state.bricks {
            assert!(matches!(brick.kind, BrickKind::Normal | BrickKind::Obstacle));
        }
    }

    #[test]
    fn test_boss_level_is_all_boss_bricks() {
        let state = GameState::with_level(GameConfig::default(), 42, 10);
        assert!(state.boss.is_some());
        for brick in &state.bricks {
            assert_eq!(brick.kind, BrickKind::Boss);
            assert!((3..=5).contains(&brick.hits));
        }
    }

    #[test]
    fn test_roll_thresholds() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(roll_brick(1, 0.01, 0.0, &mut rng).1, BrickKind::Obstacle);
        assert!(matches!(
            roll_brick(4, 0.05, 0.0, &mut rng),
            (2, BrickKind::Moving { .. })
        ));
        // Moving bricks are locked until level 4
        assert_eq!(roll_brick(3, 0.05, 0.0, &mut rng).1, BrickKind::Rainbow {
            color_index: 0,
            timer: 0
        });
        assert_eq!(roll_brick(6, 0.12, 0.0, &mut rng), (1, BrickKind::Explosive));
        assert_eq!(roll_brick(5, 0.12, 0.0, &mut rng).1, BrickKind::Rainbow {
            color_index: 0,
            timer: 0
        });
        let (hits, kind) = roll_brick(1, 0.3, 0.0, &mut rng);
        assert_eq!(kind, BrickKind::Normal);
        assert!((1..=3).contains(&hits));
        assert_eq!(roll_brick(1, 0.9, 0.0, &mut rng), (1, BrickKind::Normal));
    }

    #[test]
    fn test_moving_bricks_start_either_way() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut dirs = Vec::new();
        for _ in 0..64 {
            if let (_, BrickKind::Moving { dir, .. }) = roll_brick(4, 0.05, 0.0, &mut rng) {
                dirs.push(dir);
            }
        }
        assert_eq!(dirs.len(), 64);
        assert!(dirs.iter().all(|d| d.abs() == 1.0));
        assert!(dirs.contains(&1.0));
        assert!(dirs.contains(&-1.0));
    }

    #[test]
    fn test_bricks_stay_inside_field() {
        let config = GameConfig::default();
        for level in [1, 7, 25, 49] {
            let state = GameState::with_level(config, 9, level);
            for brick in &state.bricks {
                assert!(brick.rect.left() >= GRID_MARGIN);
                assert!(brick.rect.right() <= config.width - GRID_MARGIN);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_brick_count_matches_grid(level in 1u32..=50, seed in any::<u64>()) {
            let state = GameState::with_level(GameConfig::default(), seed, level);
            prop_assert_eq!(state.bricks.len() as u32, rows(level) * cols(level));
        }
    }
}
