//! Colours for game elements, packed as 0xRRGGBB
//!
//! The simulation tags particles with these values; the renderer unpacks them.

pub const BACKGROUND: u32 = 0x1E1E1E;
pub const BACKGROUND_LOW: u32 = 0x28283C;
pub const MENU_BACKGROUND: u32 = 0x14143C;
pub const TEXT: u32 = 0xF0F0F0;

pub const PADDLE: u32 = 0xC8C8FF;
pub const BALL: u32 = 0xFFA500;
pub const BRICK: u32 = 0xE6C850;
pub const POWERUP: u32 = 0x64FF64;
pub const POWERUP_TEXT: u32 = 0xFFFF32;
pub const OBSTACLE: u32 = 0x787878;
pub const LASER: u32 = 0xFF3232;
pub const SHIELD: u32 = 0x64C8FF;
pub const MAGNET: u32 = 0xFF64FF;
pub const COMBO: u32 = 0xFFD700;
pub const BOSS: u32 = 0xC83232;
pub const BOSS_BEAM_CORE: u32 = 0xFFC832;
pub const MOVING_BRICK: u32 = 0x9664C8;
pub const EXPLOSIVE_BRICK: u32 = 0xFF6400;
pub const GRAZE: u32 = 0xFFFFFF;

/// Colour cycle of rainbow bricks
pub const RAINBOW: [u32; 7] = [
    0xFF0000, 0xFF7F00, 0xFFFF00, 0x00FF00, 0x0000FF, 0x4B0082, 0x9400D3,
];

/// Split a packed colour into channels
#[inline]
pub const fn channels(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

/// Scale brightness of a packed colour by `factor` (0-1)
pub fn shade(color: u32, factor: f32) -> u32 {
    let factor = factor.clamp(0.0, 1.0);
    let (r, g, b) = channels(color);
    let scale = |c: u8| (c as f32 * factor) as u32;
    (scale(r) << 16) | (scale(g) << 8) | scale(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_roundtrip_brick() {
        assert_eq!(channels(BRICK), (230, 200, 80));
    }

    #[test]
    fn test_shade_half() {
        assert_eq!(channels(shade(BRICK, 0.5)), (115, 100, 40));
        assert_eq!(shade(BRICK, 1.0), BRICK);
        assert_eq!(shade(BRICK, 0.0), 0);
    }
}
