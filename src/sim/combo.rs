//! Combo tracking for consecutive brick destructions

use crate::consts::{COMBO_BASE_SCORE, COMBO_WINDOW_TICKS};

/// Counts brick destructions that land within the decay window of each other
#[derive(Debug, Clone, PartialEq)]
pub struct ComboTracker {
    pub combo: u32,
    pub max_combo: u32,
    /// Ticks left before the combo resets
    pub timer: u32,
    pub multiplier: f64,
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self {
            combo: 0,
            max_combo: 0,
            timer: 0,
            multiplier: 1.0,
        }
    }
}

impl ComboTracker {
    /// Register a destroyed brick
    pub fn hit(&mut self) {
        self.combo += 1;
        self.timer = COMBO_WINDOW_TICKS;
        self.max_combo = self.max_combo.max(self.combo);
        self.multiplier = 1.0 + self.combo as f64 * 0.1;
    }

    /// Advance the decay window by one tick
    pub fn update(&mut self) {
        if self.timer > 0 {
            self.timer -= 1;
            if self.timer == 0 {
                self.combo = 0;
                self.multiplier = 1.0;
            }
        }
    }

    /// Score for the most recent destruction
    pub fn bonus(&self) -> u64 {
        (COMBO_BASE_SCORE * self.multiplier).round() as u64
    }

    /// Fraction of the decay window remaining (for the HUD bar)
    pub fn window_fraction(&self) -> f32 {
        self.timer as f32 / COMBO_WINDOW_TICKS as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_combo_resets_after_window() {
        let mut combo = ComboTracker::default();
        combo.hit();
        combo.hit();
        assert_eq!(combo.bonus(), 120);
        for _ in 0..COMBO_WINDOW_TICKS - 1 {
            combo.update();
        }
        assert_eq!(combo.combo, 2);
        combo.update();
        assert_eq!(combo.combo, 0);
        assert_eq!(combo.multiplier, 1.0);
        assert_eq!(combo.max_combo, 2);
    }

    #[test]
    fn test_hit_refreshes_window() {
        let mut combo = ComboTracker::default();
        combo.hit();
        for _ in 0..100 {
            combo.update();
        }
        combo.hit();
        for _ in 0..100 {
            combo.update();
        }
        assert_eq!(combo.combo, 2);
    }

    proptest! {
        #[test]
        fn prop_multiplier_after_k_hits(k in 1u32..200, gap in 0u32..COMBO_WINDOW_TICKS) {
            let mut combo = ComboTracker::default();
            for _ in 0..k {
                combo.hit();
                for _ in 0..gap {
                    combo.update();
                }
            }
            let expected = 1.0 + 0.1 * k as f64;
            prop_assert!((combo.multiplier - expected).abs() < 1e-9);
            prop_assert_eq!(combo.bonus(), (100.0 * expected).round() as u64);
            prop_assert_eq!(combo.max_combo, k);
        }
    }
}
