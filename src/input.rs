//! Held-key tracking for terminal input
//!
//! Terminals only report key presses, plus OS auto-repeat, unless they speak
//! the keyboard enhancement protocol. Each key remembers the tick it was last
//! seen and counts as held while that is within the hold window. Until the
//! first auto-repeat arrives a longer grace window applies, covering the
//! OS delay before repeating starts. Release events, when the terminal sends
//! them, drop the key at once.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Hold window for terminals without release events (ticks)
///
/// Long enough to bridge the gap between OS auto-repeats.
pub const HOLD_WINDOW_TICKS: u64 = 12;

/// Hold window between a press and its first auto-repeat (ticks)
///
/// OS repeat delays run from roughly 250 to 660 ms.
pub const FIRST_REPEAT_GRACE_TICKS: u64 = 40;

/// Hold window when release events are available; only guards against a
/// release that never arrives
pub const ENHANCED_HOLD_WINDOW_TICKS: u64 = 600;

const LEFT_KEYS: [KeyCode; 2] = [KeyCode::Left, KeyCode::Char('a')];
const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::Right, KeyCode::Char('d')];
const FIRE_KEYS: [KeyCode; 1] = [KeyCode::Char(' ')];

#[derive(Debug, Clone, Copy)]
struct Held {
    last_seen: u64,
    /// An auto-repeat has arrived since the press
    repeating: bool,
}

/// Tracks which keys are currently held down
#[derive(Debug, Clone)]
pub struct KeyTracker {
    keys: HashMap<KeyCode, Held>,
    tick: u64,
    window: u64,
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new(HOLD_WINDOW_TICKS)
    }
}

impl KeyTracker {
    pub fn new(window: u64) -> Self {
        Self {
            keys: HashMap::new(),
            tick: 0,
            window,
        }
    }

    /// Advance the tracker by one simulation tick
    pub fn advance(&mut self) {
        self.tick += 1;
    }

    /// Record a key event; returns true for a fresh press
    ///
    /// Terminals without release events report auto-repeat as presses, so a
    /// press of a key that is still held counts as a repeat.
    pub fn record(&mut self, key: &KeyEvent) -> bool {
        let code = normalize(key.code);
        match key.kind {
            KeyEventKind::Press => {
                let fresh = !self.is_held(code);
                self.keys.insert(
                    code,
                    Held {
                        last_seen: self.tick,
                        repeating: !fresh,
                    },
                );
                fresh
            }
            KeyEventKind::Repeat => {
                self.keys.insert(
                    code,
                    Held {
                        last_seen: self.tick,
                        repeating: true,
                    },
                );
                false
            }
            KeyEventKind::Release => {
                self.keys.remove(&code);
                false
            }
        }
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.keys.get(&normalize(code)).is_some_and(|held| {
            let window = if held.repeating {
                self.window
            } else {
                self.window.max(FIRST_REPEAT_GRACE_TICKS)
            };
            self.tick.saturating_sub(held.last_seen) <= window
        })
    }

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|&code| self.is_held(code))
    }

    /// Paddle direction from the arrow and A/D keys (-1, 0 or 1)
    pub fn move_dir(&self) -> f32 {
        let left = self.any_held(&LEFT_KEYS);
        let right = self.any_held(&RIGHT_KEYS);
        match (left, right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    pub fn fire_held(&self) -> bool {
        self.any_held(&FIRE_KEYS)
    }

    /// Forget every held key (screen changes)
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// Fold letter case so Shift or Caps Lock never strands a held key
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
