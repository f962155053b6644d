//! Audio system
//!
//! Procedurally generated sound effects - no external files needed!
//! Playback goes through `rodio` when the `audio` feature is enabled; without
//! it every call is a no-op.

use crate::sim::{GameEvent, PowerUpKind};

/// Output sample rate for generated effects
pub const SAMPLE_RATE: u32 = 44_100;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Game started from the menu
    Start,
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits brick (doesn't break)
    BrickHit,
    /// Brick breaks
    BrickBreak,
    /// Explosive brick goes off
    Explosion,
    /// Paddle fires lasers
    Laser,
    /// Power-up collected
    PowerUp,
    /// Boss level begins
    BossWarning,
    /// Boss attack touched the paddle
    Graze,
    /// Last ball fell out
    LifeLost,
    /// Level cleared
    LevelClear,
    GameOver,
    Victory,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wave {
    Sine,
    Square,
    Triangle,
    Noise,
}

/// One segment of an effect: a frequency sweep with a decaying envelope
#[derive(Debug, Clone, Copy)]
struct Note {
    wave: Wave,
    start_hz: f32,
    end_hz: f32,
    seconds: f32,
    gain: f32,
}

const fn note(wave: Wave, start_hz: f32, end_hz: f32, seconds: f32, gain: f32) -> Note {
    Note {
        wave,
        start_hz,
        end_hz,
        seconds,
        gain,
    }
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
            GameEvent::BrickDamaged => Some(SoundEffect::BrickHit),
            GameEvent::BrickDestroyed => Some(SoundEffect::BrickBreak),
            GameEvent::Explosion => Some(SoundEffect::Explosion),
            GameEvent::LaserFired => Some(SoundEffect::Laser),
            GameEvent::PowerUpCollected(_) => Some(SoundEffect::PowerUp),
            GameEvent::BossAppeared => Some(SoundEffect::BossWarning),
            GameEvent::PaddleGrazed => Some(SoundEffect::Graze),
            GameEvent::LifeLost => Some(SoundEffect::LifeLost),
            GameEvent::LevelCleared { .. } => Some(SoundEffect::LevelClear),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
            GameEvent::Victory => Some(SoundEffect::Victory),
        }
    }

    fn notes(self) -> &'static [Note] {
        use Wave::*;
        match self {
            SoundEffect::Start => const {
                &[
                    note(Square, 262.0, 262.0, 0.08, 0.3),
                    note(Square, 330.0, 330.0, 0.08, 0.3),
                    note(Square, 392.0, 392.0, 0.08, 0.3),
                    note(Square, 523.0, 523.0, 0.16, 0.3),
                ]
            },
            SoundEffect::PaddleHit => const { &[note(Sine, 150.0, 60.0, 0.1, 0.6)] },
            SoundEffect::BrickHit => const { &[note(Triangle, 300.0, 300.0, 0.06, 0.4)] },
            SoundEffect::BrickBreak => const {
                &[
                    note(Triangle, 660.0, 880.0, 0.05, 0.4),
                    note(Sine, 1320.0, 990.0, 0.08, 0.25),
                ]
            },
            SoundEffect::Explosion => const { &[note(Noise, 0.0, 0.0, 0.3, 0.6)] },
            SoundEffect::Laser => const { &[note(Square, 1200.0, 400.0, 0.08, 0.15)] },
            SoundEffect::PowerUp => const {
                &[
                    note(Sine, 523.0, 523.0, 0.06, 0.4),
                    note(Sine, 659.0, 659.0, 0.06, 0.4),
                    note(Sine, 784.0, 1046.0, 0.12, 0.4),
                ]
            },
            SoundEffect::BossWarning => const {
                &[
                    note(Square, 110.0, 110.0, 0.25, 0.35),
                    note(Square, 98.0, 98.0, 0.25, 0.35),
                    note(Square, 110.0, 110.0, 0.25, 0.35),
                ]
            },
            SoundEffect::Graze => const { &[note(Noise, 0.0, 0.0, 0.08, 0.3)] },
            SoundEffect::LifeLost => const { &[note(Sine, 440.0, 80.0, 0.6, 0.5)] },
            SoundEffect::LevelClear => const {
                &[
                    note(Triangle, 523.0, 523.0, 0.1, 0.4),
                    note(Triangle, 659.0, 659.0, 0.1, 0.4),
                    note(Triangle, 784.0, 784.0, 0.1, 0.4),
                    note(Triangle, 1046.0, 1046.0, 0.25, 0.4),
                ]
            },
            SoundEffect::GameOver => const {
                &[
                    note(Square, 392.0, 392.0, 0.2, 0.3),
                    note(Square, 330.0, 330.0, 0.2, 0.3),
                    note(Square, 262.0, 131.0, 0.5, 0.3),
                ]
            },
            SoundEffect::Victory => const {
                &[
                    note(Square, 523.0, 523.0, 0.12, 0.3),
                    note(Square, 523.0, 523.0, 0.12, 0.3),
                    note(Square, 784.0, 784.0, 0.12, 0.3),
                    note(Square, 1046.0, 1046.0, 0.4, 0.3),
                ]
            },
        }
    }

    /// Render the effect as mono samples in [-1, 1]
    pub fn samples(self, sample_rate: u32) -> Vec<f32> {
        let mut out = Vec::new();
        // Fixed-seed LCG keeps noise reproducible without touching game RNG
        let mut noise_state: u32 = 0x1234_5678;

        for n in self.notes() {
            let count = (n.seconds * sample_rate as f32) as usize;
            let mut phase = 0.0f32;
            for i in 0..count {
                let t = i as f32 / count.max(1) as f32;
                let freq = n.start_hz + (n.end_hz - n.start_hz) * t;
                phase = (phase + freq / sample_rate as f32).fract();
                let raw = match n.wave {
                    Wave::Sine => (phase * std::f32::consts::TAU).sin(),
                    Wave::Square => {
                        if phase < 0.5 {
                            1.0
                        } else {
                            -1.0
                        }
                    }
                    Wave::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
                    Wave::Noise => {
                        noise_state = noise_state
                            .wrapping_mul(1_664_525)
                            .wrapping_add(1_013_904_223);
                        (noise_state >> 8) as f32 / (1u32 << 23) as f32 - 1.0
                    }
                };
                // Linear decay envelope
                out.push(raw * n.gain * (1.0 - t));
            }
        }
        out
    }
}

/// Chime for a collected power-up
pub fn powerup_chime(kind: PowerUpKind) -> SoundEffect {
    match kind {
        PowerUpKind::Laser => SoundEffect::Laser,
        _ => SoundEffect::PowerUp,
    }
}

#[cfg(feature = "audio")]
struct Backend {
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(feature = "audio")]
    backend: Option<Backend>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    #[cfg(feature = "audio")]
    pub fn new() -> Self {
        let backend = match rodio::OutputStream::try_default() {
            Ok((stream, handle)) => Some(Backend {
                _stream: stream,
                handle,
            }),
            Err(e) => {
                log::warn!("Failed to open audio output - audio disabled: {}", e);
                None
            }
        };
        Self {
            backend,
            master_volume: 0.8,
            muted: false,
        }
    }

    #[cfg(not(feature = "audio"))]
    pub fn new() -> Self {
        log::info!("Built without the audio feature - sound disabled");
        Self {
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play the sounds for a batch of simulation events
    pub fn play_events(&self, events: &[GameEvent]) {
        for &event in events {
            let effect = match event {
                GameEvent::PowerUpCollected(kind) => Some(powerup_chime(kind)),
                other => SoundEffect::for_event(other),
            };
            if let Some(effect) = effect {
                self.play(effect);
            }
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        #[cfg(feature = "audio")]
        if let Some(backend) = &self.backend {
            match rodio::Sink::try_new(&backend.handle) {
                Ok(sink) => {
                    sink.set_volume(vol);
                    sink.append(rodio::buffer::SamplesBuffer::new(
                        1,
                        SAMPLE_RATE,
                        effect.samples(SAMPLE_RATE),
                    ));
                    sink.detach();
                }
                Err(e) => log::debug!("Dropped {:?}: {}", effect, e),
            }
        }

        #[cfg(not(feature = "audio"))]
        let _ = effect;
    }
}
