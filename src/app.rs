//! Application layer: start menu, game session and frame pacing
//!
//! Owns everything above the simulation: held keys, the high-score record,
//! audio and settings. The binary feeds it terminal events and elapsed time.

use std::path::PathBuf;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect as Area;

use crate::audio::{AudioManager, SoundEffect};
use crate::config::GameConfig;
use crate::consts::{FRAME_STEP, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScore;
use crate::input::KeyTracker;
use crate::renderer::terminal::{self, HudInfo, MENU_OPTIONS};
use crate::settings::Settings;
use crate::sim::{GameState, TickInput, tick};

/// Frames averaged by the FPS counter
const FPS_WINDOW: usize = 60;

/// Rolling frame-rate estimate over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame at `time` seconds
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest entry is the one we overwrite next
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// A game in progress
#[derive(Debug)]
pub struct Session {
    pub state: GameState,
    /// Score already offered to the record file
    pub submitted: bool,
    pub new_record: bool,
}

#[derive(Debug)]
pub enum Screen {
    Menu { selected: usize },
    Game(Box<Session>),
}

pub struct App {
    pub config: GameConfig,
    pub settings: Settings,
    settings_path: PathBuf,
    pub record: HighScore,
    keys: KeyTracker,
    audio: AudioManager,
    pub screen: Screen,
    /// One-shot inputs, cleared after the next tick
    pending: TickInput,
    accumulator: f32,
    clock: f64,
    fps: FpsCounter,
    /// Ticks spent on the menu (starfield animation)
    menu_ticks: u64,
    /// Terminal size at the last draw, for mouse hit testing
    last_area: Area,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: GameConfig,
        settings: Settings,
        settings_path: PathBuf,
        keys: KeyTracker,
    ) -> Self {
        let record = HighScore::load(settings.record_path.clone());
        let mut audio = AudioManager::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_muted(!settings.sound);

        Self {
            config,
            settings,
            settings_path,
            record,
            keys,
            audio,
            screen: Screen::Menu { selected: 0 },
            pending: TickInput::default(),
            accumulator: 0.0,
            clock: 0.0,
            fps: FpsCounter::default(),
            menu_ticks: 0,
            last_area: Area::default(),
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The running game, if any
    pub fn state(&self) -> Option<&GameState> {
        match &self.screen {
            Screen::Game(session) => Some(&session.state),
            Screen::Menu { .. } => None,
        }
    }

    /// Begin a fresh game, discarding any unfinished one
    pub fn start_game(&mut self) {
        let seed = self.settings.seed.unwrap_or_else(rand::random);
        let mut state = GameState::new(self.config, seed);
        state.max_particles = self.settings.max_particles();
        state.trail_length = self.settings.trail_length();
        log::info!("Starting game with seed {}", seed);

        self.screen = Screen::Game(Box::new(Session {
            state,
            submitted: false,
            new_record: false,
        }));
        self.pending = TickInput::default();
        self.accumulator = 0.0;
        self.audio.play(SoundEffect::Start);
    }

    fn open_menu(&mut self) {
        self.screen = Screen::Menu { selected: 0 };
        self.keys.clear();
        self.pending = TickInput::default();
    }

    fn confirm(&mut self, selected: usize) {
        match selected {
            0 => self.start_game(),
            _ => self.should_quit = true,
        }
    }

    fn toggle_sound(&mut self) {
        self.settings.sound = !self.settings.sound;
        self.audio.set_muted(!self.settings.sound);
        log::info!("Sound {}", if self.settings.sound { "on" } else { "off" });
        if let Err(e) = self.settings.save_to(&self.settings_path) {
            log::warn!(
                "Failed to save settings to {}: {}",
                self.settings_path.display(),
                e
            );
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        let fresh = self.keys.record(&key);
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.should_quit = true;
            return;
        }

        match &mut self.screen {
            Screen::Menu { selected } => match key.code {
                KeyCode::Up | KeyCode::Char('w' | 'W') => {
                    *selected = (*selected + MENU_OPTIONS.len() - 1) % MENU_OPTIONS.len();
                }
                KeyCode::Down | KeyCode::Char('s' | 'S') => {
                    *selected = (*selected + 1) % MENU_OPTIONS.len();
                }
                KeyCode::Enter => {
                    let choice = *selected;
                    self.confirm(choice);
                }
                KeyCode::Esc | KeyCode::Char('q' | 'Q') => self.should_quit = true,
                _ => {}
            },
            Screen::Game(_) => {
                // A key still held, repeating or not, only feeds the held-key map
                if !fresh {
                    return;
                }
                match key.code {
                    KeyCode::Char('p' | 'P') => self.pending.pause = true,
                    KeyCode::Char('r' | 'R') => self.start_game(),
                    KeyCode::Char('m' | 'M') => self.toggle_sound(),
                    KeyCode::Char(' ') => self.pending.fire = true,
                    KeyCode::Esc => self.open_menu(),
                    _ => {}
                }
            }
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        let Screen::Menu { selected } = &mut self.screen else {
            return;
        };
        let layout = terminal::menu_layout(self.last_area);
        let Some(option) = layout.option_at(mouse.column, mouse.row) else {
            return;
        };

        match mouse.kind {
            MouseEventKind::Moved => *selected = option,
            MouseEventKind::Down(MouseButton::Left) => {
                *selected = option;
                self.confirm(option);
            }
            _ => {}
        }
    }

    /// Run as many fixed steps as `elapsed` seconds call for
    pub fn advance(&mut self, elapsed: f32) {
        self.clock += elapsed as f64;
        self.fps.record(self.clock);

        let dt = elapsed.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.update();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// One simulation step
    pub fn update(&mut self) {
        let Screen::Game(session) = &mut self.screen else {
            self.menu_ticks += 1;
            return;
        };

        self.keys.advance();
        let input = TickInput {
            move_dir: self.keys.move_dir(),
            fire: self.pending.fire || self.keys.fire_held(),
            pause: self.pending.pause,
        };
        // Clear one-shot inputs after processing
        self.pending = TickInput::default();

        tick(&mut session.state, &input, FRAME_STEP);
        let events = session.state.drain_events();
        self.audio.play_events(&events);

        if session.state.phase.is_finished() && !session.submitted {
            session.submitted = true;
            session.new_record = self.record.submit(session.state.score);
            log::info!(
                "Session over: {:?} at level {} with score {}",
                session.state.phase,
                session.state.level,
                session.state.score
            );
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        self.last_area = frame.area();
        match &self.screen {
            Screen::Menu { selected } => terminal::draw_menu(
                frame,
                *selected,
                self.record.best(),
                self.menu_ticks,
                &self.settings,
            ),
            Screen::Game(session) => {
                let hud = HudInfo {
                    best: self.record.best(),
                    fps: self.settings.show_fps.then(|| self.fps.fps()),
                    muted: self.audio.is_muted(),
                    new_record: session.new_record,
                };
                terminal::draw_game(frame, &session.state, &self.settings, &hud);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use crossterm::event::KeyEventState;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "arkanoid_app_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn test_app(name: &str) -> App {
        let mut settings = Settings::default();
        settings.seed = Some(7);
        settings.sound = false;
        settings.record_path = temp_path(&format!("{name}_record.txt"));
        App::new(
            GameConfig::default(),
            settings,
            temp_path(&format!("{name}_settings.json")),
            KeyTracker::default(),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn selected(app: &App) -> Option<usize> {
        match app.screen {
            Screen::Menu { selected } => Some(selected),
            Screen::Game(_) => None,
        }
    }

    #[test]
    fn test_menu_navigation_wraps() {
        let mut app = test_app("nav");
        assert_eq!(selected(&app), Some(0));
        app.on_key(press(KeyCode::Up));
        assert_eq!(selected(&app), Some(1));
        app.on_key(press(KeyCode::Char('s')));
        assert_eq!(selected(&app), Some(0));
        app.on_key(press(KeyCode::Down));
        app.on_key(press(KeyCode::Enter));
        assert!(app.should_quit());
    }

    #[test]
    fn test_enter_starts_seeded_game() {
        let mut app = test_app("start");
        app.on_key(press(KeyCode::Enter));
        let state = app.state().expect("game running");
        assert_eq!(state.seed, 7);
        assert_eq!(state.level, 1);
        assert_eq!(state.max_particles, app.settings.max_particles());
    }

    #[test]
    fn test_pause_is_one_shot() {
        let mut app = test_app("pause");
        app.start_game();
        app.on_key(press(KeyCode::Char('p')));
        app.update();
        assert_eq!(app.state().map(|s| s.phase), Some(GamePhase::Paused));
        // The pending pause is consumed by one tick
        app.update();
        assert_eq!(app.state().map(|s| s.phase), Some(GamePhase::Paused));
        app.on_key(KeyEvent {
            kind: KeyEventKind::Release,
            ..press(KeyCode::Char('p'))
        });
        app.on_key(press(KeyCode::Char('P')));
        app.update();
        assert_eq!(app.state().map(|s| s.phase), Some(GamePhase::Playing));
    }

    #[test]
    fn test_restart_and_escape() {
        let mut app = test_app("restart");
        app.start_game();
        for _ in 0..30 {
            app.update();
        }
        assert!(app.state().is_some_and(|s| s.time_ticks == 30));
        app.on_key(press(KeyCode::Char('r')));
        assert!(app.state().is_some_and(|s| s.time_ticks == 0));
        app.on_key(press(KeyCode::Esc));
        assert_eq!(selected(&app), Some(0));
        assert!(!app.should_quit());
    }

    #[test]
    fn test_held_keys_do_not_retrigger() {
        let mut app = test_app("held");
        app.start_game();
        for _ in 0..5 {
            app.update();
        }
        app.on_key(press(KeyCode::Char('r')));
        app.update();
        assert!(app.state().is_some_and(|s| s.time_ticks == 1));
        // Auto-repeat arrives as further presses on plain terminals
        app.on_key(press(KeyCode::Char('r')));
        app.update();
        assert!(app.state().is_some_and(|s| s.time_ticks == 2));

        app.on_key(press(KeyCode::Char('p')));
        app.update();
        app.on_key(press(KeyCode::Char('p')));
        app.update();
        assert_eq!(app.state().map(|s| s.phase), Some(GamePhase::Paused));
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let mut app = test_app("ctrlc");
        app.start_game();
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_score_submitted_once() {
        let mut app = test_app("submit");
        app.start_game();
        if let Screen::Game(session) = &mut app.screen {
            session.state.lives = 1;
            session.state.score = 1234;
            session.state.balls.clear();
        }
        app.update();
        assert_eq!(app.state().map(|s| s.phase), Some(GamePhase::GameOver));
        assert_eq!(app.record.best(), 1234);

        // Lower the stored record behind the app's back; no second write
        std::fs::write(app.record.path(), "5").unwrap();
        app.update();
        assert_eq!(std::fs::read_to_string(app.record.path()).unwrap(), "5");
        let _ = std::fs::remove_file(app.record.path());
    }

    #[test]
    fn test_advance_caps_substeps() {
        let mut app = test_app("advance");
        app.start_game();
        app.advance(1.0);
        assert_eq!(app.state().map(|s| s.time_ticks), Some(MAX_SUBSTEPS as u64));
        app.advance(SIM_DT * 0.5);
        app.advance(SIM_DT * 0.5);
        assert!(app.state().is_some_and(|s| s.time_ticks > MAX_SUBSTEPS as u64));
    }

    #[test]
    fn test_mute_toggle_saves_settings() {
        let mut app = test_app("mute");
        app.start_game();
        app.on_key(press(KeyCode::Char('m')));
        assert!(app.settings.sound);
        let saved = Settings::load_from(&app.settings_path);
        assert!(saved.sound);
        let _ = std::fs::remove_file(&app.settings_path);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        for i in 1..=120 {
            fps.record(i as f64 / 30.0);
        }
        assert_eq!(fps.fps(), 30);
    }
}
