//! Arkanoid - terminal entry point

use std::fs::File;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use arkanoid::app::App;
use arkanoid::consts::SIM_DT;
use arkanoid::input::{ENHANCED_HOLD_WINDOW_TICKS, HOLD_WINDOW_TICKS, KeyTracker};
use arkanoid::{GameConfig, QualityPreset, Settings};

/// Log file used when `$ARKANOID_LOG` is unset
const DEFAULT_LOG_PATH: &str = "arkanoid.log";

/// The terminal belongs to the game, so logs go to a file
fn init_logging() {
    let path = std::env::var_os("ARKANOID_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));

    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    match File::create(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn main() -> io::Result<()> {
    init_logging();

    let settings_path = Settings::default_path();
    let mut settings = Settings::load_from(&settings_path);
    if let Some(preset) = std::env::var("ARKANOID_QUALITY")
        .ok()
        .and_then(|q| QualityPreset::parse(&q))
    {
        settings.apply_preset(preset);
    }
    log::info!("Quality preset: {}", settings.quality.as_str());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Key-release events let held keys stop the moment they are let go
    let keyboard_enhanced = matches!(supports_keyboard_enhancement(), Ok(true))
        && execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .is_ok();
    let window = if keyboard_enhanced {
        ENHANCED_HOLD_WINDOW_TICKS
    } else {
        HOLD_WINDOW_TICKS
    };
    log::info!("Keyboard enhancement: {}", keyboard_enhanced);

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(
        GameConfig::from_env(),
        settings,
        settings_path,
        KeyTracker::new(window),
    );
    let result = run(&mut terminal, &mut app);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);
    }
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture);
    let _ = disable_raw_mode();
    let _ = terminal.show_cursor();

    if let Err(e) = &result {
        log::error!("Terminal error: {}", e);
    }
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> io::Result<()> {
    let frame_time = Duration::from_secs_f32(SIM_DT);
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        // Handle input until the next frame is due
        let deadline = last_frame + frame_time;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
            if app.should_quit() {
                return Ok(());
            }
        }

        let now = Instant::now();
        app.advance(now.duration_since(last_frame).as_secs_f32());
        last_frame = now;

        if app.should_quit() {
            return Ok(());
        }
    }
}
