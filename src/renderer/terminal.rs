//! Terminal backend
//!
//! Draws shape lists onto a ratatui braille canvas and lays out the HUD,
//! overlays and the start menu around it.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect as Area},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Paragraph,
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Points, Rectangle},
    },
};

use super::shapes::{self, Shape};
use crate::palette;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState};

/// Start menu entries, top to bottom
pub const MENU_OPTIONS: [&str; 2] = ["START GAME", "QUIT"];

/// Figures shown around the play-field that the simulation does not own
#[derive(Debug, Clone, Copy, Default)]
pub struct HudInfo {
    pub best: u64,
    pub fps: Option<u32>,
    pub muted: bool,
    /// The finished session set a new record
    pub new_record: bool,
}

/// Convert a packed palette colour
pub fn color(packed: u32) -> Color {
    let (r, g, b) = palette::channels(packed);
    Color::Rgb(r, g, b)
}

fn separator() -> Span<'static> {
    Span::styled(" │ ", Style::default().fg(Color::DarkGray))
}

/// Draw the in-game screen
pub fn draw_game(frame: &mut Frame, state: &GameState, settings: &Settings, hud: &HudInfo) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(Paragraph::new(status_line(state, hud)), chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color(palette::PADDLE)))
        .title(" Arkanoid ")
        .title_style(
            Style::default()
                .fg(color(palette::COMBO))
                .add_modifier(Modifier::BOLD),
        );
    let field = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    let scene = shapes::scene(state, settings);
    draw_shapes(
        frame,
        field,
        &scene,
        (state.config.width as f64, state.config.height as f64),
        palette::BACKGROUND,
    );

    frame.render_widget(Paragraph::new(help_line(state.phase)), chunks[2]);

    match state.phase {
        GamePhase::Paused => overlay(
            frame,
            field,
            "PAUSED",
            Color::Yellow,
            vec![
                Line::from("Press P to continue"),
                Line::from("Press ESC for menu"),
            ],
        ),
        GamePhase::GameOver => overlay(
            frame,
            field,
            "GAME OVER",
            Color::Rgb(255, 100, 100),
            summary_lines(state, hud),
        ),
        GamePhase::Victory => overlay(
            frame,
            field,
            "VICTORY! YOU WIN!",
            Color::Rgb(100, 255, 100),
            summary_lines(state, hud),
        ),
        GamePhase::Playing => {}
    }
}

fn status_line(state: &GameState, hud: &HudInfo) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!(" SCORE: {}", state.score),
            Style::default()
                .fg(color(palette::TEXT))
                .add_modifier(Modifier::BOLD),
        ),
        separator(),
        Span::styled(
            format!("BEST: {}", hud.best.max(state.score)),
            Style::default().fg(Color::Rgb(180, 255, 180)),
        ),
        separator(),
        Span::styled(
            format!("LIVES: {}", "♥".repeat(state.lives as usize)),
            Style::default()
                .fg(Color::Rgb(255, 100, 100))
                .add_modifier(Modifier::BOLD),
        ),
        separator(),
        Span::styled(
            format!("LEVEL: {}/{}", state.level, state.config.max_level),
            Style::default().fg(color(palette::TEXT)),
        ),
    ];

    if state.combo.combo > 1 {
        spans.push(separator());
        spans.push(Span::styled(
            format!(
                "COMBO x{} ({:.1}x) {}",
                state.combo.combo,
                state.combo.multiplier,
                bar(state.combo.window_fraction(), 6)
            ),
            Style::default()
                .fg(color(palette::COMBO))
                .add_modifier(Modifier::BOLD),
        ));
    }

    let effects = &state.paddle.effects;
    for (active, ticks, label, tint) in [
        (effects.has_laser(), effects.laser_ticks, "LASER", palette::LASER),
        (effects.has_shield(), effects.shield_ticks, "SHIELD", palette::SHIELD),
        (effects.has_magnet(), effects.magnet_ticks, "MAGNET", palette::MAGNET),
    ] {
        if active {
            spans.push(separator());
            spans.push(Span::styled(
                format!("{} {}s", label, ticks.div_ceil(crate::consts::TARGET_FPS)),
                Style::default().fg(color(tint)),
            ));
        }
    }

    if hud.muted {
        spans.push(separator());
        spans.push(Span::styled("MUTED", Style::default().fg(Color::DarkGray)));
    }
    if let Some(fps) = hud.fps {
        spans.push(separator());
        spans.push(Span::styled(
            format!("{fps} FPS"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

/// Text gauge, e.g. `[####--]`
fn bar(fraction: f32, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn help_line(phase: GamePhase) -> Line<'static> {
    let key = |s: &'static str| Span::styled(s, Style::default().fg(Color::DarkGray));
    let sep = || Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60)));
    match phase {
        GamePhase::GameOver | GamePhase::Victory => Line::from(vec![
            Span::styled(
                " R Restart ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            sep(),
            key("Esc Menu"),
        ]),
        _ => Line::from(vec![
            key(" ←→/AD Move "),
            sep(),
            Span::styled(
                "SPACE Laser ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            sep(),
            key("P Pause "),
            sep(),
            key("R Restart "),
            sep(),
            key("M Sound "),
            sep(),
            key("Esc Menu"),
        ]),
    }
}

fn summary_lines(state: &GameState, hud: &HudInfo) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(format!("Final Score: {}", state.score)),
        Line::styled(
            format!("Max Combo: {}", state.combo.max_combo),
            Style::default().fg(color(palette::COMBO)),
        ),
    ];
    if hud.new_record {
        lines.push(Line::styled(
            "NEW BEST SCORE!",
            Style::default()
                .fg(Color::Rgb(180, 255, 180))
                .add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::styled(
        "Press R to restart",
        Style::default().fg(Color::Gray),
    ));
    lines
}

/// Centre a `width` x `height` box inside `area`
pub fn centered(area: Area, width: u16, height: u16) -> Area {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Area::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn overlay(frame: &mut Frame, area: Area, title: &str, tint: Color, lines: Vec<Line<'static>>) {
    let width = lines
        .iter()
        .map(Line::width)
        .chain(std::iter::once(title.len()))
        .max()
        .unwrap_or(0) as u16
        + 6;
    let popup = centered(area, width, lines.len() as u16 + 2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(tint))
        .title(format!(" {title} "))
        .title_alignment(Alignment::Center)
        .title_style(Style::default().fg(tint).add_modifier(Modifier::BOLD));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .style(Style::default().bg(color(palette::BACKGROUND))),
        popup,
    );
}

/// Paint shapes given in play-field coordinates onto a braille canvas
fn draw_shapes(
    frame: &mut Frame,
    area: Area,
    shapes: &[Shape],
    (width, height): (f64, f64),
    background: u32,
) {
    // Canvas units covered by one cell column and one braille dot row
    let cell_w = width / area.width.max(1) as f64;
    let dot_h = (height / (area.height.max(1) as f64 * 4.0)).max(1.0);

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .background_color(color(background))
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for shape in shapes {
                paint_shape(ctx, shape, height, cell_w, dot_h);
            }
        });
    frame.render_widget(canvas, area);
}

fn paint_shape(ctx: &mut Context, shape: &Shape, height: f64, cell_w: f64, dot_h: f64) {
    // The canvas y axis points up
    let flip = |y: f32| height - y as f64;

    match shape {
        Shape::Rect {
            rect,
            color: c,
            filled,
        } => {
            let (x, w) = (rect.x as f64, rect.w as f64);
            if *filled {
                let mut y = rect.top() as f64;
                let bottom = rect.bottom() as f64;
                while y <= bottom {
                    ctx.draw(&CanvasLine::new(x, height - y, x + w, height - y, color(*c)));
                    y += dot_h;
                }
            } else {
                ctx.draw(&Rectangle {
                    x,
                    y: flip(rect.bottom()),
                    width: w,
                    height: rect.h as f64,
                    color: color(*c),
                });
            }
        }
        Shape::Circle {
            center,
            radius,
            color: c,
        } => ctx.draw(&Circle {
            x: center.x as f64,
            y: flip(center.y),
            radius: *radius as f64,
            color: color(*c),
        }),
        Shape::Line { from, to, color: c } => ctx.draw(&CanvasLine::new(
            from.x as f64,
            flip(from.y),
            to.x as f64,
            flip(to.y),
            color(*c),
        )),
        Shape::Points { points, color: c } => {
            let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, flip(p.y))).collect();
            ctx.draw(&Points {
                coords: &coords,
                color: color(*c),
            });
        }
        Shape::Text {
            pos,
            text,
            color: c,
        } => {
            let x = pos.x as f64 - text.chars().count() as f64 * cell_w / 2.0;
            ctx.print(
                x.max(0.0),
                flip(pos.y),
                Span::styled(
                    text.clone(),
                    Style::default().fg(color(*c)).add_modifier(Modifier::BOLD),
                ),
            );
        }
    }
}

/// Where each piece of the start menu goes
#[derive(Debug, Clone, Copy)]
pub struct MenuLayout {
    pub title: Area,
    pub subtitle: Area,
    pub best: Area,
    pub options: [Area; 2],
    pub controls: Area,
}

impl MenuLayout {
    /// Menu entry under a terminal cell, if any
    pub fn option_at(&self, column: u16, row: u16) -> Option<usize> {
        self.options
            .iter()
            .position(|area| area.contains(Position::new(column, row)))
    }
}

/// Lay out the start menu inside `area`
pub fn menu_layout(area: Area) -> MenuLayout {
    let rows = Layout::vertical([
        Constraint::Percentage(25),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(area);

    let option = |row: Area, label: &str| centered(row, label.len() as u16 + 4, 1);
    MenuLayout {
        title: rows[1],
        subtitle: rows[3],
        best: rows[4],
        options: [
            option(rows[6], MENU_OPTIONS[0]),
            option(rows[8], MENU_OPTIONS[1]),
        ],
        controls: rows[10],
    }
}

/// Draw the start menu
pub fn draw_menu(frame: &mut Frame, selected: usize, best: u64, ticks: u64, settings: &Settings) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(color(palette::MENU_BACKGROUND))),
        area,
    );

    if settings.effective_starfield() {
        let stars = [shapes::starfield(960.0, 720.0, ticks, 0x5EED)];
        draw_shapes(frame, area, &stars, (960.0, 720.0), palette::MENU_BACKGROUND);
    }

    let layout = menu_layout(area);
    let centered_text = |line: Line<'static>| Paragraph::new(line).alignment(Alignment::Center);

    frame.render_widget(
        centered_text(Line::styled(
            "A R K A N O I D",
            Style::default()
                .fg(Color::Rgb(255, 255, 100))
                .add_modifier(Modifier::BOLD),
        )),
        layout.title,
    );
    frame.render_widget(
        centered_text(Line::styled(
            "Ultimate Edition",
            Style::default().fg(Color::Rgb(200, 200, 255)),
        )),
        layout.subtitle,
    );
    frame.render_widget(
        centered_text(Line::styled(
            format!("BEST SCORE: {best}"),
            Style::default().fg(Color::Rgb(180, 255, 180)),
        )),
        layout.best,
    );

    for (i, (label, area)) in MENU_OPTIONS.iter().zip(layout.options).enumerate() {
        let style = if i == selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Rgb(200, 200, 200))
        };
        frame.render_widget(centered_text(Line::styled(*label, style)), area);
    }

    frame.render_widget(
        centered_text(Line::styled(
            "↑/↓: Select | ENTER: Confirm | A/D or ←/→: Move | SPACE: Laser | M: Sound",
            Style::default().fg(Color::Rgb(150, 150, 150)),
        )),
        layout.controls,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_unpacks_palette() {
        assert_eq!(color(palette::BALL), Color::Rgb(255, 165, 0));
    }

    #[test]
    fn test_bar_gauge() {
        assert_eq!(bar(0.0, 4), "[----]");
        assert_eq!(bar(0.5, 4), "[##--]");
        assert_eq!(bar(2.0, 4), "[####]");
    }

    #[test]
    fn test_centered_fits_inside() {
        let area = Area::new(0, 0, 80, 24);
        let popup = centered(area, 20, 4);
        assert_eq!(popup, Area::new(30, 10, 20, 4));
        assert_eq!(centered(area, 200, 50), area);
    }

    #[test]
    fn test_menu_hit_testing() {
        let layout = menu_layout(Area::new(0, 0, 80, 24));
        let start = layout.options[0];
        let quit = layout.options[1];
        assert!(start.y < quit.y);
        assert_eq!(layout.option_at(start.x + 1, start.y), Some(0));
        assert_eq!(layout.option_at(quit.x, quit.y), Some(1));
        assert_eq!(layout.option_at(0, 0), None);
    }
}
