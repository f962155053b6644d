//! Terminal rendering module
//!
//! `shapes` turns the simulation state into backend-neutral primitives;
//! `terminal` paints them with ratatui and draws the HUD and menus.

pub mod shapes;
pub mod terminal;

pub use shapes::{Shape, scene};
pub use terminal::{HudInfo, MENU_OPTIONS, MenuLayout, draw_game, draw_menu, menu_layout};
