//! Palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const SUNSET: Color = Color::Rgb(255, 145, 77); // #ff914d
pub const LAGOON: Color = Color::Rgb(94, 224, 208); // #5ee0d0
pub const HIBISCUS: Color = Color::Rgb(240, 98, 146); // #f06292
pub const SAND: Color = Color::Rgb(246, 222, 140); // #f6de8c
pub const PALM: Color = Color::Rgb(102, 212, 120); // #66d478
pub const CORAL_RED: Color = Color::Rgb(255, 92, 92); // #ff5c5c

pub const FOAM: Color = Color::Rgb(200, 204, 214); // #c8ccd6
pub const DRIFTWOOD: Color = Color::Rgb(110, 118, 140); // #6e768c
pub const DUSK: Color = Color::Rgb(38, 40, 52); // #262834
pub const NIGHT: Color = Color::Rgb(26, 27, 36); // #1a1b24

// ── Styles ────────────────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(LAGOON).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(SUNSET)
}

pub fn border_default() -> Style {
    Style::default().fg(DRIFTWOOD)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(LAGOON)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(FOAM)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(SUNSET)
        .bg(DUSK)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default().fg(SUNSET).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(FOAM)
}

pub fn key_hint() -> Style {
    Style::default().fg(DRIFTWOOD)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(LAGOON).add_modifier(Modifier::BOLD)
}

pub fn overlay() -> Style {
    Style::default().bg(NIGHT)
}
