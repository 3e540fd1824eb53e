//! Palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ACCENT_TEAL: Color = Color::Rgb(64, 199, 180); // #40c7b4
pub const ACCENT_AMBER: Color = Color::Rgb(255, 183, 77); // #ffb74d
pub const SUCCESS_GREEN: Color = Color::Rgb(102, 216, 126); // #66d87e
pub const ERROR_RED: Color = Color::Rgb(239, 104, 104); // #ef6868
pub const INFO_BLUE: Color = Color::Rgb(118, 178, 241); // #76b2f1

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(198, 201, 212); // #c6c9d4
pub const BORDER_GRAY: Color = Color::Rgb(94, 104, 130); // #5e6882
pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 46, 58); // #2a2e3a
pub const BG_DARK: Color = Color::Rgb(28, 30, 38); // #1c1e26

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(ACCENT_AMBER)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(ACCENT_AMBER)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default()
        .fg(ACCENT_AMBER)
        .add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD)
}

/// Form field label.
pub fn form_label() -> Style {
    Style::default().fg(DIM_WHITE).add_modifier(Modifier::BOLD)
}

/// Inline per-field validation message.
pub fn form_error() -> Style {
    Style::default().fg(ERROR_RED)
}

/// Banner for a page-level error.
pub fn error_banner() -> Style {
    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
}
