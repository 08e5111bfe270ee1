//! Palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};

use samdash_core::Credential;

use crate::action::NotificationLevel;

// ── Palette ───────────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const AMBER: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const RED: Color = Color::Rgb(255, 99, 99); // #ff6363
pub const TEXT: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const MUTED: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border_default() -> Style {
    Style::default().fg(MUTED)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(TEXT)
}

/// Row under the cursor.
pub fn table_cursor() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Row checked for a bulk action.
pub fn table_checked() -> Style {
    Style::default().fg(AMBER)
}

pub fn tab_active() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(TEXT)
}

pub fn key_hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}

pub fn input_focused() -> Style {
    Style::default().fg(CYAN).bg(BG_HIGHLIGHT)
}

pub fn input_default() -> Style {
    Style::default().fg(TEXT)
}

pub fn credential(credential: Credential) -> Style {
    match credential {
        Credential::Superadmin | Credential::Admin => Style::default().fg(ACCENT),
        Credential::Operator => Style::default().fg(CYAN),
        Credential::Guest => Style::default().fg(TEXT),
    }
}

pub fn over_speed(over: bool) -> Style {
    if over {
        Style::default().fg(RED).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT)
    }
}

/// Border color and icon for a banner.
pub fn banner(level: NotificationLevel) -> (Color, &'static str) {
    match level {
        NotificationLevel::Success => (GREEN, "✓"),
        NotificationLevel::Error => (RED, "✗"),
        NotificationLevel::Warning => (AMBER, "!"),
        NotificationLevel::Info => (CYAN, "·"),
    }
}
