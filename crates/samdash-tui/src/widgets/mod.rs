//! Reusable widgets: text inputs, modal forms, confirm dialogs and the
//! filtered/sorted/paged table every list screen is built on.

pub mod confirm;
pub mod form;
pub mod input;
pub mod list_view;

use ratatui::layout::Rect;

/// A `width` × `height` rectangle centered in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Terminal cell count from a length, saturating at `u16::MAX`.
pub fn cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
