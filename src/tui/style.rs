//! Color constants for the TUI.

use ratatui::style::Color;

use crate::meter::Status;

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Table column header color.
pub const COLUMN_FG: Color = Color::Cyan;

/// Returns the row color for a reading status.
pub fn status_color(status: Status) -> Color {
    match status {
        Status::Normal => Color::Green,
        Status::Peak => Color::Red,
        Status::Maintenance => Color::Yellow,
    }
}

/// Returns the gauge color for the share of meters at peak.
pub fn peak_share_color(share: f64) -> Color {
    if share >= 0.5 {
        Color::Red
    } else if share >= 0.2 {
        Color::Yellow
    } else {
        Color::Green
    }
}
