//! Colors for the panels.

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub border: Color,
    pub border_focused: Color,
    pub trace: Color,
    pub axis: Color,
    pub positive: Color,
    pub negative: Color,
    pub zero: Color,
    pub cursor: Color,
    pub ok: Color,
    pub error: Color,
    pub dim: Color,
    pub status_fg: Color,
    pub status_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            trace: Color::Yellow,
            axis: Color::Gray,
            positive: Color::Green,
            negative: Color::Red,
            zero: Color::DarkGray,
            cursor: Color::Cyan,
            ok: Color::Green,
            error: Color::Red,
            dim: Color::DarkGray,
            status_fg: Color::White,
            status_bg: Color::Rgb(30, 30, 40),
        }
    }
}
