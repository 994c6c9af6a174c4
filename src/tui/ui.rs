//! Common UI styles and helpers for the pinpoint TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::MapMode;

/// Common UI styles
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default()
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Color::Rgb(0x2C, 0x3E, 0x50))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Color::Rgb(0xB8, 0xC5, 0xD9))
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn success() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn info() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn inactive() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn active_border() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn inactive_border() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn key() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

/// Colors used to draw the map canvas in each display mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPalette {
    pub land: Color,
    pub background: Color,
    pub grid: Color,
    pub marker: Color,
}

impl MapPalette {
    pub fn for_mode(mode: MapMode) -> Self {
        match mode {
            MapMode::Standard => Self {
                land: Color::Gray,
                background: Color::Reset,
                grid: Color::DarkGray,
                marker: Color::Red,
            },
            MapMode::Satellite => Self {
                land: Color::Rgb(0x6b, 0x9a, 0x76),
                background: Color::Rgb(0x0b, 0x1d, 0x3a),
                grid: Color::Rgb(0x26, 0x3c, 0x3f),
                marker: Color::Yellow,
            },
            MapMode::Night => Self {
                land: Color::Rgb(0x74, 0x68, 0x55),
                background: Color::Rgb(0x24, 0x2f, 0x3e),
                grid: Color::Rgb(0x38, 0x41, 0x4e),
                marker: Color::Rgb(0xd5, 0x95, 0x63),
            },
        }
    }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Truncate to a display width, appending an ellipsis when cut
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if width + char_width + 1 > max_width {
            break;
        }
        out.push(c);
        width += char_width;
    }
    out.push('…');
    out
}

/// First `n` characters of a coordinate's textual form, as the favorites
/// list shows them
pub fn short_degrees(value: f64, n: usize) -> String {
    value.to_string().chars().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Home", 10), "Home");
        assert_eq!(truncate_to_width("Amir Temur Square", 8), "Amir Te…");
        assert_eq!(truncate_to_width("東京タワー", 5), "東京…");
    }

    #[test]
    fn test_short_degrees() {
        assert_eq!(short_degrees(41.34114558450147, 7), "41.3411");
        assert_eq!(short_degrees(-0.1278, 7), "-0.1278");
        assert_eq!(short_degrees(51.5, 7), "51.5");
    }

    #[test]
    fn test_palettes_differ_per_mode() {
        assert_ne!(
            MapPalette::for_mode(MapMode::Standard),
            MapPalette::for_mode(MapMode::Night)
        );
    }
}
