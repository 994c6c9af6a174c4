//! Welcome screen shown on the very first launch

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::{events::ScreenAction, ui::Styles};

#[derive(Debug, Default)]
pub struct WelcomeScreen;

impl WelcomeScreen {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => ScreenAction::CompleteWelcome,
            KeyCode::Esc | KeyCode::Char('q') => ScreenAction::Quit,
            _ => ScreenAction::None,
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Length(7),
                Constraint::Min(0),
            ])
            .split(area);

        let content = vec![
            Line::from(Span::styled(
                "Pinpoint",
                Styles::title().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("Explore any coordinate on Earth", Styles::info())),
            Line::from(""),
            Line::from(vec![
                Span::raw("Press "),
                Span::styled("Enter", Styles::key()),
                Span::raw(" to go on 🚀"),
            ]),
        ];

        let welcome = Paragraph::new(content)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            );

        f.render_widget(welcome, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_enter_completes_welcome() {
        let mut screen = WelcomeScreen::new();
        let action = screen.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(action, ScreenAction::CompleteWelcome);
    }
}
