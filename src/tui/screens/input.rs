//! Coordinate input screen

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use crate::models::{parse_coordinate_input, QuickLocation, QUICK_LOCATIONS};
use crate::tui::{components::FormField, events::ScreenAction, ui::Styles};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    Latitude,
    Longitude,
    QuickLocations,
}

impl InputFocus {
    fn next(self) -> Self {
        match self {
            InputFocus::Latitude => InputFocus::Longitude,
            InputFocus::Longitude => InputFocus::QuickLocations,
            InputFocus::QuickLocations => InputFocus::Latitude,
        }
    }

    fn previous(self) -> Self {
        match self {
            InputFocus::Latitude => InputFocus::QuickLocations,
            InputFocus::Longitude => InputFocus::Latitude,
            InputFocus::QuickLocations => InputFocus::Longitude,
        }
    }
}

/// Input screen state
pub struct InputScreen {
    pub latitude: FormField,
    pub longitude: FormField,
    pub focus: InputFocus,
    /// Highlighted entry in the quick locations row
    pub quick_cursor: usize,
    /// Quick location whose values are currently in the fields
    pub selected_quick: Option<usize>,
}

impl Default for InputScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl InputScreen {
    pub fn new() -> Self {
        let mut screen = Self {
            latitude: FormField::new("Latitude").with_placeholder("e.g. 41.3111"),
            longitude: FormField::new("Longitude").with_placeholder("e.g. 69.2797"),
            focus: InputFocus::Latitude,
            quick_cursor: 0,
            selected_quick: None,
        };
        screen.update_focus();
        screen
    }

    fn update_focus(&mut self) {
        self.latitude.set_focus(self.focus == InputFocus::Latitude);
        self.longitude.set_focus(self.focus == InputFocus::Longitude);
    }

    fn set_focus(&mut self, focus: InputFocus) {
        self.focus = focus;
        self.update_focus();
    }

    fn focused_field(&mut self) -> Option<&mut FormField> {
        match self.focus {
            InputFocus::Latitude => Some(&mut self.latitude),
            InputFocus::Longitude => Some(&mut self.longitude),
            InputFocus::QuickLocations => None,
        }
    }

    /// Current inline error, shared by both fields
    pub fn error(&self) -> Option<&str> {
        self.latitude
            .validation_error
            .as_deref()
            .or(self.longitude.validation_error.as_deref())
    }

    fn set_error(&mut self, message: &str) {
        self.latitude.validation_error = Some(message.to_string());
        self.longitude.validation_error = Some(message.to_string());
    }

    fn clear_error(&mut self) {
        self.latitude.validation_error = None;
        self.longitude.validation_error = None;
    }

    /// Fill both fields from a quick location
    pub fn apply_quick_location(&mut self, index: usize) {
        if let Some(QuickLocation { label, coordinate }) = QUICK_LOCATIONS.get(index) {
            debug!("Quick location selected: {}", label);
            self.latitude.set_value(&coordinate.latitude.to_string());
            self.longitude.set_value(&coordinate.longitude.to_string());
            self.quick_cursor = index;
            self.selected_quick = Some(index);
        }
    }

    /// Validate the fields; on success the app opens the map
    pub fn submit(&mut self) -> ScreenAction {
        match parse_coordinate_input(&self.latitude.value, &self.longitude.value) {
            Ok(coordinate) => {
                self.clear_error();
                ScreenAction::SelectLocation(coordinate)
            }
            Err(e) => {
                debug!("Rejected coordinate input: {}", e);
                self.set_error(&e.to_string());
                ScreenAction::None
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, favorites_count: usize) -> ScreenAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('f') if ctrl => return view_favorites(favorites_count),
            KeyCode::F(2) => return view_favorites(favorites_count),
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab | KeyCode::Down => {
                self.set_focus(self.focus.next());
                return ScreenAction::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.set_focus(self.focus.previous());
                return ScreenAction::None;
            }
            _ => {}
        }

        if self.focus == InputFocus::QuickLocations {
            match key.code {
                KeyCode::Left => {
                    let index = (self.quick_cursor + QUICK_LOCATIONS.len() - 1) % QUICK_LOCATIONS.len();
                    self.apply_quick_location(index);
                }
                KeyCode::Right => {
                    let index = (self.quick_cursor + 1) % QUICK_LOCATIONS.len();
                    self.apply_quick_location(index);
                }
                KeyCode::Char(' ') => self.apply_quick_location(self.quick_cursor),
                KeyCode::Char(c) if ('1'..='4').contains(&c) => {
                    self.apply_quick_location(c as usize - '1' as usize);
                }
                _ => {}
            }
            return ScreenAction::None;
        }

        let Some(field) = self.focused_field() else {
            return ScreenAction::None;
        };
        let edited = match key.code {
            KeyCode::Char(c) if !ctrl => {
                field.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                field.delete_char();
                true
            }
            KeyCode::Delete => {
                field.delete_char_forward();
                true
            }
            KeyCode::Left => {
                field.move_cursor_left();
                false
            }
            KeyCode::Right => {
                field.move_cursor_right();
                false
            }
            KeyCode::Home => {
                field.move_cursor_to_start();
                false
            }
            KeyCode::End => {
                field.move_cursor_to_end();
                false
            }
            _ => false,
        };

        if edited {
            self.selected_quick = None;
        }
        ScreenAction::None
    }

    /// Draw the input screen
    pub fn draw(&self, f: &mut Frame, area: Rect, favorites_count: usize) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Latitude
                Constraint::Length(3), // Longitude
                Constraint::Length(3), // Quick locations
                Constraint::Length(1), // Favorites
                Constraint::Min(0),
                Constraint::Length(3), // Explore
            ])
            .split(area);

        let title = Paragraph::new("Where would you like to go?")
            .style(Styles::title())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(title, chunks[0]);

        self.latitude.render(f, chunks[1]);
        self.longitude.render(f, chunks[2]);
        self.draw_quick_locations(f, chunks[3]);

        if favorites_count > 0 {
            let favorites = Paragraph::new(Line::from(vec![
                Span::styled("Ctrl+F", Styles::key()),
                Span::raw(format!(" View Favorite Locations ({})", favorites_count)),
            ]));
            f.render_widget(favorites, chunks[4]);
        }

        let explore = Paragraph::new(Line::from(vec![
            Span::styled("Enter", Styles::key()),
            Span::raw(" Explore Location   "),
            Span::styled("Tab", Styles::key()),
            Span::raw(" Next field"),
        ]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(explore, chunks[6]);
    }

    fn draw_quick_locations(&self, f: &mut Frame, area: Rect) {
        let focused = self.focus == InputFocus::QuickLocations;
        let mut spans = Vec::new();
        for (i, quick) in QUICK_LOCATIONS.iter().enumerate() {
            let style = if self.selected_quick == Some(i) {
                Styles::selected()
            } else if focused && self.quick_cursor == i {
                Styles::active_border().add_modifier(Modifier::BOLD)
            } else {
                Styles::default()
            };
            spans.push(Span::styled(format!(" {} {} ", i + 1, quick.label), style));
            spans.push(Span::raw("  "));
        }

        let border_style = if focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let quick = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title("Quick Locations")
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        f.render_widget(quick, area);
    }
}

fn view_favorites(favorites_count: usize) -> ScreenAction {
    if favorites_count > 0 {
        ScreenAction::ViewFavorites
    } else {
        ScreenAction::SetStatus("No favorite locations saved yet".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    fn press(screen: &mut InputScreen, code: KeyCode) -> ScreenAction {
        screen.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), 0)
    }

    fn type_text(screen: &mut InputScreen, text: &str) {
        for c in text.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_submit_valid_coordinates() {
        let mut screen = InputScreen::new();
        type_text(&mut screen, "41.3111");
        press(&mut screen, KeyCode::Tab);
        type_text(&mut screen, "69.2797");

        assert_eq!(
            press(&mut screen, KeyCode::Enter),
            ScreenAction::SelectLocation(Coordinate::new(41.3111, 69.2797))
        );
        assert_eq!(screen.error(), None);
    }

    #[test]
    fn test_out_of_range_shows_error() {
        let mut screen = InputScreen::new();
        type_text(&mut screen, "91");
        press(&mut screen, KeyCode::Tab);
        type_text(&mut screen, "0");

        assert_eq!(press(&mut screen, KeyCode::Enter), ScreenAction::None);
        assert_eq!(screen.error(), Some("Invalid coordinate ranges"));
    }

    #[test]
    fn test_non_numeric_shows_error() {
        let mut screen = InputScreen::new();
        type_text(&mut screen, "abc");
        press(&mut screen, KeyCode::Tab);
        type_text(&mut screen, "0");

        assert_eq!(press(&mut screen, KeyCode::Enter), ScreenAction::None);
        assert_eq!(screen.error(), Some("Invalid coordinate format"));
    }

    #[test]
    fn test_quick_location_fills_fields() {
        let mut screen = InputScreen::new();
        press(&mut screen, KeyCode::BackTab);
        assert_eq!(screen.focus, InputFocus::QuickLocations);

        press(&mut screen, KeyCode::Char('2'));
        assert_eq!(screen.latitude.value, "51.5074");
        assert_eq!(screen.longitude.value, "-0.1278");
        assert_eq!(screen.selected_quick, Some(1));

        press(&mut screen, KeyCode::Tab);
        press(&mut screen, KeyCode::Backspace);
        assert_eq!(screen.selected_quick, None);
        assert_eq!(screen.latitude.value, "51.507");
    }

    #[test]
    fn test_favorites_only_offered_when_present() {
        let mut screen = InputScreen::new();
        let ctrl_f = KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL);

        assert!(matches!(screen.handle_key_event(ctrl_f, 0), ScreenAction::SetStatus(_)));
        assert_eq!(screen.handle_key_event(ctrl_f, 2), ScreenAction::ViewFavorites);
        assert!(screen.latitude.is_empty());
    }
}
