//! Favorite locations list

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::models::FavoriteEntry;
use crate::tui::{
    events::ScreenAction,
    ui::{short_degrees, truncate_to_width, Styles},
};

const NAME_WIDTH: usize = 32;

pub struct FavoritesScreen {
    pub entries: Vec<FavoriteEntry>,
    pub list_state: ListState,
}

impl Default for FavoritesScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoritesScreen {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            list_state: ListState::default(),
        }
    }

    /// Update entries and maintain selection if possible
    pub fn set_entries(&mut self, entries: Vec<FavoriteEntry>) {
        let selected = self.list_state.selected();
        self.entries = entries;

        let selected = match selected {
            _ if self.entries.is_empty() => None,
            Some(i) => Some(i.min(self.entries.len() - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn selected(&self) -> Option<&FavoriteEntry> {
        self.list_state.selected().and_then(|i| self.entries.get(i))
    }

    fn next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.entries.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.entries.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => ScreenAction::GoBack,
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous();
                ScreenAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.next();
                ScreenAction::None
            }
            KeyCode::Enter => match self.selected() {
                Some(entry) => ScreenAction::ChooseFavorite(entry.coordinate),
                None => ScreenAction::None,
            },
            KeyCode::Delete | KeyCode::Char('d') | KeyCode::Char('x') => match self.selected() {
                Some(entry) => ScreenAction::RemoveFavorite(entry.name.clone()),
                None => ScreenAction::None,
            },
            _ => ScreenAction::None,
        }
    }

    /// Draw the favorites screen
    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // List
                Constraint::Length(3), // Instructions
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("← ", Styles::key()),
            Span::styled("Favorite Locations", Styles::title()),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, chunks[0]);

        if self.entries.is_empty() {
            let empty = Paragraph::new(
                "You haven't saved any locations yet.\nSave locations to view them here.",
            )
            .style(Styles::inactive())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(empty, chunks[1]);
        } else {
            self.draw_list(f, chunks[1]);
        }

        let instructions = Paragraph::new(Line::from(vec![
            Span::styled("↑/↓", Styles::key()),
            Span::raw(" Navigate   "),
            Span::styled("Enter", Styles::key()),
            Span::raw(" Show on map   "),
            Span::styled("d", Styles::key()),
            Span::raw(" Remove   "),
            Span::styled("Esc", Styles::key()),
            Span::raw(" Back"),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(instructions, chunks[2]);
    }

    fn draw_list(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        truncate_to_width(&entry.name, NAME_WIDTH),
                        Styles::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!(
                            "  Lat: {}   Lng: {}",
                            short_degrees(entry.coordinate.latitude, 7),
                            short_degrees(entry.coordinate.longitude, 7)
                        ),
                        Styles::inactive(),
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("{} saved", self.entries.len()))
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected())
            .highlight_symbol("▶ ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;
    use crossterm::event::KeyModifiers;

    fn entry(name: &str, lat: f64, lng: f64) -> FavoriteEntry {
        FavoriteEntry {
            name: name.to_string(),
            coordinate: Coordinate::new(lat, lng),
        }
    }

    fn press(screen: &mut FavoritesScreen, code: KeyCode) -> ScreenAction {
        screen.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_choose_and_remove_selected() {
        let mut screen = FavoritesScreen::new();
        screen.set_entries(vec![entry("Home", 41.3111, 69.2797), entry("Work", 41.3, 69.2)]);

        press(&mut screen, KeyCode::Down);
        assert_eq!(
            press(&mut screen, KeyCode::Enter),
            ScreenAction::ChooseFavorite(Coordinate::new(41.3, 69.2))
        );
        assert_eq!(
            press(&mut screen, KeyCode::Char('d')),
            ScreenAction::RemoveFavorite("Work".to_string())
        );
    }

    #[test]
    fn test_selection_follows_shrinking_list() {
        let mut screen = FavoritesScreen::new();
        screen.set_entries(vec![entry("Home", 1.0, 1.0), entry("Work", 2.0, 2.0)]);
        press(&mut screen, KeyCode::Up);
        assert_eq!(screen.selected().map(|e| e.name.as_str()), Some("Work"));

        screen.set_entries(vec![entry("Home", 1.0, 1.0)]);
        assert_eq!(screen.selected().map(|e| e.name.as_str()), Some("Home"));

        screen.set_entries(Vec::new());
        assert!(screen.selected().is_none());
        assert_eq!(press(&mut screen, KeyCode::Enter), ScreenAction::None);
    }
}
