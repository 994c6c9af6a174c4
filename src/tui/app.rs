//! Main TUI application state and logic

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use super::events::{AppEvent, ScreenAction};
use super::screens::*;
use super::ui::{centered_rect, Styles};
use crate::config::Config;
use crate::favorites::FavoritesStore;
use crate::geocoding::{location_name, Geocoder};
use crate::models::Coordinate;
use crate::router::{AppScreen, ScreenRouter};
use crate::storage::{Preferences, SharedStore};

/// How long to wait for a key before redrawing
const TICK_RATE: Duration = Duration::from_millis(50);

/// Main TUI application state
pub struct App {
    /// Application configuration
    pub config: Config,
    pub router: ScreenRouter,
    pub favorites: FavoritesStore,
    pub preferences: Preferences,
    geocoder: Arc<dyn Geocoder>,

    // Screen states
    pub show_welcome: bool,
    pub welcome: WelcomeScreen,
    pub input: InputScreen,
    pub map: MapScreen,
    pub favorites_screen: FavoritesScreen,

    // Global application state
    pub should_quit: bool,
    pub show_help_popup: bool,
    pub status_message: Option<String>,
    pub error_message: Option<String>,

    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    /// Create a new TUI application over an already opened preferences store
    pub fn new(config: Config, store: SharedStore, geocoder: Arc<dyn Geocoder>) -> Self {
        let preferences = Preferences::new(store.clone());
        let favorites = FavoritesStore::open(store);
        let (events_tx, events_rx) = unbounded_channel();

        Self {
            config,
            router: ScreenRouter::new(),
            show_welcome: preferences.is_first_launch(),
            favorites,
            preferences,
            geocoder,

            welcome: WelcomeScreen::new(),
            input: InputScreen::new(),
            map: MapScreen::new(),
            favorites_screen: FavoritesScreen::new(),

            should_quit: false,
            show_help_popup: false,
            status_message: None,
            error_message: None,

            events_tx,
            events_rx,
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!(
            "Starting with {} favorite locations (first launch: {})",
            self.favorites.len(),
            self.show_welcome
        );

        loop {
            terminal.draw(|f| self.draw(f))?;

            if crossterm::event::poll(TICK_RATE)? {
                if let Event::Key(key) = crossterm::event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            self.drain_events();

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply every background result that has arrived so far
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_app_event(event);
        }
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LocationResolved { target, name } => {
                if self.router.target() == Some(target) {
                    self.map.set_location_name(name);
                } else {
                    debug!("Discarding stale location name for {}", target);
                }
            }
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global shortcuts
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Char('?') if !self.is_typing() => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Esc if self.show_help_popup => {
                self.show_help_popup = false;
                return;
            }
            _ => {}
        }

        if self.show_help_popup {
            return;
        }

        if self.show_welcome {
            let action = self.welcome.handle_key_event(key);
            self.apply_action(action);
            return;
        }

        // Any key acknowledges the previous message
        self.clear_messages();

        let action = match self.router.screen() {
            AppScreen::Input => self.input.handle_key_event(key, self.favorites.len()),
            AppScreen::Map { .. } => self.map.handle_key_event(key),
            AppScreen::Favorites => self.favorites_screen.handle_key_event(key),
        };

        // 'q' quits from screens that do not take text
        if action == ScreenAction::None
            && key.code == KeyCode::Char('q')
            && !self.is_typing()
        {
            self.should_quit = true;
            return;
        }

        self.apply_action(action);
    }

    /// Whether printable keys currently go into a text field
    fn is_typing(&self) -> bool {
        if self.show_welcome {
            return false;
        }
        match self.router.screen() {
            AppScreen::Input => true,
            AppScreen::Map { .. } => self.map.save_dialog.is_some(),
            AppScreen::Favorites => false,
        }
    }

    pub fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::CompleteWelcome => {
                if let Err(e) = self.preferences.complete_first_launch() {
                    error!("Failed to store first-launch flag: {}", e);
                    self.set_error(format!("Could not save preferences: {}", e));
                }
                self.show_welcome = false;
            }
            ScreenAction::SelectLocation(coordinate) => {
                match self.router.select_location(coordinate) {
                    Ok(()) => self.open_map(coordinate),
                    Err(e) => self.set_error(e.to_string()),
                }
            }
            ScreenAction::ViewFavorites => match self.router.view_favorites() {
                Ok(()) => {
                    self.favorites.reload();
                    self.favorites_screen.set_entries(self.favorites.entries());
                }
                Err(e) => self.set_error(e.to_string()),
            },
            ScreenAction::ChooseFavorite(coordinate) => {
                match self.router.choose_favorite(coordinate) {
                    Ok(()) => self.open_map(coordinate),
                    Err(e) => self.set_error(e.to_string()),
                }
            }
            ScreenAction::GoBack => {
                if let Err(e) = self.router.go_back() {
                    self.set_error(e.to_string());
                }
            }
            ScreenAction::SetMapMode(mode) => self.router.set_map_mode(mode),
            ScreenAction::SaveFavorite(name) => self.save_favorite(&name),
            ScreenAction::RemoveFavorite(name) => self.remove_favorite(&name),
            ScreenAction::SetStatus(message) => self.set_status(message),
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::None => {}
        }
    }

    /// Show the map for `target` and start resolving its name
    fn open_map(&mut self, target: Coordinate) {
        info!("Showing {} on the map", target);
        self.map.open(target);

        let geocoder = Arc::clone(&self.geocoder);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let name = location_name(geocoder.as_ref(), target).await;
            // The receiver is gone only when the app is shutting down
            let _ = events_tx.send(AppEvent::LocationResolved { target, name });
        });
    }

    fn save_favorite(&mut self, name: &str) {
        let Some(target) = self.router.target() else {
            self.set_error("No location to save".to_string());
            return;
        };

        match self.favorites.put(name, target) {
            Ok(()) => {
                self.map.close_save_dialog();
                self.set_status(format!("Saved '{}' to favorites", name));
            }
            Err(e) => {
                error!("Failed to save favorite '{}': {}", name, e);
                self.map.set_save_error(e.to_string());
            }
        }
    }

    fn remove_favorite(&mut self, name: &str) {
        match self.favorites.remove(name) {
            Ok(_) => {
                self.favorites_screen.set_entries(self.favorites.entries());
                self.set_status(format!("Removed '{}'", name));
            }
            Err(e) => {
                error!("Failed to remove favorite '{}': {}", name, e);
                self.set_error(format!("Could not remove '{}': {}", name, e));
            }
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        if self.show_welcome {
            self.welcome.draw(f, size);
            return;
        }

        // Main layout: status bar at bottom, content area above
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        match self.router.screen() {
            AppScreen::Input => self.input.draw(f, chunks[0], self.favorites.len()),
            AppScreen::Map { .. } => self.map.draw(f, chunks[0], self.router.map_mode()),
            AppScreen::Favorites => self.favorites_screen.draw(f, chunks[0]),
        }

        self.draw_status_bar(f, chunks[1]);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    /// Draw status bar with current screen info and shortcuts
    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if let Some(ref msg) = self.status_message {
            format!("Status: {}", msg)
        } else if let Some(ref err) = self.error_message {
            format!("Error: {}", err)
        } else {
            format!(
                "Pinpoint - {} | Ctrl+C: Quit | F1: Help",
                self.router.screen().title()
            )
        };

        let style = if self.error_message.is_some() {
            Styles::error()
        } else if self.status_message.is_some() {
            Styles::success()
        } else {
            Styles::inactive()
        };

        let status_bar = Paragraph::new(status_text)
            .style(style)
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(status_bar, area);
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 60, area);

        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.get_context_help())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .style(Styles::active_border()),
            )
            .style(Style::default());

        f.render_widget(help_popup, popup_area);
    }

    /// Get context-sensitive help content
    fn get_context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            Ctrl+C / Ctrl+Q - Quit application\n\
            F1 - Toggle this help\n\n";

        let screen_help = match self.router.screen() {
            AppScreen::Input => {
                "Enter Coordinates:\n\
                Tab / ↑↓ - Switch field\n\
                Enter - Explore location\n\
                ←/→ or 1-4 on Quick Locations - Pick a quick location\n\
                Ctrl+F / F2 - View favorite locations"
            }
            AppScreen::Map { .. } => {
                "Map:\n\
                Esc - Back to input\n\
                m / s / n - Standard, satellite, night map\n\
                a - Save location to favorites\n\
                i - Toggle location details"
            }
            AppScreen::Favorites => {
                "Favorite Locations:\n\
                ↑/↓ - Navigate\n\
                Enter - Show on map\n\
                d / Delete - Remove\n\
                Esc - Back to input"
            }
        };

        format!(
            "{}{}\n\nFavorites file: {}",
            global_help,
            screen_help,
            self.config.prefs_path.display()
        )
    }

    /// Set status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.error_message = None;
    }

    /// Set error message
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
        self.status_message = None;
    }

    /// Clear status and error messages
    pub fn clear_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::{OfflineGeocoder, LOADING_LABEL};
    use crate::models::MapMode;
    use crate::storage::{KeyValueStore, MemoryStore, FIRST_LAUNCH_KEY};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    fn returning_app(store: SharedStore) -> App {
        store.put_bool(FIRST_LAUNCH_KEY, false).unwrap();
        App::new(Config::default(), store, Arc::new(OfflineGeocoder))
    }

    async fn wait_for_location_name(app: &mut App) {
        let event = tokio::time::timeout(Duration::from_secs(5), app.events_rx.recv())
            .await
            .unwrap()
            .unwrap();
        app.handle_app_event(event);
    }

    #[tokio::test]
    async fn test_first_launch_shows_welcome_once() {
        let store: SharedStore = Arc::new(MemoryStore::new());

        let mut app = App::new(Config::default(), store.clone(), Arc::new(OfflineGeocoder));
        assert!(app.show_welcome);
        app.handle_key_event(key(KeyCode::Enter));
        assert!(!app.show_welcome);

        let app = App::new(Config::default(), store, Arc::new(OfflineGeocoder));
        assert!(!app.show_welcome);
    }

    #[tokio::test]
    async fn test_explore_save_and_recall_favorite() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut app = returning_app(store.clone());

        type_text(&mut app, "41.3111");
        app.handle_key_event(key(KeyCode::Tab));
        type_text(&mut app, "69.2797");
        app.handle_key_event(key(KeyCode::Enter));

        let home = Coordinate::new(41.3111, 69.2797);
        assert_eq!(app.router.screen(), AppScreen::Map { target: home });
        assert_eq!(app.map.location_name, LOADING_LABEL);

        wait_for_location_name(&mut app).await;
        assert_eq!(app.map.location_name, "Location at 41.3111, 69.2797");

        app.handle_key_event(key(KeyCode::Char('n')));
        assert_eq!(app.router.map_mode(), MapMode::Night);

        app.handle_key_event(key(KeyCode::Char('a')));
        type_text(&mut app, "Home");
        app.handle_key_event(key(KeyCode::Enter));
        assert!(app.map.save_dialog.is_none());
        assert_eq!(app.favorites.get("Home"), Some(home));

        app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(app.router.screen(), AppScreen::Input);

        app.handle_key_event(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL));
        assert_eq!(app.router.screen(), AppScreen::Favorites);
        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.router.screen(), AppScreen::Map { target: home });

        let reopened = FavoritesStore::open(store);
        assert_eq!(reopened.get("Home"), Some(home));
    }

    #[tokio::test]
    async fn test_invalid_input_stays_on_input_screen() {
        let mut app = returning_app(Arc::new(MemoryStore::new()));

        type_text(&mut app, "91");
        app.handle_key_event(key(KeyCode::Tab));
        type_text(&mut app, "0");
        app.handle_key_event(key(KeyCode::Enter));

        assert_eq!(app.router.screen(), AppScreen::Input);
        assert_eq!(app.input.error(), Some("Invalid coordinate ranges"));
    }

    #[tokio::test]
    async fn test_remove_favorite_from_list() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut app = returning_app(store.clone());
        app.favorites.put("Home", Coordinate::new(41.3111, 69.2797)).unwrap();

        app.apply_action(ScreenAction::ViewFavorites);
        app.handle_key_event(key(KeyCode::Char('d')));

        assert!(app.favorites.is_empty());
        assert!(app.favorites_screen.entries.is_empty());
        assert!(FavoritesStore::open(store).load().is_empty());
        assert_eq!(app.router.screen(), AppScreen::Favorites);
    }

    #[tokio::test]
    async fn test_stale_location_name_is_ignored() {
        let mut app = returning_app(Arc::new(MemoryStore::new()));
        app.apply_action(ScreenAction::SelectLocation(Coordinate::new(1.0, 2.0)));
        app.apply_action(ScreenAction::GoBack);
        app.apply_action(ScreenAction::SelectLocation(Coordinate::new(3.0, 4.0)));

        app.handle_app_event(AppEvent::LocationResolved {
            target: Coordinate::new(1.0, 2.0),
            name: "Old".to_string(),
        });
        assert_eq!(app.map.location_name, LOADING_LABEL);
    }

    #[tokio::test]
    async fn test_q_quits_outside_text_fields() {
        let mut app = returning_app(Arc::new(MemoryStore::new()));
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        assert_eq!(app.input.latitude.value, "q");

        app.apply_action(ScreenAction::SelectLocation(Coordinate::new(1.0, 2.0)));
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
