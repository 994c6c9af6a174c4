//! Screen navigation state
//!
//! The router only tracks which screen is showing and the data that screen
//! needs. It has no side effects; persistence and lookups happen elsewhere.

use tracing::{debug, warn};

use crate::errors::RouterError;
use crate::models::{Coordinate, MapMode};

/// Screens of the location flow
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppScreen {
    Input,
    Map { target: Coordinate },
    Favorites,
}

impl AppScreen {
    pub fn name(&self) -> &'static str {
        match self {
            AppScreen::Input => "input",
            AppScreen::Map { .. } => "map",
            AppScreen::Favorites => "favorites",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppScreen::Input => "Enter Coordinates",
            AppScreen::Map { .. } => "Map",
            AppScreen::Favorites => "Favorite Locations",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScreenRouter {
    screen: AppScreen,
    map_mode: MapMode,
}

impl Default for ScreenRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenRouter {
    pub fn new() -> Self {
        Self {
            screen: AppScreen::Input,
            map_mode: MapMode::default(),
        }
    }

    pub fn screen(&self) -> AppScreen {
        self.screen
    }

    /// Coordinate shown on the map, if the map is the current screen
    pub fn target(&self) -> Option<Coordinate> {
        match self.screen {
            AppScreen::Map { target } => Some(target),
            _ => None,
        }
    }

    pub fn map_mode(&self) -> MapMode {
        self.map_mode
    }

    pub fn set_map_mode(&mut self, mode: MapMode) {
        debug!("Map mode changed to {}", mode.as_str());
        self.map_mode = mode;
    }

    /// Input -> Map. The coordinate must already be validated.
    pub fn select_location(&mut self, coordinate: Coordinate) -> Result<(), RouterError> {
        match self.screen {
            AppScreen::Input => self.go_to(AppScreen::Map { target: coordinate }),
            AppScreen::Map { .. } | AppScreen::Favorites => {
                Err(self.rejected("select a location"))
            }
        }
    }

    /// Map or Favorites -> Input
    pub fn go_back(&mut self) -> Result<(), RouterError> {
        match self.screen {
            AppScreen::Map { .. } | AppScreen::Favorites => self.go_to(AppScreen::Input),
            AppScreen::Input => Err(self.rejected("go back")),
        }
    }

    /// Input -> Favorites
    pub fn view_favorites(&mut self) -> Result<(), RouterError> {
        match self.screen {
            AppScreen::Input => self.go_to(AppScreen::Favorites),
            AppScreen::Map { .. } | AppScreen::Favorites => Err(self.rejected("view favorites")),
        }
    }

    /// Favorites -> Map
    pub fn choose_favorite(&mut self, coordinate: Coordinate) -> Result<(), RouterError> {
        match self.screen {
            AppScreen::Favorites => self.go_to(AppScreen::Map { target: coordinate }),
            AppScreen::Input | AppScreen::Map { .. } => Err(self.rejected("choose a favorite")),
        }
    }

    fn go_to(&mut self, screen: AppScreen) -> Result<(), RouterError> {
        debug!("Navigating from {} to {}", self.screen.name(), screen.name());
        self.screen = screen;
        Ok(())
    }

    fn rejected(&self, action: &'static str) -> RouterError {
        warn!("Ignoring '{}' on the {} screen", action, self.screen.name());
        RouterError::InvalidTransition {
            from: self.screen.name(),
            action,
        }
    }
}
