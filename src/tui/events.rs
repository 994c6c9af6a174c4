//! Events and actions for the pinpoint TUI

use crate::models::{Coordinate, MapMode};

/// Results delivered to the event loop from background tasks
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A reverse geocoding lookup finished
    LocationResolved { target: Coordinate, name: String },
}

/// What a screen asks the app to do after handling a key
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Leave the welcome screen for good
    CompleteWelcome,
    /// Open the map at a validated coordinate from the input screen
    SelectLocation(Coordinate),
    ViewFavorites,
    /// Open the map at a favorite's coordinate
    ChooseFavorite(Coordinate),
    GoBack,
    SetMapMode(MapMode),
    /// Save the map target under this name
    SaveFavorite(String),
    RemoveFavorite(String),
    SetStatus(String),
    Quit,
    None,
}
