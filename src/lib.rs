//! pinpoint: explore coordinates on a map and keep named favorite locations
//!
//! The library holds everything except process setup: the favorites store
//! and its key-value persistence, screen routing, coordinate validation,
//! reverse geocoding, the map camera model and the terminal UI.

pub mod config;
pub mod errors;
pub mod favorites;
pub mod geocoding;
pub mod map;
pub mod models;
pub mod router;
pub mod storage;
pub mod tui;

pub use errors::{FavoritesError, GeocodeError, InputError, RouterError, StorageError};
pub use favorites::{Favorites, FavoritesStore};
pub use models::{parse_coordinate_input, Coordinate, FavoriteEntry, MapMode};
pub use router::{AppScreen, ScreenRouter};
