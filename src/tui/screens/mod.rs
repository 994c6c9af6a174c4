//! Screen modules for the pinpoint TUI

pub mod welcome;
pub mod input;
pub mod map;
pub mod favorites;

pub use welcome::WelcomeScreen;
pub use input::InputScreen;
pub use map::MapScreen;
pub use favorites::FavoritesScreen;
