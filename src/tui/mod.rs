//! Terminal user interface for pinpoint
//!
//! Screens are drawn with ratatui; navigation state lives in
//! [`crate::router::ScreenRouter`] and favorites in
//! [`crate::favorites::FavoritesStore`].

pub mod app;
pub mod components;
pub mod events;
pub mod screens;
pub mod ui;

pub use app::App;
pub use events::{AppEvent, ScreenAction};
