//! Reusable UI components for the pinpoint TUI

pub mod form_field;

pub use form_field::FormField;
