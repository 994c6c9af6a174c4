//! Error types shared across pinpoint

use std::path::PathBuf;
use thiserror::Error;

/// Rejections of the coordinate text fields on the input screen
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid coordinate format")]
    InvalidFormat,

    #[error("Invalid coordinate ranges")]
    InvalidRange,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("Cannot {action} from the {from} screen")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read preferences file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write preferences file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Preferences file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Preference '{key}' has unexpected type, expected {expected}")]
    WrongType {
        key: String,
        expected: &'static str,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("Favorite name must not be empty")]
    EmptyName,

    #[error("Favorite name '{0}' must not contain ':'")]
    InvalidName(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geocoding service error (status {status_code}): {message}")]
    Service { status_code: u16, message: String },
}
