use std::fmt;

use crate::errors::InputError;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// A point on the Earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components inside their ranges. NaN is never in range.
    pub fn is_in_range(&self) -> bool {
        (MIN_LATITUDE..=MAX_LATITUDE).contains(&self.latitude)
            && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.longitude)
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Parse the two text fields of the input screen into a coordinate.
///
/// Format errors win over range errors: `("abc", "500")` is reported as
/// [`InputError::InvalidFormat`].
pub fn parse_coordinate_input(latitude: &str, longitude: &str) -> Result<Coordinate, InputError> {
    let latitude = parse_degrees(latitude)?;
    let longitude = parse_degrees(longitude)?;

    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_in_range() {
        return Err(InputError::InvalidRange);
    }
    Ok(coordinate)
}

/// Only the literal words `NaN` and `Infinity` (optionally signed) count as
/// numbers. Other spellings that `f64::from_str` accepts, like `inf` or
/// `nan`, are format errors.
fn parse_degrees(text: &str) -> Result<f64, InputError> {
    let text = text.trim();
    let unsigned = text
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(text);
    let is_word = !unsigned.is_empty() && unsigned.chars().all(|c| c.is_ascii_alphabetic());
    if is_word && !matches!(unsigned, "NaN" | "Infinity") {
        return Err(InputError::InvalidFormat);
    }

    text.parse().map_err(|_| InputError::InvalidFormat)
}

/// A named, user-saved coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteEntry {
    pub name: String,
    pub coordinate: Coordinate,
}

/// How the map is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapMode {
    #[default]
    Standard,
    Satellite,
    Night,
}

impl MapMode {
    pub const ALL: [MapMode; 3] = [MapMode::Standard, MapMode::Satellite, MapMode::Night];

    pub fn as_str(&self) -> &str {
        match self {
            MapMode::Standard => "standard",
            MapMode::Satellite => "satellite",
            MapMode::Night => "night",
        }
    }

    /// Single-letter label used on the map screen controls
    pub fn short_label(&self) -> char {
        match self {
            MapMode::Standard => 'M',
            MapMode::Satellite => 'S',
            MapMode::Night => 'N',
        }
    }
}

impl std::str::FromStr for MapMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "normal" | "m" => Ok(MapMode::Standard),
            "satellite" | "s" => Ok(MapMode::Satellite),
            "night" | "n" => Ok(MapMode::Night),
            other => Err(anyhow::anyhow!(
                "Unsupported map mode: {}. Supported modes: standard, satellite, night",
                other
            )),
        }
    }
}

/// Shortcut shown on the input screen
#[derive(Debug, Clone, Copy)]
pub struct QuickLocation {
    pub label: &'static str,
    pub coordinate: Coordinate,
}

pub const QUICK_LOCATIONS: [QuickLocation; 4] = [
    QuickLocation {
        label: "🏫 Campus",
        coordinate: Coordinate::new(41.34114558450147, 69.28677201284974),
    },
    QuickLocation {
        label: "🇬🇧 London",
        coordinate: Coordinate::new(51.5074, -0.1278),
    },
    QuickLocation {
        label: "🗼 Tokyo",
        coordinate: Coordinate::new(35.6762, 139.6503),
    },
    QuickLocation {
        label: "🏄 Sydney",
        coordinate: Coordinate::new(-33.8688, 151.2093),
    },
];
