//! Reverse geocoding
//!
//! A [`Geocoder`] turns a coordinate into address components. The rest of
//! the app only ever sees the label produced by [`location_name`], which
//! never fails: missing addresses and lookup errors both degrade to the
//! "Location at ..." fallback.

pub mod nominatim;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::{Config, GeocoderBackend};
use crate::errors::GeocodeError;
use crate::models::Coordinate;

pub use nominatim::NominatimGeocoder;

/// Shown on the map screen while a lookup is in flight
pub const LOADING_LABEL: &str = "Loading...";

/// Used when an address was found but none of its components are usable
pub const UNKNOWN_LOCATION_LABEL: &str = "Unknown location";

/// Address components returned by a geocoder, from most to least specific
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    /// Point of interest or house number
    pub feature_name: Option<String>,
    /// Street
    pub thoroughfare: Option<String>,
    /// City, town or village
    pub locality: Option<String>,
    /// State or region
    pub admin_area: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up the address at `coordinate`. `Ok(None)` means the service
    /// answered but has no address there.
    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<Address>, GeocodeError>;
}

/// Geocoder that never resolves anything, for offline use
#[derive(Debug, Default, Clone)]
pub struct OfflineGeocoder;

#[async_trait]
impl Geocoder for OfflineGeocoder {
    async fn reverse(&self, _coordinate: Coordinate) -> Result<Option<Address>, GeocodeError> {
        Ok(None)
    }
}

/// Build the geocoder selected in the configuration
pub fn build_geocoder(config: &Config) -> anyhow::Result<Arc<dyn Geocoder>> {
    match config.geocoder.backend {
        GeocoderBackend::Nominatim => Ok(Arc::new(NominatimGeocoder::new(&config.geocoder)?)),
        GeocoderBackend::Offline => Ok(Arc::new(OfflineGeocoder)),
    }
}

/// Human-readable description of an address.
///
/// Street-level beats locality, locality beats admin area.
pub fn describe_address(address: &Address) -> String {
    if let Some(thoroughfare) = present(&address.thoroughfare) {
        let mut label = String::new();
        if let Some(feature) = present(&address.feature_name) {
            if feature != thoroughfare {
                label.push_str(feature);
                label.push_str(", ");
            }
        }
        label.push_str(thoroughfare);
        if let Some(locality) = present(&address.locality) {
            label.push_str(", ");
            label.push_str(locality);
        }
        return label;
    }

    if let Some(locality) = present(&address.locality) {
        return match present(&address.admin_area) {
            Some(admin_area) => format!("{}, {}", locality, admin_area),
            None => locality.to_string(),
        };
    }

    match present(&address.admin_area) {
        Some(admin_area) => admin_area.to_string(),
        None => UNKNOWN_LOCATION_LABEL.to_string(),
    }
}

/// A component that is set and not blank
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Label for a coordinate with no resolved address
pub fn fallback_label(coordinate: Coordinate) -> String {
    format!(
        "Location at {:.4}, {:.4}",
        coordinate.latitude, coordinate.longitude
    )
}

/// Best-effort place name for `coordinate`
pub async fn location_name(geocoder: &dyn Geocoder, coordinate: Coordinate) -> String {
    match geocoder.reverse(coordinate).await {
        Ok(Some(address)) => {
            let label = describe_address(&address);
            debug!("Resolved {} to '{}'", coordinate, label);
            label
        }
        Ok(None) => {
            debug!("No address found for {}", coordinate);
            fallback_label(coordinate)
        }
        Err(e) => {
            error!("Error getting location name for {}: {}", coordinate, e);
            fallback_label(coordinate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(
        feature_name: Option<&str>,
        thoroughfare: Option<&str>,
        locality: Option<&str>,
        admin_area: Option<&str>,
    ) -> Address {
        Address {
            feature_name: feature_name.map(str::to_string),
            thoroughfare: thoroughfare.map(str::to_string),
            locality: locality.map(str::to_string),
            admin_area: admin_area.map(str::to_string),
        }
    }

    #[test]
    fn test_street_level_description() {
        let full = address(Some("Amir Temur Square"), Some("Amir Temur Avenue"), Some("Tashkent"), Some("Tashkent Region"));
        assert_eq!(describe_address(&full), "Amir Temur Square, Amir Temur Avenue, Tashkent");

        let same_feature = address(Some("Baker Street"), Some("Baker Street"), Some("London"), None);
        assert_eq!(describe_address(&same_feature), "Baker Street, London");

        let street_only = address(None, Some("Shibuya Crossing"), None, Some("Tokyo"));
        assert_eq!(describe_address(&street_only), "Shibuya Crossing");
    }

    #[test]
    fn test_locality_and_admin_area_fallbacks() {
        assert_eq!(
            describe_address(&address(Some("12"), None, Some("Sydney"), Some("New South Wales"))),
            "Sydney, New South Wales"
        );
        assert_eq!(describe_address(&address(None, None, Some("Sydney"), None)), "Sydney");
        assert_eq!(describe_address(&address(None, None, None, Some("Queensland"))), "Queensland");
        assert_eq!(describe_address(&Address::default()), "Unknown location");
        assert_eq!(describe_address(&address(None, Some("  "), None, None)), "Unknown location");
    }

    #[test]
    fn test_fallback_label_format() {
        assert_eq!(
            fallback_label(Coordinate::new(41.34114558450147, 69.28677201284974)),
            "Location at 41.3411, 69.2868"
        );
        assert_eq!(fallback_label(Coordinate::new(-33.8688, 0.0)), "Location at -33.8688, 0.0000");
    }

    struct FailingGeocoder;

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn reverse(&self, _coordinate: Coordinate) -> Result<Option<Address>, GeocodeError> {
            Err(GeocodeError::Service {
                status_code: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    struct FixedGeocoder(Address);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn reverse(&self, _coordinate: Coordinate) -> Result<Option<Address>, GeocodeError> {
            Ok(Some(self.0.clone()))
        }
    }

    #[tokio::test]
    async fn test_location_name_never_fails() {
        let target = Coordinate::new(51.5074, -0.1278);

        assert_eq!(
            location_name(&FailingGeocoder, target).await,
            "Location at 51.5074, -0.1278"
        );
        assert_eq!(
            location_name(&OfflineGeocoder, target).await,
            "Location at 51.5074, -0.1278"
        );
        assert_eq!(
            location_name(&FixedGeocoder(address(None, None, Some("London"), None)), target).await,
            "London"
        );
    }
}
