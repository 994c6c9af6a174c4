//! Reverse geocoding through a Nominatim server

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Address, Geocoder};
use crate::config::GeocoderConfig;
use crate::errors::GeocodeError;
use crate::models::Coordinate;

/// Body of `GET /reverse?format=jsonv2`
#[derive(Debug, Deserialize)]
pub struct ReverseResponse {
    /// Name of the matched object, empty for plain buildings
    pub name: Option<String>,
    pub address: Option<ReverseAddress>,
    /// Present instead of everything else when nothing was found
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReverseAddress {
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub pedestrian: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub hamlet: Option<String>,
    pub municipality: Option<String>,
    pub state: Option<String>,
    pub region: Option<String>,
    pub province: Option<String>,
}

impl ReverseResponse {
    /// Map Nominatim's address fields onto [`Address`] components
    pub fn into_address(self) -> Option<Address> {
        if let Some(error) = self.error {
            debug!("Nominatim returned no result: {}", error);
            return None;
        }

        let details = self.address?;
        let feature_name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .or(details.house_number);

        Some(Address {
            feature_name,
            thoroughfare: details.road.or(details.pedestrian),
            locality: details
                .city
                .or(details.town)
                .or(details.village)
                .or(details.hamlet)
                .or(details.municipality),
            admin_area: details.state.or(details.region).or(details.province),
        })
    }
}

pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
        })
    }

    fn reverse_url(&self) -> String {
        format!("{}/reverse", self.base_url)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<Address>, GeocodeError> {
        debug!("Reverse geocoding {} via {}", coordinate, self.base_url);

        let response = self
            .client
            .get(self.reverse_url())
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("zoom", "18".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Nominatim request failed with status {}", status);
            return Err(GeocodeError::Service {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: ReverseResponse = response.json().await?;
        Ok(body.into_address())
    }
}
