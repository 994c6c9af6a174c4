//! Centralized configuration management for pinpoint

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the JSON preferences file holding favorites and flags
    pub prefs_path: PathBuf,
    /// Log file written in TUI mode
    pub log_file: PathBuf,
    /// Reverse geocoding configuration
    pub geocoder: GeocoderConfig,
}

/// Which reverse geocoder to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocoderBackend {
    Nominatim,
    Offline,
}

impl std::str::FromStr for GeocoderBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "nominatim" | "osm" => Ok(GeocoderBackend::Nominatim),
            "offline" | "none" => Ok(GeocoderBackend::Offline),
            other => Err(anyhow::anyhow!(
                "Unsupported geocoder: {}. Supported geocoders: nominatim, offline",
                other
            )),
        }
    }
}

/// Reverse geocoding configuration
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub backend: GeocoderBackend,
    /// Base URL of the Nominatim server
    pub nominatim_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string, required by the public Nominatim usage policy
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            backend: GeocoderBackend::Nominatim,
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            timeout_seconds: 10,
            user_agent: "pinpoint/0.1.0".to_string(),
        }
    }
}

impl GeocoderConfig {
    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefs_path: "./pinpoint_prefs.json".into(),
            log_file: "pinpoint.log".into(),
            geocoder: GeocoderConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let prefs_path = std::env::var("PINPOINT_PREFS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.prefs_path);

        let log_file = std::env::var("PINPOINT_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        let geocoder = GeocoderConfig {
            backend: parse_env_var("PINPOINT_GEOCODER")?.unwrap_or(defaults.geocoder.backend),
            nominatim_url: std::env::var("PINPOINT_NOMINATIM_URL")
                .unwrap_or(defaults.geocoder.nominatim_url),
            timeout_seconds: parse_env_var("PINPOINT_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.geocoder.timeout_seconds),
            user_agent: std::env::var("PINPOINT_USER_AGENT")
                .unwrap_or(defaults.geocoder.user_agent),
        };

        Ok(Config {
            prefs_path,
            log_file,
            geocoder,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(parent) = self.prefs_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Cannot create preferences directory: {}", parent.display())
                })?;
            }
        }

        if self.geocoder.backend == GeocoderBackend::Nominatim
            && !self.geocoder.nominatim_url.starts_with("http")
        {
            return Err(anyhow::anyhow!(
                "Nominatim URL must start with http:// or https://: {}",
                self.geocoder.nominatim_url
            ));
        }

        if self.geocoder.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be at least one second"));
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).map_err(|e| {
            anyhow::anyhow!(
                "Failed to parse environment variable {} = '{}': {}",
                var_name,
                val,
                e
            )
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.prefs_path, PathBuf::from("./pinpoint_prefs.json"));
        assert_eq!(config.geocoder.backend, GeocoderBackend::Nominatim);
        assert_eq!(config.geocoder.http_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_config_validation() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.prefs_path = temp_dir.path().join("state").join("prefs.json");
        config.validate().unwrap();
        assert!(temp_dir.path().join("state").is_dir());

        config.geocoder.nominatim_url = "nominatim.local".to_string();
        assert!(config.validate().is_err());

        config.geocoder.backend = GeocoderBackend::Offline;
        config.validate().unwrap();
    }

    #[test]
    fn test_geocoder_backend_parsing() {
        assert_eq!("OSM".parse::<GeocoderBackend>().unwrap(), GeocoderBackend::Nominatim);
        assert_eq!("offline".parse::<GeocoderBackend>().unwrap(), GeocoderBackend::Offline);
        assert!("google".parse::<GeocoderBackend>().is_err());
    }
}
