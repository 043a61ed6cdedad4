use serde::Deserialize;
use thiserror::Error;

use crate::feed::FeedEndpoint;
use crate::geo::{GeoPoint, LocationSource};
use crate::session::{SessionConfig, SettingsError, DEFAULT_STALENESS_THRESHOLD_S};
use crate::view::map::DEFAULT_ZOOM;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid session settings: {0}")]
    Session(#[from] SettingsError),
    #[error("invalid feed endpoint: {0}")]
    Feed(String),
    #[error("invalid location: {0}")]
    Location(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub feed: FeedEndpoint,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub map: MapConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        WebConfig {
            bind: default_bind(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_threshold")]
    pub staleness_threshold_s: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            staleness_threshold_s: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_STALENESS_THRESHOLD_S
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationConfig {
    pub coordinates: Option<String>,
    pub geolocation_url: Option<String>,
}

impl LocationConfig {
    pub fn source(&self) -> LocationSource {
        LocationSource::from_config(self.coordinates.as_deref(), self.geolocation_url.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_tile_url")]
    pub tile_url: String,
    #[serde(default = "default_attribution")]
    pub attribution: String,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            tile_url: default_tile_url(),
            attribution: default_attribution(),
            zoom: default_zoom(),
        }
    }
}

fn default_tile_url() -> String {
    "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

fn default_attribution() -> String {
    "&copy; OpenStreetMap contributors".to_string()
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.feed
            .request()
            .map_err(|e| ConfigError::Feed(e.to_string()))?;
        self.session_config()?;
        if let Some(coordinates) = &self.location.coordinates {
            GeoPoint::from_coordinates(coordinates)
                .map_err(|e| ConfigError::Location(e.to_string()))?;
        }
        Ok(())
    }

    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        Ok(SessionConfig::new(self.session.staleness_threshold_s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_yaml("feed:\n  host: localhost\n  port: 8765\n").unwrap();
        assert_eq!(config.feed.url(), "ws://localhost:8765/");
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.session.staleness_threshold_s, 10.0);
        assert_eq!(config.map.zoom, 9);
        assert_eq!(config.location.source(), LocationSource::Unavailable);
        config.validate().unwrap();
    }

    #[test]
    fn full_config() {
        let yaml = r#"
feed:
  scheme: wss
  host: adsb.local
  port: 443
  path: contacts
web:
  bind: 127.0.0.1:3000
session:
  staleness_threshold_s: 30
location:
  coordinates: "48.35, 11.78"
map:
  zoom: 11
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.feed.url(), "wss://adsb.local:443/contacts");
        assert_eq!(config.web.bind, "127.0.0.1:3000");
        assert_eq!(config.session_config().unwrap().staleness_threshold_s, 30.0);
        assert_eq!(config.location.source(), LocationSource::Fixed("48.35, 11.78".into()));
        assert_eq!(config.map.zoom, 11);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_invalid_values() {
        let config =
            Config::from_yaml("feed: {host: h, port: 1}\nsession: {staleness_threshold_s: -5}\n")
                .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Session(_))));

        let config =
            Config::from_yaml("feed: {host: h, port: 1}\nlocation: {coordinates: here}\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Location(_))));

        let config = Config::from_yaml("feed: {scheme: http, host: h, port: 1}\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Feed(_))));

        assert!(matches!(Config::from_yaml("web: {}\n"), Err(ConfigError::Yaml(_))));
    }
}
