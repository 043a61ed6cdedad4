use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::geo::GeoPoint;

pub const DEFAULT_STALENESS_THRESHOLD_S: f64 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("threshold must be finite")]
    NotFinite,
    #[error("threshold must not be negative, got {0}")]
    Negative(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SessionConfig {
    /// Contacts with `last_seen` at or above this many seconds are hidden.
    pub staleness_threshold_s: f64,
    pub initial_center: Option<GeoPoint>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            staleness_threshold_s: DEFAULT_STALENESS_THRESHOLD_S,
            initial_center: None,
        }
    }
}

impl SessionConfig {
    pub fn new(staleness_threshold_s: f64) -> Result<Self, SettingsError> {
        let mut config = SessionConfig::default();
        config.set_threshold(staleness_threshold_s)?;
        Ok(config)
    }

    /// Updates the threshold; on error the previous value is kept.
    pub fn set_threshold(&mut self, seconds: f64) -> Result<(), SettingsError> {
        if !seconds.is_finite() {
            return Err(SettingsError::NotFinite);
        }
        if seconds < 0.0 {
            return Err(SettingsError::Negative(seconds));
        }
        self.staleness_threshold_s = seconds;
        log::info!("Staleness threshold set to {}s", seconds);
        Ok(())
    }

    pub fn set_threshold_from_input(&mut self, input: &str) -> Result<(), SettingsError> {
        let seconds: f64 = input
            .trim()
            .parse()
            .map_err(|_| SettingsError::NotANumber(input.to_string()))?;
        self.set_threshold(seconds)
    }

    pub fn init_center(&mut self, center: GeoPoint) {
        if self.initial_center.is_none() {
            self.initial_center = Some(center);
        }
    }
}
