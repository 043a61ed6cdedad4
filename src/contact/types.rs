use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use strum_macros::Display;
use utoipa::ToSchema;

use super::error::DecodeError;

/// A status-paired telemetry value. `Unknown` covers every case where the
/// feed did not mark the value as determined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Reading<T> {
    Unknown,
    Known(T),
}

impl<T> Reading<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Reading::Known(v) => Some(v),
            Reading::Unknown => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        match self {
            Reading::Known(v) => Reading::Known(f(v)),
            Reading::Unknown => Reading::Unknown,
        }
    }
}

impl<T> Default for Reading<T> {
    fn default() -> Self {
        Reading::Unknown
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Reading::Known(v),
            None => Reading::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TriState {
    On,
    Off,
    #[default]
    NotAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    /// (0, 0) is what the feed reports before a position fix exists.
    pub fn is_sentinel(&self) -> bool {
        self.lat == 0.0 && self.lon == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AltitudeKind {
    Gnss,
    Barometric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpeedKind {
    IndicatedAirspeed,
    TrueAirspeed,
    GroundSpeed,
    GroundMovement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeadingKind {
    TrackAngle,
    Magnetic,
    GroundHeading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerticalRateSource {
    Gnss,
    Barometer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectedAltitudeSource {
    Fms,
    Mcpfcu,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Altitude {
    pub feet: f64,
    pub kind: AltitudeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SelectedAltitude {
    pub feet: f64,
    pub source: Option<SelectedAltitudeSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Speed {
    pub knots: f64,
    pub kind: SpeedKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Heading {
    pub degrees: f64,
    pub kind: HeadingKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct VerticalRate {
    pub feet_per_minute: f64,
    pub source: Option<VerticalRateSource>,
}

// Displayed forms carry only the number; the kind is shown by the JSON API.
impl fmt::Display for Altitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.feet)
    }
}

impl fmt::Display for SelectedAltitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.feet)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.knots)
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees)
    }
}

impl fmt::Display for VerticalRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.feet_per_minute)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Contact {
    pub icao: String,
    pub callsign: String,
    #[schema(value_type = Object)]
    pub position: Reading<Position>,
    #[schema(value_type = Object)]
    pub altitude: Reading<Altitude>,
    #[schema(value_type = Object)]
    pub selected_altitude: Reading<SelectedAltitude>,
    #[schema(value_type = Object)]
    pub speed: Reading<Speed>,
    #[schema(value_type = Object)]
    pub heading: Reading<Heading>,
    #[schema(value_type = Object)]
    pub selected_heading: Reading<f64>,
    #[schema(value_type = Object)]
    pub vertical_rate: Reading<VerticalRate>,
    #[schema(value_type = Object)]
    pub baro_pressure_setting: Reading<f64>,
    pub aircraft_category: String,
    pub autopilot: TriState,
    pub approach_mode: TriState,
    pub altitude_hold_mode: TriState,
    pub tcas_operational: TriState,
    pub lnav_mode: TriState,
    pub vnav_mode: TriState,
    pub n_messages: u64,
    pub last_seen: f64,
}

impl Contact {
    pub fn new(icao: impl Into<String>, last_seen: f64) -> Self {
        Contact {
            icao: icao.into(),
            callsign: String::new(),
            position: Reading::Unknown,
            altitude: Reading::Unknown,
            selected_altitude: Reading::Unknown,
            speed: Reading::Unknown,
            heading: Reading::Unknown,
            selected_heading: Reading::Unknown,
            vertical_rate: Reading::Unknown,
            baro_pressure_setting: Reading::Unknown,
            aircraft_category: String::new(),
            autopilot: TriState::NotAvailable,
            approach_mode: TriState::NotAvailable,
            altitude_hold_mode: TriState::NotAvailable,
            tcas_operational: TriState::NotAvailable,
            lnav_mode: TriState::NotAvailable,
            vnav_mode: TriState::NotAvailable,
            n_messages: 0,
            last_seen,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactSnapshot {
    contacts: Vec<Contact>,
    received_at: DateTime<Utc>,
}

impl ContactSnapshot {
    pub fn new(contacts: Vec<Contact>, received_at: DateTime<Utc>) -> Result<Self, DecodeError> {
        let mut seen = HashSet::with_capacity(contacts.len());
        for contact in &contacts {
            if !seen.insert(contact.icao.as_str()) {
                return Err(DecodeError::DuplicateIcao(contact.icao.clone()));
            }
        }
        Ok(ContactSnapshot {
            contacts,
            received_at,
        })
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn get(&self, icao: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.icao == icao)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}
