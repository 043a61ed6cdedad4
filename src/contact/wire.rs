//! Decoding of the JSON snapshot documents published by the feed.
//!
//! The producer pairs most values with a status string and emits the value
//! regardless of the status, so a value is only taken over when its status
//! marks it as determined. Numbers sometimes arrive quoted.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer};

use super::error::DecodeError;
use super::types::{
    Altitude, AltitudeKind, Contact, ContactSnapshot, Heading, HeadingKind, Position, Reading,
    SelectedAltitude, SelectedAltitudeSource, Speed, SpeedKind, TriState, VerticalRate,
    VerticalRateSource,
};

const KNOWN: &str = "KNOWN";

#[derive(Debug, Deserialize)]
struct WireSnapshot {
    contacts: Vec<WireContact>,
}

#[derive(Debug, Deserialize)]
struct WireContact {
    icao: String,
    #[serde(default)]
    callsign: Option<String>,
    #[serde(default)]
    aircraft_category: Option<String>,

    #[serde(default)]
    position_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lon: Option<f64>,

    #[serde(default)]
    altitude_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    altitude: Option<f64>,

    #[serde(default)]
    selected_altitude_status: Option<String>,
    #[serde(default)]
    selected_altitude_source: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    selected_altitude: Option<f64>,

    #[serde(default)]
    speed_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    speed: Option<f64>,

    #[serde(default)]
    heading_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    heading: Option<f64>,

    #[serde(default)]
    selected_heading_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    selected_heading: Option<f64>,

    #[serde(default)]
    vertical_rate_status: Option<String>,
    #[serde(default)]
    vertical_rate_source: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    vertical_rate: Option<f64>,

    #[serde(default)]
    baro_pressure_setting_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    baro_pressure_setting: Option<f64>,

    #[serde(default, deserialize_with = "tri_state")]
    autopilot: TriState,
    #[serde(default, deserialize_with = "tri_state")]
    approach_mode: TriState,
    #[serde(default, deserialize_with = "tri_state")]
    altitude_hold_mode: TriState,
    #[serde(default, deserialize_with = "tri_state")]
    tcas_operational: TriState,
    #[serde(default, deserialize_with = "tri_state")]
    lnav_mode: TriState,
    #[serde(default, deserialize_with = "tri_state")]
    vnav_mode: TriState,

    #[serde(default, deserialize_with = "lenient_f64")]
    n_messages: Option<f64>,
    #[serde(deserialize_with = "required_f64")]
    last_seen: f64,
}

pub fn decode_snapshot(
    payload: &[u8],
    received_at: DateTime<Utc>,
) -> Result<ContactSnapshot, DecodeError> {
    let wire: WireSnapshot = serde_json::from_slice(payload)?;
    let contacts = wire.contacts.into_iter().map(Contact::from).collect();
    ContactSnapshot::new(contacts, received_at)
}

impl From<WireContact> for Contact {
    fn from(w: WireContact) -> Self {
        let position = match (is_known(&w.position_status), w.lat, w.lon) {
            (true, Some(lat), Some(lon)) => Reading::Known(Position { lat, lon }),
            _ => Reading::Unknown,
        };

        let altitude = typed(w.altitude_type.as_deref(), altitude_kind, w.altitude)
            .map(|(feet, kind)| Altitude { feet, kind });
        let speed = typed(w.speed_type.as_deref(), speed_kind, w.speed)
            .map(|(knots, kind)| Speed { knots, kind });
        let heading = typed(w.heading_type.as_deref(), heading_kind, w.heading)
            .map(|(degrees, kind)| Heading { degrees, kind });

        let selected_altitude_source = w
            .selected_altitude_source
            .as_deref()
            .and_then(selected_altitude_source);
        let selected_altitude = status_paired(&w.selected_altitude_status, w.selected_altitude)
            .map(|feet| SelectedAltitude {
                feet,
                source: selected_altitude_source,
            });

        let vertical_rate_source = w
            .vertical_rate_source
            .as_deref()
            .and_then(vertical_rate_source);
        let vertical_rate = status_paired(&w.vertical_rate_status, w.vertical_rate).map(
            |feet_per_minute| VerticalRate {
                feet_per_minute,
                source: vertical_rate_source,
            },
        );

        Contact {
            icao: w.icao,
            callsign: w.callsign.map(|c| c.trim().to_string()).unwrap_or_default(),
            position,
            altitude,
            selected_altitude,
            speed,
            heading,
            selected_heading: status_paired(&w.selected_heading_status, w.selected_heading),
            vertical_rate,
            baro_pressure_setting: status_paired(
                &w.baro_pressure_setting_status,
                w.baro_pressure_setting,
            ),
            aircraft_category: w.aircraft_category.unwrap_or_default(),
            autopilot: w.autopilot,
            approach_mode: w.approach_mode,
            altitude_hold_mode: w.altitude_hold_mode,
            tcas_operational: w.tcas_operational,
            lnav_mode: w.lnav_mode,
            vnav_mode: w.vnav_mode,
            n_messages: w
                .n_messages
                .filter(|n| n.is_finite() && *n >= 0.0)
                .map(|n| n as u64)
                .unwrap_or_default(),
            last_seen: w.last_seen,
        }
    }
}

fn is_known(status: &Option<String>) -> bool {
    status.as_deref() == Some(KNOWN)
}

fn status_paired(status: &Option<String>, value: Option<f64>) -> Reading<f64> {
    if is_known(status) {
        value.into()
    } else {
        Reading::Unknown
    }
}

/// Values whose status string doubles as a kind (e.g. `altitude_type`).
/// `UNDETERMINED`, a missing status and unrecognised kinds all yield `Unknown`.
fn typed<K>(
    status: Option<&str>,
    kind_of: fn(&str) -> Option<K>,
    value: Option<f64>,
) -> Reading<(f64, K)> {
    match (status.and_then(kind_of), value) {
        (Some(kind), Some(v)) => Reading::Known((v, kind)),
        _ => Reading::Unknown,
    }
}

fn altitude_kind(s: &str) -> Option<AltitudeKind> {
    match s {
        "GNSS" => Some(AltitudeKind::Gnss),
        "BAROMETRIC" => Some(AltitudeKind::Barometric),
        _ => None,
    }
}

fn speed_kind(s: &str) -> Option<SpeedKind> {
    match s {
        "INDICATED_AIRSPEED" => Some(SpeedKind::IndicatedAirspeed),
        "TRUE_AIRSPEED" => Some(SpeedKind::TrueAirspeed),
        "GROUND_SPEED" => Some(SpeedKind::GroundSpeed),
        "GROUND_MOVEMENT" => Some(SpeedKind::GroundMovement),
        _ => None,
    }
}

fn heading_kind(s: &str) -> Option<HeadingKind> {
    match s {
        "TRACK_ANGLE" => Some(HeadingKind::TrackAngle),
        "MAGNETIC" => Some(HeadingKind::Magnetic),
        "GROUND_HEADING" => Some(HeadingKind::GroundHeading),
        _ => None,
    }
}

fn vertical_rate_source(s: &str) -> Option<VerticalRateSource> {
    match s {
        "GNSS" => Some(VerticalRateSource::Gnss),
        "BAROMETER" => Some(VerticalRateSource::Barometer),
        _ => None,
    }
}

fn selected_altitude_source(s: &str) -> Option<SelectedAltitudeSource> {
    match s {
        "FMS" => Some(SelectedAltitudeSource::Fms),
        "MCPFCU" => Some(SelectedAltitudeSource::Mcpfcu),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Numeric>::deserialize(deserializer)?;
    Ok(raw.and_then(|n| match n {
        Numeric::Number(v) => Some(v),
        Numeric::Text(s) => s.trim().parse().ok(),
    }))
}

fn required_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Numeric::deserialize(deserializer)? {
        Numeric::Number(v) => Ok(v),
        Numeric::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("not a number: {s:?}"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

fn tri_state<'de, D>(deserializer: D) -> Result<TriState, D::Error>
where
    D: Deserializer<'de>,
{
    let state = match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(true)) => TriState::On,
        Some(Flag::Bool(false)) => TriState::Off,
        Some(Flag::Text(s)) if s.eq_ignore_ascii_case("true") => TriState::On,
        Some(Flag::Text(s)) if s.eq_ignore_ascii_case("false") => TriState::Off,
        _ => TriState::NotAvailable,
    };
    Ok(state)
}
