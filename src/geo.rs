use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 52.52,
    lon: 13.405,
};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("invalid coordinates '{0}', expected \"lat, lon\"")]
    InvalidCoordinates(String),
    #[error("coordinates out of range: {lat}, {lon}")]
    OutOfRange { lat: f64, lon: f64 },
    #[error("location lookup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no location source configured")]
    Unavailable,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeolocationError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(GeolocationError::OutOfRange { lat, lon });
        }
        Ok(GeoPoint { lat, lon })
    }

    pub fn from_coordinates(coordinates: &str) -> Result<Self, GeolocationError> {
        let invalid = || GeolocationError::InvalidCoordinates(coordinates.to_string());
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return Err(invalid());
        }
        let lat = parts[0].parse().map_err(|_| invalid())?;
        let lon = parts[1].parse().map_err(|_| invalid())?;
        Self::new(lat, lon)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    Fixed(String),
    Http(String),
    Unavailable,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(alias = "latitude")]
    lat: f64,
    #[serde(alias = "longitude")]
    lon: f64,
}

impl LocationSource {
    pub fn from_config(coordinates: Option<&str>, lookup_url: Option<&str>) -> Self {
        match (coordinates, lookup_url) {
            (Some(c), _) => LocationSource::Fixed(c.to_string()),
            (None, Some(url)) => LocationSource::Http(url.to_string()),
            (None, None) => LocationSource::Unavailable,
        }
    }

    pub async fn locate(&self) -> Result<GeoPoint, GeolocationError> {
        match self {
            LocationSource::Fixed(coordinates) => GeoPoint::from_coordinates(coordinates),
            LocationSource::Http(url) => {
                let client = reqwest::Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
                let response: LookupResponse = client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                GeoPoint::new(response.lat, response.lon)
            }
            LocationSource::Unavailable => Err(GeolocationError::Unavailable),
        }
    }
}

/// Resolves the viewport center once. Never fails: any lookup problem falls
/// back to [`DEFAULT_CENTER`].
pub async fn resolve_initial_center(source: &LocationSource) -> GeoPoint {
    match source.locate().await {
        Ok(center) => {
            log::info!("Map centered on {}, {}", center.lat, center.lon);
            center
        }
        Err(GeolocationError::Unavailable) => {
            log::info!("No location configured, using default map center");
            DEFAULT_CENTER
        }
        Err(e) => {
            log::warn!("Could not determine location ({}), using default map center", e);
            DEFAULT_CENTER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};

    #[test]
    fn parses_coordinate_pairs() {
        let p = GeoPoint::from_coordinates("48.1, 11.5").unwrap();
        assert_eq!(p, GeoPoint { lat: 48.1, lon: 11.5 });
        assert!(GeoPoint::from_coordinates("48.1").is_err());
        assert!(GeoPoint::from_coordinates("48.1, east").is_err());
        assert!(GeoPoint::from_coordinates("1, 2, 3").is_err());
        assert!(matches!(
            GeoPoint::from_coordinates("95, 0"),
            Err(GeolocationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn fixed_coordinates_take_precedence() {
        let source = LocationSource::from_config(Some("1, 2"), Some("http://localhost"));
        assert_eq!(source, LocationSource::Fixed("1, 2".into()));
        assert_eq!(
            LocationSource::from_config(None, None),
            LocationSource::Unavailable
        );
    }

    #[tokio::test]
    async fn falls_back_to_default_center() {
        let center = resolve_initial_center(&LocationSource::Unavailable).await;
        assert_eq!(center, DEFAULT_CENTER);

        let center = resolve_initial_center(&LocationSource::Fixed("nowhere".into())).await;
        assert_eq!(center, DEFAULT_CENTER);
    }

    #[tokio::test]
    async fn http_lookup_accepts_long_field_names() {
        let app = Router::new().route(
            "/where",
            get(|| async { Json(serde_json::json!({"latitude": 40.4, "longitude": -3.7})) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let source = LocationSource::Http(format!("http://{}/where", addr));
        let center = resolve_initial_center(&source).await;
        assert_eq!(center, GeoPoint { lat: 40.4, lon: -3.7 });
    }

    #[tokio::test]
    async fn http_lookup_failure_falls_back() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = LocationSource::Http(format!("http://{}/where", addr));
        assert!(source.locate().await.is_err());
        assert_eq!(resolve_initial_center(&source).await, DEFAULT_CENTER);
    }
}
