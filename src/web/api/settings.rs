use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::session::SessionConfig;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

/// Threshold as typed by the user: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ThresholdInput {
    Seconds(f64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SettingsUpdate {
    pub staleness_threshold_s: ThresholdInput,
}

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Current session settings", body = SessionConfig)
    ),
    tag = "settings"
)]
pub async fn get_settings(State(state): State<AppState>) -> Json<SessionConfig> {
    Json(state.session.read().await.clone())
}

#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = SettingsUpdate,
    responses(
        (status = 200, description = "Settings updated", body = SessionConfig),
        (status = 400, description = "Invalid threshold, settings unchanged", body = ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn put_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> ApiResult<Json<SessionConfig>> {
    let mut session = state.session.write().await;
    match update.staleness_threshold_s {
        ThresholdInput::Seconds(seconds) => session.set_threshold(seconds)?,
        ThresholdInput::Text(text) => session.set_threshold_from_input(&text)?,
    }
    Ok(Json(session.clone()))
}
