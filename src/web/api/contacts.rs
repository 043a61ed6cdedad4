use axum::{extract::State, Json};

use crate::contact::{is_fresh, Contact};
use crate::view::{map::MapScene, table, ContactTable};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/contacts",
    responses(
        (status = 200, description = "Full telemetry of every fresh contact", body = Vec<Contact>)
    ),
    tag = "contacts"
)]
pub async fn list(State(state): State<AppState>) -> Json<Vec<Contact>> {
    let (snapshot, session) = state.view_inputs().await;
    let contacts = snapshot
        .map(|s| {
            s.contacts()
                .iter()
                .filter(|c| is_fresh(c, session.staleness_threshold_s))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(contacts)
}

#[utoipa::path(
    get,
    path = "/api/contacts/table",
    responses(
        (status = 200, description = "Fresh contacts as table rows", body = ContactTable)
    ),
    tag = "contacts"
)]
pub async fn table(State(state): State<AppState>) -> Json<ContactTable> {
    let (snapshot, session) = state.view_inputs().await;
    Json(table::derive(
        snapshot.as_deref(),
        session.staleness_threshold_s,
    ))
}

#[utoipa::path(
    get,
    path = "/api/contacts/map",
    responses(
        (status = 200, description = "Viewport and oriented markers", body = MapScene),
        (status = 503, description = "Map center not resolved yet", body = ErrorResponse)
    ),
    tag = "contacts"
)]
pub async fn map(State(state): State<AppState>) -> ApiResult<Json<MapScene>> {
    let (snapshot, session) = state.view_inputs().await;
    let mut markers = state.markers.lock().await;
    let scene = markers
        .scene(
            session.initial_center,
            state.config.map.zoom,
            snapshot.as_deref(),
            session.staleness_threshold_s,
        )
        .ok_or(ApiError::Unavailable("location_pending"))?;
    Ok(Json(scene))
}
